//! HTTP router tests
//!
//! The router is driven with `oneshot` over a pool that never connects, so
//! these cover everything decided before the database is reached. A valid
//! token still needs its account loaded, which fails here with a 500.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use campus_events::config::Settings;
use campus_events::database::connection::{create_lazy_pool, DatabaseConfig};
use campus_events::database::DatabaseService;
use campus_events::models::user::{Gender, User, UserRole};
use campus_events::{router, AppState};

fn test_state(settings: &Settings) -> AppState {
    let config = DatabaseConfig {
        url: "postgresql://nobody@127.0.0.1:1/none".to_string(),
        min_connections: 0,
        acquire_timeout: Duration::from_millis(500),
        ..Default::default()
    };
    let pool = create_lazy_pool(&config).unwrap();
    AppState::new(settings, DatabaseService::new(pool)).unwrap()
}

fn test_app() -> (Router, AppState) {
    let settings = Settings::default();
    let state = test_state(&settings);
    (router(state.clone(), &settings.server.cors_origins), state)
}

fn token_for(state: &AppState, user_id: i64, role: UserRole) -> String {
    let now = Utc::now();
    let user = User {
        id: user_id,
        student_id: format!("S{}", user_id),
        email: format!("s{}@student.university.edu", user_id),
        password_hash: String::new(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        role,
        gender: Gender::Other,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    state.services.auth_service.issue_token(&user).unwrap().token
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (app, _) = test_app();

    let response = app.oneshot(request(Method::GET, "/api/auth/me", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (app, _) = test_app();

    let response = app
        .oneshot(request(Method::GET, "/api/events/mine", Some("not-a-jwt"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid or expired token");
}

#[tokio::test]
async fn test_malformed_path_id_is_a_validation_error() {
    let (app, _) = test_app();

    let response = app.oneshot(request(Method::GET, "/api/events/abc", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_json_body_is_a_validation_error() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"studentId\":"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_uses_envelope() {
    let (app, _) = test_app();

    let response = app.oneshot(request(Method::GET, "/nope", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_health_reports_unavailable_database() {
    let (app, _) = test_app();

    let response = app.oneshot(request(Method::GET, "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_internal_error_detail_outside_production() {
    let (app, state) = test_app();
    let token = token_for(&state, 9, UserRole::Student);

    let response = app
        .oneshot(request(Method::GET, "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Database error")));
}

#[tokio::test]
async fn test_internal_error_detail_hidden_in_production() {
    let mut settings = Settings::default();
    settings.app.environment = "production".to_string();
    let state = test_state(&settings);
    let app = router(state.clone(), &settings.server.cors_origins);
    let token = token_for(&state, 9, UserRole::Student);

    let response = app
        .oneshot(request(Method::GET, "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nope")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}
