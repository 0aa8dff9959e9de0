//! Health check, shareable-link redirect and fallback

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde_json::json;
use tracing::warn;
use crate::handlers::response::{ApiPath, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::utils::errors::CampusEventsError;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    match state.db.health_check().await {
        Ok(()) => {
            ApiResponse::ok(json!({ "status": "ok", "version": crate::VERSION })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::failure("Database unavailable", Some("unavailable".to_string())),
            )
                .into_response()
        }
    }
}

/// GET /s/:code
pub async fn shared_link(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> ApiResult<Redirect> {
    let target = state.services.event_service.resolve_share_code(&code).await?;
    Ok(Redirect::temporary(&target))
}

pub async fn not_found() -> CampusEventsError {
    CampusEventsError::NotFound("Route".to_string())
}
