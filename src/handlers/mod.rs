//! HTTP handlers module
//!
//! Routes are grouped by resource; everything except the health check and
//! the shareable-link redirect lives under `/api`.

pub mod analytics;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod registrations;
pub mod response;
pub mod system;
pub mod users;

pub use response::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};

use axum::middleware::map_response_with_state;
use axum::routing::{get, post, put};
use axum::Router;
use crate::middleware::{cors_layer, with_request_tracing};
use crate::state::AppState;

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/users", get(users::list_users))
        .route("/users/:id/role", put(users::set_role))
        .route("/users/:id/active", put(users::set_active))
        // Event lifecycle
        .route("/events", get(events::list).post(events::create))
        .route("/events/mine", get(events::mine))
        .route("/events/:id", get(events::get).put(events::update).delete(events::delete))
        .route("/events/:id/media", put(events::update_media))
        .route("/events/:id/submit", post(events::submit))
        .route("/events/:id/cancel-submission", post(events::cancel_submission))
        .route("/events/:id/approve", post(events::approve))
        .route("/events/:id/reject", post(events::reject))
        .route("/events/:id/close-registration", post(events::close_registration))
        .route("/events/:id/open-registration", post(events::open_registration))
        .route("/admin/events/pending", get(events::pending))
        // Registrations
        .route("/events/:id/register", post(registrations::register).delete(registrations::cancel))
        .route("/events/:id/registrations", get(registrations::for_event))
        .route("/events/:id/roster", get(registrations::roster))
        .route("/registrations/mine", get(registrations::mine))
        .route("/registrations/:id/attend", post(registrations::mark_attended))
        // Notifications
        .route("/notifications", get(notifications::list).delete(notifications::delete_all))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/:id", axum::routing::delete(notifications::delete))
        .route("/notifications/:id/read", put(notifications::mark_read))
        // Analytics
        .route("/analytics/events/:id", get(analytics::event_stats))
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/overview", get(analytics::overview))
}

/// Build the application router
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let app = Router::new()
        .nest("/api", api_routes())
        .route("/s/:code", get(system::shared_link))
        .route("/health", get(system::health))
        .fallback(system::not_found)
        .layer(map_response_with_state(state.clone(), response::hide_internal_errors))
        .with_state(state);

    with_request_tracing(app).layer(cors_layer(cors_origins))
}
