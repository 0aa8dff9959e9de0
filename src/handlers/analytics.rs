//! Analytics endpoints

use axum::extract::State;
use crate::handlers::response::{ApiPath, ApiResponse, ApiResult};
use crate::middleware::{AdminUser, AuthUser};
use crate::models::analytics::{EventStats, OrganizerDashboard, PlatformOverview};
use crate::state::AppState;

/// GET /api/analytics/events/:id
pub async fn event_stats(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<EventStats>> {
    let stats = state.services.analytics_service.event_stats(&actor, event_id).await?;
    Ok(ApiResponse::ok(stats))
}

/// GET /api/analytics/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<OrganizerDashboard>> {
    let dashboard = state.services.analytics_service.organizer_dashboard(&actor).await?;
    Ok(ApiResponse::ok(dashboard))
}

/// GET /api/analytics/overview
pub async fn overview(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
) -> ApiResult<ApiResponse<PlatformOverview>> {
    let overview = state.services.analytics_service.platform_overview(&actor).await?;
    Ok(ApiResponse::ok(overview))
}
