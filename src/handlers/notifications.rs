//! Notification inbox endpoints

use axum::extract::State;
use serde_json::{json, Value};
use crate::handlers::response::{ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::models::notification::{Notification, NotificationPage, NotificationQuery};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> ApiResult<ApiResponse<NotificationPage>> {
    let page = state.services.notification_service.list(actor.user_id, &query).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<Value>> {
    let unread = state.services.notification_service.unread_count(actor.user_id).await?;
    Ok(ApiResponse::ok(json!({ "unread": unread })))
}

/// PUT /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(notification_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Notification>> {
    let notification = state
        .services
        .notification_service
        .mark_read(actor.user_id, notification_id)
        .await?;
    Ok(ApiResponse::ok(notification))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<Value>> {
    let updated = state.services.notification_service.mark_all_read(actor.user_id).await?;
    Ok(ApiResponse::with_message("All notifications marked as read", json!({ "updated": updated })))
}

/// DELETE /api/notifications/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(notification_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state
        .services
        .notification_service
        .delete(actor.user_id, notification_id)
        .await?;
    Ok(ApiResponse::message("Notification deleted"))
}

/// DELETE /api/notifications
pub async fn delete_all(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<Value>> {
    let deleted = state.services.notification_service.delete_all(actor.user_id).await?;
    Ok(ApiResponse::with_message("All notifications deleted", json!({ "deleted": deleted })))
}
