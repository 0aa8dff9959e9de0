//! Event lifecycle endpoints

use axum::extract::State;
use axum::http::StatusCode;
use crate::handlers::response::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::middleware::{AdminUser, AuthUser, MaybeAuthUser};
use crate::models::event::{
    ApproveEventRequest, CreateEventRequest, Event, EventDetails, EventFilter, EventPage,
    RejectEventRequest, UpdateEventRequest, UpdateMediaRequest,
};
use crate::state::AppState;

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(actor): MaybeAuthUser,
    ApiQuery(filter): ApiQuery<EventFilter>,
) -> ApiResult<ApiResponse<EventPage>> {
    let page = state.services.event_service.list(actor.as_ref(), filter).await?;
    Ok(ApiResponse::ok(page))
}

/// GET /api/events/mine
pub async fn mine(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiQuery(filter): ApiQuery<EventFilter>,
) -> ApiResult<ApiResponse<EventPage>> {
    let page = state.services.event_service.my_events(&actor, filter).await?;
    Ok(ApiResponse::ok(page))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiJson(request): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, ApiResponse<Event>)> {
    let event = state.services.event_service.create(&actor, request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Event created as draft", event)))
}

/// GET /api/events/:id
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(actor): MaybeAuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<EventDetails>> {
    let details = state.services.event_service.get(actor.as_ref(), event_id).await?;
    Ok(ApiResponse::ok(details))
}

/// PUT /api/events/:id
pub async fn update(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.update(&actor, event_id, request).await?;
    Ok(ApiResponse::with_message("Event updated", event))
}

/// PUT /api/events/:id/media
pub async fn update_media(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateMediaRequest>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.update_media(&actor, event_id, request).await?;
    Ok(ApiResponse::with_message("Media updated", event))
}

/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<()>> {
    state.services.event_service.delete(&actor, event_id).await?;
    Ok(ApiResponse::message("Event deleted"))
}

/// POST /api/events/:id/submit
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.submit(&actor, event_id).await?;
    Ok(ApiResponse::with_message("Event submitted for approval", event))
}

/// POST /api/events/:id/cancel-submission
pub async fn cancel_submission(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.cancel_submission(&actor, event_id).await?;
    Ok(ApiResponse::with_message("Submission cancelled", event))
}

/// POST /api/events/:id/approve
pub async fn approve(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiPath(event_id): ApiPath<i64>,
    body: Option<ApiJson<ApproveEventRequest>>,
) -> ApiResult<ApiResponse<Event>> {
    let notes = body.and_then(|ApiJson(request)| request.approval_notes);
    let event = state.services.event_service.approve(&actor, event_id, notes).await?;
    Ok(ApiResponse::with_message("Event approved", event))
}

/// POST /api/events/:id/reject
pub async fn reject(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiPath(event_id): ApiPath<i64>,
    body: Option<ApiJson<RejectEventRequest>>,
) -> ApiResult<ApiResponse<Event>> {
    let notes = body.and_then(|ApiJson(request)| request.rejection_notes);
    let event = state
        .services
        .event_service
        .reject(&actor, event_id, notes.as_deref())
        .await?;
    Ok(ApiResponse::with_message("Event rejected", event))
}

/// POST /api/events/:id/close-registration
pub async fn close_registration(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.close_registration(&actor, event_id).await?;
    Ok(ApiResponse::with_message("Registration closed", event))
}

/// POST /api/events/:id/open-registration
pub async fn open_registration(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Event>> {
    let event = state.services.event_service.open_registration(&actor, event_id).await?;
    Ok(ApiResponse::with_message("Registration reopened", event))
}

/// GET /api/admin/events/pending
pub async fn pending(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
) -> ApiResult<ApiResponse<Vec<Event>>> {
    let events = state.services.event_service.pending(&actor).await?;
    Ok(ApiResponse::ok(events))
}
