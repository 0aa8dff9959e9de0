//! Registration endpoints

use axum::extract::State;
use axum::http::StatusCode;
use crate::handlers::response::{ApiJson, ApiPath, ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::models::registration::{
    AttendanceRoster, CancelRegistrationRequest, CreateRegistrationRequest, MyRegistration,
    RegistrantEntry, Registration, RegistrationOutcome, RegistrationStatus,
};
use crate::state::AppState;

/// POST /api/events/:id/register
pub async fn register(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
    body: Option<ApiJson<CreateRegistrationRequest>>,
) -> ApiResult<(StatusCode, ApiResponse<RegistrationOutcome>)> {
    let source = body.map(|ApiJson(request)| request.source).unwrap_or_default();
    let outcome = state
        .services
        .registration_service
        .register(&actor, event_id, source)
        .await?;

    let message = if outcome.registration.status == RegistrationStatus::Waitlisted {
        "Event is full; you have been added to the waitlist"
    } else {
        "Successfully registered for event"
    };
    Ok((StatusCode::CREATED, ApiResponse::with_message(message, outcome)))
}

/// DELETE /api/events/:id/register
pub async fn cancel(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
    body: Option<ApiJson<CancelRegistrationRequest>>,
) -> ApiResult<ApiResponse<Registration>> {
    let reason = body.and_then(|ApiJson(request)| request.reason);
    let removed = state
        .services
        .registration_service
        .cancel(&actor, event_id, reason)
        .await?;
    Ok(ApiResponse::with_message("Registration cancelled", removed))
}

/// GET /api/events/:id/registrations
pub async fn for_event(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Vec<RegistrantEntry>>> {
    let entries = state
        .services
        .registration_service
        .event_registrations(&actor, event_id)
        .await?;
    Ok(ApiResponse::ok(entries))
}

/// GET /api/events/:id/roster
pub async fn roster(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(event_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<AttendanceRoster>> {
    let roster = state.services.registration_service.roster(&actor, event_id).await?;
    Ok(ApiResponse::ok(roster))
}

/// POST /api/registrations/:id/attend
pub async fn mark_attended(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ApiPath(registration_id): ApiPath<i64>,
) -> ApiResult<ApiResponse<Registration>> {
    let registration = state
        .services
        .registration_service
        .mark_attended(&actor, registration_id)
        .await?;
    Ok(ApiResponse::with_message("Attendance recorded", registration))
}

/// GET /api/registrations/mine
pub async fn mine(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<Vec<MyRegistration>>> {
    let registrations = state.services.registration_service.my_registrations(&actor).await?;
    Ok(ApiResponse::ok(registrations))
}
