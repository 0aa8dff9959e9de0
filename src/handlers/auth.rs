//! Account endpoints

use axum::extract::State;
use axum::http::StatusCode;
use crate::handlers::response::{ApiJson, ApiResponse, ApiResult};
use crate::middleware::AuthUser;
use crate::models::user::{LoginRequest, RegisterUserRequest, User};
use crate::services::LoginResponse;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterUserRequest>,
) -> ApiResult<(StatusCode, ApiResponse<User>)> {
    let user = state.services.user_service.register(request).await?;
    Ok((StatusCode::CREATED, ApiResponse::with_message("Registration successful", user)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<ApiResponse<LoginResponse>> {
    let response = state.services.user_service.login(request).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> ApiResult<ApiResponse<User>> {
    let user = state.services.user_service.profile(actor.user_id).await?;
    Ok(ApiResponse::ok(user))
}
