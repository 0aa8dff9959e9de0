//! Admin user management endpoints

use axum::extract::State;
use serde::Deserialize;
use crate::handlers::response::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::middleware::AdminUser;
use crate::models::event::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::user::{User, UserRole};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<ApiResponse<Vec<User>>> {
    let users = state
        .services
        .user_service
        .list_users(&actor, query.page(), query.limit())
        .await?;
    Ok(ApiResponse::ok(users))
}

/// PUT /api/users/:id/role
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(request): ApiJson<SetRoleRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = state.services.user_service.set_role(&actor, user_id, request.role).await?;
    Ok(ApiResponse::with_message("Role updated", user))
}

/// PUT /api/users/:id/active
pub async fn set_active(
    State(state): State<AppState>,
    AdminUser(actor): AdminUser,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(request): ApiJson<SetActiveRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = state
        .services
        .user_service
        .set_active(&actor, user_id, request.is_active)
        .await?;
    Ok(ApiResponse::with_message("Account status updated", user))
}
