//! Authentication extractors
//!
//! A bearer token only proves identity. Every request reloads the account so
//! deactivation and role changes apply to tokens that are already issued.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use crate::models::lifecycle::Actor;
use crate::state::AppState;
use crate::utils::errors::CampusEventsError;

/// An authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Actor);

/// A caller that may or may not have presented a token
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<Actor>);

/// An authenticated administrator
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Actor);

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Result<Option<&str>, CampusEventsError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| {
            CampusEventsError::Authentication("Malformed Authorization header".to_string())
        })?;

    match value.split_once(' ') {
        Some((scheme, token))
            if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
        {
            Ok(Some(token.trim()))
        }
        _ => Err(CampusEventsError::Authentication("Expected a Bearer token".to_string())),
    }
}

async fn actor_from_token(state: &AppState, token: &str) -> Result<Actor, CampusEventsError> {
    let user_id = state.services.auth_service.validate_token(token)?.user_id()?;
    let user = state
        .db
        .users
        .find_by_id(user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| {
            CampusEventsError::Authentication("Account not found or deactivated".to_string())
        })?;
    Ok(Actor::new(user.id, user.role))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = CampusEventsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?
            .ok_or_else(|| {
                CampusEventsError::Authentication("Authentication required".to_string())
            })?;
        Ok(AuthUser(actor_from_token(state, token).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = CampusEventsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeAuthUser(Some(actor_from_token(state, token).await?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = CampusEventsError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(actor) = AuthUser::from_request_parts(parts, state).await?;
        actor.require_admin()?;
        Ok(AdminUser(actor))
    }
}
