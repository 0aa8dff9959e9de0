//! JSON envelope and error rendering
//!
//! Every response body has the shape `{success, message?, data?, error?}`.
//! Unexpected (5xx) errors carry their detail in `error`; the router strips
//! it again in production via [`hide_internal_errors`].

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};
use crate::state::AppState;
use crate::utils::errors::{CampusEventsError, ErrorSeverity};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Marker left on responses produced by unexpected errors
#[derive(Debug, Clone, Copy)]
pub struct InternalErrorMarker;

/// Short machine-readable code for an error's status
fn error_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "validation_error",
        StatusCode::UNAUTHORIZED => "unauthenticated",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        _ => "internal_error",
    }
}

impl IntoResponse for CampusEventsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                error!(status = status.as_u16(), error = %self, "Request failed")
            }
            ErrorSeverity::Warning => {
                warn!(status = status.as_u16(), error = %self, "Request rejected")
            }
            ErrorSeverity::Info => {
                debug!(status = status.as_u16(), error = %self, "Request rejected")
            }
        }

        if status.is_server_error() {
            let body = ApiResponse::failure(INTERNAL_ERROR_MESSAGE, Some(self.to_string()));
            let mut response = (status, body).into_response();
            response.extensions_mut().insert(InternalErrorMarker);
            return response;
        }

        let message = match &self {
            // the token library's wording is not meant for clients
            CampusEventsError::Jwt(_) => "Invalid or expired token".to_string(),
            other => other.to_string(),
        };
        let body = ApiResponse::failure(message, Some(error_code(status).to_string()));
        (status, body).into_response()
    }
}

/// Replace unexpected-error bodies with a generic message in production
pub async fn hide_internal_errors(State(state): State<AppState>, response: Response) -> Response {
    if state.production && response.extensions().get::<InternalErrorMarker>().is_some() {
        let body = ApiResponse::failure(INTERNAL_ERROR_MESSAGE, None);
        return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    }
    response
}

impl From<JsonRejection> for CampusEventsError {
    fn from(rejection: JsonRejection) -> Self {
        CampusEventsError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for CampusEventsError {
    fn from(rejection: QueryRejection) -> Self {
        CampusEventsError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for CampusEventsError {
    fn from(rejection: PathRejection) -> Self {
        CampusEventsError::Validation(rejection.body_text())
    }
}

/// `Json` whose rejection renders as the envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(CampusEventsError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection renders as the envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(CampusEventsError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejection renders as the envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CampusEventsError))]
pub struct ApiPath<T>(pub T);

pub type ApiResult<T> = std::result::Result<T, CampusEventsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_envelope() {
        let response = CampusEventsError::DuplicateRegistration.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Already registered for this event");
        assert_eq!(body["error"], "conflict");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_marked() {
        let response = CampusEventsError::Config("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalErrorMarker>().is_some());

        let body = body_json(response).await;
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
        assert_eq!(body["error"], "Configuration error: boom");
    }

    #[test]
    fn test_success_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ApiResponse::ok(5)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 5 }));
    }
}
