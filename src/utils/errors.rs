//! Error handling for Campus Events
//!
//! This module defines the main error type used throughout the application
//! and the mapping from error variants to HTTP status codes and severities.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the Campus Events application
#[derive(Error, Debug)]
pub enum CampusEventsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid student ID or password")]
    InvalidCredentials,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Registration not found")]
    RegistrationNotFound,

    #[error("Notification not found: {notification_id}")]
    NotificationNotFound { notification_id: i64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot {action} an event in status {from}")]
    InvalidStateTransition { from: String, action: String },

    #[error("Event is not open for registration")]
    EventNotApproved,

    #[error("Registration is closed for this event")]
    RegistrationClosed,

    #[error("Already registered for this event")]
    DuplicateRegistration,

    #[error("{0} is already registered")]
    DuplicateIdentity(String),

    #[error("Too many attempts, try again later")]
    RateLimitExceeded,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias for Campus Events operations
pub type Result<T> = std::result::Result<T, CampusEventsError>;

impl From<argon2::password_hash::Error> for CampusEventsError {
    fn from(err: argon2::password_hash::Error) -> Self {
        CampusEventsError::PasswordHash(err.to_string())
    }
}

impl CampusEventsError {
    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        use CampusEventsError::*;

        match self {
            Validation(_) => StatusCode::BAD_REQUEST,
            Authentication(_) | InvalidCredentials | Jwt(_) => StatusCode::UNAUTHORIZED,
            PermissionDenied(_) => StatusCode::FORBIDDEN,
            UserNotFound { .. }
            | EventNotFound { .. }
            | RegistrationNotFound
            | NotificationNotFound { .. }
            | NotFound(_) => StatusCode::NOT_FOUND,
            InvalidStateTransition { .. }
            | EventNotApproved
            | RegistrationClosed
            | DuplicateRegistration
            | DuplicateIdentity(_) => StatusCode::CONFLICT,
            RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Database(_) | Migration(_) | Config(_) | PasswordHash(_) | Serialization(_)
            | Io(_) | UrlParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error is the caller's fault (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CampusEventsError::Database(_) => ErrorSeverity::Critical,
            CampusEventsError::Migration(_) => ErrorSeverity::Critical,
            CampusEventsError::Config(_) => ErrorSeverity::Critical,
            CampusEventsError::PermissionDenied(_) => ErrorSeverity::Warning,
            CampusEventsError::Authentication(_) => ErrorSeverity::Warning,
            CampusEventsError::InvalidCredentials => ErrorSeverity::Warning,
            CampusEventsError::RateLimitExceeded => ErrorSeverity::Warning,
            CampusEventsError::Validation(_) => ErrorSeverity::Info,
            e if e.is_client_error() => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Map a unique-constraint violation onto a conflict, keeping other database errors as-is
    pub fn from_unique_violation(err: sqlx::Error, conflict: CampusEventsError) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => conflict,
            _ => CampusEventsError::Database(err),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
