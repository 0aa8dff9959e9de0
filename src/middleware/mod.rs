//! Middleware module
//!
//! This module contains middleware for request processing

pub mod auth;
pub mod logging;

// Re-export commonly used middleware
pub use auth::{AdminUser, AuthUser, MaybeAuthUser};
pub use logging::{cors_layer, with_request_tracing};
