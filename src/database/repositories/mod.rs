//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod event;
pub mod registration;
pub mod notification;
pub mod analytics;

// Re-export repositories
pub use user::UserRepository;
pub use event::{EventRepository, EventScope, ApprovalRecord};
pub use registration::{RegistrationRepository, Admission};
pub use notification::NotificationRepository;
pub use analytics::AnalyticsRepository;
