//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod event;
pub mod lifecycle;
pub mod registration;
pub mod notification;
pub mod domain_event;
pub mod analytics;

// Re-export commonly used models
pub use user::{User, UserRole, Gender, NewUser, RegisterUserRequest, LoginRequest};
pub use event::{
    Event, EventStatus, EventCategory, EventDetails, EventFilter, EventPage, NewEvent,
    CreateEventRequest, UpdateEventRequest, UpdateMediaRequest, ApproveEventRequest,
    RejectEventRequest,
};
pub use lifecycle::{Actor, LifecycleAction, Transition};
pub use registration::{
    Registration, RegistrationStatus, RegistrationSource, RegistrationOutcome, RegistrantEntry,
    MyRegistration, AttendanceRoster, CreateRegistrationRequest, CancelRegistrationRequest,
};
pub use notification::{
    Notification, NotificationType, NotificationQuery, NotificationPage, CreateNotificationRequest,
};
pub use domain_event::DomainEvent;
pub use analytics::{KeyCount, EventStats, OrganizerDashboard, PlatformOverview};
