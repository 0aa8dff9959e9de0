//! Services module
//!
//! This module contains business logic services

pub mod analytics;
pub mod auth;
pub mod dispatcher;
pub mod event;
pub mod notification;
pub mod registration;
pub mod user;

// Re-export commonly used services
pub use analytics::AnalyticsService;
pub use auth::{AuthService, AuthToken, Claims};
pub use dispatcher::{DomainEventDispatcher, DomainEventHandler};
pub use event::EventService;
pub use notification::NotificationService;
pub use registration::RegistrationService;
pub use user::{LoginResponse, PromotionHandler, UserService};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;
use crate::utils::validation::EmailPolicy;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub notification_service: NotificationService,
    pub analytics_service: AnalyticsService,
}

impl ServiceFactory {
    /// Create all services and wire the domain event handlers
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let auth_service = AuthService::new(&settings.auth, &settings.rate_limit)?;
        let user_service = UserService::new(
            db.users.clone(),
            EmailPolicy::new(&settings.email),
            auth_service.clone(),
        );
        let notification_service =
            NotificationService::new(db.notifications.clone(), settings.app.frontend_url.clone());

        let dispatcher = DomainEventDispatcher::new()
            .with_handler(Arc::new(PromotionHandler::new(user_service.clone())))
            .with_handler(Arc::new(notification_service.clone()));

        let event_service = EventService::new(
            db.clone(),
            dispatcher.clone(),
            settings.app.public_base_url.clone(),
            settings.app.frontend_url.clone(),
        );
        let registration_service = RegistrationService::new(db.clone(), dispatcher);
        let analytics_service = AnalyticsService::new(db);

        Ok(Self {
            auth_service,
            user_service,
            event_service,
            registration_service,
            notification_service,
            analytics_service,
        })
    }
}
