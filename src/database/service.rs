//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AnalyticsRepository, DatabasePool, EventRepository, NotificationRepository,
    RegistrationRepository, UserRepository,
};
use crate::models::event::{Event, EventDetails};
use crate::utils::errors::CampusEventsError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
    pub notifications: NotificationRepository,
    pub analytics: AnalyticsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Load an event or fail with `EventNotFound`
    pub async fn require_event(&self, event_id: i64) -> Result<Event, CampusEventsError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id })
    }

    /// Attach live capacity figures to an event
    pub async fn event_details(&self, event: Event) -> Result<EventDetails, CampusEventsError> {
        let (current_attendees, waitlisted) = self.events.capacity_counts(event.id).await?;
        Ok(EventDetails::new(event, current_attendees, waitlisted))
    }

    pub async fn health_check(&self) -> Result<(), CampusEventsError> {
        crate::database::health_check(&self.pool).await
    }
}
