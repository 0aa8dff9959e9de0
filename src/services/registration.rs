//! Registration ledger service

use tracing::info;
use crate::database::DatabaseService;
use crate::models::domain_event::DomainEvent;
use crate::models::lifecycle::Actor;
use crate::models::registration::{
    AttendanceRoster, MyRegistration, RegistrantEntry, Registration, RegistrationOutcome,
    RegistrationSource,
};
use crate::services::dispatcher::DomainEventDispatcher;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::logging::{log_event_action, log_registration};

#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    dispatcher: DomainEventDispatcher,
}

impl RegistrationService {
    pub fn new(db: DatabaseService, dispatcher: DomainEventDispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Register the actor; a full event puts them on the waitlist
    pub async fn register(
        &self,
        actor: &Actor,
        event_id: i64,
        source: RegistrationSource,
    ) -> Result<RegistrationOutcome> {
        let admission = self
            .db
            .registrations
            .create_gated(actor.user_id, event_id, source)
            .await?;

        let status = admission.outcome.registration.status;
        log_registration(event_id, actor.user_id, status.as_str());

        self.dispatcher
            .publish(DomainEvent::RegistrationCreated {
                event_id,
                title: admission.event_title,
                user_id: actor.user_id,
                status,
            })
            .await;
        Ok(admission.outcome)
    }

    /// Withdraw the actor's registration; waitlisted users are not moved up
    pub async fn cancel(
        &self,
        actor: &Actor,
        event_id: i64,
        reason: Option<String>,
    ) -> Result<Registration> {
        let event = self.db.require_event(event_id).await?;
        let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());

        let removed = self
            .db
            .registrations
            .delete_for_user(actor.user_id, event_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound)?;

        log_registration(event_id, actor.user_id, "cancelled");
        self.dispatcher
            .publish(DomainEvent::RegistrationCancelled {
                event_id,
                title: event.title,
                user_id: actor.user_id,
                reason,
            })
            .await;
        Ok(removed)
    }

    /// Check a registrant in; organizers and admins only
    pub async fn mark_attended(&self, actor: &Actor, registration_id: i64) -> Result<Registration> {
        let registration = self
            .db
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound)?;
        let event = self.db.require_event(registration.event_id).await?;
        actor.require_manage(&event)?;

        let updated = self
            .db
            .registrations
            .mark_attended(registration_id)
            .await?
            .ok_or(CampusEventsError::RegistrationNotFound)?;

        info!(
            registration_id = registration_id,
            event_id = event.id,
            user_id = updated.user_id,
            "Attendance recorded"
        );
        Ok(updated)
    }

    /// Active registrants bucketed by gender
    pub async fn roster(&self, actor: &Actor, event_id: i64) -> Result<AttendanceRoster> {
        let entries = self.event_registrations(actor, event_id).await?;
        Ok(AttendanceRoster::build(event_id, entries))
    }

    /// Every registration for the event with registrant profiles
    pub async fn event_registrations(
        &self,
        actor: &Actor,
        event_id: i64,
    ) -> Result<Vec<RegistrantEntry>> {
        let event = self.db.require_event(event_id).await?;
        actor.require_manage(&event)?;

        let entries = self.db.registrations.registrants(event_id).await?;
        log_event_action(event_id, "view_registrations", actor.user_id, None);
        Ok(entries)
    }

    pub async fn my_registrations(&self, actor: &Actor) -> Result<Vec<MyRegistration>> {
        self.db.registrations.for_user(actor.user_id).await
    }
}
