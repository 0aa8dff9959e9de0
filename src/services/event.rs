//! Event lifecycle service
//!
//! Each mutating operation loads the event, asks [`plan`] whether the actor
//! may perform the action from the current state, then persists it with a
//! conditional write. When that write matches no row the event changed
//! concurrently (or vanished) and the caller gets a conflict or not-found.

use chrono::Utc;
use tracing::{debug, info};
use crate::database::repositories::{ApprovalRecord, EventScope};
use crate::database::DatabaseService;
use crate::models::domain_event::DomainEvent;
use crate::models::event::{
    CreateEventRequest, Event, EventDetails, EventFilter, EventPage, EventStatus,
    UpdateEventRequest, UpdateMediaRequest,
};
use crate::models::lifecycle::{plan, require_rejection_notes, Actor, LifecycleAction};
use crate::services::dispatcher::DomainEventDispatcher;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::{generate_share_code, join_url};
use crate::utils::logging::{log_admin_action, log_event_action};

#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    dispatcher: DomainEventDispatcher,
    public_base_url: String,
    frontend_url: String,
}

impl EventService {
    pub fn new(
        db: DatabaseService,
        dispatcher: DomainEventDispatcher,
        public_base_url: impl Into<String>,
        frontend_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            dispatcher,
            public_base_url: public_base_url.into(),
            frontend_url: frontend_url.into(),
        }
    }

    /// Create a draft owned by the actor
    pub async fn create(&self, actor: &Actor, request: CreateEventRequest) -> Result<Event> {
        let new_event = request.validate(actor.user_id, Utc::now())?;
        let event = self.db.events.create(new_event).await?;
        log_event_action(event.id, "create", actor.user_id, Some(&event.title));
        Ok(event)
    }

    /// Fetch an event; proposals are only visible to their owners and admins,
    /// unlisted approved events only to signed-in callers
    pub async fn get(&self, actor: Option<&Actor>, event_id: i64) -> Result<EventDetails> {
        let event = self.db.require_event(event_id).await?;
        let visible = event.is_publicly_visible()
            || actor.is_some_and(|a| event.status == EventStatus::Approved || a.can_manage(&event));
        if !visible {
            return Err(CampusEventsError::EventNotFound { event_id });
        }
        self.db.event_details(event).await
    }

    /// Public listing; admins filtering by status see every event
    pub async fn list(&self, actor: Option<&Actor>, filter: EventFilter) -> Result<EventPage> {
        let scope = match actor {
            Some(a) if a.is_admin() && filter.status.is_some() => EventScope::All,
            _ => EventScope::Public,
        };
        self.page(filter, scope).await
    }

    /// Events the actor created or organizes, in any status
    pub async fn my_events(&self, actor: &Actor, filter: EventFilter) -> Result<EventPage> {
        self.page(filter, EventScope::Owned(actor.user_id)).await
    }

    async fn page(&self, filter: EventFilter, scope: EventScope) -> Result<EventPage> {
        let (events, total) = self.db.events.list(&filter, scope, Utc::now()).await?;
        debug!(total = total, scope = ?scope, "Listed events");
        Ok(EventPage {
            events,
            total,
            page: filter.page(),
            limit: filter.limit(),
        })
    }

    /// Proposals awaiting review
    pub async fn pending(&self, actor: &Actor) -> Result<Vec<Event>> {
        actor.require_admin()?;
        self.db.events.list_pending().await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        event_id: i64,
        request: UpdateEventRequest,
    ) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, LifecycleAction::Update)?;
        let request = request.validate(Utc::now())?;

        let updated = self.db.events.update_proposal(event_id, request).await?;
        let updated = self.settle(event_id, transition.action, updated).await?;
        log_event_action(event_id, "update", actor.user_id, None);
        Ok(updated)
    }

    pub async fn update_media(
        &self,
        actor: &Actor,
        event_id: i64,
        request: UpdateMediaRequest,
    ) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        plan(&event, actor, LifecycleAction::UpdateMedia)?;

        let updated = self
            .db
            .events
            .update_media(event_id, request)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id })?;
        log_event_action(event_id, "update_media", actor.user_id, None);
        Ok(updated)
    }

    /// draft -> pending
    pub async fn submit(&self, actor: &Actor, event_id: i64) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, LifecycleAction::Submit)?;

        let updated = self
            .db
            .events
            .transition_status(event_id, transition.from, transition.to)
            .await?;
        let updated = self.settle(event_id, transition.action, updated).await?;
        log_event_action(event_id, "submit", actor.user_id, None);

        self.dispatcher
            .publish(DomainEvent::EventSubmitted {
                event_id,
                title: updated.title.clone(),
                creator_id: updated.creator_id,
            })
            .await;
        Ok(updated)
    }

    /// pending -> draft
    pub async fn cancel_submission(&self, actor: &Actor, event_id: i64) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, LifecycleAction::CancelSubmission)?;

        let updated = self
            .db
            .events
            .transition_status(event_id, transition.from, transition.to)
            .await?;
        let updated = self.settle(event_id, transition.action, updated).await?;
        log_event_action(event_id, "cancel_submission", actor.user_id, None);
        Ok(updated)
    }

    /// pending -> approved; mints the shareable link and promotes the creator
    pub async fn approve(
        &self,
        actor: &Actor,
        event_id: i64,
        notes: Option<String>,
    ) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, LifecycleAction::Approve)?;

        let share_code = generate_share_code();
        let record = ApprovalRecord {
            approved_by: actor.user_id,
            notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            shareable_link: join_url(&self.public_base_url, &format!("s/{}", share_code)),
            share_code,
        };

        let updated = self.db.events.approve(event_id, record).await?;
        let updated = self.settle(event_id, transition.action, updated).await?;
        log_admin_action(actor.user_id, "approve_event", Some(&event_id.to_string()), None);

        self.dispatcher
            .publish(DomainEvent::EventApproved {
                event_id,
                title: updated.title.clone(),
                creator_id: updated.creator_id,
                shareable_link: updated.shareable_link.clone().unwrap_or_default(),
            })
            .await;
        Ok(updated)
    }

    /// pending -> rejected; notes are mandatory
    pub async fn reject(&self, actor: &Actor, event_id: i64, notes: Option<&str>) -> Result<Event> {
        actor.require_admin()?;
        let notes = require_rejection_notes(notes)?;

        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, LifecycleAction::Reject)?;

        let updated = self.db.events.reject(event_id, actor.user_id, &notes).await?;
        let updated = self.settle(event_id, transition.action, updated).await?;
        log_admin_action(actor.user_id, "reject_event", Some(&event_id.to_string()), Some(&notes));

        self.dispatcher
            .publish(DomainEvent::EventRejected {
                event_id,
                title: updated.title.clone(),
                creator_id: updated.creator_id,
                notes,
            })
            .await;
        Ok(updated)
    }

    pub async fn close_registration(&self, actor: &Actor, event_id: i64) -> Result<Event> {
        self.toggle_registration(actor, event_id, LifecycleAction::CloseRegistration).await
    }

    pub async fn open_registration(&self, actor: &Actor, event_id: i64) -> Result<Event> {
        self.toggle_registration(actor, event_id, LifecycleAction::OpenRegistration).await
    }

    async fn toggle_registration(
        &self,
        actor: &Actor,
        event_id: i64,
        action: LifecycleAction,
    ) -> Result<Event> {
        let event = self.db.require_event(event_id).await?;
        let transition = plan(&event, actor, action)?;

        let updated = self
            .db
            .events
            .set_registration_closed(event_id, transition.registration_closed)
            .await?;
        let updated = self.settle(event_id, action, updated).await?;
        let label = if transition.registration_closed {
            "close_registration"
        } else {
            "open_registration"
        };
        log_event_action(event_id, label, actor.user_id, None);

        let registrant_ids = self.db.events.registrant_ids(event_id).await?;
        let title = updated.title.clone();
        let domain_event = if transition.registration_closed {
            DomainEvent::RegistrationClosed { event_id, title, registrant_ids }
        } else {
            DomainEvent::RegistrationOpened { event_id, title, registrant_ids }
        };
        self.dispatcher.publish(domain_event).await;
        Ok(updated)
    }

    /// Remove an event and all of its registrations
    pub async fn delete(&self, actor: &Actor, event_id: i64) -> Result<()> {
        let event = self.db.require_event(event_id).await?;
        plan(&event, actor, LifecycleAction::Delete)?;

        let registrant_ids = self
            .db
            .events
            .delete_cascade(event_id)
            .await?
            .ok_or(CampusEventsError::EventNotFound { event_id })?;

        info!(
            event_id = event_id,
            user_id = actor.user_id,
            registrations_removed = registrant_ids.len(),
            "Event deleted"
        );

        self.dispatcher
            .publish(DomainEvent::EventDeleted {
                event_id,
                title: event.title,
                registrant_ids,
            })
            .await;
        Ok(())
    }

    /// Count a share-link click and return where it redirects
    pub async fn resolve_share_code(&self, code: &str) -> Result<String> {
        let event_id = self
            .db
            .events
            .record_share_click(code)
            .await?
            .ok_or_else(|| CampusEventsError::NotFound("Shareable link".to_string()))?;

        Ok(join_url(&self.frontend_url, &format!("events/{}", event_id)))
    }

    /// Turn an empty conditional write into the right error
    async fn settle(
        &self,
        event_id: i64,
        action: LifecycleAction,
        written: Option<Event>,
    ) -> Result<Event> {
        if let Some(event) = written {
            return Ok(event);
        }

        match self.db.events.find_by_id(event_id).await? {
            None => Err(CampusEventsError::EventNotFound { event_id }),
            Some(current) => Err(CampusEventsError::InvalidStateTransition {
                from: current.status.to_string(),
                action: action.as_str().to_string(),
            }),
        }
    }
}
