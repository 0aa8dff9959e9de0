//! Domain events
//!
//! Facts published by the event lifecycle and the registration ledger.
//! Other components react to them through the dispatcher instead of
//! mutating each other's records directly.

use serde::{Deserialize, Serialize};
use crate::models::registration::RegistrationStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    EventSubmitted {
        event_id: i64,
        title: String,
        creator_id: i64,
    },
    EventApproved {
        event_id: i64,
        title: String,
        creator_id: i64,
        shareable_link: String,
    },
    EventRejected {
        event_id: i64,
        title: String,
        creator_id: i64,
        notes: String,
    },
    RegistrationClosed {
        event_id: i64,
        title: String,
        registrant_ids: Vec<i64>,
    },
    RegistrationOpened {
        event_id: i64,
        title: String,
        registrant_ids: Vec<i64>,
    },
    EventDeleted {
        event_id: i64,
        title: String,
        registrant_ids: Vec<i64>,
    },
    RegistrationCreated {
        event_id: i64,
        title: String,
        user_id: i64,
        status: RegistrationStatus,
    },
    RegistrationCancelled {
        event_id: i64,
        title: String,
        user_id: i64,
        reason: Option<String>,
    },
}

impl DomainEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::EventSubmitted { .. } => "event_submitted",
            DomainEvent::EventApproved { .. } => "event_approved",
            DomainEvent::EventRejected { .. } => "event_rejected",
            DomainEvent::RegistrationClosed { .. } => "registration_closed",
            DomainEvent::RegistrationOpened { .. } => "registration_opened",
            DomainEvent::EventDeleted { .. } => "event_deleted",
            DomainEvent::RegistrationCreated { .. } => "registration_created",
            DomainEvent::RegistrationCancelled { .. } => "registration_cancelled",
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            DomainEvent::EventSubmitted { event_id, .. }
            | DomainEvent::EventApproved { event_id, .. }
            | DomainEvent::EventRejected { event_id, .. }
            | DomainEvent::RegistrationClosed { event_id, .. }
            | DomainEvent::RegistrationOpened { event_id, .. }
            | DomainEvent::EventDeleted { event_id, .. }
            | DomainEvent::RegistrationCreated { event_id, .. }
            | DomainEvent::RegistrationCancelled { event_id, .. } => *event_id,
        }
    }
}
