//! Event lifecycle state machine
//!
//! Every mutation of an event goes through [`plan`], which checks the
//! actor's authority and the current status and returns the [`Transition`]
//! to persist. The repository then applies it with a conditional write
//! guarded by `transition.from`, so a concurrent change turns into a
//! conflict instead of a lost update.
//!
//! | From     | Action             | Actor            | To                    |
//! |----------|--------------------|------------------|-----------------------|
//! | draft    | submit             | owner            | pending               |
//! | pending  | cancel submission  | creator          | draft                 |
//! | pending  | approve            | admin            | approved              |
//! | pending  | reject (notes)     | admin            | rejected              |
//! | approved | close registration | owner            | approved (closed)     |
//! | approved | open registration  | owner            | approved (open)       |
//! | draft, pending | update       | owner            | unchanged             |
//! | any      | update media       | owner            | unchanged             |
//! | any      | delete             | owner            | removed               |

use serde::{Deserialize, Serialize};
use crate::models::event::{Event, EventStatus};
use crate::models::user::UserRole;
use crate::utils::errors::{CampusEventsError, Result};

/// The authenticated principal performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CampusEventsError::PermissionDenied("Administrator role required".to_string()))
        }
    }

    /// Admin, creator, or assigned organizer of the event
    pub fn can_manage(&self, event: &Event) -> bool {
        self.is_admin() || event.is_owned_by(self.user_id)
    }

    pub fn require_manage(&self, event: &Event) -> Result<()> {
        if self.can_manage(event) {
            Ok(())
        } else {
            Err(CampusEventsError::PermissionDenied(
                "Only the event's organizer or an administrator may do this".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Submit,
    CancelSubmission,
    Approve,
    Reject,
    CloseRegistration,
    OpenRegistration,
    Update,
    UpdateMedia,
    Delete,
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Submit => "submit",
            LifecycleAction::CancelSubmission => "cancel submission of",
            LifecycleAction::Approve => "approve",
            LifecycleAction::Reject => "reject",
            LifecycleAction::CloseRegistration => "close registration for",
            LifecycleAction::OpenRegistration => "open registration for",
            LifecycleAction::Update => "update",
            LifecycleAction::UpdateMedia => "update media of",
            LifecycleAction::Delete => "delete",
        }
    }
}

/// A checked change of status and registration sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: LifecycleAction,
    pub from: EventStatus,
    pub to: EventStatus,
    /// Registration flag after the transition
    pub registration_closed: bool,
}

/// Check authority and status for `action` on `event`
pub fn plan(event: &Event, actor: &Actor, action: LifecycleAction) -> Result<Transition> {
    authorize(event, actor, action)?;

    let from = event.status;
    let stay = |registration_closed| Transition {
        action,
        from,
        to: from,
        registration_closed,
    };
    let invalid = || CampusEventsError::InvalidStateTransition {
        from: describe_state(event),
        action: action.as_str().to_string(),
    };

    match (action, from) {
        (LifecycleAction::Submit, EventStatus::Draft) => Ok(Transition {
            action,
            from,
            to: EventStatus::Pending,
            registration_closed: false,
        }),
        (LifecycleAction::CancelSubmission, EventStatus::Pending) => Ok(Transition {
            action,
            from,
            to: EventStatus::Draft,
            registration_closed: false,
        }),
        (LifecycleAction::Approve, EventStatus::Pending) => Ok(Transition {
            action,
            from,
            to: EventStatus::Approved,
            registration_closed: false,
        }),
        (LifecycleAction::Reject, EventStatus::Pending) => Ok(Transition {
            action,
            from,
            to: EventStatus::Rejected,
            registration_closed: false,
        }),
        (LifecycleAction::CloseRegistration, EventStatus::Approved)
            if !event.registration_closed =>
        {
            Ok(stay(true))
        }
        (LifecycleAction::OpenRegistration, EventStatus::Approved) if event.registration_closed => {
            Ok(stay(false))
        }
        (LifecycleAction::Update, status) if status.is_proposal() => {
            Ok(stay(event.registration_closed))
        }
        (LifecycleAction::UpdateMedia, _) | (LifecycleAction::Delete, _) => {
            Ok(stay(event.registration_closed))
        }
        _ => Err(invalid()),
    }
}

fn authorize(event: &Event, actor: &Actor, action: LifecycleAction) -> Result<()> {
    let allowed = match action {
        LifecycleAction::Approve | LifecycleAction::Reject => actor.is_admin(),
        LifecycleAction::CancelSubmission => event.creator_id == actor.user_id,
        _ => actor.can_manage(event),
    };

    if allowed {
        Ok(())
    } else {
        Err(CampusEventsError::PermissionDenied(format!(
            "You are not allowed to {} this event",
            action.as_str()
        )))
    }
}

fn describe_state(event: &Event) -> String {
    match (event.status, event.registration_closed) {
        (EventStatus::Approved, true) => "approved (registration closed)".to_string(),
        (EventStatus::Approved, false) => "approved (registration open)".to_string(),
        (status, _) => status.to_string(),
    }
}

/// Rejection notes are mandatory and returned trimmed
pub fn require_rejection_notes(notes: Option<&str>) -> Result<String> {
    match notes.map(str::trim) {
        Some(notes) if !notes.is_empty() => Ok(notes.to_string()),
        _ => Err(CampusEventsError::Validation(
            "rejectionNotes is required when rejecting an event".to_string(),
        )),
    }
}
