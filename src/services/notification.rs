//! Notification service implementation
//!
//! Persists in-app notifications. Writes triggered by domain events are
//! fire-and-forget: a failed insert is logged and never fails the operation
//! that caused it.

use async_trait::async_trait;
use futures::{future, stream, StreamExt};
use tracing::{debug, warn};
use crate::database::repositories::NotificationRepository;
use crate::models::domain_event::DomainEvent;
use crate::models::notification::{
    CreateNotificationRequest, Notification, NotificationPage, NotificationQuery, NotificationType,
};
use crate::models::event::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::models::registration::RegistrationStatus;
use crate::services::dispatcher::DomainEventHandler;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::{calculate_offset, join_url};

/// Concurrent inserts when one event notifies many registrants
const FAN_OUT_CONCURRENCY: usize = 8;

#[derive(Clone)]
pub struct NotificationService {
    repository: NotificationRepository,
    frontend_url: String,
}

impl NotificationService {
    pub fn new(repository: NotificationRepository, frontend_url: impl Into<String>) -> Self {
        Self {
            repository,
            frontend_url: frontend_url.into(),
        }
    }

    /// Insert a notification, logging instead of failing
    pub async fn notify(&self, request: CreateNotificationRequest) -> Option<Notification> {
        let user_id = request.user_id;
        let notification_type = request.notification_type;
        match self.repository.create(request).await {
            Ok(notification) => {
                debug!(
                    user_id = user_id,
                    notification_id = notification.id,
                    kind = ?notification_type,
                    "Notification stored"
                );
                Some(notification)
            }
            Err(e) => {
                warn!(
                    user_id = user_id,
                    kind = ?notification_type,
                    error = %e,
                    "Failed to store notification"
                );
                None
            }
        }
    }

    pub async fn list(&self, user_id: i64, query: &NotificationQuery) -> Result<NotificationPage> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

        let notifications = self
            .repository
            .list(user_id, query.unread_only, i64::from(limit), calculate_offset(page, limit))
            .await?;
        let unread = self.repository.unread_count(user_id).await?;

        Ok(NotificationPage {
            notifications,
            unread,
            page,
            limit,
        })
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        self.repository.unread_count(user_id).await
    }

    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> Result<Notification> {
        self.repository
            .mark_read(notification_id, user_id)
            .await?
            .ok_or(CampusEventsError::NotificationNotFound { notification_id })
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        self.repository.mark_all_read(user_id).await
    }

    pub async fn delete(&self, user_id: i64, notification_id: i64) -> Result<()> {
        if self.repository.delete(notification_id, user_id).await? {
            Ok(())
        } else {
            Err(CampusEventsError::NotificationNotFound { notification_id })
        }
    }

    pub async fn delete_all(&self, user_id: i64) -> Result<u64> {
        self.repository.delete_all(user_id).await
    }
}

#[async_trait]
impl DomainEventHandler for NotificationService {
    fn name(&self) -> &'static str {
        "notification_outbox"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let requests = notifications_for(event, &self.frontend_url);
        let total = requests.len();

        let stored = stream::iter(requests)
            .map(|request| self.notify(request))
            .buffer_unordered(FAN_OUT_CONCURRENCY)
            .filter(|stored| future::ready(stored.is_some()))
            .count()
            .await;

        if stored < total {
            warn!(
                event = event.name(),
                stored = stored,
                total = total,
                "Some notifications were not stored"
            );
        }
        Ok(())
    }
}

/// The notifications a domain event produces
pub fn notifications_for(
    event: &DomainEvent,
    frontend_url: &str,
) -> Vec<CreateNotificationRequest> {
    let event_url = |event_id: i64| Some(join_url(frontend_url, &format!("events/{}", event_id)));
    let single = |user_id, notification_type, title: String, message: String, event_id: i64| {
        vec![CreateNotificationRequest {
            user_id,
            notification_type,
            title,
            message,
            related_event_id: Some(event_id),
            action_url: event_url(event_id),
        }]
    };

    match event {
        DomainEvent::EventSubmitted { event_id, title, creator_id } => single(
            *creator_id,
            NotificationType::EventSubmitted,
            "Event submitted for review".to_string(),
            format!("\"{}\" is waiting for administrator approval.", title),
            *event_id,
        ),
        DomainEvent::EventApproved { event_id, title, creator_id, shareable_link } => single(
            *creator_id,
            NotificationType::EventApproved,
            "Event approved".to_string(),
            format!(
                "\"{}\" is approved and open for registration. Share it: {}",
                title, shareable_link
            ),
            *event_id,
        ),
        DomainEvent::EventRejected { event_id, title, creator_id, notes } => single(
            *creator_id,
            NotificationType::EventRejected,
            "Event rejected".to_string(),
            format!("\"{}\" was not approved: {}", title, notes),
            *event_id,
        ),
        DomainEvent::RegistrationCreated { event_id, title, user_id, status } => {
            let waitlisted = *status == RegistrationStatus::Waitlisted;
            let (notification_type, heading, message) = if waitlisted {
                (
                    NotificationType::RegistrationWaitlisted,
                    "You are on the waitlist",
                    format!("\"{}\" is full; you have been placed on the waitlist.", title),
                )
            } else {
                (
                    NotificationType::RegistrationConfirmed,
                    "Registration confirmed",
                    format!("You are registered for \"{}\".", title),
                )
            };
            single(*user_id, notification_type, heading.to_string(), message, *event_id)
        }
        DomainEvent::RegistrationCancelled { event_id, title, user_id, reason } => single(
            *user_id,
            NotificationType::RegistrationCancelled,
            "Registration cancelled".to_string(),
            match reason {
                Some(reason) => {
                    format!("Your registration for \"{}\" was cancelled: {}", title, reason)
                }
                None => format!("Your registration for \"{}\" was cancelled.", title),
            },
            *event_id,
        ),
        DomainEvent::RegistrationClosed { event_id, title, registrant_ids } => registrant_ids
            .iter()
            .map(|user_id| CreateNotificationRequest {
                user_id: *user_id,
                notification_type: NotificationType::RegistrationClosed,
                title: "Registration closed".to_string(),
                message: format!(
                    "Registration for \"{}\" has been closed by the organizer.",
                    title
                ),
                related_event_id: Some(*event_id),
                action_url: event_url(*event_id),
            })
            .collect(),
        DomainEvent::RegistrationOpened { event_id, title, registrant_ids } => registrant_ids
            .iter()
            .map(|user_id| CreateNotificationRequest {
                user_id: *user_id,
                notification_type: NotificationType::RegistrationOpened,
                title: "Registration reopened".to_string(),
                message: format!("Registration for \"{}\" is open again.", title),
                related_event_id: Some(*event_id),
                action_url: event_url(*event_id),
            })
            .collect(),
        // the event row is gone, so nothing may reference it
        DomainEvent::EventDeleted { title, registrant_ids, .. } => registrant_ids
            .iter()
            .map(|user_id| CreateNotificationRequest {
                user_id: *user_id,
                notification_type: NotificationType::EventDeleted,
                title: "Event cancelled".to_string(),
                message: format!(
                    "\"{}\" has been removed and your registration was cancelled.",
                    title
                ),
                related_event_id: None,
                action_url: None,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRONTEND: &str = "https://campus.example.edu";

    #[test]
    fn test_approval_notifies_creator_with_link() {
        let requests = notifications_for(
            &DomainEvent::EventApproved {
                event_id: 4,
                title: "Chess Night".to_string(),
                creator_id: 9,
                shareable_link: "https://api.example.edu/s/abc".to_string(),
            },
            FRONTEND,
        );
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_id, 9);
        assert_eq!(requests[0].notification_type, NotificationType::EventApproved);
        assert!(requests[0].message.contains("https://api.example.edu/s/abc"));
        assert_eq!(requests[0].action_url.as_deref(), Some("https://campus.example.edu/events/4"));
    }

    #[test]
    fn test_waitlisted_registration_uses_waitlist_type() {
        let requests = notifications_for(
            &DomainEvent::RegistrationCreated {
                event_id: 1,
                title: "Talk".to_string(),
                user_id: 3,
                status: RegistrationStatus::Waitlisted,
            },
            FRONTEND,
        );
        assert_eq!(requests[0].notification_type, NotificationType::RegistrationWaitlisted);
    }

    #[test]
    fn test_deletion_fans_out_without_event_reference() {
        let requests = notifications_for(
            &DomainEvent::EventDeleted {
                event_id: 8,
                title: "Gala".to_string(),
                registrant_ids: vec![1, 2, 3],
            },
            FRONTEND,
        );
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.related_event_id.is_none() && r.action_url.is_none()));
        assert!(requests.iter().all(|r| r.notification_type == NotificationType::EventDeleted));
    }

    #[test]
    fn test_close_without_registrants_is_silent() {
        let requests = notifications_for(
            &DomainEvent::RegistrationClosed {
                event_id: 8,
                title: "Gala".to_string(),
                registrant_ids: vec![],
            },
            FRONTEND,
        );
        assert!(requests.is_empty());
    }
}
