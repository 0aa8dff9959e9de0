//! Domain event dispatch
//!
//! Services publish [`DomainEvent`]s after their own write has committed.
//! Handlers run in registration order; a failing handler is logged and does
//! not affect the publisher or the remaining handlers.

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, warn};
use crate::models::domain_event::DomainEvent;
use crate::utils::errors::Result;

#[async_trait]
pub trait DomainEventHandler: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &DomainEvent) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct DomainEventDispatcher {
    handlers: Vec<Arc<dyn DomainEventHandler>>,
}

impl DomainEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn DomainEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    #[cfg(test)]
    fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Deliver an event to every handler
    pub async fn publish(&self, event: DomainEvent) {
        debug!(event = event.name(), event_id = event.event_id(), "Publishing domain event");

        for handler in &self.handlers {
            if let Err(e) = handler.handle(&event).await {
                warn!(
                    handler = handler.name(),
                    event = event.name(),
                    event_id = event.event_id(),
                    error = %e,
                    "Domain event handler failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use crate::utils::errors::CampusEventsError;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl DomainEventHandler for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn handle(&self, event: &DomainEvent) -> Result<()> {
            self.seen.lock().unwrap().push(event.name());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl DomainEventHandler for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn handle(&self, _event: &DomainEvent) -> Result<()> {
            Err(CampusEventsError::NotFound("nothing".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_handlers() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = DomainEventDispatcher::new()
            .with_handler(Arc::new(Failing))
            .with_handler(recorder.clone());

        dispatcher
            .publish(DomainEvent::EventApproved {
                event_id: 1,
                title: "Fair".to_string(),
                creator_id: 2,
                shareable_link: "http://x/s/abc".to_string(),
            })
            .await;

        assert_eq!(dispatcher.handler_count(), 2);
        assert_eq!(*recorder.seen.lock().unwrap(), vec!["event_approved"]);
    }
}
