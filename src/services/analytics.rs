//! Analytics aggregator

use tracing::debug;
use crate::database::DatabaseService;
use crate::models::analytics::{EventStats, OrganizerDashboard, PlatformOverview};
use crate::models::lifecycle::Actor;
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AnalyticsService {
    db: DatabaseService,
}

impl AnalyticsService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn event_stats(&self, actor: &Actor, event_id: i64) -> Result<EventStats> {
        let event = self.db.require_event(event_id).await?;
        actor.require_manage(&event)?;

        let by_status = self.db.analytics.registrations_by_status(event_id).await?;
        let by_gender = self.db.analytics.active_registrants_by_gender(event_id).await?;
        let by_source = self.db.analytics.registrations_by_source(event_id).await?;

        debug!(event_id = event_id, "Computed event stats");
        Ok(EventStats::from_counts(
            event.id,
            event.title,
            event.max_attendees,
            event.share_clicks,
            &by_status,
            by_gender,
            by_source,
        ))
    }

    pub async fn organizer_dashboard(&self, actor: &Actor) -> Result<OrganizerDashboard> {
        let events_by_status = self.db.analytics.owned_events_by_status(actor.user_id).await?;
        let totals = self.db.analytics.owner_totals(actor.user_id).await?;

        Ok(OrganizerDashboard {
            user_id: actor.user_id,
            events_by_status,
            total_events: totals.total_events,
            total_registrations: totals.total_registrations,
            total_attended: totals.total_attended,
            upcoming_approved: totals.upcoming_approved,
            total_share_clicks: totals.total_share_clicks,
        })
    }

    pub async fn platform_overview(&self, actor: &Actor) -> Result<PlatformOverview> {
        actor.require_admin()?;

        let users_by_role = self.db.analytics.users_by_role().await?;
        let events_by_status = self.db.analytics.events_by_status().await?;
        let events_by_category = self.db.analytics.events_by_category().await?;
        let total_registrations = self.db.analytics.total_registrations().await?;

        Ok(PlatformOverview {
            total_users: users_by_role.iter().map(|c| c.count).sum(),
            total_events: events_by_status.iter().map(|c| c.count).sum(),
            users_by_role,
            events_by_status,
            events_by_category,
            total_registrations,
        })
    }
}
