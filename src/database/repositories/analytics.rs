//! Analytics repository
//!
//! Read-only aggregation over events and registrations. Enum columns are
//! grouped as text so callers get plain key/count pairs.

use sqlx::PgPool;
use chrono::Utc;
use crate::models::analytics::KeyCount;
use crate::utils::errors::CampusEventsError;

#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

/// Totals over the events a user owns
#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct OwnerTotals {
    pub total_events: i64,
    pub total_registrations: i64,
    pub total_attended: i64,
    pub upcoming_approved: i64,
    pub total_share_clicks: i64,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn registrations_by_status(
        &self,
        event_id: i64,
    ) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            r#"
            SELECT status::text AS key, COUNT(*) AS count FROM registrations
            WHERE event_id = $1
            GROUP BY status ORDER BY key
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn registrations_by_source(
        &self,
        event_id: i64,
    ) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            r#"
            SELECT source::text AS key, COUNT(*) AS count FROM registrations
            WHERE event_id = $1
            GROUP BY source ORDER BY key
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Gender breakdown of registrants holding a seat
    pub async fn active_registrants_by_gender(
        &self,
        event_id: i64,
    ) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            r#"
            SELECT u.gender::text AS key, COUNT(*) AS count
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1 AND r.status IN ('registered', 'attended')
            GROUP BY u.gender
            ORDER BY key
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn owned_events_by_status(
        &self,
        user_id: i64,
    ) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            r#"
            SELECT status::text AS key, COUNT(*) AS count
            FROM events
            WHERE creator_id = $1 OR organizer_id = $1
            GROUP BY status
            ORDER BY key
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn owner_totals(&self, user_id: i64) -> Result<OwnerTotals, CampusEventsError> {
        let totals = sqlx::query_as::<_, OwnerTotals>(
            r#"
            WITH owned AS (
                SELECT id, status, event_date, share_clicks FROM events
                WHERE creator_id = $1 OR organizer_id = $1
            )
            SELECT
                (SELECT COUNT(*) FROM owned) AS total_events,
                (SELECT COUNT(*) FROM registrations r JOIN owned o ON o.id = r.event_id)
                    AS total_registrations,
                (SELECT COUNT(*) FROM registrations r JOIN owned o ON o.id = r.event_id
                    WHERE r.status = 'attended') AS total_attended,
                (SELECT COUNT(*) FROM owned WHERE status = 'approved' AND event_date > $2)
                    AS upcoming_approved,
                (SELECT COALESCE(SUM(share_clicks), 0)::BIGINT FROM owned) AS total_share_clicks
            "#
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    pub async fn users_by_role(&self) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            "SELECT role::text AS key, COUNT(*) AS count FROM users GROUP BY role ORDER BY key"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn events_by_status(&self) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            "SELECT status::text AS key, COUNT(*) AS count FROM events GROUP BY status ORDER BY key"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn events_by_category(&self) -> Result<Vec<KeyCount>, CampusEventsError> {
        let counts = sqlx::query_as::<_, KeyCount>(
            "SELECT category::text AS key, COUNT(*) AS count FROM events \
             GROUP BY category ORDER BY key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn total_registrations(&self) -> Result<i64, CampusEventsError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
