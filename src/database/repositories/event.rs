//! Event repository implementation
//!
//! Status changes are conditional updates keyed on the status the caller
//! observed; `None` from those methods means the row moved on in between.

use sqlx::{PgPool, Postgres, QueryBuilder};
use chrono::{DateTime, Utc};
use crate::models::event::{
    Event, EventFilter, EventStatus, NewEvent, UpdateEventRequest, UpdateMediaRequest,
};
use crate::utils::errors::CampusEventsError;
use crate::utils::helpers::{calculate_offset, escape_like};

pub(crate) const EVENT_COLUMNS: &str =
    "id, title, description, category, event_date, location, max_attendees, \
     creator_id, organizer_id, status, registration_closed, closed_at, \
     approved_by, approval_notes, approved_at, \
     banner_url, images, videos, shareable_link, share_clicks, tags, is_public, \
     created_at, updated_at";

/// Which events a listing may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    /// Approved, public events only
    Public,
    /// Events the user created or organizes, any status
    Owned(i64),
    /// Everything (admin)
    All,
}

/// Fields written when an admin approves an event
#[derive(Debug, Clone)]
pub struct ApprovalRecord {
    pub approved_by: i64,
    pub notes: Option<String>,
    pub shareable_link: String,
    pub share_code: String,
}

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event in draft
    pub async fn create(&self, new_event: NewEvent) -> Result<Event, CampusEventsError> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events
                (title, description, category, event_date, location, max_attendees, creator_id,
                 status, tags, is_public, banner_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft', $8, $9, $10, $11, $11)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(new_event.title)
        .bind(new_event.description)
        .bind(new_event.category)
        .bind(new_event.event_date)
        .bind(new_event.location)
        .bind(new_event.max_attendees)
        .bind(new_event.creator_id)
        .bind(new_event.tags)
        .bind(new_event.is_public)
        .bind(new_event.banner_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, CampusEventsError> {
        let event =
            sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(event)
    }

    /// Update editable fields while the event is still a proposal
    pub async fn update_proposal(
        &self,
        id: i64,
        request: UpdateEventRequest,
    ) -> Result<Option<Event>, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                event_date = COALESCE($5, event_date),
                location = COALESCE($6, location),
                max_attendees = COALESCE($7, max_attendees),
                tags = COALESCE($8, tags),
                is_public = COALESCE($9, is_public),
                updated_at = $10
            WHERE id = $1 AND status IN ('draft', 'pending')
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.category)
        .bind(request.event_date)
        .bind(request.location)
        .bind(request.max_attendees)
        .bind(request.tags)
        .bind(request.is_public)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Replace media references; allowed in every status
    pub async fn update_media(
        &self,
        id: i64,
        request: UpdateMediaRequest,
    ) -> Result<Option<Event>, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET banner_url = COALESCE($2, banner_url),
                images = COALESCE($3, images),
                videos = COALESCE($4, videos),
                updated_at = $5
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.banner_url)
        .bind(request.images)
        .bind(request.videos)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Move between two top-level statuses (submit, cancel submission)
    pub async fn transition_status(
        &self,
        id: i64,
        from: EventStatus,
        to: EventStatus,
    ) -> Result<Option<Event>, CampusEventsError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = $3, updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// pending -> approved; the creator becomes the organizer and the share link is minted once
    pub async fn approve(
        &self,
        id: i64,
        record: ApprovalRecord,
    ) -> Result<Option<Event>, CampusEventsError> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = 'approved',
                organizer_id = creator_id,
                approved_by = $2,
                approval_notes = $3,
                approved_at = $4,
                shareable_link = COALESCE(shareable_link, $5),
                share_code = COALESCE(share_code, $6),
                registration_closed = FALSE,
                closed_at = NULL,
                updated_at = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(record.approved_by)
        .bind(record.notes)
        .bind(now)
        .bind(record.shareable_link)
        .bind(record.share_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// pending -> rejected with the admin's notes
    pub async fn reject(
        &self,
        id: i64,
        admin_id: i64,
        notes: &str,
    ) -> Result<Option<Event>, CampusEventsError> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET status = 'rejected',
                approved_by = $2,
                approval_notes = $3,
                approved_at = $4,
                updated_at = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(admin_id)
        .bind(notes)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Flip the registration sub-state of an approved event
    pub async fn set_registration_closed(
        &self,
        id: i64,
        closed: bool,
    ) -> Result<Option<Event>, CampusEventsError> {
        let now = Utc::now();
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET registration_closed = $2,
                closed_at = CASE WHEN $2 THEN $3 ELSE NULL END,
                updated_at = $3
            WHERE id = $1 AND status = 'approved' AND registration_closed = NOT $2
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(closed)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete an event and all of its registrations atomically
    ///
    /// Returns the user ids that were registered, or `None` when the event did not exist.
    pub async fn delete_cascade(&self, id: i64) -> Result<Option<Vec<i64>>, CampusEventsError> {
        let mut tx = self.pool.begin().await?;

        let registrants: Vec<(i64,)> = sqlx::query_as(
            "DELETE FROM registrations WHERE event_id = $1 RETURNING user_id"
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(registrants.into_iter().map(|(user_id,)| user_id).collect()))
    }

    /// Count a click on a shareable link and return the event it points to
    pub async fn record_share_click(
        &self,
        share_code: &str,
    ) -> Result<Option<i64>, CampusEventsError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE events SET share_clicks = share_clicks + 1 WHERE share_code = $1 RETURNING id"
        )
        .bind(share_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// List events matching the filter within a scope, with the total match count
    pub async fn list(
        &self,
        filter: &EventFilter,
        scope: EventScope,
        now: DateTime<Utc>,
    ) -> Result<(Vec<Event>, i64), CampusEventsError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_predicates(&mut count_query, filter, scope, now);
        let total: (i64,) = count_query.build_query_as().fetch_one(&self.pool).await?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
        push_predicates(&mut query, filter, scope, now);
        query.push(" ORDER BY event_date ASC, id ASC LIMIT ");
        query.push_bind(i64::from(filter.limit()));
        query.push(" OFFSET ");
        query.push_bind(calculate_offset(filter.page(), filter.limit()));

        let events = query.build_query_as::<Event>().fetch_all(&self.pool).await?;
        Ok((events, total.0))
    }

    /// Pending proposals, oldest first
    pub async fn list_pending(&self) -> Result<Vec<Event>, CampusEventsError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE status = 'pending' ORDER BY updated_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Seats taken (registered + attended) and waitlist length for an event
    pub async fn capacity_counts(&self, event_id: i64) -> Result<(i64, i64), CampusEventsError> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status IN ('registered', 'attended')),
                   COUNT(*) FILTER (WHERE status = 'waitlisted')
            FROM registrations
            WHERE event_id = $1
            "#
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    /// User ids of everyone holding a registration for the event
    pub async fn registrant_ids(&self, event_id: i64) -> Result<Vec<i64>, CampusEventsError> {
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT user_id FROM registrations WHERE event_id = $1")
                .bind(event_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

/// Translate each present filter field into one SQL predicate
fn push_predicates(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &EventFilter,
    scope: EventScope,
    now: DateTime<Utc>,
) {
    query.push(" WHERE TRUE");

    match scope {
        EventScope::Public => {
            query.push(" AND status = 'approved' AND is_public");
        }
        EventScope::Owned(user_id) => {
            query.push(" AND (creator_id = ");
            query.push_bind(user_id);
            query.push(" OR organizer_id = ");
            query.push_bind(user_id);
            query.push(")");
        }
        EventScope::All => {}
    }

    if let Some(status) = filter.status {
        query.push(" AND status = ");
        query.push_bind(status);
    }
    if let Some(category) = filter.category {
        query.push(" AND category = ");
        query.push_bind(category);
    }
    if let Some(creator_id) = filter.creator_id {
        query.push(" AND creator_id = ");
        query.push_bind(creator_id);
    }
    let tag = filter.tag.as_deref().map(|t| t.trim().to_lowercase());
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        query.push(" AND ");
        query.push_bind(tag);
        query.push(" = ANY(tags)");
    }
    if let Some(search) = filter.search_text() {
        let pattern = format!("%{}%", escape_like(&search));
        query.push(" AND (title ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR description ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR location ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }
    if filter.upcoming_only {
        query.push(" AND event_date > ");
        query.push_bind(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventCategory;

    fn sql_for(filter: &EventFilter, scope: EventScope) -> String {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_predicates(&mut query, filter, scope, Utc::now());
        query.sql().to_string()
    }

    #[test]
    fn test_empty_filter_public_scope() {
        let sql = sql_for(&EventFilter::default(), EventScope::Public);
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM events WHERE TRUE AND status = 'approved' AND is_public"
        );
    }

    #[test]
    fn test_each_field_adds_one_predicate() {
        let filter = EventFilter {
            category: Some(EventCategory::Sports),
            search: Some("chess".to_string()),
            tag: Some("Board".to_string()),
            upcoming_only: true,
            ..Default::default()
        };
        let sql = sql_for(&filter, EventScope::All);
        assert!(sql.contains("category = $1"));
        assert!(sql.contains("$2 = ANY(tags)"));
        assert!(sql.contains("title ILIKE $3 OR description ILIKE $4 OR location ILIKE $5"));
        assert!(sql.contains("event_date > $6"));
        assert!(!sql.contains("is_public"));
    }

    #[test]
    fn test_owned_scope_binds_user() {
        let sql = sql_for(&EventFilter::default(), EventScope::Owned(9));
        assert!(sql.contains("(creator_id = $1 OR organizer_id = $2)"));
    }
}
