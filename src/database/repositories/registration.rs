//! Registration repository implementation
//!
//! Creation is serialized per event: the event row is locked `FOR UPDATE`
//! for the whole capacity check, and the unique `(user_id, event_id)`
//! constraint catches anything that slips past the duplicate check.

use sqlx::PgPool;
use chrono::Utc;
use crate::models::event::EventStatus;
use crate::models::registration::{
    admission_status, MyRegistration, RegistrantEntry, Registration, RegistrationOutcome,
    RegistrationSource,
};
use crate::utils::errors::CampusEventsError;

const REGISTRATION_COLUMNS: &str =
    "id, user_id, event_id, status, source, registered_at, cancellation_reason, checked_in_at";

/// A committed registration together with the event title it belongs to
#[derive(Debug, Clone)]
pub struct Admission {
    pub outcome: RegistrationOutcome,
    pub event_title: String,
}

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user for an event, waitlisting when the event is full
    pub async fn create_gated(
        &self,
        user_id: i64,
        event_id: i64,
        source: RegistrationSource,
    ) -> Result<Admission, CampusEventsError> {
        let mut tx = self.pool.begin().await?;

        let event: Option<(String, EventStatus, bool, i32)> = sqlx::query_as(
            r#"
            SELECT title, status, registration_closed, max_attendees
            FROM events WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (title, status, registration_closed, max_attendees) =
            event.ok_or(CampusEventsError::EventNotFound { event_id })?;

        if status != EventStatus::Approved {
            return Err(CampusEventsError::EventNotApproved);
        }
        if registration_closed {
            return Err(CampusEventsError::RegistrationClosed);
        }

        let existing: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE user_id = $1 AND event_id = $2)"
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        if existing.0 {
            return Err(CampusEventsError::DuplicateRegistration);
        }

        let active: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM registrations
            WHERE event_id = $1 AND status IN ('registered', 'attended')
            "#,
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        let new_status = admission_status(active.0, max_attendees);

        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            INSERT INTO registrations (user_id, event_id, status, source, registered_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .bind(new_status)
        .bind(source)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            CampusEventsError::from_unique_violation(e, CampusEventsError::DuplicateRegistration)
        })?;

        tx.commit().await?;

        let current_attendees = active.0 + i64::from(new_status.counts_toward_capacity());
        Ok(Admission {
            outcome: RegistrationOutcome {
                registration,
                current_attendees,
                available_slots: (i64::from(max_attendees) - current_attendees).max(0),
            },
            event_title: title,
        })
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Registration>, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Remove a user's registration for an event
    pub async fn delete_for_user(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> Result<Option<Registration>, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            DELETE FROM registrations WHERE user_id = $1 AND event_id = $2
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Check a registrant in
    pub async fn mark_attended(&self, id: i64) -> Result<Option<Registration>, CampusEventsError> {
        let registration = sqlx::query_as::<_, Registration>(&format!(
            r#"
            UPDATE registrations SET status = 'attended', checked_in_at = $2
            WHERE id = $1
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Registrations for an event joined with the registrants' profiles
    pub async fn registrants(
        &self,
        event_id: i64,
    ) -> Result<Vec<RegistrantEntry>, CampusEventsError> {
        let entries = sqlx::query_as::<_, RegistrantEntry>(
            r#"
            SELECT r.id AS registration_id, u.id AS user_id, u.student_id,
                   u.first_name, u.last_name, u.email, u.gender,
                   r.status, r.registered_at, r.checked_in_at
            FROM registrations r
            JOIN users u ON u.id = r.user_id
            WHERE r.event_id = $1
            ORDER BY r.registered_at ASC, r.id ASC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// A user's registrations with event summaries, soonest event first
    pub async fn for_user(&self, user_id: i64) -> Result<Vec<MyRegistration>, CampusEventsError> {
        let registrations = sqlx::query_as::<_, MyRegistration>(
            r#"
            SELECT r.id AS registration_id, e.id AS event_id, e.title, e.event_date, e.location,
                   r.status, r.registered_at
            FROM registrations r
            JOIN events e ON e.id = r.event_id
            WHERE r.user_id = $1
            ORDER BY e.event_date ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }
}
