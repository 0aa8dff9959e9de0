//! Registration model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::models::user::Gender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    Registered,
    Attended,
    Cancelled,
    Waitlisted,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Registered => "registered",
            RegistrationStatus::Attended => "attended",
            RegistrationStatus::Cancelled => "cancelled",
            RegistrationStatus::Waitlisted => "waitlisted",
        }
    }

    /// Statuses that occupy a seat
    pub fn counts_toward_capacity(&self) -> bool {
        matches!(self, RegistrationStatus::Registered | RegistrationStatus::Attended)
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_source", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RegistrationSource {
    #[default]
    Direct,
    SharedLink,
    Recommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub status: RegistrationStatus,
    pub source: RegistrationSource,
    pub registered_at: DateTime<Utc>,
    pub cancellation_reason: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Status a new registration receives given the seats already taken
pub fn admission_status(active_count: i64, max_attendees: i32) -> RegistrationStatus {
    if active_count >= i64::from(max_attendees) {
        RegistrationStatus::Waitlisted
    } else {
        RegistrationStatus::Registered
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationRequest {
    #[serde(default)]
    pub source: RegistrationSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRegistrationRequest {
    pub reason: Option<String>,
}

/// Result of a registration attempt with the event's capacity afterwards
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub registration: Registration,
    pub current_attendees: i64,
    pub available_slots: i64,
}

/// A registration joined with the registrant's profile
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantEntry {
    pub registration_id: i64,
    pub user_id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// A registration joined with its event, for a user's own listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MyRegistration {
    pub registration_id: i64,
    pub event_id: i64,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

/// Active registrants bucketed by gender, each bucket in name order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRoster {
    pub event_id: i64,
    pub male: Vec<RegistrantEntry>,
    pub female: Vec<RegistrantEntry>,
    pub other: Vec<RegistrantEntry>,
    pub prefer_not_to_say: Vec<RegistrantEntry>,
    pub total: usize,
}

impl AttendanceRoster {
    /// Partition registered and attended entries by gender; others are dropped
    pub fn build(event_id: i64, entries: Vec<RegistrantEntry>) -> Self {
        let mut roster = AttendanceRoster {
            event_id,
            ..Default::default()
        };

        for entry in entries.into_iter().filter(|e| e.status.counts_toward_capacity()) {
            roster.bucket_mut(entry.gender).push(entry);
        }

        for gender in Gender::ALL {
            roster.bucket_mut(gender).sort_by_cached_key(|e| {
                (e.last_name.to_lowercase(), e.first_name.to_lowercase())
            });
        }
        roster.total = roster.male.len()
            + roster.female.len()
            + roster.other.len()
            + roster.prefer_not_to_say.len();
        roster
    }

    pub fn bucket(&self, gender: Gender) -> &[RegistrantEntry] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
            Gender::Other => &self.other,
            Gender::PreferNotToSay => &self.prefer_not_to_say,
        }
    }

    fn bucket_mut(&mut self, gender: Gender) -> &mut Vec<RegistrantEntry> {
        match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
            Gender::Other => &mut self.other,
            Gender::PreferNotToSay => &mut self.prefer_not_to_say,
        }
    }
}
