//! Analytics read models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of a GROUP BY count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct KeyCount {
    pub key: String,
    pub count: i64,
}

/// Look up a key in a grouped count, treating absent keys as zero
pub fn count_for(counts: &[KeyCount], key: &str) -> i64 {
    counts.iter().find(|c| c.key == key).map_or(0, |c| c.count)
}

/// Share of active registrants that actually attended, in percent
pub fn attendance_rate(registered: i64, attended: i64) -> f64 {
    let active = registered + attended;
    if active == 0 {
        return 0.0;
    }
    (attended as f64 / active as f64 * 1000.0).round() / 10.0
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub event_id: i64,
    pub title: String,
    pub max_attendees: i32,
    pub registered: i64,
    pub attended: i64,
    pub waitlisted: i64,
    pub cancelled: i64,
    pub current_attendees: i64,
    pub available_slots: i64,
    pub attendance_rate: f64,
    pub by_gender: Vec<KeyCount>,
    pub by_source: Vec<KeyCount>,
    pub share_clicks: i64,
}

impl EventStats {
    /// Assemble stats from the per-status counts of one event
    pub fn from_counts(
        event_id: i64,
        title: String,
        max_attendees: i32,
        share_clicks: i64,
        by_status: &[KeyCount],
        by_gender: Vec<KeyCount>,
        by_source: Vec<KeyCount>,
    ) -> Self {
        let registered = count_for(by_status, "registered");
        let attended = count_for(by_status, "attended");
        let current_attendees = registered + attended;

        Self {
            event_id,
            title,
            max_attendees,
            registered,
            attended,
            waitlisted: count_for(by_status, "waitlisted"),
            cancelled: count_for(by_status, "cancelled"),
            current_attendees,
            available_slots: (i64::from(max_attendees) - current_attendees).max(0),
            attendance_rate: attendance_rate(registered, attended),
            by_gender,
            by_source,
            share_clicks,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizerDashboard {
    pub user_id: i64,
    pub events_by_status: Vec<KeyCount>,
    pub total_events: i64,
    pub total_registrations: i64,
    pub total_attended: i64,
    pub upcoming_approved: i64,
    pub total_share_clicks: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOverview {
    pub users_by_role: Vec<KeyCount>,
    pub events_by_status: Vec<KeyCount>,
    pub events_by_category: Vec<KeyCount>,
    pub total_users: i64,
    pub total_events: i64,
    pub total_registrations: i64,
}
