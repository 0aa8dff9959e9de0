//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::normalize_whitespace;
use crate::utils::validation::{bounded_text, MAX_DESCRIPTION_LEN, MAX_LOCATION_LEN, MAX_TITLE_LEN};

/// Largest page size accepted by listing endpoints
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_TAGS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    /// Reserved; nothing transitions into it
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Draft,
        EventStatus::Pending,
        EventStatus::Approved,
        EventStatus::Rejected,
        EventStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Draft and pending events are still proposals and may be edited
    pub fn is_proposal(&self) -> bool {
        matches!(self, EventStatus::Draft | EventStatus::Pending)
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Academic,
    Cultural,
    Sports,
    Technical,
    Social,
    Workshop,
    Seminar,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    pub creator_id: i64,
    pub organizer_id: Option<i64>,
    pub status: EventStatus,
    pub registration_closed: bool,
    pub closed_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i64>,
    pub approval_notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub banner_url: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub shareable_link: Option<String>,
    pub share_clicks: i64,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creator or assigned organizer
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.creator_id == user_id || self.organizer_id == Some(user_id)
    }

    /// Approved, public events are visible to everyone
    pub fn is_publicly_visible(&self) -> bool {
        self.status == EventStatus::Approved && self.is_public
    }
}

/// An event together with its live capacity figures
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub current_attendees: i64,
    pub available_slots: i64,
    pub waitlisted: i64,
}

impl EventDetails {
    pub fn new(event: Event, current_attendees: i64, waitlisted: i64) -> Self {
        let available_slots = (i64::from(event.max_attendees) - current_attendees).max(0);
        Self {
            event,
            current_attendees,
            available_slots,
            waitlisted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub banner_url: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Validated insert payload
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: i32,
    pub creator_id: i64,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub banner_url: Option<String>,
}

impl CreateEventRequest {
    pub fn validate(self, creator_id: i64, now: DateTime<Utc>) -> Result<NewEvent> {
        Ok(NewEvent {
            title: bounded_text("Title", &normalize_whitespace(&self.title), MAX_TITLE_LEN)?,
            description: bounded_text("Description", &self.description, MAX_DESCRIPTION_LEN)?,
            category: self.category,
            event_date: check_event_date(self.event_date, now)?,
            location: bounded_text("Location", &self.location, MAX_LOCATION_LEN)?,
            max_attendees: check_capacity(self.max_attendees)?,
            creator_id,
            tags: normalize_tags(self.tags)?,
            is_public: self.is_public,
            banner_url: self.banner_url,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub event_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub max_attendees: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl UpdateEventRequest {
    /// Validate the fields that are present, leaving absent ones untouched
    pub fn validate(self, now: DateTime<Utc>) -> Result<UpdateEventRequest> {
        Ok(UpdateEventRequest {
            title: self
                .title
                .map(|t| bounded_text("Title", &normalize_whitespace(&t), MAX_TITLE_LEN))
                .transpose()?,
            description: self
                .description
                .map(|d| bounded_text("Description", &d, MAX_DESCRIPTION_LEN))
                .transpose()?,
            category: self.category,
            event_date: self.event_date.map(|d| check_event_date(d, now)).transpose()?,
            location: self
                .location
                .map(|l| bounded_text("Location", &l, MAX_LOCATION_LEN))
                .transpose()?,
            max_attendees: self.max_attendees.map(check_capacity).transpose()?,
            tags: self.tags.map(normalize_tags).transpose()?,
            is_public: self.is_public,
        })
    }
}

/// Media references; these are stored as given without full validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaRequest {
    pub banner_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectEventRequest {
    pub rejection_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveEventRequest {
    pub approval_notes: Option<String>,
}

/// Closed set of listing criteria; each present field becomes one predicate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFilter {
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
    pub search: Option<String>,
    pub tag: Option<String>,
    pub creator_id: Option<i64>,
    #[serde(default)]
    pub upcoming_only: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl EventFilter {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Search text with blank input treated as absent
    pub fn search_text(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(normalize_whitespace)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

fn check_event_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    if date <= now {
        return Err(CampusEventsError::Validation("Event date must be in the future".to_string()));
    }
    Ok(date)
}

fn check_capacity(max_attendees: i32) -> Result<i32> {
    if max_attendees < 1 {
        return Err(CampusEventsError::Validation("maxAttendees must be at least 1".to_string()));
    }
    Ok(max_attendees)
}

fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    if normalized.len() > MAX_TAGS {
        return Err(CampusEventsError::Validation(format!("At most {} tags are allowed", MAX_TAGS)));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            title: "  Spring   Hackathon ".to_string(),
            description: "Build things".to_string(),
            category: EventCategory::Technical,
            event_date: Utc::now() + Duration::days(7),
            location: "Hall A".to_string(),
            max_attendees: 50,
            tags: vec!["#Code".to_string(), "code".to_string(), " ".to_string()],
            is_public: true,
            banner_url: None,
        }
    }

    #[test]
    fn test_create_request_normalizes() {
        let new_event = request().validate(7, Utc::now()).unwrap();
        assert_eq!(new_event.title, "Spring Hackathon");
        assert_eq!(new_event.tags, vec!["code".to_string()]);
        assert_eq!(new_event.creator_id, 7);
    }

    #[test]
    fn test_past_date_rejected() {
        let mut req = request();
        req.event_date = Utc::now() - Duration::hours(1);
        assert_matches!(req.validate(1, Utc::now()), Err(CampusEventsError::Validation(_)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut req = request();
        req.max_attendees = 0;
        assert_matches!(req.validate(1, Utc::now()), Err(CampusEventsError::Validation(_)));
    }

    #[test]
    fn test_update_validates_present_fields_only() {
        let update = UpdateEventRequest {
            location: Some(" Room 4 ".to_string()),
            ..Default::default()
        }
        .validate(Utc::now())
        .unwrap();
        assert_eq!(update.location.as_deref(), Some("Room 4"));
        assert!(update.title.is_none());

        let bad = UpdateEventRequest {
            max_attendees: Some(0),
            ..Default::default()
        };
        assert!(bad.validate(Utc::now()).is_err());
    }

    #[test]
    fn test_location_length_limit() {
        let mut req = request();
        req.location = "L".repeat(MAX_LOCATION_LEN);
        assert!(req.validate(1, Utc::now()).is_ok());

        let mut req = request();
        req.location = "L".repeat(MAX_LOCATION_LEN + 1);
        assert_matches!(req.validate(1, Utc::now()), Err(CampusEventsError::Validation(_)));

        let update = UpdateEventRequest {
            location: Some("L".repeat(MAX_LOCATION_LEN + 1)),
            ..Default::default()
        };
        assert_matches!(update.validate(Utc::now()), Err(CampusEventsError::Validation(_)));
    }

    #[test]
    fn test_public_visibility_needs_approval_and_listing() {
        assert!(sample_event(1, 1, EventStatus::Approved).is_publicly_visible());
        assert!(!sample_event(1, 1, EventStatus::Pending).is_publicly_visible());

        let mut unlisted = sample_event(1, 1, EventStatus::Approved);
        unlisted.is_public = false;
        assert!(!unlisted.is_publicly_visible());
    }

    #[test]
    fn test_filter_paging_bounds() {
        let filter = EventFilter {
            page: Some(0),
            limit: Some(1000),
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);
        assert!(filter.search_text().is_none());
    }

    #[test]
    fn test_details_available_slots_never_negative() {
        let event = sample_event(1, 1, EventStatus::Approved);
        let details = EventDetails::new(event, 3, 1);
        assert_eq!(details.available_slots, 0);
        assert_eq!(details.waitlisted, 1);
    }
}

/// Event fixture for unit tests
#[cfg(test)]
pub(crate) fn sample_event(id: i64, creator_id: i64, status: EventStatus) -> Event {
    let now = Utc::now();
    Event {
        id,
        title: "Robotics Night".into(),
        description: "Demo evening".into(),
        category: EventCategory::Technical,
        event_date: now + chrono::Duration::days(3),
        location: "Lab 2".into(),
        max_attendees: 2,
        creator_id,
        organizer_id: None,
        status,
        registration_closed: false,
        closed_at: None,
        approved_by: None,
        approval_notes: None,
        approved_at: None,
        banner_url: None,
        images: vec![],
        videos: vec![],
        shareable_link: None,
        share_clicks: 0,
        tags: vec![],
        is_public: true,
        created_at: now,
        updated_at: now,
    }
}
