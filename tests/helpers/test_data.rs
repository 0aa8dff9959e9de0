//! Test data builders

use chrono::{Duration, Utc};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use campus_events::models::event::{CreateEventRequest, EventCategory};
use campus_events::models::user::{Gender, RegisterUserRequest};

pub const TEST_PASSWORD: &str = "correct-horse";

/// A valid registration with a unique student id and email
pub fn registration_request(gender: Gender) -> RegisterUserRequest {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    RegisterUserRequest {
        student_id: format!("S-{}", &suffix[..10]),
        email: format!("{}@student.university.edu", &suffix[..12]),
        password: TEST_PASSWORD.to_string(),
        first_name,
        last_name,
        gender,
    }
}

pub fn event_request(max_attendees: i32) -> CreateEventRequest {
    CreateEventRequest {
        title: "Robotics Club Demo Night".to_string(),
        description: "Build-and-battle showcase".to_string(),
        category: EventCategory::Technical,
        event_date: Utc::now() + Duration::days(14),
        location: "Engineering Hall 101".to_string(),
        max_attendees,
        tags: vec!["robotics".to_string()],
        is_public: true,
        banner_url: None,
    }
}
