//! Shared helpers for integration tests

#![allow(dead_code)]

pub mod database_helper;
pub mod test_data;

pub use database_helper::TestDatabase;
pub use test_data::{event_request, registration_request, TEST_PASSWORD};

use campus_events::config::Settings;
use campus_events::database::DatabaseService;
use campus_events::models::event::Event;
use campus_events::models::lifecycle::Actor;
use campus_events::models::user::{Gender, User, UserRole};
use campus_events::AppState;

/// Application state wired to the test database
pub struct TestContext {
    pub database: TestDatabase,
    pub state: AppState,
}

impl TestContext {
    pub async fn new() -> Self {
        let database = TestDatabase::connect().await;
        let state = AppState::new(&Settings::default(), DatabaseService::new(database.pool.clone()))
            .expect("Failed to build application state");
        Self { database, state }
    }

    pub async fn create_user(&self, role: UserRole) -> (User, Actor) {
        self.create_user_with_gender(role, Gender::PreferNotToSay).await
    }

    pub async fn create_user_with_gender(&self, role: UserRole, gender: Gender) -> (User, Actor) {
        let user = self
            .state
            .services
            .user_service
            .register(registration_request(gender))
            .await
            .expect("Failed to register test user");

        let user = if role == UserRole::Student {
            user
        } else {
            self.state
                .db
                .users
                .set_role(user.id, role)
                .await
                .expect("Failed to set role")
                .expect("Test user disappeared")
        };
        let actor = Actor::new(user.id, user.role);
        (user, actor)
    }

    pub async fn create_event(&self, owner: &Actor, max_attendees: i32) -> Event {
        self.state
            .services
            .event_service
            .create(owner, event_request(max_attendees))
            .await
            .expect("Failed to create test event")
    }

    /// Create, submit and approve an event
    pub async fn approved_event(&self, owner: &Actor, admin: &Actor, max_attendees: i32) -> Event {
        let events = &self.state.services.event_service;
        let event = self.create_event(owner, max_attendees).await;
        events.submit(owner, event.id).await.expect("Failed to submit");
        events
            .approve(admin, event.id, Some("Looks good".to_string()))
            .await
            .expect("Failed to approve")
    }
}
