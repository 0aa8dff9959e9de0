//! Integration tests for capacity-gated registration
//!
//! These need PostgreSQL: `TEST_DATABASE_URL`, or Docker for a container.

mod helpers;

use assert_matches::assert_matches;
use serial_test::serial;
use campus_events::models::registration::{RegistrationSource, RegistrationStatus};
use campus_events::models::user::{Gender, UserRole};
use campus_events::CampusEventsError;

use helpers::TestContext;

#[tokio::test]
#[serial]
async fn test_single_seat_event_waitlists_second_registrant() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user(UserRole::Student).await;
    let (_, bob) = ctx.create_user(UserRole::Student).await;

    let event = ctx.approved_event(&owner, &admin, 1).await;

    let first = registrations.register(&alice, event.id, RegistrationSource::Direct).await.unwrap();
    assert_eq!(first.registration.status, RegistrationStatus::Registered);
    assert_eq!(first.current_attendees, 1);
    assert_eq!(first.available_slots, 0);

    let second = registrations
        .register(&bob, event.id, RegistrationSource::SharedLink)
        .await
        .unwrap();
    assert_eq!(second.registration.status, RegistrationStatus::Waitlisted);
    assert_eq!(second.registration.source, RegistrationSource::SharedLink);
    assert_eq!(second.current_attendees, 1);
}

#[tokio::test]
#[serial]
async fn test_first_n_registered_then_waitlisted() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;

    let capacity = 3;
    let event = ctx.approved_event(&owner, &admin, capacity).await;

    let mut statuses = Vec::new();
    for _ in 0..capacity + 2 {
        let (_, student) = ctx.create_user(UserRole::Student).await;
        let outcome = registrations
            .register(&student, event.id, RegistrationSource::Direct)
            .await
            .unwrap();
        statuses.push(outcome.registration.status);
    }

    assert!(statuses[..3].iter().all(|s| *s == RegistrationStatus::Registered));
    assert!(statuses[3..].iter().all(|s| *s == RegistrationStatus::Waitlisted));
}

#[tokio::test]
#[serial]
async fn test_concurrent_registrations_respect_capacity() {
    let ctx = TestContext::new().await;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let event = ctx.approved_event(&owner, &admin, 2).await;

    let mut students = Vec::new();
    for _ in 0..6 {
        students.push(ctx.create_user(UserRole::Student).await.1);
    }

    let attempts = students.iter().map(|student| {
        let service = ctx.state.services.registration_service.clone();
        let student = *student;
        let event_id = event.id;
        async move { service.register(&student, event_id, RegistrationSource::Direct).await }
    });
    let outcomes = futures::future::join_all(attempts).await;

    let registered = outcomes
        .iter()
        .filter_map(|o| o.as_ref().ok())
        .filter(|outcome| outcome.registration.status == RegistrationStatus::Registered)
        .count();
    assert!(outcomes.iter().all(|o| o.is_ok()));
    assert_eq!(registered, 2);
}

#[tokio::test]
#[serial]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user(UserRole::Student).await;
    let (_, bob) = ctx.create_user(UserRole::Student).await;

    let event = ctx.approved_event(&owner, &admin, 1).await;
    registrations.register(&alice, event.id, RegistrationSource::Direct).await.unwrap();
    registrations.register(&bob, event.id, RegistrationSource::Direct).await.unwrap();

    let err = registrations
        .register(&alice, event.id, RegistrationSource::Direct)
        .await
        .unwrap_err();
    assert_matches!(err, CampusEventsError::DuplicateRegistration);
    assert_eq!(err.status_code().as_u16(), 409);

    // Waitlisted entries count as existing registrations too
    assert_matches!(
        registrations.register(&bob, event.id, RegistrationSource::Direct).await,
        Err(CampusEventsError::DuplicateRegistration)
    );
}

#[tokio::test]
#[serial]
async fn test_registration_requires_open_approved_event() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let events = &ctx.state.services.event_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user(UserRole::Student).await;

    let draft = ctx.create_event(&owner, 10).await;
    assert_matches!(
        registrations.register(&alice, draft.id, RegistrationSource::Direct).await,
        Err(CampusEventsError::EventNotApproved)
    );

    let approved = ctx.approved_event(&owner, &admin, 10).await;
    events.close_registration(&owner, approved.id).await.unwrap();
    assert_matches!(
        registrations.register(&alice, approved.id, RegistrationSource::Direct).await,
        Err(CampusEventsError::RegistrationClosed)
    );

    assert_matches!(
        registrations.register(&alice, i64::MAX, RegistrationSource::Direct).await,
        Err(CampusEventsError::EventNotFound { .. })
    );
}

#[tokio::test]
#[serial]
async fn test_cancel_does_not_promote_waitlist() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user(UserRole::Student).await;
    let (_, bob) = ctx.create_user(UserRole::Student).await;

    let event = ctx.approved_event(&owner, &admin, 1).await;
    registrations.register(&alice, event.id, RegistrationSource::Direct).await.unwrap();
    registrations.register(&bob, event.id, RegistrationSource::Direct).await.unwrap();

    let removed = registrations
        .cancel(&alice, event.id, Some("Exam clash".to_string()))
        .await
        .unwrap();
    assert_eq!(removed.user_id, alice.user_id);

    let mine = registrations.my_registrations(&bob).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].status, RegistrationStatus::Waitlisted);

    assert_matches!(
        registrations.cancel(&alice, event.id, None).await,
        Err(CampusEventsError::RegistrationNotFound)
    );
}

#[tokio::test]
#[serial]
async fn test_delete_event_removes_registrations() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user(UserRole::Student).await;

    let event = ctx.approved_event(&owner, &admin, 5).await;
    registrations.register(&alice, event.id, RegistrationSource::Direct).await.unwrap();
    assert_eq!(ctx.database.count_registrations_for(event.id).await, 1);

    ctx.state.services.event_service.delete(&owner, event.id).await.unwrap();

    assert_eq!(ctx.database.count_registrations_for(event.id).await, 0);
    assert_matches!(
        ctx.state.db.require_event(event.id).await,
        Err(CampusEventsError::EventNotFound { .. })
    );

    // Registrants are told, without a link to the removed event
    let inbox = ctx
        .state
        .services
        .notification_service
        .list(alice.user_id, &Default::default())
        .await
        .unwrap();
    assert!(inbox.notifications.iter().any(|n| n.related_event_id.is_none()));
}

#[tokio::test]
#[serial]
async fn test_attendance_roster_and_stats() {
    let ctx = TestContext::new().await;
    let registrations = &ctx.state.services.registration_service;
    let (_, owner) = ctx.create_user(UserRole::Student).await;
    let (_, admin) = ctx.create_user(UserRole::Admin).await;
    let (_, alice) = ctx.create_user_with_gender(UserRole::Student, Gender::Female).await;
    let (_, bob) = ctx.create_user_with_gender(UserRole::Student, Gender::Male).await;
    let (_, carol) = ctx.create_user_with_gender(UserRole::Student, Gender::Other).await;

    let event = ctx.approved_event(&owner, &admin, 2).await;
    let a = registrations.register(&alice, event.id, RegistrationSource::Direct).await.unwrap();
    registrations.register(&bob, event.id, RegistrationSource::Direct).await.unwrap();
    registrations.register(&carol, event.id, RegistrationSource::Direct).await.unwrap();

    assert_matches!(
        registrations.mark_attended(&bob, a.registration.id).await,
        Err(CampusEventsError::PermissionDenied(_))
    );
    let attended = registrations.mark_attended(&owner, a.registration.id).await.unwrap();
    assert_eq!(attended.status, RegistrationStatus::Attended);
    assert!(attended.checked_in_at.is_some());

    let roster = registrations.roster(&owner, event.id).await.unwrap();
    assert_eq!(roster.female.len(), 1);
    assert_eq!(roster.male.len(), 1);
    assert!(roster.other.is_empty());
    assert_eq!(roster.total, 2);

    let stats = ctx.state.services.analytics_service.event_stats(&owner, event.id).await.unwrap();
    assert_eq!(stats.registered, 1);
    assert_eq!(stats.attended, 1);
    assert_eq!(stats.waitlisted, 1);
    assert_eq!(stats.current_attendees, 2);
    assert_eq!(stats.available_slots, 0);
    assert_eq!(stats.attendance_rate, 50.0);

    assert_matches!(
        ctx.state.services.analytics_service.event_stats(&carol, event.id).await,
        Err(CampusEventsError::PermissionDenied(_))
    );
}
