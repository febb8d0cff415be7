//! Scenario tests for the registration engine against in-memory stores.

mod common;

use chrono::{Duration, Utc};

use common::Harness;
use confera_core::types::id::{SessionId, UserId};
use confera_entity::registration::store::RegistrationStore;
use confera_entity::session::store::SessionStore;
use confera_entity::settings::model::RegistrationSettings;
use confera_service::registration::{ClosedReason, RegistrationError};

#[tokio::test]
async fn test_register_then_duplicate_then_cancel_then_reregister() {
    let h = Harness::new();
    let workshop = h.add_workshop("Lockpicking", 10).await;
    let user = UserId::new();
    let now = Utc::now();

    let first = h.engine.register(now, user, workshop).await.unwrap();
    assert!(first.is_active());
    assert_eq!(h.occupancy(workshop).await, 1);

    let dup = h.engine.register(now, user, workshop).await;
    assert!(matches!(dup, Err(RegistrationError::AlreadyRegistered)));
    assert_eq!(h.occupancy(workshop).await, 1);

    h.engine.cancel(now, user, workshop).await.unwrap();
    assert_eq!(h.occupancy(workshop).await, 0);

    let again = h.engine.register(now, user, workshop).await.unwrap();
    assert!(again.is_active());
    assert_ne!(again.id, first.id, "cancelled rows are not reused");
    assert_eq!(h.occupancy(workshop).await, 1);
}

#[tokio::test]
async fn test_cancel_twice_decrements_once() {
    let h = Harness::new();
    let workshop = h.add_workshop("Fermentation", 5).await;
    let user = UserId::new();
    let now = Utc::now();

    h.engine.register(now, user, workshop).await.unwrap();
    assert_eq!(h.occupancy(workshop).await, 1);

    h.engine.cancel(now, user, workshop).await.unwrap();
    let second = h.engine.cancel(now, user, workshop).await;
    assert!(matches!(second, Err(RegistrationError::NotRegistered)));
    assert_eq!(h.occupancy(workshop).await, 0);
}

#[tokio::test]
async fn test_user_limit_applies_to_workshops_only() {
    let h = Harness::new();
    let a = h.add_workshop("Workshop A", 10).await;
    let b = h.add_workshop("Workshop B", 10).await;
    let c = h.add_workshop("Workshop C", 10).await;
    let conference = h.add_conference("Opening keynote").await;
    let user = UserId::new();
    let now = Utc::now();

    h.engine.register(now, user, a).await.unwrap();
    h.engine.register(now, user, b).await.unwrap();

    let third = h.engine.register(now, user, c).await;
    assert!(matches!(
        third,
        Err(RegistrationError::UserLimitExceeded { limit: 2 })
    ));

    // Conferences neither count toward nor respect the workshop limit.
    h.engine.register(now, user, conference).await.unwrap();
}

#[tokio::test]
async fn test_session_full_rejection() {
    let h = Harness::new();
    let workshop = h.add_workshop("Tiny room", 1).await;
    let now = Utc::now();

    h.engine
        .register(now, UserId::new(), workshop)
        .await
        .unwrap();

    let overflow = h.engine.register(now, UserId::new(), workshop).await;
    assert!(matches!(overflow, Err(RegistrationError::SessionFull)));
    assert_eq!(h.occupancy(workshop).await, 1);
}

#[tokio::test]
async fn test_window_gates_workshops_but_not_conferences() {
    let now = Utc::now();
    let mut settings = RegistrationSettings::default();
    settings.registration_opens_at = Some(now + Duration::days(1));
    let h = Harness::with_settings(settings);

    let workshop = h.add_workshop("Early bird", 10).await;
    let conference = h.add_conference("Plenary").await;
    let user = UserId::new();

    let early = h.engine.register(now, user, workshop).await;
    assert!(matches!(
        early,
        Err(RegistrationError::RegistrationClosed(ClosedReason::NotYetOpen))
    ));

    h.engine.register(now, user, conference).await.unwrap();

    // Once the window opens, the same call goes through.
    let later = now + Duration::days(2);
    h.engine.register(later, user, workshop).await.unwrap();
}

#[tokio::test]
async fn test_deadline_and_master_switch() {
    let now = Utc::now();
    let mut settings = RegistrationSettings::default();
    settings.registration_deadline = Some(now - Duration::hours(1));
    let h = Harness::with_settings(settings);
    let workshop = h.add_workshop("Late entry", 10).await;

    let late = h.engine.register(now, UserId::new(), workshop).await;
    assert!(matches!(
        late,
        Err(RegistrationError::RegistrationClosed(ClosedReason::PastDeadline))
    ));

    let mut disabled = RegistrationSettings::default();
    disabled.registration_enabled = false;
    h.settings.set(disabled).await;

    let off = h.engine.register(now, UserId::new(), workshop).await;
    assert!(matches!(
        off,
        Err(RegistrationError::RegistrationClosed(
            ClosedReason::GloballyDisabled
        ))
    ));
}

#[tokio::test]
async fn test_admin_assign_bypasses_gate_but_not_capacity() {
    let now = Utc::now();
    let mut settings = RegistrationSettings::default();
    settings.registration_enabled = false;
    let h = Harness::with_settings(settings);
    let workshop = h.add_workshop("Invite only", 1).await;

    // The window is shut, but the admin path goes through.
    h.engine
        .admin_assign(now, UserId::new(), workshop)
        .await
        .unwrap();
    assert_eq!(h.occupancy(workshop).await, 1);

    // Capacity still binds admins.
    let full = h.engine.admin_assign(now, UserId::new(), workshop).await;
    assert!(matches!(full, Err(RegistrationError::SessionFull)));
}

#[tokio::test]
async fn test_admin_assign_respects_user_limit_and_duplicates() {
    let h = Harness::new();
    let a = h.add_workshop("A", 10).await;
    let b = h.add_workshop("B", 10).await;
    let c = h.add_workshop("C", 10).await;
    let user = UserId::new();
    let now = Utc::now();

    h.engine.admin_assign(now, user, a).await.unwrap();
    let dup = h.engine.admin_assign(now, user, a).await;
    assert!(matches!(dup, Err(RegistrationError::AlreadyRegistered)));

    h.engine.admin_assign(now, user, b).await.unwrap();
    let over = h.engine.admin_assign(now, user, c).await;
    assert!(matches!(
        over,
        Err(RegistrationError::UserLimitExceeded { .. })
    ));
}

#[tokio::test]
async fn test_cancellation_switch_binds_self_service_only() {
    let now = Utc::now();
    let mut settings = RegistrationSettings::default();
    settings.cancellation_enabled = false;
    let h = Harness::with_settings(settings);
    let workshop = h.add_workshop("No take-backs", 10).await;
    let user = UserId::new();

    h.engine.register(now, user, workshop).await.unwrap();

    let blocked = h.engine.cancel(now, user, workshop).await;
    assert!(matches!(
        blocked,
        Err(RegistrationError::CancellationDisabled)
    ));
    assert_eq!(h.occupancy(workshop).await, 1);

    h.engine.admin_remove(now, user, workshop).await.unwrap();
    assert_eq!(h.occupancy(workshop).await, 0);
}

#[tokio::test]
async fn test_admin_remove_unknown_registration() {
    let h = Harness::new();
    let workshop = h.add_workshop("Quiet room", 10).await;
    let now = Utc::now();

    h.engine
        .register(now, UserId::new(), workshop)
        .await
        .unwrap();

    let missing = h.engine.admin_remove(now, UserId::new(), workshop).await;
    assert!(matches!(missing, Err(RegistrationError::NotRegistered)));
    assert_eq!(h.occupancy(workshop).await, 1);
}

#[tokio::test]
async fn test_unknown_session() {
    let h = Harness::new();
    let now = Utc::now();
    let ghost = SessionId::new();

    let result = h.engine.register(now, UserId::new(), ghost).await;
    assert!(matches!(
        result,
        Err(RegistrationError::SessionNotFound(id)) if id == ghost
    ));
}

#[tokio::test]
async fn test_reconciliation_restores_corrupted_counter() {
    let h = Harness::new();
    let workshop = h.add_workshop("Drifted", 50).await;
    let now = Utc::now();

    for _ in 0..3 {
        h.engine
            .register(now, UserId::new(), workshop)
            .await
            .unwrap();
    }

    // Simulate drift from a manual data edit.
    h.sessions.set_occupancy(workshop, 41).await.unwrap();

    let count = h.reconciler.reconcile_session(workshop).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(h.occupancy(workshop).await, 3);

    // Idempotent: a second run changes nothing.
    let report = h.reconciler.reconcile_all().await.unwrap();
    assert!(report.corrections.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(h.occupancy(workshop).await, 3);
}

#[tokio::test]
async fn test_session_deletion_cascade() {
    let h = Harness::new();
    let workshop = h.add_workshop("Doomed", 10).await;
    let user = UserId::new();
    let now = Utc::now();

    h.engine.register(now, user, workshop).await.unwrap();

    // The admin deletion flow removes registrations first, then the
    // session row.
    let removed = h
        .registrations
        .delete_all_for_session(workshop)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert!(h.sessions.delete(workshop).await.unwrap());

    let gone = h.engine.register(now, user, workshop).await;
    assert!(matches!(gone, Err(RegistrationError::SessionNotFound(_))));
}
