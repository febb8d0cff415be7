//! Per-user and per-session eligibility rules.
//!
//! Pure functions over counts the caller has already read; no I/O. The
//! duplicate-registration check happens in the ledger because it needs a
//! targeted lookup.

use confera_entity::session::model::Session;
use confera_entity::settings::model::RegistrationSettings;

/// A rule the requested registration would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The attendee already holds the maximum number of workshop
    /// registrations.
    UserLimitExceeded {
        /// The configured per-attendee limit.
        limit: i32,
    },
    /// The workshop has no seats left.
    SessionFull,
}

/// Check whether a new registration for `session` would break the
/// per-user workshop limit or the seat capacity.
///
/// `user_workshop_count` is the attendee's current number of active
/// workshop registrations (not counting the one being requested);
/// `occupancy` is the session's occupancy as read by the caller.
///
/// Checks run in a fixed order — user limit, then capacity — and the
/// first violation wins, so rejection messages are deterministic.
/// Conferences are exempt from both rules.
pub fn check_eligibility(
    session: &Session,
    user_workshop_count: i64,
    occupancy: i32,
    settings: &RegistrationSettings,
) -> Result<(), Violation> {
    if !session.is_capacity_limited() {
        return Ok(());
    }

    if user_workshop_count >= i64::from(settings.max_workshops_per_user) {
        return Err(Violation::UserLimitExceeded {
            limit: settings.max_workshops_per_user,
        });
    }

    if occupancy >= session.capacity {
        return Err(Violation::SessionFull);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use confera_core::types::id::SessionId;
    use confera_entity::session::model::SessionKind;

    fn session(kind: SessionKind, capacity: i32) -> Session {
        Session {
            id: SessionId::new(),
            title: "Advanced macros".to_string(),
            kind,
            capacity,
            occupancy: 0,
            starts_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ok_when_under_both_limits() {
        let s = session(SessionKind::Workshop, 10);
        let settings = RegistrationSettings::default();
        assert_eq!(check_eligibility(&s, 1, 5, &settings), Ok(()));
    }

    #[test]
    fn test_user_limit() {
        let s = session(SessionKind::Workshop, 10);
        let settings = RegistrationSettings::default();
        assert_eq!(
            check_eligibility(&s, 2, 0, &settings),
            Err(Violation::UserLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn test_session_full() {
        let s = session(SessionKind::Workshop, 10);
        let settings = RegistrationSettings::default();
        assert_eq!(
            check_eligibility(&s, 0, 10, &settings),
            Err(Violation::SessionFull)
        );
    }

    #[test]
    fn test_user_limit_wins_over_capacity() {
        // Both rules violated: the user limit is reported, per the fixed
        // check order.
        let s = session(SessionKind::Workshop, 10);
        let settings = RegistrationSettings::default();
        assert_eq!(
            check_eligibility(&s, 2, 10, &settings),
            Err(Violation::UserLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn test_conferences_are_exempt() {
        let s = session(SessionKind::Conference, 0);
        let settings = RegistrationSettings::default();
        assert_eq!(check_eligibility(&s, 99, 99, &settings), Ok(()));
    }
}
