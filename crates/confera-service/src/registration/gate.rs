//! Registration window gate.
//!
//! Decides whether self-service registration is currently permitted at
//! all, from the admin-configured settings and the session kind. Pure;
//! performs no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use confera_entity::session::model::SessionKind;
use confera_entity::settings::model::RegistrationSettings;

/// Why the registration window rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosedReason {
    /// The master switch is off.
    GloballyDisabled,
    /// The configured opening time has not been reached yet.
    NotYetOpen,
    /// The configured deadline has passed.
    PastDeadline,
}

impl std::fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GloballyDisabled => write!(f, "globally-disabled"),
            Self::NotYetOpen => write!(f, "not-yet-open"),
            Self::PastDeadline => write!(f, "past-deadline"),
        }
    }
}

/// Check whether registration for a session of the given kind is open at
/// `now`.
///
/// Conferences are never gated: they stay open for registration even
/// while the workshop window is closed or the master switch is off.
pub fn registration_open(
    now: DateTime<Utc>,
    settings: &RegistrationSettings,
    kind: SessionKind,
) -> Result<(), ClosedReason> {
    if !kind.is_capacity_limited() {
        return Ok(());
    }

    if !settings.registration_enabled {
        return Err(ClosedReason::GloballyDisabled);
    }

    if let Some(opens_at) = settings.registration_opens_at {
        if now < opens_at {
            return Err(ClosedReason::NotYetOpen);
        }
    }

    if let Some(deadline) = settings.registration_deadline {
        if now > deadline {
            return Err(ClosedReason::PastDeadline);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn settings() -> RegistrationSettings {
        RegistrationSettings::default()
    }

    #[test]
    fn test_open_by_default() {
        let now = Utc::now();
        assert_eq!(
            registration_open(now, &settings(), SessionKind::Workshop),
            Ok(())
        );
    }

    #[test]
    fn test_master_switch() {
        let mut s = settings();
        s.registration_enabled = false;
        assert_eq!(
            registration_open(Utc::now(), &s, SessionKind::Workshop),
            Err(ClosedReason::GloballyDisabled)
        );
    }

    #[test]
    fn test_not_yet_open() {
        let now = Utc::now();
        let mut s = settings();
        s.registration_opens_at = Some(now + Duration::days(1));
        assert_eq!(
            registration_open(now, &s, SessionKind::Workshop),
            Err(ClosedReason::NotYetOpen)
        );
    }

    #[test]
    fn test_past_deadline() {
        let now = Utc::now();
        let mut s = settings();
        s.registration_deadline = Some(now - Duration::hours(1));
        assert_eq!(
            registration_open(now, &s, SessionKind::Workshop),
            Err(ClosedReason::PastDeadline)
        );
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let now = Utc::now();
        let mut s = settings();
        s.registration_opens_at = Some(now);
        s.registration_deadline = Some(now);
        assert_eq!(registration_open(now, &s, SessionKind::Workshop), Ok(()));
    }

    #[test]
    fn test_conferences_are_never_gated() {
        let now = Utc::now();
        let mut s = settings();
        s.registration_enabled = false;
        s.registration_opens_at = Some(now + Duration::days(1));
        assert_eq!(registration_open(now, &s, SessionKind::Conference), Ok(()));
    }
}
