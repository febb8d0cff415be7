//! Registration settings singleton model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Admin-configured registration settings.
///
/// A single row, read on every registration decision (possibly through a
/// short-lived cache) and mutated only by the admin configuration surface.
/// The window fields gate workshop registration only; conferences stay
/// open regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RegistrationSettings {
    /// Master switch for workshop registration.
    pub registration_enabled: bool,
    /// Whether attendees may cancel their own registrations.
    pub cancellation_enabled: bool,
    /// Earliest instant registration is accepted, if set.
    pub registration_opens_at: Option<DateTime<Utc>>,
    /// Latest instant registration is accepted, if set.
    pub registration_deadline: Option<DateTime<Utc>>,
    /// Maximum simultaneous workshop registrations per attendee.
    pub max_workshops_per_user: i32,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            registration_enabled: true,
            cancellation_enabled: true,
            registration_opens_at: None,
            registration_deadline: None,
            max_workshops_per_user: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = RegistrationSettings::default();
        assert!(s.registration_enabled);
        assert!(s.cancellation_enabled);
        assert!(s.registration_opens_at.is_none());
        assert!(s.registration_deadline.is_none());
        assert_eq!(s.max_workshops_per_user, 2);
    }
}
