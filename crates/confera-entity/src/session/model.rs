//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use confera_core::types::id::SessionId;

/// What kind of event a session is, which decides how registration for it
/// is constrained.
///
/// Workshops enforce a seat capacity and count toward the per-attendee
/// workshop limit. Conferences do neither and stay open for registration
/// even while the workshop registration window is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Capacity-limited hands-on session.
    Workshop,
    /// Open plenary session, uncapped.
    Conference,
}

impl SessionKind {
    /// Whether sessions of this kind enforce a seat capacity and count
    /// toward the per-attendee workshop limit.
    pub fn is_capacity_limited(self) -> bool {
        matches!(self, Self::Workshop)
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Workshop => write!(f, "workshop"),
            Self::Conference => write!(f, "conference"),
        }
    }
}

/// A registrable workshop or conference session.
///
/// `occupancy` is the live, denormalized count of active registrations.
/// It is mutated only through `SessionStore::adjust_occupancy` and
/// repaired by the reconciliation job; for workshops it must never exceed
/// `capacity`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Display title.
    pub title: String,
    /// Workshop or conference.
    pub kind: SessionKind,
    /// Seat ceiling. Meaningful only for workshops.
    pub capacity: i32,
    /// Live count of active registrations.
    pub occupancy: i32,
    /// Scheduled start, if already published.
    pub starts_at: Option<DateTime<Utc>>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Whether this session enforces a seat capacity.
    pub fn is_capacity_limited(&self) -> bool {
        self.kind.is_capacity_limited()
    }

    /// Remaining seats, or `None` for conferences.
    pub fn seats_remaining(&self) -> Option<i32> {
        self.is_capacity_limited()
            .then(|| (self.capacity - self.occupancy).max(0))
    }

    /// Whether a workshop has no seats left. Conferences are never full.
    pub fn is_full(&self) -> bool {
        self.seats_remaining() == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(kind: SessionKind, capacity: i32, occupancy: i32) -> Session {
        Session {
            id: SessionId::new(),
            title: "Intro to Rust".to_string(),
            kind,
            capacity,
            occupancy,
            starts_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_workshop_seats_remaining() {
        let s = session(SessionKind::Workshop, 30, 28);
        assert_eq!(s.seats_remaining(), Some(2));
        assert!(!s.is_full());
    }

    #[test]
    fn test_full_workshop() {
        let s = session(SessionKind::Workshop, 30, 30);
        assert_eq!(s.seats_remaining(), Some(0));
        assert!(s.is_full());
    }

    #[test]
    fn test_conference_is_never_full() {
        let s = session(SessionKind::Conference, 0, 5000);
        assert_eq!(s.seats_remaining(), None);
        assert!(!s.is_full());
    }
}
