//! Registration entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use confera_core::types::id::{RegistrationId, SessionId, UserId};

/// Lifecycle state of a registration.
///
/// Cancellation is terminal for the row; re-registering afterwards
/// creates a fresh registration rather than reviving the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// The attendee currently holds a place in the session.
    Active,
    /// The place was given up or revoked.
    Cancelled,
}

/// One attendee's enrollment in one session.
///
/// At most one registration per (user, session) pair may be `Active` at
/// any instant; the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    /// Unique registration identifier.
    pub id: RegistrationId,
    /// The attendee.
    pub user_id: UserId,
    /// The session registered for.
    pub session_id: SessionId,
    /// Current lifecycle state.
    pub status: RegistrationStatus,
    /// When the registration was created.
    pub created_at: DateTime<Utc>,
    /// When the registration was last modified.
    pub updated_at: DateTime<Utc>,
    /// When the registration was cancelled, if it was.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// Whether the registration currently holds a place.
    pub fn is_active(&self) -> bool {
        self.status == RegistrationStatus::Active
    }
}
