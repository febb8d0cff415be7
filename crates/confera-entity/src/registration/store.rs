//! Registration store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use confera_core::result::AppResult;
use confera_core::types::id::{RegistrationId, SessionId, UserId};

use super::model::Registration;

/// Result of an attempt to insert an active registration.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The registration was created.
    Inserted(Registration),
    /// An active registration for the same (user, session) pair already
    /// exists; nothing was written.
    DuplicateActive,
}

/// Durable storage of [`Registration`] records.
///
/// Implementations must guarantee at most one `active` row per
/// (user, session) pair — in PostgreSQL via a partial unique index, in
/// memory via a keyed set — and report a lost insert race as
/// [`InsertOutcome::DuplicateActive`] rather than an error.
#[async_trait]
pub trait RegistrationStore: Send + Sync + 'static {
    /// Find the active registration for a (user, session) pair.
    async fn find_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> AppResult<Option<Registration>>;

    /// List a user's active registrations, newest first.
    async fn list_active_by_user(&self, user_id: UserId) -> AppResult<Vec<Registration>>;

    /// List the active registrations for a session (admin roster view).
    async fn list_active_for_session(&self, session_id: SessionId)
    -> AppResult<Vec<Registration>>;

    /// Count a user's active registrations against capacity-limited
    /// sessions. Conference registrations are not counted.
    async fn count_active_workshops(&self, user_id: UserId) -> AppResult<i64>;

    /// Count the active registrations referencing a session, from a single
    /// consistent read (reconciliation).
    async fn count_active_for_session(&self, session_id: SessionId) -> AppResult<i64>;

    /// Insert a new active registration stamped with `now`.
    async fn insert_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome>;

    /// Transition a registration to cancelled, stamped with `now`.
    /// Returns `false` if the row was not active (already cancelled, or
    /// never existed).
    async fn mark_cancelled(&self, id: RegistrationId, now: DateTime<Utc>) -> AppResult<bool>;

    /// Hard-delete every registration for a session (session-deletion
    /// cascade). Returns the number of rows removed.
    async fn delete_all_for_session(&self, session_id: SessionId) -> AppResult<u64>;

    /// Hard-delete cancelled registrations whose cancellation is older
    /// than `cutoff`. Active rows are never touched.
    async fn prune_cancelled_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}
