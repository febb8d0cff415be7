//! Session store contract.

use async_trait::async_trait;

use confera_core::result::AppResult;
use confera_core::types::id::SessionId;

use super::model::Session;

/// Result of a conditional occupancy adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyAdjustment {
    /// The adjustment was applied. `clamped` is set when a decrement would
    /// have taken occupancy below zero and was floored instead — a sign of
    /// pre-existing counter drift.
    Applied {
        /// Occupancy after the adjustment.
        occupancy: i32,
        /// Whether the result was floored at zero.
        clamped: bool,
    },
    /// An increment was rejected because it would exceed capacity.
    CapacityExhausted,
    /// The session does not exist.
    NotFound,
}

/// Durable storage of [`Session`] records.
///
/// `adjust_occupancy` is the single serialization point for the seat
/// counter: implementations must apply the delta and the capacity check
/// as one atomic operation, so that no interleaving of concurrent calls
/// can push occupancy past capacity or below zero.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Find a session by ID.
    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>>;

    /// List all sessions, newest first.
    async fn list(&self) -> AppResult<Vec<Session>>;

    /// List the IDs of all capacity-limited sessions (for reconciliation).
    async fn list_workshop_ids(&self) -> AppResult<Vec<SessionId>>;

    /// Atomically adjust the occupancy counter by `delta`.
    ///
    /// When `enforce_capacity` is set, an adjustment that would leave
    /// `occupancy > capacity` is rejected with
    /// [`OccupancyAdjustment::CapacityExhausted`] and the counter is left
    /// untouched. Decrements are floored at zero.
    async fn adjust_occupancy(
        &self,
        id: SessionId,
        delta: i32,
        enforce_capacity: bool,
    ) -> AppResult<OccupancyAdjustment>;

    /// Overwrite the occupancy counter (reconciliation only).
    /// Returns `false` if the session does not exist.
    async fn set_occupancy(&self, id: SessionId, occupancy: i32) -> AppResult<bool>;

    /// Delete a session. Returns `false` if it did not exist.
    ///
    /// Callers must cascade-delete the session's registrations first; the
    /// store does not do it implicitly.
    async fn delete(&self, id: SessionId) -> AppResult<bool>;
}
