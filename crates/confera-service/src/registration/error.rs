//! Typed outcomes of the registration engine.

use thiserror::Error;

use confera_core::error::AppError;
use confera_core::types::id::SessionId;

use super::gate::ClosedReason;

/// Expected business outcomes of a registration operation, plus the
/// infrastructure failure case.
///
/// Everything except [`RegistrationError::Storage`] is a final answer the
/// caller should relay, not retry. `Storage` covers unreachable storage,
/// statement timeouts, and exhausted commit retries, and is worth
/// retrying with backoff.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The referenced session does not exist.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The registration window rejected the request.
    #[error("registration is closed ({0})")]
    RegistrationClosed(ClosedReason),

    /// An active registration for this (user, session) already exists.
    /// Semantically idempotent; callers may treat it as already done.
    #[error("already registered for this session")]
    AlreadyRegistered,

    /// The attendee already holds the maximum number of workshop
    /// registrations.
    #[error("workshop limit of {limit} reached")]
    UserLimitExceeded {
        /// The configured per-attendee limit.
        limit: i32,
    },

    /// The workshop has no seats left.
    #[error("session is full")]
    SessionFull,

    /// Cancel/remove targeted a (user, session) with no active
    /// registration.
    #[error("no active registration for this session")]
    NotRegistered,

    /// Self-service cancellation is switched off.
    #[error("cancellation is currently disabled")]
    CancellationDisabled,

    /// Storage failed or the bounded commit retry was exhausted.
    #[error(transparent)]
    Storage(#[from] AppError),
}

impl RegistrationError {
    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}
