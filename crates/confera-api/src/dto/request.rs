//! Request DTOs.

use serde::Deserialize;
use uuid::Uuid;

/// Body of `POST /api/registrations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// The session to register for.
    pub session_id: Uuid,
}

/// Body of `POST /api/admin/registrations`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    /// The attendee to enroll.
    pub user_id: Uuid,
    /// The session to enroll them in.
    pub session_id: Uuid,
}
