//! Session read handlers (pickers and occupancy display).

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use confera_core::error::AppError;
use confera_core::types::id::SessionId;
use confera_entity::session::store::SessionStore;

use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// GET /api/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    _caller: CallerIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let sessions = state.sessions.list().await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": sessions }),
    ))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .sessions
        .find_by_id(SessionId::from_uuid(id))
        .await?
        .ok_or_else(|| AppError::not_found(format!("Session {id} not found")))?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": session }),
    ))
}
