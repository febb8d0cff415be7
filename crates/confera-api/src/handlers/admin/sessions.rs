//! Admin session maintenance handlers: reconciliation triggers and the
//! session-deletion cascade.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;
use uuid::Uuid;

use confera_core::error::AppError;
use confera_core::types::id::SessionId;
use confera_entity::registration::store::RegistrationStore;
use confera_entity::session::store::SessionStore;

use crate::error::ApiError;
use crate::extractors::AdminIdentity;
use crate::state::AppState;

/// POST /api/admin/sessions/{id}/reconcile
pub async fn reconcile_session(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let occupancy = state
        .reconciler
        .reconcile_session(SessionId::from_uuid(id))
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "occupancy": occupancy } }),
    ))
}

/// POST /api/admin/reconcile
pub async fn reconcile_all(
    State(state): State<AppState>,
    _admin: AdminIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.reconciler.reconcile_all().await?;
    Ok(Json(serde_json::json!({ "success": true, "data": report })))
}

/// DELETE /api/admin/sessions/{id}
///
/// Removes the session's registrations first, then the session row, so
/// the invariants never depend on a storage-engine cascade.
pub async fn delete_session(
    State(state): State<AppState>,
    AdminIdentity(admin_id): AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session_id = SessionId::from_uuid(id);

    let removed = state
        .registrations
        .delete_all_for_session(session_id)
        .await?;

    if !state.sessions.delete(session_id).await? {
        return Err(AppError::not_found(format!("Session {id} not found")).into());
    }

    info!(
        admin_id = %admin_id,
        session_id = %id,
        registrations_removed = removed,
        "Session deleted"
    );
    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "registrations_removed": removed }
    })))
}
