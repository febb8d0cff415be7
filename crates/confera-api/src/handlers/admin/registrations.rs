//! Admin manual assignment and removal handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use confera_core::types::id::{SessionId, UserId};
use confera_entity::registration::store::RegistrationStore;

use crate::dto::request::AssignRequest;
use crate::error::ApiError;
use crate::extractors::AdminIdentity;
use crate::state::AppState;

/// POST /api/admin/registrations
pub async fn assign(
    State(state): State<AppState>,
    AdminIdentity(admin_id): AdminIdentity,
    Json(req): Json<AssignRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registration = state
        .engine
        .admin_assign(
            Utc::now(),
            UserId::from_uuid(req.user_id),
            SessionId::from_uuid(req.session_id),
        )
        .await?;

    info!(
        admin_id = %admin_id,
        user_id = %req.user_id,
        session_id = %req.session_id,
        "Admin assigned registration"
    );
    Ok(Json(
        serde_json::json!({ "success": true, "data": registration }),
    ))
}

/// DELETE /api/admin/registrations/{user_id}/{session_id}
pub async fn remove(
    State(state): State<AppState>,
    AdminIdentity(admin_id): AdminIdentity,
    Path((user_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .engine
        .admin_remove(
            Utc::now(),
            UserId::from_uuid(user_id),
            SessionId::from_uuid(session_id),
        )
        .await?;

    info!(
        admin_id = %admin_id,
        user_id = %user_id,
        session_id = %session_id,
        "Admin removed registration"
    );
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Registration removed" } }),
    ))
}

/// GET /api/admin/sessions/{id}/registrations
pub async fn roster(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registrations = state
        .registrations
        .list_active_for_session(SessionId::from_uuid(id))
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": registrations }),
    ))
}
