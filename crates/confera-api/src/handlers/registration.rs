//! Self-service registration handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;
use uuid::Uuid;

use confera_core::types::id::SessionId;
use confera_entity::registration::store::RegistrationStore;

use crate::dto::request::RegisterRequest;
use crate::error::ApiError;
use crate::extractors::CallerIdentity;
use crate::state::AppState;

/// GET /api/registrations
pub async fn list_mine(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registrations = state.registrations.list_active_by_user(user_id).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": registrations }),
    ))
}

/// POST /api/registrations
pub async fn register(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let registration = state
        .engine
        .register(Utc::now(), user_id, SessionId::from_uuid(req.session_id))
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": registration }),
    ))
}

/// DELETE /api/registrations/{session_id}
pub async fn cancel(
    State(state): State<AppState>,
    CallerIdentity(user_id): CallerIdentity,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .engine
        .cancel(Utc::now(), user_id, SessionId::from_uuid(session_id))
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "message": "Registration cancelled" } }),
    ))
}
