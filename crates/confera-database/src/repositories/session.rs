//! Session store implementation backed by PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use confera_core::error::{AppError, ErrorKind};
use confera_core::result::AppResult;
use confera_core::types::id::SessionId;
use confera_entity::session::model::Session;
use confera_entity::session::store::{OccupancyAdjustment, SessionStore};

/// PostgreSQL-backed [`SessionStore`].
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list sessions", e))
    }

    async fn list_workshop_ids(&self) -> AppResult<Vec<SessionId>> {
        sqlx::query_scalar::<_, SessionId>(
            "SELECT id FROM sessions WHERE kind = 'workshop' ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list workshop sessions", e)
        })
    }

    async fn adjust_occupancy(
        &self,
        id: SessionId,
        delta: i32,
        enforce_capacity: bool,
    ) -> AppResult<OccupancyAdjustment> {
        // Single conditional statement: the capacity check and the counter
        // write happen under the same row lock, so concurrent adjustments
        // serialize per session and the counter can never pass capacity.
        let row = sqlx::query_as::<_, (i32, i32)>(
            "WITH prev AS ( \
                 SELECT occupancy FROM sessions WHERE id = $1 FOR UPDATE \
             ) \
             UPDATE sessions AS s \
             SET occupancy = GREATEST(s.occupancy + $2, 0), updated_at = NOW() \
             FROM prev \
             WHERE s.id = $1 AND (NOT $3 OR s.occupancy + $2 <= s.capacity) \
             RETURNING s.occupancy, prev.occupancy",
        )
        .bind(id)
        .bind(delta)
        .bind(enforce_capacity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust occupancy", e)
        })?;

        if let Some((occupancy, previous)) = row {
            return Ok(OccupancyAdjustment::Applied {
                occupancy,
                clamped: previous + delta < 0,
            });
        }

        // Zero rows: either the condition failed or the session is gone.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check session", e))?;

        if exists {
            Ok(OccupancyAdjustment::CapacityExhausted)
        } else {
            Ok(OccupancyAdjustment::NotFound)
        }
    }

    async fn set_occupancy(&self, id: SessionId, occupancy: i32) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET occupancy = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(occupancy)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set occupancy", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: SessionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session", e)
            })?;

        Ok(result.rows_affected() > 0)
    }
}
