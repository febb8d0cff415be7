//! Registration store implementation backed by PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use confera_core::error::{AppError, ErrorKind};
use confera_core::result::AppResult;
use confera_core::types::id::{RegistrationId, SessionId, UserId};
use confera_entity::registration::model::Registration;
use confera_entity::registration::store::{InsertOutcome, RegistrationStore};

/// PostgreSQL-backed [`RegistrationStore`].
///
/// Duplicate-active prevention relies on the partial unique index
/// `uniq_active_registration` on `(user_id, session_id) WHERE status =
/// 'active'`; a lost insert race comes back as a unique violation and is
/// reported as [`InsertOutcome::DuplicateActive`].
#[derive(Debug, Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    /// Create a new registration store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn find_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> AppResult<Option<Registration>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations \
             WHERE user_id = $1 AND session_id = $2 AND status = 'active'",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active registration", e)
        })
    }

    async fn list_active_by_user(&self, user_id: UserId) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations \
             WHERE user_id = $1 AND status = 'active' ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list user registrations", e)
        })
    }

    async fn list_active_for_session(
        &self,
        session_id: SessionId,
    ) -> AppResult<Vec<Registration>> {
        sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations \
             WHERE session_id = $1 AND status = 'active' ORDER BY created_at",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to list session registrations",
                e,
            )
        })
    }

    async fn count_active_workshops(&self, user_id: UserId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations r \
             JOIN sessions s ON s.id = r.session_id \
             WHERE r.user_id = $1 AND r.status = 'active' AND s.kind = 'workshop'",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to count workshop registrations",
                e,
            )
        })?;
        Ok(count)
    }

    async fn count_active_for_session(&self, session_id: SessionId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE session_id = $1 AND status = 'active'",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to count session registrations",
                e,
            )
        })?;
        Ok(count)
    }

    async fn insert_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome> {
        let result = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (id, user_id, session_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, 'active', $4, $4) RETURNING *",
        )
        .bind(RegistrationId::new())
        .bind(user_id)
        .bind(session_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(registration) => Ok(InsertOutcome::Inserted(registration)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Ok(InsertOutcome::DuplicateActive)
            }
            Err(e) => Err(AppError::with_source(
                ErrorKind::Database,
                "Failed to insert registration",
                e,
            )),
        }
    }

    async fn mark_cancelled(&self, id: RegistrationId, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE registrations \
             SET status = 'cancelled', cancelled_at = $2, updated_at = $2 \
             WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to cancel registration", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_session(&self, session_id: SessionId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM registrations WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to delete session registrations",
                    e,
                )
            })?;

        Ok(result.rows_affected())
    }

    async fn prune_cancelled_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM registrations WHERE status = 'cancelled' AND cancelled_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                "Failed to prune cancelled registrations",
                e,
            )
        })?;

        Ok(result.rows_affected())
    }
}
