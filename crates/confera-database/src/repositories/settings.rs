//! Registration settings store: PostgreSQL singleton row plus a
//! TTL-cached read-through wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use sqlx::PgPool;

use confera_core::error::{AppError, ErrorKind};
use confera_core::result::AppResult;
use confera_entity::settings::model::RegistrationSettings;
use confera_entity::settings::source::SettingsSource;

/// PostgreSQL-backed settings source reading the singleton row.
#[derive(Debug, Clone)]
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    /// Create a new settings store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upsert the singleton row (admin configuration surface).
    pub async fn save(&self, settings: &RegistrationSettings) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO registration_settings \
                 (id, registration_enabled, cancellation_enabled, \
                  registration_opens_at, registration_deadline, max_workshops_per_user) \
             VALUES (TRUE, $1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 registration_enabled = EXCLUDED.registration_enabled, \
                 cancellation_enabled = EXCLUDED.cancellation_enabled, \
                 registration_opens_at = EXCLUDED.registration_opens_at, \
                 registration_deadline = EXCLUDED.registration_deadline, \
                 max_workshops_per_user = EXCLUDED.max_workshops_per_user",
        )
        .bind(settings.registration_enabled)
        .bind(settings.cancellation_enabled)
        .bind(settings.registration_opens_at)
        .bind(settings.registration_deadline)
        .bind(settings.max_workshops_per_user)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save settings", e))?;
        Ok(())
    }
}

#[async_trait]
impl SettingsSource for PgSettingsStore {
    async fn current(&self) -> AppResult<RegistrationSettings> {
        let row = sqlx::query_as::<_, RegistrationSettings>(
            "SELECT registration_enabled, cancellation_enabled, \
                    registration_opens_at, registration_deadline, max_workshops_per_user \
             FROM registration_settings WHERE id = TRUE",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read settings", e))?;

        // A missing row means the deployment was never configured; fall
        // back to the defaults rather than failing every registration.
        Ok(row.unwrap_or_default())
    }
}

/// Read-through cache in front of another [`SettingsSource`].
///
/// Settings are read on every registration decision; a short TTL keeps
/// that from becoming one database round-trip per request while still
/// picking up admin changes within seconds.
pub struct CachedSettingsSource {
    inner: Arc<dyn SettingsSource>,
    cache: Cache<(), RegistrationSettings>,
}

impl CachedSettingsSource {
    /// Wrap `inner` with a TTL cache.
    pub fn new(inner: Arc<dyn SettingsSource>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }
}

#[async_trait]
impl SettingsSource for CachedSettingsSource {
    async fn current(&self) -> AppResult<RegistrationSettings> {
        let inner = Arc::clone(&self.inner);
        self.cache
            .try_get_with((), async move { inner.current().await })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::settings::MemorySettingsSource;

    #[tokio::test]
    async fn test_cached_source_serves_stale_until_ttl() {
        let inner = Arc::new(MemorySettingsSource::new(RegistrationSettings::default()));
        let cached = CachedSettingsSource::new(
            Arc::clone(&inner) as Arc<dyn SettingsSource>,
            Duration::from_secs(60),
        );

        assert!(cached.current().await.unwrap().registration_enabled);

        let mut updated = RegistrationSettings::default();
        updated.registration_enabled = false;
        inner.set(updated).await;

        // Within the TTL the old value is still served.
        assert!(cached.current().await.unwrap().registration_enabled);
    }
}
