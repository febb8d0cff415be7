//! In-memory settings source.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use confera_core::result::AppResult;
use confera_entity::settings::model::RegistrationSettings;
use confera_entity::settings::source::SettingsSource;

/// In-memory [`SettingsSource`] with a writable handle for tests and
/// single-node demos.
#[derive(Debug, Clone)]
pub struct MemorySettingsSource {
    state: Arc<RwLock<RegistrationSettings>>,
}

impl MemorySettingsSource {
    /// Create a source serving `settings`.
    pub fn new(settings: RegistrationSettings) -> Self {
        Self {
            state: Arc::new(RwLock::new(settings)),
        }
    }

    /// Replace the served settings.
    pub async fn set(&self, settings: RegistrationSettings) {
        *self.state.write().await = settings;
    }
}

impl Default for MemorySettingsSource {
    fn default() -> Self {
        Self::new(RegistrationSettings::default())
    }
}

#[async_trait]
impl SettingsSource for MemorySettingsSource {
    async fn current(&self) -> AppResult<RegistrationSettings> {
        Ok(self.state.read().await.clone())
    }
}
