//! Registration engine configuration.

use serde::{Deserialize, Serialize};

/// Registration engine configuration.
///
/// The business-facing toggles (window, limits) live in the database as
/// `RegistrationSettings` so admins can change them at runtime; this
/// section only holds process-level tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// How long a read of the admin-configured registration settings may
    /// be served from cache before hitting the database again.
    #[serde(default = "default_settings_ttl")]
    pub settings_cache_ttl_seconds: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            settings_cache_ttl_seconds: default_settings_ttl(),
        }
    }
}

fn default_settings_ttl() -> u64 {
    5
}
