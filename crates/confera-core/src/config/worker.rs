//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron schedule for occupancy reconciliation.
    #[serde(default = "default_reconcile_schedule")]
    pub reconcile_schedule: String,
    /// Cron schedule for pruning old cancelled registrations.
    #[serde(default = "default_prune_schedule")]
    pub prune_schedule: String,
    /// How many days a cancelled registration is retained before pruning.
    #[serde(default = "default_retention_days")]
    pub cancelled_retention_days: u32,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconcile_schedule: default_reconcile_schedule(),
            prune_schedule: default_prune_schedule(),
            cancelled_retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Every 5 minutes.
fn default_reconcile_schedule() -> String {
    "0 */5 * * * *".to_string()
}

/// Daily at 4 AM.
fn default_prune_schedule() -> String {
    "0 0 4 * * *".to_string()
}

fn default_retention_days() -> u32 {
    30
}
