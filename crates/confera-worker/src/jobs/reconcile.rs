//! Scheduled occupancy reconciliation.

use std::sync::Arc;

use tracing::{error, info};

use confera_service::registration::ReconciliationService;

/// Runs a full reconciliation pass over all workshops.
///
/// Safe to run while live traffic mutates registrations; a pass that
/// races a concurrent admission converges on the next run.
#[derive(Clone)]
pub struct OccupancyReconcileJob {
    service: Arc<ReconciliationService>,
}

impl OccupancyReconcileJob {
    /// Create a new reconcile job.
    pub fn new(service: Arc<ReconciliationService>) -> Self {
        Self { service }
    }

    /// Execute one pass. Errors are logged, not propagated; the next
    /// scheduled run simply tries again.
    pub async fn run(&self) {
        match self.service.reconcile_all().await {
            Ok(report) => {
                if report.corrections.is_empty() && report.failures.is_empty() {
                    info!(checked = report.checked, "Occupancy reconciliation clean");
                } else {
                    info!(
                        checked = report.checked,
                        corrected = report.corrections.len(),
                        failed = report.failures.len(),
                        "Occupancy reconciliation corrected drift"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Occupancy reconciliation run failed");
            }
        }
    }
}
