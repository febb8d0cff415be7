//! Cron scheduler for periodic maintenance tasks.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use confera_core::config::worker::WorkerConfig;
use confera_core::error::AppError;

use crate::jobs::{OccupancyReconcileJob, RegistrationPruneJob};

/// Cron-based scheduler for the registration maintenance jobs.
pub struct WorkerScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
}

impl std::fmt::Debug for WorkerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerScheduler").finish()
    }
}

impl WorkerScheduler {
    /// Create a new scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register the default maintenance tasks from configuration.
    pub async fn register_default_tasks(
        &self,
        config: &WorkerConfig,
        reconcile: OccupancyReconcileJob,
        prune: RegistrationPruneJob,
    ) -> Result<(), AppError> {
        self.register_reconcile(&config.reconcile_schedule, reconcile)
            .await?;
        self.register_prune(&config.prune_schedule, prune).await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Occupancy reconciliation on the configured cadence.
    async fn register_reconcile(
        &self,
        schedule: &str,
        job: OccupancyReconcileJob,
    ) -> Result<(), AppError> {
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled occupancy reconciliation");
                job.run().await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create reconcile schedule: {e}")))?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add reconcile schedule: {e}")))?;

        tracing::info!(schedule, "Registered: occupancy_reconciliation");
        Ok(())
    }

    /// Cancelled-registration pruning on the configured cadence.
    async fn register_prune(
        &self,
        schedule: &str,
        job: RegistrationPruneJob,
    ) -> Result<(), AppError> {
        let cron = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled registration pruning");
                job.run().await;
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create prune schedule: {e}")))?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add prune schedule: {e}")))?;

        tracing::info!(schedule, "Registered: registration_pruning");
        Ok(())
    }
}
