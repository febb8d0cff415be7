//! Occupancy reconciliation.
//!
//! Recomputes each workshop's occupancy counter from the authoritative
//! registration rows and overwrites it when they disagree. Repairs drift
//! left behind by partial failures or manual data edits; never creates or
//! deletes registrations.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use confera_core::error::AppError;
use confera_core::result::AppResult;
use confera_core::types::id::SessionId;
use confera_entity::registration::store::RegistrationStore;
use confera_entity::session::store::SessionStore;

/// One corrected counter.
#[derive(Debug, Clone, Serialize)]
pub struct SessionCorrection {
    /// The session whose counter was wrong.
    pub session_id: SessionId,
    /// The stored occupancy before correction.
    pub previous: i32,
    /// The recomputed occupancy.
    pub corrected: i32,
}

/// Outcome of a batch reconciliation run.
#[derive(Debug, Default, Serialize)]
pub struct ReconciliationReport {
    /// Number of workshops whose counter was already correct.
    pub checked: usize,
    /// Counters that were overwritten.
    pub corrections: Vec<SessionCorrection>,
    /// Sessions that could not be processed. Failures are per-session
    /// and do not abort the rest of the batch.
    pub failures: Vec<(SessionId, String)>,
}

/// Recomputes occupancy counters from the registration rows.
pub struct ReconciliationService {
    sessions: Arc<dyn SessionStore>,
    registrations: Arc<dyn RegistrationStore>,
}

impl ReconciliationService {
    /// Create a new reconciliation service.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        registrations: Arc<dyn RegistrationStore>,
    ) -> Self {
        Self {
            sessions,
            registrations,
        }
    }

    /// Recompute one session's occupancy and overwrite it if it drifted.
    /// Returns the authoritative count.
    ///
    /// The count comes from a single query rather than an incremental
    /// walk, so a run that races live traffic reads one consistent value;
    /// any adjustment that lands after it converges on the next run.
    pub async fn reconcile_session(&self, session_id: SessionId) -> AppResult<i64> {
        let count = self
            .registrations
            .count_active_for_session(session_id)
            .await?;

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))?;

        if session.is_capacity_limited() && i64::from(session.occupancy) != count {
            warn!(
                session_id = %session_id,
                stored = session.occupancy,
                actual = count,
                "Occupancy drift detected, correcting"
            );
            self.sessions
                .set_occupancy(session_id, count as i32)
                .await?;
        }

        Ok(count)
    }

    /// Reconcile every workshop. Per-session failures are collected in
    /// the report instead of aborting the run.
    pub async fn reconcile_all(&self) -> AppResult<ReconciliationReport> {
        let ids = self.sessions.list_workshop_ids().await?;
        let mut report = ReconciliationReport::default();

        for session_id in ids {
            let stored = match self.sessions.find_by_id(session_id).await {
                Ok(Some(session)) => session.occupancy,
                Ok(None) => continue,
                Err(e) => {
                    report.failures.push((session_id, e.to_string()));
                    continue;
                }
            };

            match self.reconcile_session(session_id).await {
                Ok(count) if i64::from(stored) != count => {
                    report.corrections.push(SessionCorrection {
                        session_id,
                        previous: stored,
                        corrected: count as i32,
                    });
                }
                Ok(_) => report.checked += 1,
                Err(e) => report.failures.push((session_id, e.to_string())),
            }
        }

        info!(
            checked = report.checked,
            corrected = report.corrections.len(),
            failed = report.failures.len(),
            "Occupancy reconciliation finished"
        );
        Ok(report)
    }
}
