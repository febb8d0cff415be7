//! Scheduled pruning of old cancelled registrations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info};

use confera_entity::registration::store::RegistrationStore;

/// Hard-deletes cancelled registrations past their retention window.
/// Active registrations are never touched.
#[derive(Clone)]
pub struct RegistrationPruneJob {
    registrations: Arc<dyn RegistrationStore>,
    retention_days: u32,
}

impl RegistrationPruneJob {
    /// Create a new prune job.
    pub fn new(registrations: Arc<dyn RegistrationStore>, retention_days: u32) -> Self {
        Self {
            registrations,
            retention_days,
        }
    }

    /// Execute one pruning pass.
    pub async fn run(&self) {
        let cutoff = Utc::now() - Duration::days(i64::from(self.retention_days));
        match self.registrations.prune_cancelled_before(cutoff).await {
            Ok(0) => {}
            Ok(pruned) => {
                info!(pruned, retention_days = self.retention_days, "Pruned cancelled registrations");
            }
            Err(e) => {
                error!(error = %e, "Registration pruning run failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use confera_core::types::id::{SessionId, UserId};
    use confera_database::memory::{MemoryRegistrationStore, MemorySessionStore};
    use confera_entity::registration::store::InsertOutcome;
    use confera_entity::session::model::{Session, SessionKind};

    #[tokio::test]
    async fn test_prune_leaves_recent_and_active_rows() {
        let sessions = Arc::new(MemorySessionStore::new());
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            title: "History of tooling".to_string(),
            kind: SessionKind::Workshop,
            capacity: 10,
            occupancy: 0,
            starts_at: None,
            created_at: now,
            updated_at: now,
        };
        let session_id = session.id;
        sessions.insert(session).await;

        let store = Arc::new(MemoryRegistrationStore::new(sessions));

        let stale_stamp = now - Duration::days(90);
        let InsertOutcome::Inserted(stale) = store
            .insert_active(UserId::new(), session_id, stale_stamp)
            .await
            .unwrap()
        else {
            panic!("expected insert");
        };
        store.mark_cancelled(stale.id, stale_stamp).await.unwrap();
        store
            .insert_active(UserId::new(), session_id, now)
            .await
            .unwrap();

        let job = RegistrationPruneJob::new(Arc::clone(&store), 30);
        job.run().await;

        assert_eq!(store.count_active_for_session(session_id).await.unwrap(), 1);
        assert!(store.find_active(stale.user_id, session_id).await.unwrap().is_none());
    }
}
