//! In-memory registration store using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use confera_core::result::AppResult;
use confera_core::types::id::{RegistrationId, SessionId, UserId};
use confera_entity::registration::model::{Registration, RegistrationStatus};
use confera_entity::registration::store::{InsertOutcome, RegistrationStore};
use confera_entity::session::store::SessionStore;

use super::session::MemorySessionStore;

/// In-memory [`RegistrationStore`].
///
/// Holds a handle to the session store so that workshop counting can
/// resolve session kinds, mirroring the JOIN the PostgreSQL
/// implementation performs.
#[derive(Debug, Clone)]
pub struct MemoryRegistrationStore {
    sessions: Arc<MemorySessionStore>,
    state: Arc<Mutex<HashMap<RegistrationId, Registration>>>,
}

impl MemoryRegistrationStore {
    /// Create an empty store backed by `sessions` for kind lookups.
    pub fn new(sessions: Arc<MemorySessionStore>) -> Self {
        Self {
            sessions,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RegistrationStore for MemoryRegistrationStore {
    async fn find_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
    ) -> AppResult<Option<Registration>> {
        Ok(self
            .state
            .lock()
            .await
            .values()
            .find(|r| r.user_id == user_id && r.session_id == session_id && r.is_active())
            .cloned())
    }

    async fn list_active_by_user(&self, user_id: UserId) -> AppResult<Vec<Registration>> {
        let mut rows: Vec<Registration> = self
            .state
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_active_for_session(
        &self,
        session_id: SessionId,
    ) -> AppResult<Vec<Registration>> {
        let mut rows: Vec<Registration> = self
            .state
            .lock()
            .await
            .values()
            .filter(|r| r.session_id == session_id && r.is_active())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn count_active_workshops(&self, user_id: UserId) -> AppResult<i64> {
        let session_ids: Vec<SessionId> = self
            .state
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id && r.is_active())
            .map(|r| r.session_id)
            .collect();

        let mut count = 0i64;
        for id in session_ids {
            if let Some(session) = self.sessions.find_by_id(id).await? {
                if session.is_capacity_limited() {
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    async fn count_active_for_session(&self, session_id: SessionId) -> AppResult<i64> {
        Ok(self
            .state
            .lock()
            .await
            .values()
            .filter(|r| r.session_id == session_id && r.is_active())
            .count() as i64)
    }

    async fn insert_active(
        &self,
        user_id: UserId,
        session_id: SessionId,
        now: DateTime<Utc>,
    ) -> AppResult<InsertOutcome> {
        let mut state = self.state.lock().await;

        let duplicate = state
            .values()
            .any(|r| r.user_id == user_id && r.session_id == session_id && r.is_active());
        if duplicate {
            return Ok(InsertOutcome::DuplicateActive);
        }

        let registration = Registration {
            id: RegistrationId::new(),
            user_id,
            session_id,
            status: RegistrationStatus::Active,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        };
        state.insert(registration.id, registration.clone());
        Ok(InsertOutcome::Inserted(registration))
    }

    async fn mark_cancelled(&self, id: RegistrationId, now: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.get_mut(&id) {
            Some(r) if r.is_active() => {
                r.status = RegistrationStatus::Cancelled;
                r.cancelled_at = Some(now);
                r.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_all_for_session(&self, session_id: SessionId) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.len();
        state.retain(|_, r| r.session_id != session_id);
        Ok((before - state.len()) as u64)
    }

    async fn prune_cancelled_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.len();
        state.retain(|_, r| {
            r.is_active() || r.cancelled_at.map(|at| at >= cutoff).unwrap_or(true)
        });
        Ok((before - state.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use confera_entity::session::model::{Session, SessionKind};

    async fn seeded() -> (Arc<MemorySessionStore>, MemoryRegistrationStore, SessionId) {
        let sessions = Arc::new(MemorySessionStore::new());
        let session = Session {
            id: SessionId::new(),
            title: "Welding basics".to_string(),
            kind: SessionKind::Workshop,
            capacity: 10,
            occupancy: 0,
            starts_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let id = session.id;
        sessions.insert(session).await;
        let registrations = MemoryRegistrationStore::new(Arc::clone(&sessions));
        (sessions, registrations, id)
    }

    #[tokio::test]
    async fn test_duplicate_active_insert_is_rejected() {
        let (_, store, session_id) = seeded().await;
        let user = UserId::new();
        let now = Utc::now();

        assert!(matches!(
            store.insert_active(user, session_id, now).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert!(matches!(
            store.insert_active(user, session_id, now).await.unwrap(),
            InsertOutcome::DuplicateActive
        ));
    }

    #[tokio::test]
    async fn test_reinsert_allowed_after_cancellation() {
        let (_, store, session_id) = seeded().await;
        let user = UserId::new();
        let now = Utc::now();

        let InsertOutcome::Inserted(reg) =
            store.insert_active(user, session_id, now).await.unwrap()
        else {
            panic!("expected insert");
        };
        assert!(store.mark_cancelled(reg.id, now).await.unwrap());
        assert!(!store.mark_cancelled(reg.id, now).await.unwrap());

        assert!(matches!(
            store.insert_active(user, session_id, now).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        // The cancelled row is kept, not reused.
        assert_eq!(store.count_active_for_session(session_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_prune_removes_only_old_cancelled_rows() {
        let (_, store, session_id) = seeded().await;
        let now = Utc::now();
        let old = now - Duration::days(60);

        let InsertOutcome::Inserted(stale) = store
            .insert_active(UserId::new(), session_id, old)
            .await
            .unwrap()
        else {
            panic!("expected insert");
        };
        store.mark_cancelled(stale.id, old).await.unwrap();
        store
            .insert_active(UserId::new(), session_id, now)
            .await
            .unwrap();

        let pruned = store
            .prune_cancelled_before(now - Duration::days(30))
            .await
            .unwrap();
        assert_eq!(pruned, 1);
        assert_eq!(store.count_active_for_session(session_id).await.unwrap(), 1);
    }
}
