//! In-memory session store using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use confera_core::result::AppResult;
use confera_core::types::id::SessionId;
use confera_entity::session::model::Session;
use confera_entity::session::store::{OccupancyAdjustment, SessionStore};

/// In-memory [`SessionStore`].
///
/// All mutation happens under one mutex, which makes every operation —
/// including the conditional occupancy adjustment — atomic with respect
/// to concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    state: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session (seeding for tests and demos).
    pub async fn insert(&self, session: Session) {
        self.state.lock().await.insert(session.id, session);
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        Ok(self.state.lock().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self.state.lock().await.values().cloned().collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn list_workshop_ids(&self) -> AppResult<Vec<SessionId>> {
        Ok(self
            .state
            .lock()
            .await
            .values()
            .filter(|s| s.is_capacity_limited())
            .map(|s| s.id)
            .collect())
    }

    async fn adjust_occupancy(
        &self,
        id: SessionId,
        delta: i32,
        enforce_capacity: bool,
    ) -> AppResult<OccupancyAdjustment> {
        let mut state = self.state.lock().await;

        let Some(session) = state.get_mut(&id) else {
            return Ok(OccupancyAdjustment::NotFound);
        };

        let target = session.occupancy + delta;
        if enforce_capacity && target > session.capacity {
            return Ok(OccupancyAdjustment::CapacityExhausted);
        }

        let clamped = target < 0;
        session.occupancy = target.max(0);
        Ok(OccupancyAdjustment::Applied {
            occupancy: session.occupancy,
            clamped,
        })
    }

    async fn set_occupancy(&self, id: SessionId, occupancy: i32) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.get_mut(&id) {
            Some(session) => {
                session.occupancy = occupancy;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: SessionId) -> AppResult<bool> {
        Ok(self.state.lock().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use confera_entity::session::model::SessionKind;

    fn workshop(capacity: i32, occupancy: i32) -> Session {
        Session {
            id: SessionId::new(),
            title: "Soldering 101".to_string(),
            kind: SessionKind::Workshop,
            capacity,
            occupancy,
            starts_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_increment_respects_capacity() {
        let store = MemorySessionStore::new();
        let s = workshop(1, 0);
        let id = s.id;
        store.insert(s).await;

        let first = store.adjust_occupancy(id, 1, true).await.unwrap();
        assert_eq!(
            first,
            OccupancyAdjustment::Applied {
                occupancy: 1,
                clamped: false
            }
        );

        let second = store.adjust_occupancy(id, 1, true).await.unwrap();
        assert_eq!(second, OccupancyAdjustment::CapacityExhausted);
    }

    #[tokio::test]
    async fn test_decrement_is_floored_at_zero() {
        let store = MemorySessionStore::new();
        let s = workshop(5, 0);
        let id = s.id;
        store.insert(s).await;

        let adj = store.adjust_occupancy(id, -1, false).await.unwrap();
        assert_eq!(
            adj,
            OccupancyAdjustment::Applied {
                occupancy: 0,
                clamped: true
            }
        );
    }

    #[tokio::test]
    async fn test_missing_session() {
        let store = MemorySessionStore::new();
        let adj = store
            .adjust_occupancy(SessionId::new(), 1, true)
            .await
            .unwrap();
        assert_eq!(adj, OccupancyAdjustment::NotFound);
    }
}
