//! Shared test harness: the registration engine wired to in-memory
//! stores.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;

use confera_core::types::id::SessionId;
use confera_database::memory::{
    MemoryRegistrationStore, MemorySessionStore, MemorySettingsSource,
};
use confera_entity::session::model::{Session, SessionKind};
use confera_entity::settings::model::RegistrationSettings;
use confera_service::registration::{ReconciliationService, RegistrationService};

pub struct Harness {
    pub sessions: Arc<MemorySessionStore>,
    pub registrations: Arc<MemoryRegistrationStore>,
    pub settings: Arc<MemorySettingsSource>,
    pub engine: Arc<RegistrationService>,
    pub reconciler: Arc<ReconciliationService>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(RegistrationSettings::default())
    }

    pub fn with_settings(settings: RegistrationSettings) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let registrations = Arc::new(MemoryRegistrationStore::new(Arc::clone(&sessions)));
        let settings = Arc::new(MemorySettingsSource::new(settings));

        let engine = Arc::new(RegistrationService::new(
            Arc::clone(&sessions),
            Arc::clone(&registrations),
            Arc::clone(&settings),
        ));
        let reconciler = Arc::new(ReconciliationService::new(
            Arc::clone(&sessions),
            Arc::clone(&registrations),
        ));

        Self {
            sessions,
            registrations,
            settings,
            engine,
            reconciler,
        }
    }

    pub async fn add_workshop(&self, title: &str, capacity: i32) -> SessionId {
        self.add_session(title, SessionKind::Workshop, capacity).await
    }

    pub async fn add_conference(&self, title: &str) -> SessionId {
        self.add_session(title, SessionKind::Conference, 0).await
    }

    async fn add_session(&self, title: &str, kind: SessionKind, capacity: i32) -> SessionId {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            title: title.to_string(),
            kind,
            capacity,
            occupancy: 0,
            starts_at: None,
            created_at: now,
            updated_at: now,
        };
        let id = session.id;
        self.sessions.insert(session).await;
        id
    }

    pub async fn occupancy(&self, id: SessionId) -> i32 {
        use confera_entity::session::store::SessionStore;
        self.sessions
            .find_by_id(id)
            .await
            .expect("store read")
            .expect("session exists")
            .occupancy
    }
}
