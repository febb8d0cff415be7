//! Shared application state threaded through every handler.

use std::sync::Arc;

use confera_core::config::AppConfig;
use confera_database::DatabasePool;
use confera_entity::registration::store::RegistrationStore;
use confera_entity::session::store::SessionStore;
use confera_service::registration::{ReconciliationService, RegistrationService};

/// Application state handed to the router.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Database pool (health checks).
    pub db: DatabasePool,
    /// Session store (read endpoints, deletion cascade).
    pub sessions: Arc<dyn SessionStore>,
    /// Registration store (read endpoints, deletion cascade).
    pub registrations: Arc<dyn RegistrationStore>,
    /// The registration engine.
    pub engine: Arc<RegistrationService>,
    /// Occupancy reconciliation.
    pub reconciler: Arc<ReconciliationService>,
}
