//! Confera Server — conference and workshop registration backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use confera_core::config::AppConfig;
use confera_core::error::AppError;
use confera_database::DatabasePool;
use confera_database::repositories::{
    CachedSettingsSource, PgRegistrationStore, PgSessionStore, PgSettingsStore,
};
use confera_entity::registration::store::RegistrationStore;
use confera_entity::session::store::SessionStore;
use confera_entity::settings::source::SettingsSource;
use confera_service::registration::{ReconciliationService, RegistrationService};
use confera_worker::WorkerScheduler;
use confera_worker::jobs::{OccupancyReconcileJob, RegistrationPruneJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("CONFERA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Confera v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    confera_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Stores ───────────────────────────────────────────
    let sessions: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(db.pool().clone()));
    let registrations: Arc<dyn RegistrationStore> =
        Arc::new(PgRegistrationStore::new(db.pool().clone()));

    let settings_store: Arc<dyn SettingsSource> =
        Arc::new(PgSettingsStore::new(db.pool().clone()));
    let settings: Arc<dyn SettingsSource> = Arc::new(CachedSettingsSource::new(
        settings_store,
        Duration::from_secs(config.registration.settings_cache_ttl_seconds),
    ));

    // ── Step 3: Services ─────────────────────────────────────────
    let engine = Arc::new(RegistrationService::new(
        Arc::clone(&sessions),
        Arc::clone(&registrations),
        settings,
    ));
    let reconciler = Arc::new(ReconciliationService::new(
        Arc::clone(&sessions),
        Arc::clone(&registrations),
    ));
    tracing::info!("Registration engine initialized");

    // ── Step 4: Background worker ────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = WorkerScheduler::new().await?;
        scheduler
            .register_default_tasks(
                &config.worker,
                OccupancyReconcileJob::new(Arc::clone(&reconciler)),
                RegistrationPruneJob::new(
                    Arc::clone(&registrations),
                    config.worker.cancelled_retention_days,
                ),
            )
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 5: HTTP server ──────────────────────────────────────
    let state = confera_api::state::AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        sessions,
        registrations,
        engine,
        reconciler,
    };

    let app = confera_api::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Confera server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 6: Drain background tasks ───────────────────────────
    if let Some(scheduler) = scheduler.as_mut() {
        let _ = scheduler.shutdown().await;
    }
    db.close().await;

    tracing::info!("Confera server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
