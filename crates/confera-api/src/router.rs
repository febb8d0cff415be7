//! Route definitions for the Confera HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(registration_routes())
        .merge(session_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state))
        .with_state(state)
}

/// Self-service registration endpoints.
fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/registrations", get(handlers::registration::list_mine))
        .route("/registrations", post(handlers::registration::register))
        .route(
            "/registrations/{session_id}",
            delete(handlers::registration::cancel),
        )
}

/// Session read endpoints.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/sessions/{id}", get(handlers::session::get_session))
}

/// Admin endpoints: manual assignment, roster, reconciliation, deletion.
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/registrations",
            post(handlers::admin::registrations::assign),
        )
        .route(
            "/admin/registrations/{user_id}/{session_id}",
            delete(handlers::admin::registrations::remove),
        )
        .route(
            "/admin/sessions/{id}/registrations",
            get(handlers::admin::registrations::roster),
        )
        .route(
            "/admin/sessions/{id}/reconcile",
            post(handlers::admin::sessions::reconcile_session),
        )
        .route(
            "/admin/reconcile",
            post(handlers::admin::sessions::reconcile_all),
        )
        .route(
            "/admin/sessions/{id}",
            delete(handlers::admin::sessions::delete_session),
        )
}

/// CORS policy from configuration; `*` means permissive (development).
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
