//! HTTP API server for the smart-home package checkout workflow.
//!
//! Provides REST endpoints for browsing the package catalog and driving a
//! checkout session from package selection through address entry to order
//! submission, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use domain::Catalog;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::checkout::AppState;
use store::{InMemorySessionStore, SessionStore};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: SessionStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/packages", get(routes::checkout::list_packages::<S>))
        .route("/checkout", post(routes::checkout::create_session::<S>))
        .route("/checkout/{id}", get(routes::checkout::get_session::<S>))
        .route(
            "/checkout/{id}/package",
            post(routes::checkout::select_package::<S>),
        )
        .route(
            "/checkout/{id}/units",
            post(routes::checkout::adjust_units::<S>),
        )
        .route(
            "/checkout/{id}/address",
            put(routes::checkout::set_address::<S>),
        )
        .route("/checkout/{id}/back", post(routes::checkout::go_back::<S>))
        .route("/checkout/{id}/submit", post(routes::checkout::submit::<S>))
        .route(
            "/checkout/{id}/receipt",
            get(routes::checkout::get_receipt::<S>),
        )
        .route("/checkout/{id}/reset", post(routes::checkout::reset::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: the standard catalog backed by an
/// in-memory session store.
pub fn create_default_state() -> Arc<AppState<InMemorySessionStore>> {
    Arc::new(AppState {
        catalog: Catalog::standard(),
        store: InMemorySessionStore::new(),
    })
}
