//! HTTP routes for the casting agency service.
//!
//! Defines the Axum router and application state.

use crate::auth::Authorizer;
use crate::config::Config;
use crate::handlers;
use crate::repositories::{ActorRepository, MovieRepository};
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across all handlers.
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token authorizer with its JWKS client.
    pub authorizer: Arc<Authorizer>,

    /// Actor store.
    pub actors: ActorRepository,

    /// Movie store.
    pub movies: MovieRepository,
}

/// Install the Prometheus recorder and return its handle.
///
/// # Errors
///
/// Returns `BuildError` if a recorder is already installed in this
/// process.
pub fn init_metrics_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/actors` and `/movies` resource routes (authorized per endpoint)
/// - `/health` liveness probe (public)
/// - `/metrics` Prometheus scrape endpoint (public)
/// - CORS, request tracing, and a 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let api_routes = Router::new()
        .route(
            "/actors",
            get(handlers::list_actors).post(handlers::create_actor),
        )
        .route(
            "/actors/:id",
            axum::routing::patch(handlers::update_actor).delete(handlers::delete_actor),
        )
        .route(
            "/movies",
            get(handlers::list_movies).post(handlers::create_movie),
        )
        .route(
            "/movies/:id",
            axum::routing::patch(handlers::update_movie).delete(handlers::delete_movie),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Mirror of the upstream deployment's CORS posture: any origin, the
    // methods the API serves, and the headers a caller must send.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    api_routes
        .merge(metrics_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
