use axum::{http::Method, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod state;

// Domain-driven architecture
pub mod domains;

// Production-ready modules
pub mod monitoring;
pub mod observability;

use api::common::{handle_panic, request_logging_middleware};
use api::create_api_router;
use monitoring::monitoring_router;
use observability::metrics_middleware;
use state::AppState;

use axum::middleware as axum_middleware;

/// The front-end is served from another origin, so every origin is allowed.
pub fn get_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        // Endpoints de monitoreo - incluye /metrics de Prometheus
        .merge(monitoring_router())
        // API endpoints con estado
        .merge(create_api_router())
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum_middleware::from_fn(request_logging_middleware))
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(get_cors_layer())
}
