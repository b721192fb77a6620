use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::warn;

use crate::monitoring::uptime_seconds;
use crate::observability::metrics_handler;
use crate::state::AppState;

/// Create monitoring router with metrics and health endpoints
pub fn monitoring_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/metrics", get(metrics_handler))
}

/// Basic health check endpoint
async fn health_check() -> impl IntoResponse {
    let health = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": uptime_seconds(),
    });

    (StatusCode::OK, axum::Json(health))
}

/// Ready only when the warehouse client was initialised
async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if state.warehouse.is_available() {
        (
            StatusCode::OK,
            axum::Json(serde_json::json!({"status": "ready", "warehouse": "initialized"})),
        )
    } else {
        warn!("Readiness check failed: warehouse client not initialized");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::Json(serde_json::json!({"status": "not_ready", "warehouse": "unavailable"})),
        )
    }
}

async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "alive"})))
}
