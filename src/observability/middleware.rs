// ============================================================================
// HTTP METRICS MIDDLEWARE
// ============================================================================

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::observability::record_http_request;

/// Endpoint label for requests that hit no route.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

/// Records count and latency for every HTTP request
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = endpoint_label(&req);

    let response = next.run(req).await;

    record_http_request(&method, &endpoint, response.status().as_u16(), start.elapsed().as_secs_f64());

    response
}

/// Route template the request matched, e.g. `/api/profile/:user_id`.
/// The label set stays bounded by the router's routes plus one.
pub fn endpoint_label(req: &Request) -> String {
    req.extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_string())
}
