// ============================================================================
// PROMETHEUS METRICS
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static! {
    // ========================================================================
    // HTTP REQUEST METRICS
    // ========================================================================

    /// Total HTTP requests by method, endpoint and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "endpoint", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "endpoint"],
        vec![0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    // ========================================================================
    // WAREHOUSE METRICS
    // ========================================================================

    /// Warehouse query jobs by query label and outcome
    pub static ref WAREHOUSE_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "warehouse_queries_total",
        "Total number of warehouse queries",
        &["query", "status"]
    )
    .unwrap();

    /// Warehouse jobs are slow compared to OLTP queries, hence the wide buckets
    pub static ref WAREHOUSE_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "warehouse_query_duration_seconds",
        "Warehouse query duration in seconds",
        &["query"],
        vec![0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 15.0, 30.0, 60.0]
    )
    .unwrap();

    // ========================================================================
    // GAMIFICATION METRICS
    // ========================================================================

    /// Profile lookups by the path that resolved them (numeric, string, error, not_found)
    pub static ref PROFILE_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "profile_lookups_total",
        "Profile lookups by resolution path",
        &["resolution"]
    )
    .unwrap();
}

pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);
}

pub fn record_warehouse_query(query: &str, status: &str, duration_secs: f64) {
    WAREHOUSE_QUERIES_TOTAL
        .with_label_values(&[query, status])
        .inc();

    WAREHOUSE_QUERY_DURATION_SECONDS
        .with_label_values(&[query])
        .observe(duration_secs);
}

pub fn record_profile_lookup(resolution: &str) {
    PROFILE_LOOKUPS_TOTAL.with_label_values(&[resolution]).inc();
}
