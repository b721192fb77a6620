// ============================================================================
// WAREHOUSE SERVICES
// ============================================================================
pub mod warehouse;
pub mod bigquery_service;

pub use bigquery_service::BigQueryClient;
pub use warehouse::{QueryExecutor, QueryParameter, Row, WarehouseError, WarehouseQuery};
