// ============================================================================
// WAREHOUSE QUERY EXECUTOR
// ============================================================================
//
// Seam between the resolvers and the data warehouse. Production wiring uses
// `BigQueryClient`; tests plug in their own executor.
//
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// One result row, column name -> decoded cell value.
pub type Row = Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    /// The client could not be initialised at startup (usually missing credentials).
    #[error("warehouse client not initialized, check credentials setup")]
    ConnectionUnavailable,

    #[error("failed to obtain warehouse access token: {0}")]
    Auth(String),

    #[error("warehouse transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("warehouse query failed ({status}): {message}")]
    QueryFailed { status: u16, message: String },

    #[error("could not decode warehouse response: {0}")]
    Decode(String),
}

impl WarehouseError {
    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, WarehouseError::ConnectionUnavailable)
    }
}

/// Typed value for a named query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParameter {
    Int64(i64),
    String(String),
}

impl QueryParameter {
    pub fn type_name(&self) -> &'static str {
        match self {
            QueryParameter::Int64(_) => "INT64",
            QueryParameter::String(_) => "STRING",
        }
    }

    /// BigQuery transports every scalar parameter value as a string.
    pub fn wire_value(&self) -> String {
        match self {
            QueryParameter::Int64(v) => v.to_string(),
            QueryParameter::String(v) => v.clone(),
        }
    }
}

/// SQL text plus its named parameters (`@name` placeholders).
#[derive(Debug, Clone)]
pub struct WarehouseQuery {
    /// Short label used for logs and metrics.
    pub label: &'static str,
    pub sql: String,
    pub params: Vec<(String, QueryParameter)>,
}

impl WarehouseQuery {
    pub fn new(label: &'static str, sql: impl Into<String>) -> Self {
        Self {
            label,
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, name: &str, value: QueryParameter) -> Self {
        self.params.push((name.to_string(), value));
        self
    }

    pub fn param(&self, name: &str) -> Option<&QueryParameter> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireParameter {
    pub name: String,
    pub parameter_type: WireParameterType,
    pub parameter_value: WireParameterValue,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireParameterType {
    #[serde(rename = "type")]
    pub type_name: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireParameterValue {
    pub value: String,
}

impl From<&(String, QueryParameter)> for WireParameter {
    fn from((name, value): &(String, QueryParameter)) -> Self {
        Self {
            name: name.clone(),
            parameter_type: WireParameterType {
                type_name: value.type_name(),
            },
            parameter_value: WireParameterValue {
                value: value.wire_value(),
            },
        }
    }
}

/// Runs SQL against the warehouse and hands back decoded rows.
///
/// Implementations block (asynchronously) until the query job finishes and do
/// not retry; any failure is returned to the caller unchanged.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &WarehouseQuery) -> Result<Vec<Row>, WarehouseError>;

    /// Whether the underlying connection was initialised.
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_keeps_parameter_order() {
        let query = WarehouseQuery::new("profile_by_int", "SELECT 1")
            .bind("user_id", QueryParameter::Int64(42))
            .bind("other", QueryParameter::String("x".to_string()));

        assert_eq!(query.params.len(), 2);
        assert_eq!(query.params[0].0, "user_id");
        assert_eq!(query.param("other"), Some(&QueryParameter::String("x".to_string())));
        assert_eq!(query.param("missing"), None);
    }

    #[test]
    fn test_wire_parameter_shape() {
        let param = ("user_id".to_string(), QueryParameter::Int64(3574368165637449459));
        let wire = serde_json::to_value(WireParameter::from(&param)).unwrap();

        assert_eq!(
            wire,
            serde_json::json!({
                "name": "user_id",
                "parameterType": {"type": "INT64"},
                "parameterValue": {"value": "3574368165637449459"}
            })
        );
    }
}
