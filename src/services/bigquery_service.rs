// ============================================================================
// BIGQUERY SERVICE - REST client for the jobs.query API
// ============================================================================
//
// Uses OAuth 2.0 application default credentials through gcp_auth
// - GOOGLE_APPLICATION_CREDENTIALS or `gcloud auth application-default login`
// - Queries always run as standard SQL with NAMED parameters
//
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gcp_auth::TokenProvider;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::WarehouseConfig;
use crate::observability::metrics::record_warehouse_query;
use crate::services::warehouse::{
    QueryExecutor, Row, WarehouseError, WarehouseQuery, WireParameter,
};

const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    parameter_mode: &'static str,
    query_parameters: Vec<WireParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    job_reference: Option<JobReference>,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
    page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobReference {
    job_id: String,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
struct TableField {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: Value,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ============================================================================
// OAUTH TOKEN CACHE
// ============================================================================

enum TokenSource {
    Gcp(Arc<dyn TokenProvider>),
    Static(String),
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct BigQueryClient {
    http_client: Client,
    config: WarehouseConfig,
    token_source: Option<TokenSource>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl BigQueryClient {
    /// Builds a client from application default credentials.
    ///
    /// A missing or broken credential setup does not fail startup: the client
    /// is returned in an unavailable state and every query reports
    /// `WarehouseError::ConnectionUnavailable`.
    pub async fn connect(config: WarehouseConfig) -> Self {
        match gcp_auth::provider().await {
            Ok(provider) => {
                info!(
                    "BigQuery client configured for {}.{}",
                    config.project_id, config.dataset_id
                );
                Self::with_source(config, Some(TokenSource::Gcp(provider)))
            }
            Err(e) => {
                error!("Error initializing BigQuery client: {}", e);
                Self::with_source(config, None)
            }
        }
    }

    /// Client authenticating with a fixed bearer token.
    pub fn with_static_token(config: WarehouseConfig, token: impl Into<String>) -> Self {
        Self::with_source(config, Some(TokenSource::Static(token.into())))
    }

    pub fn unavailable(config: WarehouseConfig) -> Self {
        Self::with_source(config, None)
    }

    fn with_source(config: WarehouseConfig, token_source: Option<TokenSource>) -> Self {
        Self {
            http_client: Client::new(),
            config,
            token_source,
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    async fn access_token(&self) -> Result<String, WarehouseError> {
        let provider = match &self.token_source {
            None => return Err(WarehouseError::ConnectionUnavailable),
            Some(TokenSource::Static(token)) => return Ok(token.clone()),
            Some(TokenSource::Gcp(provider)) => provider,
        };

        {
            let cache = self.token_cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.expires_at > Utc::now() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let token = provider
            .token(&[BIGQUERY_SCOPE])
            .await
            .map_err(|e| WarehouseError::Auth(e.to_string()))?;
        let token_string = token.as_str().to_string();

        // Access tokens last one hour
        let expires_at = Utc::now() + Duration::minutes(50);
        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: token_string.clone(),
                expires_at,
            });
        }

        debug!("Obtained new BigQuery OAuth token, valid until {}", expires_at);
        Ok(token_string)
    }

    fn queries_endpoint(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.config.api_base_url, self.config.project_id
        )
    }

    async fn run_query(&self, query: &WarehouseQuery) -> Result<Vec<Row>, WarehouseError> {
        let token = self.access_token().await?;

        let request = QueryRequest {
            query: &query.sql,
            use_legacy_sql: false,
            parameter_mode: "NAMED",
            query_parameters: query.params.iter().map(WireParameter::from).collect(),
            location: self.config.location.as_deref(),
        };

        let response = self
            .http_client
            .post(self.queries_endpoint())
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await?;
        let mut page = parse_response(response).await?;

        let job = page.job_reference.clone();
        let mut fields: Option<Vec<TableField>> = None;
        let mut rows = Vec::new();
        let mut next_page: Option<String> = None;

        loop {
            if page.job_complete {
                if fields.is_none() {
                    fields = page.schema.take().map(|s| s.fields);
                }
                let columns = fields.as_deref().unwrap_or(&[]);
                rows.extend(page.rows.drain(..).map(|row| decode_row(columns, row)));

                match page.page_token.take() {
                    Some(token) => next_page = Some(token),
                    None => break,
                }
            } else {
                debug!("Query job for {} still running, polling", query.label);
            }

            let job_ref = job
                .as_ref()
                .ok_or_else(|| WarehouseError::Decode("response is missing jobReference".to_string()))?;
            page = self.fetch_results(&token, job_ref, next_page.as_deref()).await?;
        }

        Ok(rows)
    }

    async fn fetch_results(
        &self,
        token: &str,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, WarehouseError> {
        let url = format!("{}/{}", self.queries_endpoint(), job.job_id);

        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(location) = job.location.as_deref().or(self.config.location.as_deref()) {
            params.push(("location", location));
        }
        if let Some(page_token) = page_token {
            params.push(("pageToken", page_token));
        }

        let response = self
            .http_client
            .get(url)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;

        parse_response(response).await
    }
}

#[async_trait]
impl QueryExecutor for BigQueryClient {
    async fn execute(&self, query: &WarehouseQuery) -> Result<Vec<Row>, WarehouseError> {
        let start = Instant::now();
        let result = self.run_query(query).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(rows) => {
                record_warehouse_query(query.label, "success", elapsed.as_secs_f64());
                info!("Query {} returned {} rows in {:?}", query.label, rows.len(), elapsed);
            }
            Err(e) => {
                record_warehouse_query(query.label, "error", elapsed.as_secs_f64());
                warn!("Query {} failed after {:?}: {}", query.label, elapsed, e);
            }
        }

        result
    }

    fn is_available(&self) -> bool {
        self.token_source.is_some()
    }
}

async fn parse_response(response: Response) -> Result<QueryResponse, WarehouseError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(WarehouseError::QueryFailed {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| WarehouseError::Decode(e.to_string()))
}

fn decode_row(fields: &[TableField], row: TableRow) -> Row {
    fields
        .iter()
        .zip(row.f)
        .map(|(field, cell)| (field.name.clone(), decode_cell(field, cell.v)))
        .collect()
}

fn decode_cell(field: &TableField, raw: Value) -> Value {
    if field.mode.as_deref() == Some("REPEATED") {
        if let Value::Array(items) = raw {
            return Value::Array(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::Object(mut obj) => {
                            decode_scalar(&field.field_type, obj.remove("v").unwrap_or(Value::Null))
                        }
                        other => other,
                    })
                    .collect(),
            );
        }
    }

    decode_scalar(&field.field_type, raw)
}

/// Scalars arrive as strings; the schema type decides the JSON type.
fn decode_scalar(field_type: &str, raw: Value) -> Value {
    let s = match raw {
        Value::String(s) => s,
        other => return other,
    };

    match field_type {
        "INTEGER" | "INT64" => s.parse::<i64>().map(Value::from).unwrap_or(Value::String(s)),
        "FLOAT" | "FLOAT64" | "NUMERIC" | "BIGNUMERIC" => s
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::String(s)),
        "BOOLEAN" | "BOOL" => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(s),
        },
        _ => Value::String(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, field_type: &str) -> TableField {
        TableField {
            name: name.to_string(),
            field_type: field_type.to_string(),
            mode: Some("NULLABLE".to_string()),
        }
    }

    #[test]
    fn test_decode_scalar_by_schema_type() {
        assert_eq!(decode_scalar("INTEGER", json!("3501")), json!(3501));
        assert_eq!(decode_scalar("INT64", json!("-7")), json!(-7));
        assert_eq!(decode_scalar("FLOAT", json!("1.5")), json!(1.5));
        assert_eq!(decode_scalar("BOOLEAN", json!("true")), json!(true));
        assert_eq!(decode_scalar("STRING", json!("3574368165637449459")), json!("3574368165637449459"));
        assert_eq!(decode_scalar("INTEGER", Value::Null), Value::Null);
    }

    #[test]
    fn test_decode_row_zips_schema_and_cells() {
        let fields = vec![field("user_id", "STRING"), field("current_points", "INTEGER"), field("level_name", "STRING")];
        let row: TableRow = serde_json::from_value(json!({
            "f": [{"v": "42"}, {"v": "150"}, {"v": null}]
        }))
        .unwrap();

        let decoded = decode_row(&fields, row);
        assert_eq!(decoded.get("user_id"), Some(&json!("42")));
        assert_eq!(decoded.get("current_points"), Some(&json!(150)));
        assert_eq!(decoded.get("level_name"), Some(&Value::Null));
    }

    #[test]
    fn test_decode_repeated_cell() {
        let repeated = TableField {
            name: "badges".to_string(),
            field_type: "INTEGER".to_string(),
            mode: Some("REPEATED".to_string()),
        };
        let decoded = decode_cell(&repeated, json!([{"v": "1"}, {"v": "2"}]));
        assert_eq!(decoded, json!([1, 2]));
    }

    #[tokio::test]
    async fn test_unavailable_client_reports_connection_unavailable() {
        let config = WarehouseConfig::new("proj", "ds").unwrap();
        let client = BigQueryClient::unavailable(config);

        assert!(!client.is_available());
        let err = client
            .execute(&WarehouseQuery::new("leaderboard", "SELECT 1"))
            .await
            .unwrap_err();
        assert!(err.is_connection_unavailable());
    }
}
