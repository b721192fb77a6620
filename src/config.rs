use std::env;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PROJECT_ID: &str = "data-dbt-dev-bxjv";
const DEFAULT_DATASET_ID: &str = "DEV_hack_XP_datamodeller";
pub const DEFAULT_API_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Where the XP tables live and how to reach the warehouse API.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseConfig {
    pub project_id: String,
    pub dataset_id: String,
    pub location: Option<String>,
    pub api_base_url: String,
}

impl WarehouseConfig {
    pub fn new(project_id: &str, dataset_id: &str) -> anyhow::Result<Self> {
        validate_identifier("project", project_id)?;
        validate_identifier("dataset", dataset_id)?;

        Ok(Self {
            project_id: project_id.to_string(),
            dataset_id: dataset_id.to_string(),
            location: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let project_id = env::var("WAREHOUSE_PROJECT_ID").unwrap_or_else(|_| DEFAULT_PROJECT_ID.to_string());
        let dataset_id = env::var("WAREHOUSE_DATASET_ID").unwrap_or_else(|_| DEFAULT_DATASET_ID.to_string());

        let mut config = Self::new(&project_id, &dataset_id)?;
        config.location = env::var("WAREHOUSE_LOCATION").ok().filter(|l| !l.trim().is_empty());
        if let Ok(base_url) = env::var("WAREHOUSE_API_BASE_URL") {
            config.api_base_url = base_url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }

    /// Fully qualified, backtick-quoted table path.
    pub fn table(&self, name: &str) -> String {
        format!("`{}.{}.{}`", self.project_id, self.dataset_id, name)
    }
}

/// Table paths cannot be bound as query parameters, so they are checked here instead.
fn validate_identifier(kind: &str, value: &str) -> anyhow::Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("invalid warehouse {} identifier: {:?}", kind, value))
    }
}

pub fn server_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
