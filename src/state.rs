use std::sync::Arc;

use crate::api::templates::gamification_templates::GamificationQueryTemplates;
use crate::config::WarehouseConfig;
use crate::domains::gamification::{LeaderboardService, ProfileService};
use crate::services::bigquery_service::BigQueryClient;
use crate::services::warehouse::QueryExecutor;

/// Estado compartido de la aplicación.
/// Holds the single warehouse connection and the resolvers built on it.
#[derive(Clone)]
pub struct AppState {
    pub warehouse: Arc<dyn QueryExecutor>,
    pub profile_service: ProfileService,
    pub leaderboard_service: LeaderboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = WarehouseConfig::from_env()?;
        let client = BigQueryClient::connect(config.clone()).await;

        if !client.is_available() {
            tracing::warn!("⚠️ Warehouse client unavailable, every API request will answer 500");
        }

        Ok(Self::with_executor(Arc::new(client), &config))
    }

    /// Wires the resolvers around an already constructed executor.
    pub fn with_executor(warehouse: Arc<dyn QueryExecutor>, config: &WarehouseConfig) -> Self {
        let templates = Arc::new(GamificationQueryTemplates::new(config));

        Self {
            profile_service: ProfileService::new(warehouse.clone(), templates.clone()),
            leaderboard_service: LeaderboardService::new(warehouse.clone(), templates),
            warehouse,
        }
    }
}
