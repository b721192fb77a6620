use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::templates::gamification_templates::{GamificationQueryTemplates, LEADERBOARD_SIZE};
use crate::domains::gamification::models::LeaderboardRecord;
use crate::services::warehouse::{QueryExecutor, WarehouseError};

/// Global top-10 leaderboard.
#[derive(Clone)]
pub struct LeaderboardService {
    executor: Arc<dyn QueryExecutor>,
    templates: Arc<GamificationQueryTemplates>,
}

impl LeaderboardService {
    pub fn new(executor: Arc<dyn QueryExecutor>, templates: Arc<GamificationQueryTemplates>) -> Self {
        Self { executor, templates }
    }

    /// At most ten entries, ascending by rank.
    ///
    /// A failed query yields an empty board; only an uninitialised warehouse
    /// connection is returned as an error.
    pub async fn resolve_leaderboard(&self) -> Result<Vec<LeaderboardRecord>, WarehouseError> {
        let rows = match self.executor.execute(&self.templates.leaderboard()).await {
            Ok(rows) => rows,
            Err(e) if e.is_connection_unavailable() => return Err(e),
            Err(e) => {
                error!("Error fetching leaderboard data: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut entries: Vec<LeaderboardRecord> = rows
            .iter()
            .enumerate()
            .filter_map(|(position, row)| {
                let entry = LeaderboardRecord::from_row(row, position);
                if entry.is_none() {
                    warn!("Skipping leaderboard row without userId");
                }
                entry
            })
            .collect();

        entries.sort_by_key(|entry| entry.rank);
        entries.truncate(LEADERBOARD_SIZE);

        info!("Leaderboard resolved with {} entries", entries.len());
        Ok(entries)
    }
}
