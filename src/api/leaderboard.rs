use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tracing::error;

use crate::api::common::ApiError;
use crate::models::gamification::LeaderboardEntry;
use crate::state::AppState;

pub const LEADERBOARD_INTERNAL_ERROR: &str = "Internal server error fetching leaderboard";

/// Create leaderboard router
pub fn create_leaderboard_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/leaderboard", get(get_leaderboard))
}

/// Top 10 users by total XP. An empty board is still a 200.
pub async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let entries = state
        .leaderboard_service
        .resolve_leaderboard()
        .await
        .map_err(|e| {
            error!("Error fetching leaderboard data: {}", e);
            ApiError::internal_server_error(LEADERBOARD_INTERNAL_ERROR)
        })?;

    Ok(Json(entries.into_iter().map(LeaderboardEntry::from).collect()))
}
