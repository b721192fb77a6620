pub mod common;
pub mod templates;
pub mod profile;      // Perfil de gamificación por usuario
pub mod leaderboard;  // Top 10 global

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Creates the API router with all REST endpoints
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(profile::create_profile_router())
        .merge(leaderboard::create_leaderboard_router())
}
