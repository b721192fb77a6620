use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

use crate::api::common::ApiError;
use crate::models::gamification::UserProfileResponse;
use crate::state::AppState;

pub const PROFILE_NOT_FOUND: &str = "User not found";
pub const PROFILE_INTERNAL_ERROR: &str = "Internal server error fetching user data";

/// Create profile router
pub fn create_profile_router() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile/:user_id", get(get_user_profile))
}

/// Rank, streak, points and level for a single user
pub async fn get_user_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let record = state
        .profile_service
        .resolve_profile(&user_id)
        .await
        .map_err(|e| {
            error!("Error fetching profile data for {}: {}", user_id, e);
            ApiError::internal_server_error(PROFILE_INTERNAL_ERROR)
        })?
        .ok_or_else(|| ApiError::not_found(PROFILE_NOT_FOUND))?;

    Ok(Json(UserProfileResponse::from_record(record, &user_id)))
}
