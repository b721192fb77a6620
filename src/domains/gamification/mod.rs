pub mod leaderboard_service;
pub mod levels;
pub mod models;
pub mod profile_service;

// Re-exports para facilitar imports
pub use leaderboard_service::LeaderboardService;
pub use models::{LeaderboardRecord, ProfileRecord};
pub use profile_service::ProfileService;
