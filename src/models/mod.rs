pub mod gamification;

pub use gamification::{LeaderboardEntry, UserProfileResponse};
