use serde::{Deserialize, Serialize};

use crate::domains::gamification::levels::threshold_for;
use crate::domains::gamification::{LeaderboardRecord, ProfileRecord};

pub const DEFAULT_USERNAME: &str = "Unknown Reader";
pub const DEFAULT_LEVEL: i64 = 1;
pub const DEFAULT_NEXT_LEVEL_POINTS: i64 = 1000;
pub const DEFAULT_RANK: i64 = 999;
pub const DEFAULT_AVATAR_URL: &str = "https://placehold.co/80x80/007bff/white?text=A";

/// Static avatar per level; anything else gets the placeholder.
pub fn avatar_url_for_level(level: i64) -> &'static str {
    match level {
        1 => "/level_1_avatar.png",
        2 => "/level_2_avatar.png",
        3 => "/level_3_avatar.png",
        _ => DEFAULT_AVATAR_URL,
    }
}

/// Profile payload consumed by the front-end.
///
/// `userId` and `username` are always strings so 64-bit identifiers survive
/// JavaScript number precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: String,
    pub username: String,
    pub level: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    pub current_points: i64,
    pub next_level_points: i64,
    pub current_level_min: i64,
    pub avatar_url: String,
    pub current_streak: i64,
    pub rank: i64,
    pub xp_created_login: i64,
    pub xp_subscriptions_months: i64,
    #[serde(rename = "xpLatest3DaysArticlePageViews")]
    pub xp_latest_3_days_article_page_views: i64,
}

impl UserProfileResponse {
    /// Renames warehouse fields and fills defaults for missing ones.
    /// `requested_id` stands in when the row has no identifier.
    pub fn from_record(record: ProfileRecord, requested_id: &str) -> Self {
        let level = record.level.unwrap_or(DEFAULT_LEVEL);

        Self {
            user_id: record.user_id.unwrap_or_else(|| requested_id.to_string()),
            username: record.username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            level,
            level_name: record.level_name,
            current_points: record.current_points.unwrap_or(0),
            next_level_points: record.next_level_points.unwrap_or(DEFAULT_NEXT_LEVEL_POINTS),
            current_level_min: record
                .current_level_min
                .unwrap_or_else(|| threshold_for(level).current_level_min),
            avatar_url: avatar_url_for_level(level).to_string(),
            current_streak: record.current_streak.unwrap_or(0),
            rank: record.rank.unwrap_or(DEFAULT_RANK),
            xp_created_login: record.xp_created_login.unwrap_or(0),
            xp_subscriptions_months: record.xp_subscriptions_months.unwrap_or(0),
            xp_latest_3_days_article_page_views: record.xp_latest_3_days_article_page_views.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub points: i64,
    pub rank: i64,
}

impl From<LeaderboardRecord> for LeaderboardEntry {
    fn from(record: LeaderboardRecord) -> Self {
        Self {
            user_id: record.user_id,
            username: record.username,
            points: record.points,
            rank: record.rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_avatar_lookup() {
        assert_eq!(avatar_url_for_level(1), "/level_1_avatar.png");
        assert_eq!(avatar_url_for_level(2), "/level_2_avatar.png");
        assert_eq!(avatar_url_for_level(3), "/level_3_avatar.png");
        assert_eq!(avatar_url_for_level(0), DEFAULT_AVATAR_URL);
        assert_eq!(avatar_url_for_level(4), DEFAULT_AVATAR_URL);
    }

    #[test]
    fn test_defaults_for_empty_record() {
        let response = UserProfileResponse::from_record(ProfileRecord::default(), "42");

        assert_eq!(response.user_id, "42");
        assert_eq!(response.username, DEFAULT_USERNAME);
        assert_eq!(response.level, 1);
        assert_eq!(response.current_points, 0);
        assert_eq!(response.next_level_points, 1000);
        assert_eq!(response.current_level_min, 1);
        assert_eq!(response.current_streak, 0);
        assert_eq!(response.rank, 999);
        assert_eq!(response.avatar_url, "/level_1_avatar.png");
    }

    #[test]
    fn test_serialized_contract_keys() {
        let record = ProfileRecord {
            user_id: Some("3574368165637449459".to_string()),
            username: Some("3574368165637449459".to_string()),
            level: Some(2),
            current_points: Some(150),
            next_level_points: Some(3501),
            current_level_min: Some(101),
            current_streak: Some(1),
            rank: Some(3),
            xp_created_login: Some(5),
            xp_subscriptions_months: Some(6),
            xp_latest_3_days_article_page_views: Some(7),
            ..Default::default()
        };

        let body = serde_json::to_value(UserProfileResponse::from_record(record, "ignored")).unwrap();
        assert_eq!(
            body,
            json!({
                "userId": "3574368165637449459",
                "username": "3574368165637449459",
                "level": 2,
                "currentPoints": 150,
                "nextLevelPoints": 3501,
                "currentLevelMin": 101,
                "avatarUrl": "/level_2_avatar.png",
                "currentStreak": 1,
                "rank": 3,
                "xpCreatedLogin": 5,
                "xpSubscriptionsMonths": 6,
                "xpLatest3DaysArticlePageViews": 7
            })
        );
    }
}
