//! Warehouse-side gamification records

use serde_json::Value;

use crate::services::warehouse::Row;

/// One user's XP row after level rules have been applied.
///
/// Every column is optional because the warehouse row may be partial; the
/// HTTP layer supplies the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRecord {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub level: Option<i64>,
    pub level_name: Option<String>,
    pub current_points: Option<i64>,
    pub next_level_points: Option<i64>,
    pub current_level_min: Option<i64>,
    pub current_streak: Option<i64>,
    pub rank: Option<i64>,
    pub xp_created_login: Option<i64>,
    pub xp_subscriptions_months: Option<i64>,
    pub xp_latest_3_days_article_page_views: Option<i64>,
}

impl ProfileRecord {
    pub fn from_row(row: &Row) -> Self {
        Self {
            user_id: column_string(row, "user_id"),
            username: column_string(row, "username"),
            level: column_i64(row, "level"),
            level_name: column_string(row, "level_name"),
            current_points: column_i64(row, "current_points"),
            next_level_points: None,
            current_level_min: None,
            current_streak: column_i64(row, "current_streak"),
            rank: column_i64(row, "rank"),
            xp_created_login: column_i64(row, "XP_CREATED_LOGIN"),
            xp_subscriptions_months: column_i64(row, "XP_subscriptions_months"),
            xp_latest_3_days_article_page_views: column_i64(row, "XP_latest_3_days_article_page_views"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRecord {
    pub user_id: String,
    pub username: String,
    pub points: i64,
    pub rank: i64,
}

impl LeaderboardRecord {
    /// `None` when the row carries no user identifier.
    pub fn from_row(row: &Row, position: usize) -> Option<Self> {
        let user_id = column_string(row, "userId")?;
        let username = column_string(row, "username").unwrap_or_else(|| user_id.clone());

        Some(Self {
            username,
            points: column_i64(row, "points").unwrap_or(0),
            rank: column_i64(row, "rank").unwrap_or(position as i64 + 1),
            user_id,
        })
    }
}

/// Column names are case-insensitive in the warehouse.
fn column<'a>(row: &'a Row, name: &str) -> Option<&'a Value> {
    row.get(name)
        .or_else(|| {
            row.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
}

/// Numeric identifiers are turned into strings so large ids keep their precision.
pub(crate) fn column_string(row: &Row, name: &str) -> Option<String> {
    match column(row, name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn column_i64(row: &Row, name: &str) -> Option<i64> {
    match column(row, name)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
