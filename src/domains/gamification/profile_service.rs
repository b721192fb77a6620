use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::templates::gamification_templates::GamificationQueryTemplates;
use crate::domains::gamification::levels::{clamp_points, day_streak, threshold_for};
use crate::domains::gamification::models::ProfileRecord;
use crate::observability::metrics::record_profile_lookup;
use crate::services::warehouse::{QueryExecutor, Row, WarehouseError};

/// Resolves one user's gamification profile from the warehouse.
#[derive(Clone)]
pub struct ProfileService {
    executor: Arc<dyn QueryExecutor>,
    templates: Arc<GamificationQueryTemplates>,
}

impl ProfileService {
    pub fn new(executor: Arc<dyn QueryExecutor>, templates: Arc<GamificationQueryTemplates>) -> Self {
        Self { executor, templates }
    }

    /// Looks the user up by integer id first, then by string id.
    ///
    /// `Ok(None)` means not found. Query failures are logged and degrade to
    /// the next step; only an uninitialised warehouse connection is returned
    /// as an error.
    pub async fn resolve_profile(&self, user_id: &str) -> Result<Option<ProfileRecord>, WarehouseError> {
        info!("Fetching profile data for user_id: {}", user_id);

        let mut rows: Vec<Row> = Vec::new();
        let mut resolution = "numeric";

        match user_id.trim().parse::<i64>() {
            Ok(numeric_id) => {
                let query = self.templates.profile_by_numeric_id(numeric_id);
                match self.executor.execute(&query).await {
                    Ok(found) => {
                        info!("Integer query returned {} results", found.len());
                        rows = found;
                    }
                    Err(e) if e.is_connection_unavailable() => return Err(e),
                    Err(e) => warn!("Could not use integer comparison for {}: {}", user_id, e),
                }
            }
            Err(_) => debug!("user_id {} is not an integer, skipping integer comparison", user_id),
        }

        if rows.is_empty() {
            resolution = "string";
            let query = self.templates.profile_by_string_id(user_id);
            match self.executor.execute(&query).await {
                Ok(found) => {
                    info!("String query returned {} results", found.len());
                    rows = found;
                }
                Err(e) if e.is_connection_unavailable() => return Err(e),
                Err(e) => {
                    error!("Error with string query for {}: {}", user_id, e);
                    record_profile_lookup("error");
                    return Ok(None);
                }
            }
        }

        let Some(row) = rows.first() else {
            info!("User {} not found in warehouse", user_id);
            record_profile_lookup("not_found");
            return Ok(None);
        };

        record_profile_lookup(resolution);
        Ok(Some(apply_level_rules(ProfileRecord::from_row(row))))
    }
}

/// Caps points and fills the level-derived fields.
pub fn apply_level_rules(mut record: ProfileRecord) -> ProfileRecord {
    if let Some(points) = record.current_points {
        record.current_points = Some(clamp_points(points));
    }

    let threshold = threshold_for(record.level.unwrap_or(1));
    record.next_level_points = Some(threshold.next_level_points);
    record.current_level_min = Some(threshold.current_level_min);

    if record.current_streak.is_none() {
        record.current_streak = Some(day_streak(record.xp_latest_3_days_article_page_views.unwrap_or(0)));
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_level_rules_caps_points() {
        let record = apply_level_rules(ProfileRecord {
            level: Some(3),
            current_points: Some(9_999),
            ..Default::default()
        });

        assert_eq!(record.current_points, Some(5000));
        assert_eq!(record.next_level_points, Some(5000));
        assert_eq!(record.current_level_min, Some(3501));
    }

    #[test]
    fn test_apply_level_rules_defaults_to_level_one() {
        let record = apply_level_rules(ProfileRecord {
            current_points: Some(50),
            ..Default::default()
        });

        assert_eq!(record.level, None);
        assert_eq!(record.next_level_points, Some(101));
        assert_eq!(record.current_level_min, Some(1));
        assert_eq!(record.current_points, Some(50));
    }

    #[test]
    fn test_streak_derived_when_column_missing() {
        let zero_views = apply_level_rules(ProfileRecord {
            xp_latest_3_days_article_page_views: Some(0),
            ..Default::default()
        });
        assert_eq!(zero_views.current_streak, Some(0));

        let from_query = apply_level_rules(ProfileRecord {
            current_streak: Some(4),
            xp_latest_3_days_article_page_views: Some(0),
            ..Default::default()
        });
        assert_eq!(from_query.current_streak, Some(4));
    }
}
