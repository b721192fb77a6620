use crate::config::WarehouseConfig;
use crate::services::warehouse::{QueryParameter, WarehouseQuery};

pub const LEADERBOARD_SIZE: usize = 10;

/// Query templates for the gamification domain.
///
/// Table paths come from configuration; user input only ever travels as a
/// named query parameter.
#[derive(Debug, Clone)]
pub struct GamificationQueryTemplates {
    user_xp_table: String,
    levels_table: String,
}

impl GamificationQueryTemplates {
    pub fn new(config: &WarehouseConfig) -> Self {
        Self {
            user_xp_table: config.table("user_xp"),
            levels_table: config.table("levels"),
        }
    }

    /// Profile lookup matching the identifier column as an integer
    pub fn profile_by_numeric_id(&self, user_id: i64) -> WarehouseQuery {
        WarehouseQuery::new("profile_by_numeric_id", self.profile_query("t.user_id = @user_id"))
            .bind("user_id", QueryParameter::Int64(user_id))
    }

    /// Profile lookup matching the identifier column cast to a string
    pub fn profile_by_string_id(&self, user_id: &str) -> WarehouseQuery {
        WarehouseQuery::new(
            "profile_by_string_id",
            self.profile_query("CAST(t.user_id AS STRING) = @user_id"),
        )
        .bind("user_id", QueryParameter::String(user_id.to_string()))
    }

    /// Top users by total XP, dense-ranked
    pub fn leaderboard(&self) -> WarehouseQuery {
        let sql = format!(
            r#"
            WITH ranked_xp AS (
                SELECT
                    y.bnid_farm AS user_id,
                    y.bnid_farm AS username,
                    y.XP_total,
                    DENSE_RANK() OVER (ORDER BY y.XP_total DESC) AS rank
                FROM {user_xp} AS y
            )
            SELECT
                CAST(user_id AS STRING) AS userId,
                CAST(username AS STRING) AS username,
                XP_total AS points,
                rank
            FROM ranked_xp
            ORDER BY rank ASC, userId ASC
            LIMIT {limit}
            "#,
            user_xp = self.user_xp_table,
            limit = LEADERBOARD_SIZE,
        );

        WarehouseQuery::new("leaderboard", sql)
    }

    fn profile_query(&self, filter: &str) -> String {
        format!(
            r#"
            WITH ranked_xp AS (
                SELECT
                    y.bnid_farm AS user_id,
                    y.bnid_farm AS username,
                    y.XP_CREATED_LOGIN,
                    y.XP_subscriptions_months,
                    y.XP_latest_3_days_article_page_views,
                    CAST(FLOOR(LN(CASE
                        WHEN y.XP_latest_3_days_article_page_views IS NULL
                          OR y.XP_latest_3_days_article_page_views <= 0 THEN 1
                        ELSE y.XP_latest_3_days_article_page_views
                    END)) AS INT64) AS day_streak,
                    y.XP_total,
                    x.level,
                    x.level_name,
                    DENSE_RANK() OVER (ORDER BY y.XP_total DESC) AS rank
                FROM {user_xp} AS y
                JOIN {levels} AS x
                  ON y.XP_total >= x.xp_min
                 AND (y.XP_total < x.xp_max OR x.xp_max IS NULL)
            )
            SELECT
                CAST(t.user_id AS STRING) AS user_id,
                CAST(t.username AS STRING) AS username,
                t.XP_total AS current_points,
                t.level,
                t.level_name,
                t.day_streak AS current_streak,
                t.XP_CREATED_LOGIN,
                t.XP_subscriptions_months,
                t.XP_latest_3_days_article_page_views,
                t.rank
            FROM ranked_xp t
            WHERE {filter}
            LIMIT 1
            "#,
            user_xp = self.user_xp_table,
            levels = self.levels_table,
            filter = filter,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> GamificationQueryTemplates {
        GamificationQueryTemplates::new(&WarehouseConfig::new("proj", "xp").unwrap())
    }

    #[test]
    fn test_profile_queries_bind_instead_of_interpolating() {
        let hostile = "42' OR '1'='1";
        let query = templates().profile_by_string_id(hostile);

        assert!(!query.sql.contains(hostile));
        assert!(query.sql.contains("CAST(t.user_id AS STRING) = @user_id"));
        assert_eq!(query.param("user_id"), Some(&QueryParameter::String(hostile.to_string())));

        let numeric = templates().profile_by_numeric_id(42);
        assert!(numeric.sql.contains("WHERE t.user_id = @user_id"));
        assert_eq!(numeric.param("user_id"), Some(&QueryParameter::Int64(42)));
    }

    #[test]
    fn test_queries_use_dense_rank_and_configured_tables() {
        let profile = templates().profile_by_numeric_id(1);
        assert!(profile.sql.contains("DENSE_RANK() OVER (ORDER BY y.XP_total DESC)"));
        assert!(profile.sql.contains("`proj.xp.user_xp`"));
        assert!(profile.sql.contains("`proj.xp.levels`"));
        assert!(profile.sql.contains("y.XP_total < x.xp_max OR x.xp_max IS NULL"));

        let leaderboard = templates().leaderboard();
        assert!(leaderboard.sql.contains("DENSE_RANK()"));
        assert!(leaderboard.sql.contains("LIMIT 10"));
        assert!(leaderboard.params.is_empty());
    }
}
