//! Level thresholds and derived progress values.
//!
//! Level 1: 1-100 points, level 2: 101-3500 points, level 3: 3501-5000 points
//! (max level, capped at 5000).

/// Points are never reported above this value.
pub const MAX_POINTS: i64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelThreshold {
    /// Minimum points for the current level
    pub current_level_min: i64,
    /// Points needed to reach the next level (the cap on the last level)
    pub next_level_points: i64,
}

/// Level 3 and anything outside 1..=2 share the max-level row.
pub fn threshold_for(level: i64) -> LevelThreshold {
    match level {
        1 => LevelThreshold {
            current_level_min: 1,
            next_level_points: 101,
        },
        2 => LevelThreshold {
            current_level_min: 101,
            next_level_points: 3501,
        },
        _ => LevelThreshold {
            current_level_min: 3501,
            next_level_points: MAX_POINTS,
        },
    }
}

pub fn clamp_points(points: i64) -> i64 {
    points.min(MAX_POINTS)
}

/// floor(ln(page views)); zero or negative counts are read as 1.
pub fn day_streak(page_views: i64) -> i64 {
    let views = page_views.max(1) as f64;
    views.ln().floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_per_level() {
        assert_eq!(threshold_for(1), LevelThreshold { current_level_min: 1, next_level_points: 101 });
        assert_eq!(threshold_for(2), LevelThreshold { current_level_min: 101, next_level_points: 3501 });
        assert_eq!(threshold_for(3), LevelThreshold { current_level_min: 3501, next_level_points: 5000 });
        assert_eq!(threshold_for(7), threshold_for(3));
    }

    #[test]
    fn test_clamp_points() {
        assert_eq!(clamp_points(12_000), 5000);
        assert_eq!(clamp_points(5000), 5000);
        assert_eq!(clamp_points(4999), 4999);
        assert_eq!(clamp_points(0), 0);
    }

    #[test]
    fn test_day_streak() {
        assert_eq!(day_streak(0), 0);
        assert_eq!(day_streak(-3), 0);
        assert_eq!(day_streak(1), 0);
        assert_eq!(day_streak(2), 0);
        assert_eq!(day_streak(3), 1);
        assert_eq!(day_streak(20), 2);
        assert_eq!(day_streak(21), 3);
    }
}
