//! Fixed-ratio estimator.

use serde::{Deserialize, Serialize};

pub const DEATH_RATIO: f64 = 0.02;
pub const RECOVERY_RATIO: f64 = 0.90;
pub const ACTIVE_RATIO: f64 = 0.08;
pub const CRITICAL_RATIO: f64 = 0.01;

/// Metrics derived from a country's confirmed-case totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedMetrics {
    pub total_deaths: i64,
    pub new_deaths: i64,
    pub total_recovered: i64,
    pub active_cases: i64,
    pub critical_cases: i64,
}

impl EstimatedMetrics {
    /// Recompute every estimate from the given totals.
    ///
    /// `new_cases` may be negative (downward corrections upstream); the product is
    /// truncated toward zero either way.
    pub fn from_totals(total_cases: i64, new_cases: i64) -> Self {
        Self {
            total_deaths: apply_ratio(total_cases, DEATH_RATIO),
            new_deaths: apply_ratio(new_cases, DEATH_RATIO),
            total_recovered: apply_ratio(total_cases, RECOVERY_RATIO),
            active_cases: apply_ratio(total_cases, ACTIVE_RATIO),
            critical_cases: apply_ratio(total_cases, CRITICAL_RATIO),
        }
    }
}

fn apply_ratio(value: i64, ratio: f64) -> i64 {
    // `as` truncates toward zero.
    (value as f64 * ratio) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratios_truncate_toward_zero() {
        let m = EstimatedMetrics::from_totals(150, 30);
        assert_eq!(m.total_deaths, 3);
        assert_eq!(m.new_deaths, 0);
        assert_eq!(m.total_recovered, 135);
        assert_eq!(m.active_cases, 12);
        assert_eq!(m.critical_cases, 1);
    }

    #[test]
    fn negative_delta_truncates_toward_zero() {
        let m = EstimatedMetrics::from_totals(1000, -130);
        assert_eq!(m.new_deaths, -2);

        let small = EstimatedMetrics::from_totals(0, -30);
        assert_eq!(small.new_deaths, 0);
    }

    #[test]
    fn estimation_is_idempotent() {
        let a = EstimatedMetrics::from_totals(123_456, 789);
        let b = EstimatedMetrics::from_totals(123_456, 789);
        assert_eq!(a, b);
    }

    #[test]
    fn recompute_differs_from_summing_per_row_estimates() {
        // Two regions of 99 cases: per-row critical estimates are 0 + 0,
        // but the country total of 198 yields 1.
        let per_row = EstimatedMetrics::from_totals(99, 0).critical_cases * 2;
        let combined = EstimatedMetrics::from_totals(198, 0).critical_cases;
        assert_eq!(per_row, 0);
        assert_eq!(combined, 1);
    }
}
