//! Reporting utilities: worldwide roll-ups, rankings, and insight inputs.

pub mod format;

pub use format::*;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CountryRecord, GlobalStats};

impl GlobalStats {
    /// Sum every country's numeric fields (saturating at the `i64` bounds).
    pub fn from_records<'a, I>(records: I, generated_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a CountryRecord>,
    {
        let mut stats = GlobalStats {
            total_cases: 0,
            total_deaths: 0,
            total_recovered: 0,
            active_cases: 0,
            critical_cases: 0,
            affected_countries: 0,
            last_updated: format_timestamp(generated_at),
        };
        for r in records {
            stats.total_cases = stats.total_cases.saturating_add(r.total_cases);
            stats.total_deaths = stats.total_deaths.saturating_add(r.total_deaths);
            stats.total_recovered = stats.total_recovered.saturating_add(r.total_recovered);
            stats.active_cases = stats.active_cases.saturating_add(r.active_cases);
            stats.critical_cases = stats.critical_cases.saturating_add(r.critical_cases);
            stats.affected_countries += 1;
        }
        stats
    }
}

/// e.g. `March 9, 2023, 4:05 PM UTC`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y, %-I:%M %p UTC").to_string()
}

/// Countries with the most total cases, largest first (ties by name).
pub fn rank_by_total_cases(records: &[CountryRecord], top_n: usize) -> Vec<CountryRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.total_cases.cmp(&a.total_cases).then_with(|| a.country.cmp(&b.country)));
    sorted.truncate(top_n);
    sorted
}

/// How fast a country's case count is moving, bucketed by `newCases`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Significant,
    Moderate,
    Minor,
    Minimal,
    Flat,
}

impl Trend {
    pub fn from_new_cases(new_cases: i64) -> Self {
        match new_cases {
            n if n > 10_000 => Trend::Significant,
            n if n > 1_000 => Trend::Moderate,
            n if n > 100 => Trend::Minor,
            n if n > 0 => Trend::Minimal,
            _ => Trend::Flat,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Trend::Significant => "significant daily increase",
            Trend::Moderate => "moderate daily increase",
            Trend::Minor => "minor daily increase",
            Trend::Minimal => "minimal daily increase",
            Trend::Flat => "no new cases reported",
        }
    }
}

/// Derived ratios handed, with the record itself, to the narrative-insight service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightContext {
    pub record: CountryRecord,
    pub mortality_rate_pct: f64,
    pub active_case_rate_pct: f64,
    pub trend: Trend,
}

impl InsightContext {
    pub fn from_record(record: &CountryRecord) -> Self {
        Self {
            record: record.clone(),
            mortality_rate_pct: percent_of(record.total_deaths, record.total_cases),
            active_case_rate_pct: percent_of(record.active_cases, record.total_cases),
            trend: Trend::from_new_cases(record.new_cases),
        }
    }
}

fn percent_of(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::domain::CountryAccumulator;

    fn record(country: &str, total: i64, new: i64) -> CountryRecord {
        CountryAccumulator::new(country, total, new, "1/23/20").to_record()
    }

    #[test]
    fn global_stats_sum_every_country() {
        let records = vec![record("USA", 150, 30), record("Peru", 1000, 10)];
        let ts = Utc.with_ymd_and_hms(2020, 3, 9, 16, 5, 0).unwrap();
        let stats = GlobalStats::from_records(&records, ts);

        assert_eq!(stats.total_cases, 1150);
        assert_eq!(stats.total_deaths, 3 + 20);
        assert_eq!(stats.total_recovered, 135 + 900);
        assert_eq!(stats.active_cases, 12 + 80);
        assert_eq!(stats.critical_cases, 1 + 10);
        assert_eq!(stats.affected_countries, 2);
        assert_eq!(stats.last_updated, "March 9, 2020, 4:05 PM UTC");
    }

    #[test]
    fn global_stats_of_nothing_is_zero() {
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let stats = GlobalStats::from_records(&Vec::<CountryRecord>::new(), ts);
        assert_eq!(stats.total_cases, 0);
        assert_eq!(stats.affected_countries, 0);
    }

    #[test]
    fn global_stats_saturate_instead_of_overflowing() {
        let records = vec![record("X", i64::MAX - 10, 0), record("Y", 100, 0)];
        let ts = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let stats = GlobalStats::from_records(&records, ts);
        assert_eq!(stats.total_cases, i64::MAX);
        assert_eq!(stats.affected_countries, 2);
    }

    #[test]
    fn ranking_orders_by_total_cases() {
        let records = vec![record("B", 10, 0), record("A", 10, 0), record("C", 99, 0)];
        let top: Vec<_> = rank_by_total_cases(&records, 2).into_iter().map(|r| r.country).collect();
        assert_eq!(top, vec!["C", "A"]);
    }

    #[test]
    fn insight_context_ratios() {
        let ctx = InsightContext::from_record(&record("USA", 1000, 1500));
        assert!((ctx.mortality_rate_pct - 2.0).abs() < 1e-9);
        assert!((ctx.active_case_rate_pct - 8.0).abs() < 1e-9);
        assert_eq!(ctx.trend, Trend::Moderate);

        let empty = InsightContext::from_record(&record("Nowhere", 0, 0));
        assert_eq!(empty.mortality_rate_pct, 0.0);
        assert_eq!(empty.trend, Trend::Flat);
    }

    #[test]
    fn trend_buckets() {
        assert_eq!(Trend::from_new_cases(10_001), Trend::Significant);
        assert_eq!(Trend::from_new_cases(10_000), Trend::Moderate);
        assert_eq!(Trend::from_new_cases(101), Trend::Minor);
        assert_eq!(Trend::from_new_cases(1), Trend::Minimal);
        assert_eq!(Trend::from_new_cases(-5), Trend::Flat);
    }
}
