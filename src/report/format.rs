//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the ingest/aggregation code stays clean and testable
//! - output changes are localized

use crate::domain::{CountryRecord, GlobalStats};
use crate::io::ingest::IngestReport;
use crate::report::InsightContext;

/// How many row errors to list before summarizing the rest.
const MAX_LISTED_ROW_ERRORS: usize = 10;

/// Ingest summary: rows read/used/skipped, the date window, and the first row errors.
pub fn format_ingest_summary(report: &IngestReport) -> String {
    let mut out = String::new();

    out.push_str("=== outbreak - country case summary ===\n");
    out.push_str(&format!(
        "Window: latest={} | previous={}\n",
        report.window.last_updated_label(),
        report
            .window
            .previous
            .as_ref()
            .map(|c| c.label.as_str())
            .unwrap_or("-"),
    ));
    out.push_str(&format!(
        "Rows: read={} | used={} | skipped={}\n",
        report.rows_read,
        report.rows_used,
        report.rows_skipped(),
    ));
    out.push_str(&format!("Countries: {}\n", report.records.len()));

    if !report.row_errors.is_empty() {
        out.push_str("\nSkipped rows:\n");
        for err in report.row_errors.iter().take(MAX_LISTED_ROW_ERRORS) {
            out.push_str(&format!("  {err}\n"));
        }
        let hidden = report.row_errors.len().saturating_sub(MAX_LISTED_ROW_ERRORS);
        if hidden > 0 {
            out.push_str(&format!("  ... and {hidden} more\n"));
        }
    }

    out
}

/// Worldwide totals block.
pub fn format_global(stats: &GlobalStats) -> String {
    let mut out = String::new();
    out.push_str("Global:\n");
    out.push_str(&format!("  {:<16} {:>14}\n", "total cases", fmt_count(stats.total_cases)));
    out.push_str(&format!("  {:<16} {:>14}\n", "total deaths", fmt_count(stats.total_deaths)));
    out.push_str(&format!("  {:<16} {:>14}\n", "recovered", fmt_count(stats.total_recovered)));
    out.push_str(&format!("  {:<16} {:>14}\n", "active", fmt_count(stats.active_cases)));
    out.push_str(&format!("  {:<16} {:>14}\n", "critical", fmt_count(stats.critical_cases)));
    out.push_str(&format!("  {:<16} {:>14}\n", "countries", stats.affected_countries));
    out.push_str(&format!("  generated {}\n", stats.last_updated));
    out
}

/// Country table (rows are printed in the order given).
pub fn format_country_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a CountryRecord>,
{
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:>12} {:>10} {:>10} {:>12} {:>10} {:<10}\n",
            "country", "total", "new", "deaths", "recovered", "active", "updated"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<28} {:-<12} {:-<10} {:-<10} {:-<12} {:-<10} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in records {
        out.push_str(
            format!(
                "{:<28} {:>12} {:>10} {:>10} {:>12} {:>10} {:<10}\n",
                truncate(&r.country, 28),
                fmt_count(r.total_cases),
                fmt_count(r.new_cases),
                fmt_count(r.total_deaths),
                fmt_count(r.total_recovered),
                fmt_count(r.active_cases),
                r.last_updated,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Single-country detail, including the ratios passed to the insight service.
pub fn format_country_detail(ctx: &InsightContext) -> String {
    let r = &ctx.record;
    let mut out = String::new();
    out.push_str(&format!("{} (as of {})\n", r.country, r.last_updated));
    out.push_str(&format!("  total cases     {:>14}\n", fmt_count(r.total_cases)));
    out.push_str(&format!("  new cases       {:>14}\n", fmt_count(r.new_cases)));
    out.push_str(&format!(
        "  total deaths    {:>14}  ({:.1}% mortality)\n",
        fmt_count(r.total_deaths),
        ctx.mortality_rate_pct
    ));
    out.push_str(&format!("  new deaths      {:>14}\n", fmt_count(r.new_deaths)));
    out.push_str(&format!("  recovered       {:>14}\n", fmt_count(r.total_recovered)));
    out.push_str(&format!(
        "  active          {:>14}  ({:.1}% of cases)\n",
        fmt_count(r.active_cases),
        ctx.active_case_rate_pct
    ));
    out.push_str(&format!("  critical        {:>14}\n", fmt_count(r.critical_cases)));
    out.push_str(&format!("  trend: {}\n", ctx.trend.description()));
    out
}

/// Thousands-separated integer, e.g. `-1,234,567`.
pub fn fmt_count(v: i64) -> String {
    let digits = v.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryAccumulator, DateColumn, DateWindow};
    use crate::error::RowIssue;
    use crate::io::ingest::RowError;

    #[test]
    fn fmt_count_groups_thousands() {
        assert_eq!(fmt_count(0), "0");
        assert_eq!(fmt_count(999), "999");
        assert_eq!(fmt_count(1000), "1,000");
        assert_eq!(fmt_count(1_234_567), "1,234,567");
        assert_eq!(fmt_count(-45_000), "-45,000");
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Peru", 10), "Peru");
        assert_eq!(truncate("Saint Vincent and the Grenadines", 10), "Saint Vin.");
    }

    #[test]
    fn table_lists_rows_in_given_order() {
        let records = vec![
            CountryAccumulator::new("Peru", 1500, 20, "1/23/20").to_record(),
            CountryAccumulator::new("Chad", 3, 1, "1/23/20").to_record(),
        ];
        let table = format_country_table(&records);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Peru"));
        assert!(lines[2].contains("1,500"));
        assert!(lines[3].starts_with("Chad"));
    }

    #[test]
    fn ingest_summary_lists_skipped_rows() {
        let report = IngestReport {
            records: Vec::new(),
            window: DateWindow {
                latest: Some(DateColumn {
                    index: 5,
                    label: "1/23/20".to_string(),
                }),
                previous: None,
            },
            row_errors: vec![RowError {
                line: 4,
                country: None,
                issue: RowIssue::MissingCountry,
            }],
            rows_read: 1,
            rows_used: 0,
        };
        let text = format_ingest_summary(&report);
        assert!(text.contains("latest=1/23/20 | previous=-"));
        assert!(text.contains("skipped=1"));
        assert!(text.contains("line 4: missing required value"));
    }
}
