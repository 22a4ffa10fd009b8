//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built up during a single ingest pass
//! - exported to JSON/CSV
//! - handed to downstream collaborators (storage, narrative insights) as plain data

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::estimate::EstimatedMetrics;

/// Header names that are metadata, not reporting dates (compared case-insensitively).
pub const PROVINCE_COLUMN: &str = "Province/State";
pub const COUNTRY_COLUMN: &str = "Country/Region";
pub const LAT_COLUMN: &str = "Lat";
pub const LONG_COLUMN: &str = "Long";

pub const RESERVED_COLUMNS: [&str; 4] = [PROVINCE_COLUMN, COUNTRY_COLUMN, LAT_COLUMN, LONG_COLUMN];

/// `lastUpdated` value used when the source has no date column at all.
pub const UNKNOWN_DATE: &str = "Unknown";

/// Field delimiter of the source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Tab-separated (the Johns Hopkins export layout).
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Tab => b'\t',
            Delimiter::Comma => b',',
        }
    }
}

/// How date-column cells that are neither blank, `N/A`, nor an integer are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CellPolicy {
    /// The row is malformed and gets skipped.
    #[default]
    Strict,
    /// The cell counts as zero and the row is kept.
    Lenient,
}

/// A header recognized as a reporting date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    /// Zero-based position in the header row.
    pub index: usize,
    /// Header text as it appears in the source (trimmed).
    pub label: String,
}

/// The two most recent date columns: rightmost is `latest`, the one before is `previous`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub latest: Option<DateColumn>,
    pub previous: Option<DateColumn>,
}

impl DateWindow {
    /// Pick the window from date columns in left-to-right source order.
    pub fn from_columns(columns: &[DateColumn]) -> Self {
        let mut rev = columns.iter().rev();
        let latest = rev.next().cloned();
        let previous = rev.next().cloned();
        Self { latest, previous }
    }

    /// Label stamped on every record as `lastUpdated`.
    pub fn last_updated_label(&self) -> &str {
        self.latest
            .as_ref()
            .map(|c| c.label.as_str())
            .unwrap_or(UNKNOWN_DATE)
    }
}

/// One source line (one region/sub-region): ordered column name → raw cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the source (header is line 1).
    pub line: usize,
    pub cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new(line: usize) -> Self {
        Self {
            line,
            cells: Vec::new(),
        }
    }

    /// Builder-style helper, mostly for tests and in-memory sources.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.push((column.into(), value.into()));
        self
    }

    /// Look up a cell by column name (case-insensitive); the value is trimmed.
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = column.trim();
        self.cells
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(column))
            .map(|(_, value)| value.trim())
    }

    /// Cell of a date column, read by source position.
    ///
    /// Falls back to the rightmost cell with that label when the row was not
    /// built from the header (positions do not line up).
    pub fn date_cell(&self, column: &DateColumn) -> Option<&str> {
        if let Some((name, value)) = self.cells.get(column.index) {
            if name.trim().eq_ignore_ascii_case(column.label.trim()) {
                return Some(value.trim());
            }
        }
        self.cells
            .iter()
            .rev()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(column.label.trim()))
            .map(|(_, value)| value.trim())
    }
}

/// In-progress running totals for one country during a single ingest pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryAccumulator {
    pub country: String,
    pub total_cases: i64,
    pub new_cases: i64,
    pub last_updated: String,
    /// Always derived from the *current* `total_cases` / `new_cases`.
    pub estimates: EstimatedMetrics,
}

impl CountryAccumulator {
    pub fn new(country: impl Into<String>, latest_cases: i64, delta: i64, last_updated: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            total_cases: latest_cases,
            new_cases: delta,
            last_updated: last_updated.into(),
            estimates: EstimatedMetrics::from_totals(latest_cases, delta),
        }
    }

    /// Fold another region of the same country in, then re-derive the estimates.
    ///
    /// On overflow nothing is changed and `None` is returned.
    pub fn add_region(&mut self, latest_cases: i64, delta: i64) -> Option<()> {
        let total_cases = self.total_cases.checked_add(latest_cases)?;
        let new_cases = self.new_cases.checked_add(delta)?;
        self.total_cases = total_cases;
        self.new_cases = new_cases;
        self.estimates = EstimatedMetrics::from_totals(total_cases, new_cases);
        Some(())
    }

    pub fn to_record(&self) -> CountryRecord {
        CountryRecord {
            country: self.country.clone(),
            total_cases: self.total_cases,
            new_cases: self.new_cases,
            total_deaths: self.estimates.total_deaths,
            new_deaths: self.estimates.new_deaths,
            total_recovered: self.estimates.total_recovered,
            active_cases: self.estimates.active_cases,
            critical_cases: self.estimates.critical_cases,
            last_updated: self.last_updated.clone(),
        }
    }
}

/// Normalized country-level summary (one per country).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country: String,
    pub total_cases: i64,
    pub new_cases: i64,
    pub total_deaths: i64,
    pub new_deaths: i64,
    pub total_recovered: i64,
    pub active_cases: i64,
    pub critical_cases: i64,
    pub last_updated: String,
}

/// Worldwide roll-up of every country record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_cases: i64,
    pub total_deaths: i64,
    pub total_recovered: i64,
    pub active_cases: i64,
    pub critical_cases: i64,
    pub affected_countries: usize,
    pub last_updated: String,
}

/// Where and how to read the source table.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub source: PathBuf,
    pub delimiter: Delimiter,
    pub cell_policy: CellPolicy,
}

impl IngestConfig {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            delimiter: Delimiter::default(),
            cell_policy: CellPolicy::default(),
        }
    }
}
