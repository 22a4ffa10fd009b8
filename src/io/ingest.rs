//! Wide-format case table ingest and per-country aggregation.
//!
//! This module turns a region-per-row, date-per-column table of cumulative
//! confirmed cases into one `CountryRecord` per country.
//!
//! Design goals:
//! - **Header-driven**: metadata columns are fixed, everything else is a date
//! - **Row-level resilience** (skip bad rows, but report what happened)
//! - **Streaming**: rows are folded as they are read, only accumulators are kept
//! - **Fresh state per call**: nothing survives between two ingests

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{
    CellPolicy, CountryAccumulator, CountryRecord, DateColumn, DateWindow, Delimiter, IngestConfig, RawRow,
    COUNTRY_COLUMN, RESERVED_COLUMNS,
};
use crate::error::{AppError, RowIssue};

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub country: Option<String>,
    pub issue: RowIssue,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.country {
            Some(country) => write!(f, "line {} ({country}): {}", self.line, self.issue),
            None => write!(f, "line {}: {}", self.line, self.issue),
        }
    }
}

/// Header row split into the country column and the ordered date columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    /// Normalized header names, in source order.
    pub headers: Vec<String>,
    pub country_index: Option<usize>,
    pub date_columns: Vec<DateColumn>,
}

impl HeaderLayout {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| normalize_header_name(h.as_ref()))
            .collect();

        let country_index = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(COUNTRY_COLUMN));

        let date_columns = date_column_positions(&headers)
            .map(|index| DateColumn {
                index,
                label: headers[index].clone(),
            })
            .collect();

        Self {
            headers,
            country_index,
            date_columns,
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::from_columns(&self.date_columns)
    }

    /// Pair a data record with the header names.
    pub fn raw_row(&self, line: usize, record: &StringRecord) -> RawRow {
        RawRow {
            line,
            cells: self
                .headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect(),
        }
    }
}

/// Header names that are reporting dates, in source order.
///
/// Exactly the four metadata names are dropped (case-insensitive); everything
/// else is kept as-is.
pub fn classify_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    date_column_positions(headers)
        .map(|index| AsRef::<str>::as_ref(&headers[index]).to_string())
        .collect()
}

fn date_column_positions<S: AsRef<str>>(headers: &[S]) -> impl Iterator<Item = usize> + '_ {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !is_reserved(AsRef::<str>::as_ref(*h).trim()))
        .map(|(index, _)| index)
}

fn is_reserved(name: &str) -> bool {
    RESERVED_COLUMNS
        .iter()
        .any(|reserved| name.eq_ignore_ascii_case(reserved))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Lenient count coercion: blank, `N/A`, or unparseable input is `0`.
pub fn parse_count(value: &str) -> i64 {
    parse_cell(value).unwrap_or(0)
}

/// Strict count coercion.
///
/// Blank and `N/A` (any case) are `0`; thousands separators are stripped.
/// Anything that still is not an integer is an `InvalidCount` (the column name is
/// filled in by the caller).
pub fn parse_cell(value: &str) -> Result<i64, RowIssue> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("N/A") {
        return Ok(0);
    }
    trimmed
        .replace(',', "")
        .trim()
        .parse::<i64>()
        .map_err(|_| RowIssue::InvalidCount {
            column: String::new(),
            value: trimmed.to_string(),
        })
}

/// Keyed table of per-country accumulators for one ingest pass.
///
/// Countries keep the order in which they were first seen.
#[derive(Debug, Clone)]
pub struct CountryAggregator {
    window: DateWindow,
    cell_policy: CellPolicy,
    index: HashMap<String, usize>,
    accumulators: Vec<CountryAccumulator>,
}

/// Result of folding a whole row sequence.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub records: Vec<CountryRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl CountryAggregator {
    pub fn new(window: DateWindow, cell_policy: CellPolicy) -> Self {
        Self {
            window,
            cell_policy,
            index: HashMap::new(),
            accumulators: Vec::new(),
        }
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    pub fn get(&self, country: &str) -> Option<&CountryAccumulator> {
        self.index.get(country).map(|&i| &self.accumulators[i])
    }

    /// Fold one region row into its country.
    ///
    /// A rejected row leaves every accumulator untouched.
    pub fn fold_row(&mut self, row: &RawRow) -> Result<(), RowError> {
        let country = row
            .get(COUNTRY_COLUMN)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RowError {
                line: row.line,
                country: None,
                issue: RowIssue::MissingCountry,
            })?;

        let reject = |issue: RowIssue| RowError {
            line: row.line,
            country: Some(country.to_string()),
            issue,
        };

        let latest_cases = self.read_count(row, self.window.latest.as_ref()).map_err(reject)?;
        let previous_cases = self.read_count(row, self.window.previous.as_ref()).map_err(reject)?;
        let overflow = || {
            reject(RowIssue::Overflow {
                column: self.window.last_updated_label().to_string(),
            })
        };
        let delta = latest_cases.checked_sub(previous_cases).ok_or_else(overflow)?;

        match self.index.get(country) {
            Some(&i) => self.accumulators[i]
                .add_region(latest_cases, delta)
                .ok_or_else(overflow)?,
            None => {
                let acc = CountryAccumulator::new(country, latest_cases, delta, self.window.last_updated_label());
                self.index.insert(acc.country.clone(), self.accumulators.len());
                self.accumulators.push(acc);
            }
        }
        Ok(())
    }

    fn read_count(&self, row: &RawRow, column: Option<&DateColumn>) -> Result<i64, RowIssue> {
        let Some(column) = column else { return Ok(0) };
        let cell = row.date_cell(column).ok_or_else(|| RowIssue::MissingCell {
            column: column.label.clone(),
        })?;
        match self.cell_policy {
            CellPolicy::Strict => parse_cell(cell).map_err(|e| e.in_column(&column.label)),
            CellPolicy::Lenient => Ok(parse_count(cell)),
        }
    }

    /// Fold every row, skipping (and logging) the malformed ones.
    pub fn aggregate<I>(mut self, rows: I) -> AggregateOutcome
    where
        I: IntoIterator<Item = Result<RawRow, RowError>>,
    {
        let mut row_errors = Vec::new();
        let mut rows_read = 0usize;

        for row in rows {
            rows_read += 1;
            if let Err(err) = row.and_then(|r| self.fold_row(&r)) {
                warn!(line = err.line, country = err.country.as_deref(), "skipping malformed row: {}", err.issue);
                row_errors.push(err);
            }
        }

        AggregateOutcome {
            records: self.finish(),
            row_errors,
            rows_read,
        }
    }

    /// One record per country, in first-seen order.
    pub fn finish(self) -> Vec<CountryRecord> {
        self.accumulators.iter().map(CountryAccumulator::to_record).collect()
    }
}

/// Ingest output: country records + the window used + row errors.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub records: Vec<CountryRecord>,
    pub window: DateWindow,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestReport {
    pub fn rows_skipped(&self) -> usize {
        self.row_errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Open the configured source and ingest it.
pub fn load_country_records(config: &IngestConfig) -> Result<IngestReport, AppError> {
    let file = File::open(&config.source).map_err(|e| {
        AppError::new(
            2,
            format!("Could not read source '{}': {e}", config.source.display()),
        )
    })?;

    info!(source = %config.source.display(), "parsing case table");
    parse_country_records(file, config.delimiter, config.cell_policy)
}

/// Ingest an already-opened table.
///
/// Only an unreadable header is fatal. An empty result is returned as-is.
pub fn parse_country_records<R: Read>(
    source: R,
    delimiter: Delimiter,
    cell_policy: CellPolicy,
) -> Result<IngestReport, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Could not read source header: {e}")))?
        .clone();

    let layout = HeaderLayout::from_headers(&headers.iter().collect::<Vec<_>>());
    if layout.country_index.is_none() && !layout.headers.is_empty() {
        warn!("header has no `{COUNTRY_COLUMN}` column; every row will be skipped");
    }

    let window = layout.window();
    debug!(
        date_columns = layout.date_columns.len(),
        latest = window.latest.as_ref().map(|c| c.label.as_str()),
        previous = window.previous.as_ref().map(|c| c.label.as_str()),
        "selected date window"
    );

    let rows = reader.records().enumerate().map(|(idx, result)| {
        // +2 because:
        // - records() starts at line 1 after headers
        // - lines are 1-based
        let line = idx + 2;
        result
            .map(|record| layout.raw_row(line, &record))
            .map_err(|e| RowError {
                line,
                country: None,
                issue: RowIssue::Csv(e.to_string()),
            })
    });

    let outcome = CountryAggregator::new(window.clone(), cell_policy).aggregate(rows);
    let rows_used = outcome.rows_read - outcome.row_errors.len();

    info!(
        countries = outcome.records.len(),
        rows_read = outcome.rows_read,
        rows_skipped = outcome.row_errors.len(),
        "parsed country records"
    );

    Ok(IngestReport {
        records: outcome.records,
        window,
        row_errors: outcome.row_errors,
        rows_read: outcome.rows_read,
        rows_used,
    })
}
