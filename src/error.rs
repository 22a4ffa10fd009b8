use thiserror::Error;

/// Error surfaced to the `outbreak` binary.
///
/// Exit codes:
/// - `2`: the source could not be read (missing file, unreadable header, bad config)
/// - `3`: nothing to report (empty ingest, unknown country)
/// - `4`: an output could not be written
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a single data row was rejected.
///
/// These never abort an ingest; they are collected into `RowError`s and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("{0}")]
    Csv(String),

    #[error("missing required value: `Country/Region`")]
    MissingCountry,

    #[error("missing cell for date column `{column}`")]
    MissingCell { column: String },

    #[error("invalid count '{value}' in column `{column}`")]
    InvalidCount { column: String, value: String },

    #[error("count in column `{column}` overflows a 64-bit total")]
    Overflow { column: String },
}

impl RowIssue {
    /// Attach the column name to an issue raised by a column-agnostic parser.
    pub fn in_column(self, column: &str) -> Self {
        match self {
            RowIssue::InvalidCount { value, .. } => RowIssue::InvalidCount {
                column: column.to_string(),
                value,
            },
            RowIssue::MissingCell { .. } => RowIssue::MissingCell {
                column: column.to_string(),
            },
            RowIssue::Overflow { .. } => RowIssue::Overflow {
                column: column.to_string(),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_issue_messages_name_the_column() {
        let issue = RowIssue::InvalidCount {
            column: String::new(),
            value: "abc".to_string(),
        }
        .in_column("1/23/20");
        assert_eq!(issue.to_string(), "invalid count 'abc' in column `1/23/20`");
    }

    #[test]
    fn csv_issue_does_not_repeat_prefix() {
        let issue = RowIssue::Csv("CSV parse error: record 2 (line 3, byte 40): invalid utf-8".to_string());
        assert_eq!(issue.to_string(), "CSV parse error: record 2 (line 3, byte 40): invalid utf-8");
    }

    #[test]
    fn app_error_keeps_exit_code() {
        let err = AppError::new(3, "nothing parsed");
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "nothing parsed");
    }
}
