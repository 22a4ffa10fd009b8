//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments and resolves the source
//! - runs the ingest pipeline
//! - prints reports and writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, CountriesArgs, CountryArgs, ExportArgs, SourceArgs, SummaryArgs};
use crate::domain::{CellPolicy, IngestConfig};
use crate::error::AppError;
use crate::report::InsightContext;

pub mod pipeline;

/// Environment variable naming the default case table.
pub const DATA_FILE_ENV: &str = "OUTBREAK_DATA_FILE";

/// Entry point for the `outbreak` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Countries(args) => handle_countries(args),
        Command::Country(args) => handle_country(args),
        Command::Export(args) => handle_export(args),
    }
}

fn init_logging() {
    // Logs go to stderr so report output on stdout stays pipeable.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = ingest_config_from_args(&args.source)?;
    let run = pipeline::run_ingest(&config)?;

    println!("{}", crate::report::format_ingest_summary(&run.ingest));
    println!("{}", crate::report::format_global(&run.global));

    if args.top > 0 && !run.ingest.is_empty() {
        let top = crate::report::rank_by_total_cases(&run.ingest.records, args.top);
        println!("Top {} by total cases:", top.len());
        println!("{}", crate::report::format_country_table(&top));
    }
    Ok(())
}

fn handle_countries(args: CountriesArgs) -> Result<(), AppError> {
    let config = ingest_config_from_args(&args.source)?;
    let run = pipeline::run_ingest(&config)?;

    let sorted = run.catalog.sorted_by_name();
    let limit = args.limit.unwrap_or(sorted.len());
    println!("{}", crate::report::format_country_table(sorted.into_iter().take(limit)));
    Ok(())
}

fn handle_country(args: CountryArgs) -> Result<(), AppError> {
    let config = ingest_config_from_args(&args.source)?;
    let run = pipeline::run_ingest(&config)?;

    let record = run
        .catalog
        .find_ignore_case(&args.name)
        .ok_or_else(|| AppError::new(3, format!("No data for country '{}'.", args.name)))?;
    let ctx = InsightContext::from_record(record);

    if args.json {
        let json = serde_json::to_string_pretty(&ctx)
            .map_err(|e| AppError::new(4, format!("Failed to serialize insight context: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_country_detail(&ctx));
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.json.is_none() && args.csv.is_none() {
        return Err(AppError::new(2, "Nothing to export: pass --json and/or --csv."));
    }

    let config = ingest_config_from_args(&args.source)?;
    let run = pipeline::run_ingest(&config)?;

    // Leave any previous export untouched rather than overwrite it with nothing.
    if run.ingest.is_empty() {
        return Err(AppError::new(3, "Source contained no valid country rows; nothing exported."));
    }

    if let Some(path) = &args.json {
        crate::io::export::write_records_json(path, &run.ingest.records)?;
        info!(path = %path.display(), countries = run.ingest.records.len(), "wrote JSON export");
    }
    if let Some(path) = &args.csv {
        crate::io::export::write_records_csv(path, &run.ingest.records)?;
        info!(path = %path.display(), countries = run.ingest.records.len(), "wrote CSV export");
    }
    Ok(())
}

/// Resolve the CLI source flags (plus `OUTBREAK_DATA_FILE`) into an ingest config.
pub fn ingest_config_from_args(args: &SourceArgs) -> Result<IngestConfig, AppError> {
    let env_file = std::env::var(DATA_FILE_ENV).ok();
    let source = resolve_source(args.file.clone(), env_file)?;

    Ok(IngestConfig {
        source,
        delimiter: args.delimiter,
        cell_policy: if args.lenient_cells {
            CellPolicy::Lenient
        } else {
            CellPolicy::Strict
        },
    })
}

/// `--file` wins over the environment; one of them is required.
fn resolve_source(flag: Option<PathBuf>, env_value: Option<String>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("No case table given: pass --file or set {DATA_FILE_ENV} (environment or .env)."),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let path = resolve_source(Some(PathBuf::from("a.tsv")), Some("b.tsv".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("a.tsv"));
    }

    #[test]
    fn environment_is_the_fallback() {
        let path = resolve_source(None, Some(" data/cases.tsv ".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("data/cases.tsv"));
    }

    #[test]
    fn missing_source_is_a_config_error() {
        let err = resolve_source(None, Some("  ".to_string())).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(resolve_source(None, None).is_err());
    }
}
