//! Command-line parsing for the outbreak case-table tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! ingest/aggregation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Delimiter;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "outbreak", version, about = "Country-level case summaries from a regional time-series table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the ingest summary, worldwide totals, and the largest countries.
    Summary(SummaryArgs),
    /// Print every country, sorted by name.
    Countries(CountriesArgs),
    /// Print one country (name matched case-insensitively).
    Country(CountryArgs),
    /// Write country records to JSON and/or CSV.
    Export(ExportArgs),
}

/// Where to read the case table from and how to parse it.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Case table path. Falls back to `OUTBREAK_DATA_FILE` (also read from `.env`).
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Field delimiter of the source table.
    #[arg(long, value_enum, default_value_t = Delimiter::Tab)]
    pub delimiter: Delimiter,

    /// Count unparseable cells as zero instead of skipping the row.
    #[arg(long)]
    pub lenient_cells: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show the top-N countries by total cases.
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CountriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Only print the first N countries (alphabetical).
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct CountryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Country name as it appears in the source (case-insensitive).
    pub name: String,

    /// Print the insight inputs as JSON instead of a text block.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Export records to a JSON array.
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Export records to CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}
