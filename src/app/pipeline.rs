//! Shared ingest pipeline used by every subcommand.
//!
//! source -> header classification -> row aggregation -> estimates -> catalog + roll-up
//!
//! The subcommands can then focus on presentation.

use chrono::Utc;

use crate::catalog::CountryCatalog;
use crate::domain::{GlobalStats, IngestConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestReport, load_country_records};

/// All computed outputs of a single ingest run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestReport,
    pub catalog: CountryCatalog,
    pub global: GlobalStats,
}

/// Read the configured source and build the catalog and worldwide totals.
///
/// An empty ingest is not an error; `catalog` is then empty too.
pub fn run_ingest(config: &IngestConfig) -> Result<RunOutput, AppError> {
    let ingest = load_country_records(config)?;

    let mut catalog = CountryCatalog::new();
    catalog.refresh(&ingest);

    let global = GlobalStats::from_records(&ingest.records, Utc::now());

    Ok(RunOutput {
        ingest,
        catalog,
        global,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_builds_catalog_and_totals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.tsv");
        std::fs::write(
            &path,
            "Province/State\tCountry/Region\tLat\tLong\t1/22/20\t1/23/20\n\
             A\tUSA\t0\t0\t80\t100\n\
             B\tUSA\t0\t0\t40\t50\n\
             \tCanada\t0\t0\t10\t12\n",
        )
        .unwrap();

        let run = run_ingest(&IngestConfig::new(&path)).unwrap();
        assert_eq!(run.catalog.len(), 2);
        assert_eq!(run.global.total_cases, 162);
        assert_eq!(run.global.affected_countries, 2);
        assert_eq!(run.catalog.find_ignore_case("usa").unwrap().new_cases, 30);
    }

    #[test]
    fn empty_source_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.tsv");
        std::fs::write(&path, "Province/State\tCountry/Region\tLat\tLong\t1/22/20\n").unwrap();

        let run = run_ingest(&IngestConfig::new(&path)).unwrap();
        assert!(run.catalog.is_empty());
        assert_eq!(run.global.total_cases, 0);
    }
}
