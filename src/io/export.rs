//! Export country records to JSON or CSV.
//!
//! JSON uses the camelCase field names downstream consumers expect; the CSV is
//! meant to be easy to open in spreadsheets.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::CountryRecord;
use crate::error::AppError;

const CSV_HEADER: [&str; 9] = [
    "country",
    "total_cases",
    "new_cases",
    "total_deaths",
    "new_deaths",
    "total_recovered",
    "active_cases",
    "critical_cases",
    "last_updated",
];

/// Write records as a pretty-printed JSON array.
pub fn write_records_json(path: &Path, records: &[CountryRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

/// Write records to a CSV file, one line per country.
pub fn write_records_csv(path: &Path, records: &[CountryRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(BufWriter::new(file));

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        writer
            .write_record([
                r.country.clone(),
                r.total_cases.to_string(),
                r.new_cases.to_string(),
                r.total_deaths.to_string(),
                r.new_deaths.to_string(),
                r.total_recovered.to_string(),
                r.active_cases.to_string(),
                r.critical_cases.to_string(),
                r.last_updated.clone(),
            ])
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountryAccumulator;

    fn records() -> Vec<CountryRecord> {
        vec![
            CountryAccumulator::new("Korea, South", 1200, 200, "1/23/20").to_record(),
            CountryAccumulator::new("Peru", 50, 5, "1/23/20").to_record(),
        ]
    }

    #[test]
    fn csv_export_quotes_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_records_csv(&path, &records()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("country,total_cases"));
        assert_eq!(lines[1], "\"Korea, South\",1200,200,24,4,1080,96,12,1/23/20");
        assert_eq!(lines[2], "Peru,50,5,1,0,45,4,0,1/23/20");
    }

    #[test]
    fn csv_export_reads_back_names_with_line_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let odd = CountryAccumulator::new("Line\r\nBreak \"Land\"", 7, 1, "1/23/20").to_record();
        write_records_csv(&path, &[odd]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Line\r\nBreak \"Land\"");
        assert_eq!(&rows[0][1], "7");
    }

    #[test]
    fn json_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records_json(&path, &records()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<CountryRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, records());
        assert!(text.contains("\"totalRecovered\""));
    }

    #[test]
    fn unwritable_path_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_records_csv(&path, &records()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
