//! In-process country catalog.
//!
//! Stands in for the storage collaborator: records are upserted by exact country
//! name, lookups can be exact or case-insensitive, and listings are sorted by name.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::CountryRecord;
use crate::io::ingest::IngestReport;

#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    records: BTreeMap<String, CountryRecord>,
}

impl CountryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert or replace each record by country name. Returns the number written.
    pub fn upsert_all<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = CountryRecord>,
    {
        let mut written = 0usize;
        for record in records {
            self.records.insert(record.country.clone(), record);
            written += 1;
        }
        written
    }

    /// Load a fresh ingest; an empty ingest leaves the current contents alone.
    pub fn refresh(&mut self, report: &IngestReport) -> usize {
        if report.is_empty() {
            warn!("source contained no valid country rows; keeping existing catalog");
            return 0;
        }
        let written = self.upsert_all(report.records.iter().cloned());
        info!(written, total = self.len(), "catalog refreshed");
        written
    }

    pub fn find_exact(&self, country: &str) -> Option<&CountryRecord> {
        self.records.get(country)
    }

    /// Exact match first, then the first name (in sorted order) equal ignoring case.
    pub fn find_ignore_case(&self, country: &str) -> Option<&CountryRecord> {
        let country = country.trim();
        self.find_exact(country).or_else(|| {
            self.records
                .values()
                .find(|r| r.country.to_lowercase() == country.to_lowercase())
        })
    }

    /// Catalog view sorted by country name.
    pub fn sorted_by_name(&self) -> Vec<&CountryRecord> {
        self.records.values().collect()
    }
}
