//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input conventions (`Delimiter`, `CellPolicy`, `IngestConfig`)
//! - header classification results (`DateColumn`, `DateWindow`)
//! - per-row and per-country data (`RawRow`, `CountryAccumulator`, `CountryRecord`)
//! - the worldwide roll-up (`GlobalStats`)

pub mod types;

pub use types::*;
