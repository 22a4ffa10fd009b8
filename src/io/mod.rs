//! Input/output helpers.
//!
//! - case table ingest + aggregation (`ingest`)
//! - record exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
