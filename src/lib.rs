//! `outbreak-ingest` library crate.
//!
//! Turns a wide-format regional time-series table of cumulative confirmed cases
//! into one normalized summary record per country.
//!
//! The binary (`outbreak`) is a thin wrapper around this library so that:
//!
//! - the ingest/aggregation core is testable without spawning processes
//! - storage, HTTP, and narrative services can consume the same records
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod catalog;
pub mod cli;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod io;
pub mod report;
