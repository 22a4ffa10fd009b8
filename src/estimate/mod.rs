//! Estimated secondary metrics.
//!
//! The source only reports cumulative confirmed cases, so deaths, recoveries,
//! active and critical cases are derived from fixed ratios. Estimates are pure
//! functions of the current totals.

pub mod ratios;

pub use ratios::*;
