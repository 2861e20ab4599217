//! Query execution for the report.
//!
//! Isolates catalog execution from the presentation layer.

pub mod executor;

pub use executor::{QueryExecutor, QueryOutcome};
