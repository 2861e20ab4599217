//! TUI widgets for the report.
//!
//! Contains reusable UI components.

pub mod catalog;
pub mod chart;
pub mod header;
pub mod table;
