//! compras-report - a terminal report over the Compras.gov.br Contratos data set.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod catalog;
pub mod chart;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod tui;
