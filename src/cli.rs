//! Command-line argument parsing for the report.
//!
//! Every flag is optional; a bare invocation opens the report over the
//! bundled data script.

use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// What a headless run prints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Final screen followed by a run summary.
    #[default]
    Text,
    /// Screen lines, report state, snapshots and assertion counts as JSON.
    Json,
    /// Every screen the run went through, one per event.
    Frames,
}

/// Interactive report over Compras.gov.br contract data.
#[derive(Parser, Debug)]
#[command(name = "compras")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQL script that creates and fills the tables
    #[arg(long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// TOML file with report members and initial chart settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Drive the report from an event script against an off-screen terminal
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "select:10,key:c")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// File with one event per line ('-' reads stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "120x40", value_parser = parse_size)]
    pub size: (u16, u16),

    /// What the headless run prints
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Write the headless output here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop the event script at the first failed assertion
    #[arg(long)]
    pub fail_fast: bool,
}

/// Parses `WIDTHxHEIGHT`, e.g. `120x40`.
fn parse_size(value: &str) -> std::result::Result<(u16, u16), String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT (e.g., 120x40), got '{value}'"))?;
    let width = width
        .parse::<u16>()
        .map_err(|_| format!("invalid width '{width}'"))?;
    let height = height
        .parse::<u16>()
        .map_err(|_| format!("invalid height '{height}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("screen size must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// `--config`, else the platform config location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the data script given on the command line, if any.
    pub fn data_path(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// A headless run needs something to execute.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if self.headless && self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }
        Ok(())
    }
}
