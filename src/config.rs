//! Configuration management for the report.
//!
//! Handles loading configuration from TOML files, with the data script
//! resolved as CLI flag, then config file, then `data/contratos.sql` in the
//! working directory, then the copy compiled into the binary.

use crate::chart::MIN_CHART_ROWS;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Script looked up in the working directory when neither the CLI nor the
/// config file names one.
pub const DEFAULT_DATA_PATH: &str = "data/contratos.sql";

/// Where the data script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    /// The script compiled into the binary.
    Bundled,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Bundled => f.write_str("bundled data script"),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Report contents.
    #[serde(default)]
    pub report: ReportConfig,

    /// Initial chart controls.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Report contents configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Path to the data script.
    pub data: Option<PathBuf>,

    /// Names listed in the "Membros" section; the section is hidden when empty.
    #[serde(default)]
    pub members: Vec<String>,
}

/// Initial state of the chart controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Whether the chart toggle starts on.
    #[serde(default)]
    pub show: bool,

    /// Initial row cap, clamped per result.
    #[serde(default = "default_rows")]
    pub rows: usize,
}

fn default_rows() -> usize {
    MIN_CHART_ROWS
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            show: false,
            rows: default_rows(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("compras-report")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ReportError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Resolves the data script, preferring the CLI value.
    ///
    /// An explicit path is used as given even when missing, so a typo
    /// surfaces as a load failure instead of silently loading other data.
    pub fn data_source(&self, cli: Option<&Path>) -> DataSource {
        if let Some(path) = cli.map(Path::to_path_buf).or_else(|| self.report.data.clone()) {
            return DataSource::File(path);
        }

        let local = Path::new(DEFAULT_DATA_PATH);
        if local.is_file() {
            DataSource::File(local.to_path_buf())
        } else {
            DataSource::Bundled
        }
    }
}
