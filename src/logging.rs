//! Tracing setup.
//!
//! The interactive report owns the terminal, so it logs to a file that is
//! truncated on every run. Headless runs log to stderr, leaving stdout to the
//! run output. `RUST_LOG` overrides the `info` default in both modes.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "compras.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs to [`log_path`]. Runs without logging if the file cannot be created.
pub fn init_file_logging() {
    let path = log_path();
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| File::create(&path));

    match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(file)
            .with_ansi(false)
            .init(),
        Err(e) => eprintln!("Warning: logging disabled, cannot open {}: {e}", path.display()),
    }
}

pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// `<state dir>/compras-report/compras.log`, falling back to the config dir
/// and then the temp dir on platforms without one.
pub fn log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("compras-report"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE)
}
