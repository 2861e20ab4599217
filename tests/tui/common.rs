//! Common test utilities for TUI tests.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Returns the path to the compras binary built by `cargo test`.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_compras"))
}

/// Path of the bundled data script.
pub fn data_path() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data/contratos.sql")
        .display()
        .to_string()
}

/// Path of a config file that does not exist, so every run uses defaults.
pub fn no_config_path() -> String {
    std::env::temp_dir()
        .join("compras-report-tests-no-config.toml")
        .display()
        .to_string()
}

/// Runs compras in headless mode with the given arguments.
///
/// The config file is pinned to a missing path so the developer's own
/// configuration never leaks into the run.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    run_headless_in(Path::new(env!("CARGO_MANIFEST_DIR")), args)
}

/// Runs compras in headless mode from `dir` as the working directory.
pub fn run_headless_in(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let config = no_config_path();
    let output = Command::new(binary_path())
        .current_dir(dir)
        .args(["--config", &config])
        .args(args)
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs compras headless against the bundled data with the given events.
pub fn run_events(events: &str, output: &str) -> (i32, String, String) {
    let data = data_path();
    run_headless(&[
        "--headless",
        "--data",
        &data,
        "--events",
        events,
        "--output",
        output,
    ])
}
