//! Formatting of headless run results as text, JSON or frames.

use super::{HeadlessResult, HeadlessState, Snapshot};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Renders a ratatui buffer as plain text.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// One line per buffer row with trailing blanks and trailing empty rows
    /// removed. The text always ends with a newline.
    pub fn render(buffer: &Buffer) -> String {
        let width = usize::from(buffer.area.width).max(1);
        let mut lines: Vec<String> = buffer
            .content()
            .chunks(width)
            .map(|row| {
                let line: String = row.iter().map(|cell| cell.symbol()).collect();
                line.trim_end().to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        format!("{}\n", lines.join("\n"))
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    screen_lines: Vec<&'a str>,
    state: &'a HeadlessState,
    snapshots: Vec<JsonSnapshot<'a>>,
    events_executed: usize,
    duration_ms: u128,
    assertions: Assertions,
}

#[derive(Serialize)]
struct JsonSnapshot<'a> {
    name: &'a str,
    screen_lines: Vec<&'a str>,
}

#[derive(Serialize)]
struct Assertions {
    passed: usize,
    failed: usize,
}

/// Formats a headless run result.
pub fn format_result(result: &HeadlessResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text(result),
        OutputFormat::Json => json(result),
        OutputFormat::Frames => frames(result),
    }
}

fn text(result: &HeadlessResult) -> String {
    let mut out: String = result.snapshots.iter().map(snapshot_block).collect();
    out.push_str(&result.screen);
    out.push('\n');
    out.push_str(&report_line(&result.state));
    out.push_str(&run_line(result));
    out
}

fn json(result: &HeadlessResult) -> String {
    let report = JsonReport {
        screen_lines: result.screen.lines().collect(),
        state: &result.state,
        snapshots: result
            .snapshots
            .iter()
            .map(|s| JsonSnapshot {
                name: &s.name,
                screen_lines: s.screen.lines().collect(),
            })
            .collect(),
        events_executed: result.events_executed,
        duration_ms: result.duration.as_millis(),
        assertions: Assertions {
            passed: result.assertions_passed,
            failed: result.assertions_failed,
        },
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => json + "\n",
        Err(e) => format!("{{\"error\": \"Failed to serialize: {e}\"}}\n"),
    }
}

fn frames(result: &HeadlessResult) -> String {
    let mut out: String = result
        .frames
        .iter()
        .map(|frame| {
            format!(
                "=== FRAME {} ({}) ===\n{}\n",
                frame.number,
                frame.event.as_deref().unwrap_or("initial"),
                frame.screen
            )
        })
        .collect();
    out.push_str(&format!("Total: {} frames\n", result.frames.len()));
    out.push_str(&run_line(result));
    out
}

fn snapshot_block(snapshot: &Snapshot) -> String {
    format!("=== SNAPSHOT {} ===\n{}\n", snapshot.name, snapshot.screen)
}

/// `Report: ResultsShown | query 10 | 20 rows | chart 5 bars`
fn report_line(state: &HeadlessState) -> String {
    let mut line = format!("Report: {} | query {}", state.state, state.selected);
    if state.result.is_some() {
        line.push_str(&format!(" | {} rows", state.result_rows));
    }
    if state.chart_bars > 0 {
        line.push_str(&format!(" | chart {} bars", state.chart_bars));
    }
    if !state.queries_enabled {
        line.push_str(" | queries disabled");
    }
    line.push('\n');
    line
}

fn run_line(result: &HeadlessResult) -> String {
    let mut line = format!(
        "Events: {} executed in {}ms",
        result.events_executed,
        result.duration.as_millis()
    );
    if result.assertions_passed + result.assertions_failed > 0 {
        line.push_str(&format!(
            " | Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        ));
    }
    line.push('\n');
    line
}
