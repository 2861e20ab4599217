//! Headless mode for scripted testing and automation.
//!
//! Runs the report UI against an off-screen buffer, executing scripted
//! events and capturing output for verification.

mod events;
mod output;

pub use events::{parse_script, parse_step, Action, Check, Comparison, StateField, Step};
pub use output::{format_result, ScreenRenderer};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::db::DatabaseClient;
use crate::error::{ReportError, Result};
use crate::tui::app::{App, ViewState};
use crate::tui::{ui, AppAction};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    pub output_format: OutputFormat,
    /// Whether to stop on first assertion failure.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl HeadlessConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let (width, height) = cli.size;
        Self {
            width,
            height,
            output_format: cli.output,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        }
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen as text.
    pub screen: String,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Report state after the last event.
    pub state: HeadlessState,
    /// Screens recorded by `snapshot:<name>`, in script order.
    pub snapshots: Vec<Snapshot>,
    /// Screen after every event, for frames output.
    pub frames: Vec<Frame>,
}

/// A screen recorded under a name.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub name: String,
    pub screen: String,
}

/// Report state exposed to JSON output and state assertions.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessState {
    /// Menu number of the highlighted entry.
    pub selected: usize,
    /// View state name.
    pub state: String,
    pub show_chart: bool,
    /// Slider position of the shown result (0 without a result).
    pub chart_rows: usize,
    /// Bars the chart currently draws.
    pub chart_bars: usize,
    /// Rows in the shown result.
    pub result_rows: usize,
    pub queries_enabled: bool,
    pub running: bool,
    /// Error banner text, when a query failed.
    pub error: Option<String>,
    /// The shown result.
    pub result: Option<crate::db::QueryResult>,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        let view = app.result();
        Self {
            selected: app.selected_entry().number,
            state: app.view.name().to_string(),
            show_chart: app.show_chart,
            chart_rows: view.map(|v| v.rows.value()).unwrap_or(0),
            chart_bars: app.chart_bars(),
            result_rows: view.map(|v| v.outcome.result.row_count).unwrap_or(0),
            queries_enabled: app.queries_enabled(),
            running: app.running,
            error: match &app.view {
                ViewState::ErrorShown { message, .. } => Some(message.clone()),
                _ => None,
            },
            result: view.map(|v| v.outcome.result.clone()),
        }
    }

    /// Text form of a field, as compared by `assert:state:`.
    pub fn value(&self, field: StateField) -> String {
        match field {
            StateField::Selected => self.selected.to_string(),
            StateField::State => self.state.clone(),
            StateField::ShowChart => self.show_chart.to_string(),
            StateField::ChartRows => self.chart_rows.to_string(),
            StateField::ChartBars => self.chart_bars.to_string(),
            StateField::ResultRows => self.result_rows.to_string(),
            StateField::QueriesEnabled => self.queries_enabled.to_string(),
            StateField::Running => self.running.to_string(),
        }
    }
}

/// Screen after one step.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 0 is the screen before any step.
    pub number: usize,
    /// Source text of the step, None for the initial screen.
    pub event: Option<String>,
    pub screen: String,
}

/// Runs the report UI against an off-screen terminal.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    db: Option<Box<dyn DatabaseClient>>,
    steps: Vec<Step>,
}

impl HeadlessRunner {
    pub fn new(config: HeadlessConfig, app: App) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(config.width, config.height))
            .map_err(|e| ReportError::internal(format!("Failed to create test terminal: {e}")))?;

        Ok(Self {
            config,
            terminal,
            app,
            db: None,
            steps: Vec::new(),
        })
    }

    /// Sets the store queries run against.
    pub fn with_database(mut self, db: Box<dyn DatabaseClient>) -> Self {
        self.db = Some(db);
        self
    }

    /// Parses a comma- or newline-separated event list.
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.steps = parse_script(input)?;
        Ok(())
    }

    /// Reads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            std::io::read_to_string(std::io::stdin())
                .map_err(|e| ReportError::internal(format!("Failed to read stdin: {e}")))?
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| ReportError::internal(format!("Failed to read script file: {e}")))?
        };
        self.load_events(&content)
    }

    /// Executes every loaded step and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start = Instant::now();
        let keep_frames = self.config.output_format == OutputFormat::Frames;
        let mut frames = Vec::new();
        let mut snapshots = Vec::new();
        let (mut passed, mut failed, mut executed) = (0, 0, 0);

        if keep_frames {
            frames.push(Frame {
                number: 0,
                event: None,
                screen: self.screen()?,
            });
        }

        for step in std::mem::take(&mut self.steps) {
            debug!(step = %step.source, "Headless step");

            match step.action {
                Action::Key(key) => {
                    if self.app.handle_key(key) == AppAction::RunSelected {
                        self.run_selected().await;
                    }
                }
                Action::Select(number) => {
                    if self.app.queries_enabled() {
                        if !self.app.select(number) {
                            return Err(ReportError::config(format!(
                                "No catalog entry numbered {number}"
                            )));
                        }
                        self.run_selected().await;
                    }
                }
                Action::Wait(duration) => tokio::time::sleep(duration).await,
                Action::Resize(width, height) => {
                    self.terminal
                        .resize(Rect::new(0, 0, width, height))
                        .map_err(|e| ReportError::internal(format!("Resize failed: {e}")))?;
                }
                Action::Snapshot(name) => {
                    let screen = self.screen()?;
                    snapshots.push(Snapshot { name, screen });
                }
                Action::Assert(check) => {
                    let screen = self.screen()?;
                    if check.holds(&screen, &HeadlessState::from_app(&self.app)) {
                        passed += 1;
                    } else {
                        debug!(step = %step.source, "Assertion failed");
                        failed += 1;
                        if self.config.fail_fast {
                            break;
                        }
                    }
                }
            }
            executed += 1;

            if keep_frames {
                frames.push(Frame {
                    number: frames.len(),
                    event: Some(step.source),
                    screen: self.screen()?,
                });
            }

            if !self.app.running {
                break;
            }
        }

        let screen = self.screen()?;
        if let Some(db) = &self.db {
            db.close().await?;
        }

        Ok(HeadlessResult {
            screen,
            events_executed: executed,
            duration: start.elapsed(),
            assertions_passed: passed,
            assertions_failed: failed,
            state: HeadlessState::from_app(&self.app),
            snapshots,
            frames,
        })
    }

    async fn run_selected(&mut self) {
        if let Some(db) = self.db.as_deref() {
            self.app.run_selected(db).await;
        }
    }

    /// Lays the report out for the current terminal size, draws it and
    /// returns the screen text.
    fn screen(&mut self) -> Result<String> {
        let size = self
            .terminal
            .size()
            .map_err(|e| ReportError::internal(format!("Failed to read terminal size: {e}")))?;
        ui::fit(&mut self.app, Rect::new(0, 0, size.width, size.height));

        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| ReportError::internal(format!("Failed to render: {e}")))?;
        Ok(ScreenRenderer::render(self.terminal.backend().buffer()))
    }
}

/// Runs headless mode from CLI arguments and returns the exit code.
pub async fn run_headless(cli: &Cli, config: &Config) -> Result<i32> {
    cli.validate_headless().map_err(ReportError::config)?;
    let headless_config = HeadlessConfig::from_cli(cli);

    let (db, status) = crate::tui::load(&config.data_source(cli.data_path())).await;
    let mut runner = HeadlessRunner::new(headless_config.clone(), App::new(status, config))?;
    if let Some(db) = db {
        runner = runner.with_database(Box::new(db));
    }

    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(path) = &cli.script {
        runner.load_script(path)?;
    }

    let result = runner.run().await?;
    let text = format_result(&result, headless_config.output_format);

    match &headless_config.output_file {
        Some(path) => std::fs::write(path, &text)
            .map_err(|e| ReportError::internal(format!("Failed to write output file: {e}")))?,
        None => print!("{text}"),
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
