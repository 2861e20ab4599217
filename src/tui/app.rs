//! Application state for the TUI.
//!
//! Holds the catalog selection, the chart controls and the view state
//! machine: `Idle → Executing → ResultsShown | ErrorShown`.

use crate::catalog::{self, CatalogEntry};
use crate::chart::{BarChart, RowCap, MAX_CHART_ROWS};
use crate::config::Config;
use crate::db::{DatabaseClient, TableSummary};
use crate::error::Result;
use crate::query::{QueryExecutor, QueryOutcome};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use super::events::Event;

/// Rows moved by one PgUp/PgDn press.
const SCROLL_PAGE: usize = 10;

/// Outcome of loading the data script.
#[derive(Debug, Clone)]
pub enum LoadStatus {
    /// The store is ready; one summary per table.
    Loaded(Vec<TableSummary>),
    /// The script could not be loaded; querying is disabled.
    Failed(String),
}

/// A result on screen, with its own chart slider and scroll offset.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub entry: &'static CatalogEntry,
    pub outcome: QueryOutcome,
    pub rows: RowCap,
    pub scroll: usize,
}

impl ResultView {
    fn new(
        entry: &'static CatalogEntry,
        outcome: QueryOutcome,
        preferred_rows: usize,
        capacity: usize,
    ) -> Self {
        let mut rows = RowCap::with_value(outcome.result.row_count, preferred_rows);
        rows.fit(capacity);
        Self {
            entry,
            outcome,
            rows,
            scroll: 0,
        }
    }
}

/// Presentation state machine.
#[derive(Debug, Clone, Default)]
pub enum ViewState {
    /// Nothing selected yet.
    #[default]
    Idle,
    /// A query is running.
    Executing {
        entry: &'static CatalogEntry,
        previous: Option<ResultView>,
    },
    /// The latest query succeeded.
    ResultsShown(ResultView),
    /// The latest query failed; the last good result stays under the banner.
    ErrorShown {
        message: String,
        previous: Option<ResultView>,
    },
}

impl ViewState {
    /// Short state name, as exposed to headless assertions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Executing { .. } => "Executing",
            Self::ResultsShown(_) => "ResultsShown",
            Self::ErrorShown { .. } => "ErrorShown",
        }
    }

    /// The result currently on screen, if any.
    pub fn result(&self) -> Option<&ResultView> {
        match self {
            Self::Idle => None,
            Self::ResultsShown(view) => Some(view),
            Self::Executing { previous, .. } | Self::ErrorShown { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    fn result_mut(&mut self) -> Option<&mut ResultView> {
        match self {
            Self::Idle => None,
            Self::ResultsShown(view) => Some(view),
            Self::Executing { previous, .. } | Self::ErrorShown { previous, .. } => {
                previous.as_mut()
            }
        }
    }

    fn into_result(self) -> Option<ResultView> {
        match self {
            Self::Idle => None,
            Self::ResultsShown(view) => Some(view),
            Self::Executing { previous, .. } | Self::ErrorShown { previous, .. } => previous,
        }
    }
}

/// What the event loop must do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    /// Run the selected catalog entry.
    RunSelected,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Index of the highlighted catalog entry.
    pub selected: usize,
    /// Chart toggle.
    pub show_chart: bool,
    /// Row cap applied to the next result; follows the slider.
    pub preferred_rows: usize,
    pub load: LoadStatus,
    /// Names for the "Membros" section.
    pub members: Vec<String>,
    pub view: ViewState,
    /// Bars the current screen layout can draw.
    chart_capacity: usize,
}

impl App {
    /// Creates a new App instance.
    pub fn new(load: LoadStatus, config: &Config) -> Self {
        Self {
            running: true,
            selected: 0,
            show_chart: config.chart.show,
            preferred_rows: config.chart.rows,
            load,
            members: config.report.members.clone(),
            view: ViewState::default(),
            chart_capacity: MAX_CHART_ROWS,
        }
    }

    /// Returns true if the data script loaded and queries may run.
    pub fn queries_enabled(&self) -> bool {
        matches!(self.load, LoadStatus::Loaded(_))
    }

    /// The highlighted catalog entry.
    pub fn selected_entry(&self) -> &'static CatalogEntry {
        let entries = catalog::entries();
        &entries[self.selected.min(entries.len() - 1)]
    }

    /// Highlights the entry with the given menu number.
    pub fn select(&mut self, number: usize) -> bool {
        match catalog::entries().iter().position(|e| e.number == number) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// The result currently on screen, if any.
    pub fn result(&self) -> Option<&ResultView> {
        self.view.result()
    }

    /// Returns true if the toggle is on and the shown result is chart-eligible
    /// and has rows.
    pub fn chart_visible(&self) -> bool {
        self.show_chart
            && self
                .result()
                .is_some_and(|view| view.entry.has_chart() && !view.outcome.result.is_empty())
    }

    /// Bounds the slider by the bars the screen can draw. The slider value
    /// follows `preferred_rows` back up when room returns.
    pub fn fit_chart(&mut self, capacity: usize) {
        self.chart_capacity = capacity;
        let preferred = self.preferred_rows;
        if let Some(view) = self.view.result_mut() {
            let mut rows = RowCap::with_value(view.outcome.result.row_count, preferred);
            rows.fit(capacity);
            view.rows = rows;
        }
    }

    /// Builds the chart for the shown result, if one should be drawn.
    pub fn chart(&self) -> Option<Result<BarChart>> {
        if !self.chart_visible() {
            return None;
        }
        let view = self.result()?;
        let spec = view.entry.chart.as_ref()?;
        Some(BarChart::build(
            &view.outcome.result,
            spec,
            view.rows.value(),
        ))
    }

    /// Number of bars the chart would draw right now.
    pub fn chart_bars(&self) -> usize {
        match self.chart() {
            Some(Ok(chart)) => chart.len(),
            _ => 0,
        }
    }

    /// Handles a terminal event.
    pub fn handle_event(&mut self, event: Event) -> AppAction {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize => AppAction::None,
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return AppAction::None;
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                return AppAction::None;
            }
            _ => {}
        }

        if !self.queries_enabled() {
            return AppAction::None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(catalog::entries().len() - 1);
            }
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = catalog::entries().len() - 1,
            KeyCode::Enter => return AppAction::RunSelected,
            KeyCode::Char('c') => self.show_chart = !self.show_chart,
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => self.step_rows(true),
            KeyCode::Left | KeyCode::Char('-') => self.step_rows(false),
            KeyCode::PageDown => self.scroll(true),
            KeyCode::PageUp => self.scroll(false),
            _ => {}
        }

        AppAction::None
    }

    fn step_rows(&mut self, up: bool) {
        if !self.chart_visible() {
            return;
        }
        if let Some(view) = self.view.result_mut() {
            let moved = if up {
                view.rows.increment()
            } else {
                view.rows.decrement()
            };
            if moved {
                self.preferred_rows = view.rows.value();
            }
        }
    }

    fn scroll(&mut self, down: bool) {
        if let Some(view) = self.view.result_mut() {
            let last = view.outcome.result.row_count.saturating_sub(1);
            view.scroll = if down {
                (view.scroll + SCROLL_PAGE).min(last)
            } else {
                view.scroll.saturating_sub(SCROLL_PAGE)
            };
        }
    }

    /// Enters `Executing` for the selected entry, keeping the shown result.
    pub fn begin_run(&mut self) -> &'static CatalogEntry {
        let entry = self.selected_entry();
        let previous = std::mem::take(&mut self.view).into_result();
        self.view = ViewState::Executing { entry, previous };
        entry
    }

    /// Leaves `Executing` with the query outcome.
    pub fn finish_run(&mut self, outcome: Result<QueryOutcome>) {
        let (entry, previous) = match std::mem::take(&mut self.view) {
            ViewState::Executing { entry, previous } => (entry, previous),
            other => (self.selected_entry(), other.into_result()),
        };

        self.view = match outcome {
            Ok(outcome) => ViewState::ResultsShown(ResultView::new(
                entry,
                outcome,
                self.preferred_rows,
                self.chart_capacity,
            )),
            Err(e) => ViewState::ErrorShown {
                message: e.to_string(),
                previous,
            },
        };
    }

    /// Runs the selected entry against `db` and replaces the shown result.
    pub async fn run_selected(&mut self, db: &dyn DatabaseClient) {
        if !self.queries_enabled() {
            return;
        }
        let entry = self.begin_run();
        info!(query = entry.number, "Query selected");
        let outcome = QueryExecutor::new(db).run(entry).await;
        self.finish_run(outcome);
    }
}
