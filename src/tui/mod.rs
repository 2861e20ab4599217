//! Terminal User Interface for the report.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::{App, AppAction, LoadStatus};
pub use events::Event;

use crate::config::{Config, DataSource};
use crate::db::{DatabaseClient, SqliteClient};
use crate::error::{ReportError, Result};
use crate::query::QueryExecutor;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{info, warn};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Self::setup_terminal()?,
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| ReportError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| ReportError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| ReportError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| ReportError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| ReportError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| ReportError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    fn draw(&mut self, app: &mut App) -> Result<()> {
        let size = self
            .terminal
            .size()
            .map_err(|e| ReportError::internal(format!("Failed to read terminal size: {e}")))?;
        ui::fit(app, Rect::new(0, 0, size.width, size.height));

        let app = &*app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| ReportError::internal(format!("Failed to draw: {e}")))?;
        Ok(())
    }

    /// Runs the event loop until the operator quits.
    ///
    /// Queries are awaited inline; nothing else is processed while one runs.
    pub async fn run(&mut self, app: &mut App, db: Option<&dyn DatabaseClient>) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        while app.running {
            self.draw(app)?;

            let Some(event) = events::next_event(events::POLL_INTERVAL)? else {
                continue;
            };

            if app.handle_event(event) == AppAction::RunSelected {
                if let Some(db) = db {
                    let entry = app.begin_run();
                    self.draw(app)?;
                    let outcome = QueryExecutor::new(db).run(entry).await;
                    app.finish_run(outcome);
                }
            }
        }

        let _ = panic::take_hook();

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Loads the data script and reports the outcome as a load status.
///
/// A failed load is not an error: the report opens with querying disabled.
pub async fn load(source: &DataSource) -> (Option<SqliteClient>, LoadStatus) {
    info!("Loading data script from: {}", source);
    let client = match SqliteClient::load(source).await {
        Ok(client) => client,
        Err(e) => {
            warn!("Querying disabled: {}", e);
            return (None, LoadStatus::Failed(e.to_string()));
        }
    };

    match client.summary().await {
        Ok(summary) => (Some(client), LoadStatus::Loaded(summary)),
        Err(e) => {
            warn!("Querying disabled: {}", e);
            (None, LoadStatus::Failed(e.to_string()))
        }
    }
}

/// Runs the interactive report.
pub async fn run(config: &Config, data: &DataSource) -> Result<()> {
    let (db, status) = load(data).await;
    let mut app = App::new(status, config);

    let mut tui = Tui::new()?;
    let result = tui
        .run(&mut app, db.as_ref().map(|db| db as &dyn DatabaseClient))
        .await;

    if let Some(db) = db {
        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        }
    }

    result
}
