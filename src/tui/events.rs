//! Terminal input for the interactive report.

use crate::error::{ReportError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// How long one wait for input lasts before the loop redraws.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Input the report reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The layout is recomputed on the next draw.
    Resize,
}

/// Waits up to `timeout` for the next relevant input.
pub fn next_event(timeout: Duration) -> Result<Option<Event>> {
    if !event::poll(timeout)
        .map_err(|e| ReportError::internal(format!("Failed to poll events: {e}")))?
    {
        return Ok(None);
    }

    let raw =
        event::read().map_err(|e| ReportError::internal(format!("Failed to read event: {e}")))?;
    Ok(translate(raw))
}

/// Keeps key presses and resizes; releases, repeats, mouse, focus and paste
/// events are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}
