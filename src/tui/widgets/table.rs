//! Box-drawn table of a query result.
//!
//! Columns are sized to their content up to 40 characters and shrunk
//! proportionally when the pane is narrower. Numbers are right-aligned and
//! NULL is dimmed. A result without rows renders a notice instead.

use crate::db::{QueryResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

const MAX_COLUMN_WIDTH: usize = 40;
const MIN_COLUMN_WIDTH: usize = 4;

/// Lines around the data rows: three above, border and footer below.
const CHROME_LINES: usize = 5;

/// Fewest lines that draw a table with at least one data row.
pub const MIN_TABLE_HEIGHT: u16 = CHROME_LINES as u16 + 1;

/// Shown in place of a table when a query returns no rows.
pub const EMPTY_NOTICE: &str = "No results to display.";

const TOP: [char; 3] = ['┌', '┬', '┐'];
const SEPARATOR: [char; 3] = ['├', '┼', '┤'];
const BOTTOM: [char; 3] = ['└', '┴', '┘'];

fn frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn dim_italic() -> Style {
    frame_style().add_modifier(Modifier::ITALIC)
}

/// Result table with a scroll offset.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    offset: usize,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a QueryResult) -> Self {
        Self { result, offset: 0 }
    }

    /// Starts the visible rows at `offset`.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Widest cell per column in characters, clamped to the column bounds.
    fn column_widths(&self) -> Vec<usize> {
        self.result
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.result
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|value| value.to_display_string().chars().count())
                    .fold(col.name.chars().count(), usize::max)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Whole table, every row.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'a>> {
        self.lines(available_width, usize::MAX)
    }

    /// At most `visible_rows` data rows from the offset, between the header
    /// and the footer.
    fn lines(&self, available_width: usize, visible_rows: usize) -> Vec<Line<'a>> {
        let rows = &self.result.rows;
        if rows.is_empty() {
            return vec![Line::from(Span::styled(EMPTY_NOTICE, dim_italic()))];
        }

        let widths = shrink_to(self.column_widths(), available_width);
        let start = self.offset.min(rows.len() - 1);
        let window = &rows[start..rows.len().min(start.saturating_add(visible_rows.max(1)))];

        let header = self.result.columns.iter().map(|col| {
            let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            (col.name.clone(), style, false)
        });

        let mut lines = vec![rule(&widths, TOP), cells(header, &widths), rule(&widths, SEPARATOR)];
        lines.extend(window.iter().map(|row| cells(row.iter().map(data_cell), &widths)));
        lines.push(rule(&widths, BOTTOM));
        lines.push(self.footer(start, window.len()));
        lines
    }

    fn returned(&self) -> String {
        let count = self.result.row_count;
        format!(
            "{count} row{} returned ({}ms)",
            if count == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        )
    }

    /// One-line stand-in used when the area is shorter than [`MIN_TABLE_HEIGHT`].
    pub fn summary(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(self.returned(), frame_style()),
            Span::styled(" · rows hidden to fit the chart (c hides it)", dim_italic()),
        ])
    }

    /// Row count and time, plus the visible window when scrolled and the
    /// truncation notice when capped.
    fn footer(&self, start: usize, shown: usize) -> Line<'a> {
        let mut footer = self.returned();
        if shown < self.result.row_count {
            footer.push_str(&format!(" · showing {}-{} (PgUp/PgDn)", start + 1, start + shown));
        }
        if let Some(warning) = self.result.truncation_warning() {
            footer.push_str("  ");
            footer.push_str(&warning);
        }
        Line::from(Span::styled(footer, frame_style()))
    }
}

/// Scales widths down proportionally when the drawn table (three cells of
/// padding and border per column, plus one) exceeds the available width.
fn shrink_to(widths: Vec<usize>, available: usize) -> Vec<usize> {
    let drawn = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
    if available == 0 || drawn <= available {
        return widths;
    }
    let scale = available as f64 / drawn as f64;
    widths
        .into_iter()
        .map(|w| ((w as f64 * scale) as usize).max(MIN_COLUMN_WIDTH))
        .collect()
}

/// Cuts `text` to `width` characters, ending in "..." when there is room.
fn fit_cell(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let head: String = text.chars().take(width - 3).collect();
    format!("{head}...")
}

fn data_cell(value: &Value) -> (String, Style, bool) {
    let style = if value.is_null() {
        dim_italic()
    } else {
        Style::default()
    };
    let numeric = matches!(value, Value::Integer(_) | Value::Real(_));
    (value.to_display_string(), style, numeric)
}

fn rule<'a>(widths: &[usize], [left, mid, right]: [char; 3]) -> Line<'a> {
    let inner = widths
        .iter()
        .map(|&w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join(&mid.to_string());
    Line::from(Span::styled(format!("{left}{inner}{right}"), frame_style()))
}

/// `│ cell │ cell │`, each cell padded to its column; the flag right-aligns.
fn cells<'a>(
    cells: impl Iterator<Item = (String, Style, bool)>,
    widths: &[usize],
) -> Line<'a> {
    let mut spans = vec![Span::styled("│", frame_style())];
    for ((text, style, right), &width) in cells.zip(widths) {
        let text = fit_cell(&text, width);
        let padded = if right {
            format!(" {text:>width$} ")
        } else {
            format!(" {text:width$} ")
        };
        spans.push(Span::styled(padded, style));
        spans.push(Span::styled("│", frame_style()));
    }
    Line::from(spans)
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        if area.height < MIN_TABLE_HEIGHT && !self.result.rows.is_empty() {
            buf.set_line(area.x, area.y, &self.summary(), area.width);
            return;
        }

        let visible_rows = usize::from(area.height).saturating_sub(CHROME_LINES);
        for (y, line) in (area.y..area.bottom()).zip(self.lines(area.width.into(), visible_rows)) {
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}
