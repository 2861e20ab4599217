//! Catalog selection list.

use crate::catalog::CatalogEntry;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Marker for chart-eligible entries.
const CHART_MARK: &str = "▤";

/// Widget listing every catalog entry with the selection highlighted.
pub struct CatalogList<'a> {
    entries: &'a [CatalogEntry],
    selected: usize,
}

impl<'a> CatalogList<'a> {
    pub fn new(entries: &'a [CatalogEntry], selected: usize) -> Self {
        Self { entries, selected }
    }

    /// First entry shown so that the selection stays inside `height` rows.
    fn first_visible(&self, height: usize) -> usize {
        if height == 0 || self.selected < height {
            0
        } else {
            self.selected + 1 - height
        }
    }

    fn line(&self, idx: usize, entry: &CatalogEntry, width: usize) -> Line<'a> {
        let selected = idx == self.selected;
        let pointer = if selected { "▶ " } else { "  " };
        let mark = if entry.has_chart() { CHART_MARK } else { " " };

        let label_width = width.saturating_sub(4);
        let label: String = if entry.label.chars().count() > label_width {
            let mut head: String = entry.label.chars().take(label_width.saturating_sub(1)).collect();
            head.push('…');
            head
        } else {
            entry.label.to_string()
        };

        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(pointer, style),
            Span::styled(mark, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(label, style),
        ])
    }
}

impl Widget for CatalogList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Consultas (↑/↓ select, Enter run, ▤ chart) ");
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        let first = self.first_visible(height);
        for (row, (idx, entry)) in self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .enumerate()
        {
            let line = self.line(idx, entry, inner.width as usize);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}
