//! Horizontal bar chart widget.
//!
//! Draws one line per bar: `key │████▌ value  annotation`.

use crate::chart::{BarChart, RowCap};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Widest key column before truncation.
const MAX_KEY_WIDTH: usize = 32;

/// Fewest cells left for the bar itself.
const MIN_BAR_WIDTH: usize = 4;

/// Partial-cell glyphs, from one eighth to seven eighths.
const EIGHTHS: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];

/// Widget for a bar chart inside a titled block.
pub struct ChartView<'a> {
    chart: &'a BarChart,
    rows: RowCap,
}

impl<'a> ChartView<'a> {
    pub fn new(chart: &'a BarChart, rows: RowCap) -> Self {
        Self { chart, rows }
    }

    /// Block title with the slider position.
    fn title(&self) -> String {
        format!(
            " {} by {} · rows {}/{} (←/→) ",
            self.chart.y_label,
            self.chart.x_label,
            self.rows.value(),
            self.rows.max()
        )
    }

    /// Renders the bars to lines fitting `width` cells.
    pub fn render_to_lines(&self, width: usize) -> Vec<Line<'a>> {
        let key_width = self
            .chart
            .bars
            .iter()
            .map(|bar| bar.key.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_KEY_WIDTH);

        let values: Vec<String> = self
            .chart
            .bars
            .iter()
            .map(|bar| format_value(bar.value))
            .collect();
        let value_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
        let annotation_width = self
            .chart
            .bars
            .iter()
            .filter_map(|bar| bar.annotation.as_ref())
            .map(|a| a.chars().count() + 2)
            .max()
            .unwrap_or(0);

        let bar_width = width
            .saturating_sub(key_width + 3 + value_width + 1 + annotation_width)
            .max(MIN_BAR_WIDTH);
        let max = self.chart.max_value();

        self.chart
            .bars
            .iter()
            .zip(values)
            .map(|(bar, value)| {
                let fraction = if max > 0.0 { bar.value.abs() / max } else { 0.0 };
                let mut spans = vec![
                    Span::raw(format!("{:>key_width$}", truncate(&bar.key, key_width))),
                    Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(bar_glyphs(fraction, bar_width), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                ];
                if let Some(annotation) = &bar.annotation {
                    spans.push(Span::styled(
                        format!("  {}", annotation),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title());
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = self.render_to_lines(inner.width as usize);
        for (i, line) in lines.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}

/// Builds a bar `fraction` of `width` cells long, with eighth-cell precision.
fn bar_glyphs(fraction: f64, width: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * (width * 8) as f64).round() as usize;
    let mut bar = "█".repeat(eighths / 8);
    if eighths % 8 > 0 {
        bar.push(EIGHTHS[eighths % 8 - 1]);
    }
    bar
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut head: String = s.chars().take(width.saturating_sub(1)).collect();
        head.push('…');
        head
    }
}
