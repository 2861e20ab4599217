//! Title bar: report name and version on the left, load status on the right.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

pub const TITLE: &str = "Contratos.gov.br Contratos";

pub struct Header<'a> {
    status: &'a str,
    loaded: bool,
}

impl<'a> Header<'a> {
    /// `loaded` picks a green or red status dot.
    pub fn new(status: &'a str, loaded: bool) -> Self {
        Self { status, loaded }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bar = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        buf.set_style(area, bar);

        let title = format!(" {TITLE} v{}", env!("CARGO_PKG_VERSION"));
        buf.set_span(area.x, area.y, &Span::styled(title, bar), area.width);

        let dot_color = if self.loaded { Color::Green } else { Color::Red };
        let status = Line::from(vec![
            Span::raw(" "),
            Span::styled(if self.loaded { "●" } else { "○" }, bar.fg(dot_color)),
            Span::raw(format!(" [{}] ", self.status)),
        ]);
        let width = status.width() as u16;
        if width < area.width {
            buf.set_line(area.right() - width, area.y, &status, width);
        }
    }
}
