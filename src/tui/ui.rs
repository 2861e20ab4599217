//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, LoadStatus, ViewState};
use super::widgets::{catalog::CatalogList, chart::ChartView, header, table::ResultTable};
use crate::catalog;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Public dataset the bundled script was extracted from.
pub const DATASET_URL: &str = "https://dados.gov.br/dados/conjuntos-dados/comprasgovbr-contratos";

const CONTEXT: &str = "Consultas sobre os contratos firmados pelo governo federal entre \
                       01/11/2023 e 20/11/2023: fornecedores, órgãos, unidades, itens e tipos \
                       de contrato.";

/// Shown in place of the query section when the data script failed to load.
pub const DISABLED_NOTICE: &str = "Queries unavailable: the data script could not be loaded.";

/// Rows taken by the catalog while a chart is shown: the selected entry only.
const COMPACT_CATALOG_HEIGHT: u16 = 3;

/// Lines of the error banner above a kept result.
const BANNER_HEIGHT: u16 = 2;

/// Screen regions, top to bottom.
struct Regions {
    header: Rect,
    intro: Rect,
    catalog: Rect,
    results: Rect,
    help: Rect,
}

fn regions(area: Rect, app: &App, intro_lines: usize) -> Regions {
    let catalog_height = if app.chart_visible() {
        COMPACT_CATALOG_HEIGHT
    } else {
        catalog::entries().len() as u16 + 2
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                        // Header
            Constraint::Length(intro_lines as u16 + 2),   // Intro text
            Constraint::Length(catalog_height),           // Catalog
            Constraint::Min(3),                           // Results
            Constraint::Length(1),                        // Key help
        ])
        .split(area);

    Regions {
        header: layout[0],
        intro: layout[1],
        catalog: layout[2],
        results: layout[3],
        help: layout[4],
    }
}

/// Area inside the results block available to the table and the chart.
fn results_body(results: Rect, app: &App) -> Rect {
    let inner = results_block().inner(results);
    match app.view {
        ViewState::ErrorShown { .. } => Rect {
            y: inner.y + BANNER_HEIGHT.min(inner.height),
            height: inner.height.saturating_sub(BANNER_HEIGHT),
            ..inner
        },
        _ => inner,
    }
}

/// Number of bars the chart can draw in `area` without clipping.
///
/// One line stays reserved for the table summary, two for the chart border.
pub fn chart_capacity(area: Rect, app: &App) -> usize {
    let intro = intro_lines(app, area.width.saturating_sub(2) as usize);
    let body = results_body(regions(area, app, intro.len()).results, app);
    body.height.saturating_sub(3) as usize
}

/// Bounds the app's chart slider by what fits in `area`. Call before drawing.
pub fn fit(app: &mut App, area: Rect) {
    let capacity = chart_capacity(area, app);
    app.fit_chart(capacity);
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let intro = intro_lines(app, area.width.saturating_sub(2) as usize);
    let regions = regions(area, app, intro.len());

    render_header(frame, regions.header, app);
    render_intro(frame, regions.intro, intro);

    match &app.load {
        LoadStatus::Loaded(_) => {
            frame.render_widget(
                CatalogList::new(catalog::entries(), app.selected),
                regions.catalog,
            );
            render_results(frame, regions.results, app);
        }
        LoadStatus::Failed(message) => {
            let disabled = regions.catalog.union(regions.results);
            render_disabled(frame, disabled, message);
        }
    }

    render_help(frame, regions.help, app);
}

/// Table and row count summary for the header.
fn load_summary(app: &App) -> String {
    match &app.load {
        LoadStatus::Loaded(tables) => {
            let rows: i64 = tables.iter().map(|t| t.rows).sum();
            format!("{} tables, {} rows", tables.len(), rows)
        }
        LoadStatus::Failed(_) => "data unavailable".to_string(),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let summary = load_summary(app);
    let widget = header::Header::new(&summary, app.queries_enabled());
    frame.render_widget(widget, area);
}

/// Greedy word wrap on character counts. Words longer than `width` keep
/// their own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let len = current.chars().count();
        if len > 0 && len + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wraps `label` + `value`, styling the label where it starts the first line.
fn labeled(label: &'static str, value: &str, width: usize, style: Style) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    wrap(&format!("{label}{value}"), width)
        .into_iter()
        .enumerate()
        .map(|(i, text)| match text.strip_prefix(label) {
            Some(rest) if i == 0 => Line::from(vec![
                Span::styled(label, label_style),
                Span::styled(rest.to_string(), style),
            ]),
            _ => Line::from(Span::styled(text, style)),
        })
        .collect()
}

/// Intro block content, already wrapped to `width` cells.
fn intro_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = labeled("Fonte: ", DATASET_URL, width, Style::default().fg(Color::Blue));
    lines.extend(wrap(CONTEXT, width).into_iter().map(Line::from));
    if !app.members.is_empty() {
        lines.extend(labeled(
            "Membros: ",
            &app.members.join(" · "),
            width,
            Style::default(),
        ));
    }
    if let LoadStatus::Loaded(tables) = &app.load {
        let tables = tables
            .iter()
            .map(|t| format!("{} {}", t.name, t.rows))
            .collect::<Vec<_>>()
            .join(" · ");
        lines.extend(labeled(
            "Tabelas: ",
            &tables,
            width,
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

fn render_intro(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", header::TITLE));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_disabled(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Consultas ");
    let lines = vec![
        Line::from(Span::styled(
            DISABLED_NOTICE,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(message.to_string()),
        Line::from(Span::styled(
            "Point --data at the script or set [report] data in the config file.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn results_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let title = match &app.view {
        ViewState::Idle => " Resultado ".to_string(),
        ViewState::Executing { entry, .. } => format!(" {} ", entry.label),
        ViewState::ResultsShown(view) => format!(" {} ", view.entry.label),
        ViewState::ErrorShown { previous, .. } => match previous {
            Some(view) => format!(" {} ", view.entry.label),
            None => " Resultado ".to_string(),
        },
    };
    let block = results_block().title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &app.view {
        ViewState::Idle => {
            let hint = Paragraph::new(Span::styled(
                "Select a query and press Enter.",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(hint, inner);
            return;
        }
        ViewState::Executing { entry, .. } => {
            let running = Paragraph::new(Span::styled(
                format!("Running Query {}…", entry.number),
                Style::default().fg(Color::Yellow),
            ));
            frame.render_widget(running, inner);
            return;
        }
        ViewState::ErrorShown { message, .. } => {
            let banner = Paragraph::new(Span::styled(
                format!("⚠ {}", message),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ))
            .wrap(Wrap { trim: true });
            let height = BANNER_HEIGHT.min(inner.height);
            frame.render_widget(banner, Rect { height, ..inner });
        }
        ViewState::ResultsShown(_) => {}
    }

    let Some(view) = app.result() else {
        return;
    };
    let body = results_body(area, app);
    let table = ResultTable::new(&view.outcome.result).offset(view.scroll);

    let Some(chart) = app.chart() else {
        frame.render_widget(table, body);
        return;
    };

    // The chart takes its full height; the table keeps what is left and
    // shrinks to its summary line when that is too little.
    let wanted = match &chart {
        Ok(chart) => chart.len() as u16 + 2,
        Err(_) => 3,
    };
    let chart_height = wanted.min(body.height);
    let table_area = Rect {
        height: body.height - chart_height,
        ..body
    };
    let chart_area = Rect {
        y: body.y + table_area.height,
        height: chart_height,
        ..body
    };

    frame.render_widget(table, table_area);
    match chart {
        Ok(chart) => frame.render_widget(ChartView::new(&chart, view.rows), chart_area),
        Err(e) => {
            let notice = Paragraph::new(Span::styled(
                format!("{}: {}", e.category(), e),
                Style::default().fg(Color::Red),
            ))
            .block(Block::default().borders(Borders::ALL).title(" Chart "))
            .wrap(Wrap { trim: true });
            frame.render_widget(notice, chart_area);
        }
    }
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let text = if !app.queries_enabled() {
        " q quit".to_string()
    } else {
        let chart = if app.show_chart { "on" } else { "off" };
        format!(
            " ↑/↓ select · Enter run · c chart [{}] · ←/→ chart rows · PgUp/PgDn scroll · q quit",
            chart
        )
    };
    let help = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)));
    frame.render_widget(help, area);
}
