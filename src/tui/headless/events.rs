//! Event scripts for headless runs.
//!
//! A script is a list of steps, one per line or comma-separated, with `#`
//! starting a comment line:
//!
//! ```text
//! key:<name>        enter, esc, up, down, left, right, home, end, pgup, pgdn,
//!                   plus, minus, a single character, or ctrl+<char>
//! select:<n>        highlight catalog entry n and run it
//! wait:<duration>   100, 100ms or 2s
//! resize:<W>x<H>    resize the off-screen terminal
//! snapshot:<name>   record the current screen under a name
//! assert:<check>    contains:<text>, contains-exact:<text>, not-contains:<text>,
//!                   matches:<regex>, state:<field><op><value>
//! ```

use super::HeadlessState;
use crate::error::{ReportError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use std::str::FromStr;
use std::time::Duration;

/// One parsed script step, with the text it came from.
#[derive(Debug, Clone)]
pub struct Step {
    pub source: String,
    pub action: Action,
}

/// What a step does.
#[derive(Debug, Clone)]
pub enum Action {
    Key(KeyEvent),
    /// Highlight the catalog entry with this menu number and run it.
    Select(usize),
    Wait(Duration),
    Resize(u16, u16),
    Snapshot(String),
    Assert(Check),
}

/// A check against the rendered screen or the report state.
#[derive(Debug, Clone)]
pub enum Check {
    /// Screen contains the text, ignoring case.
    Contains(String),
    ContainsExact(String),
    NotContains(String),
    Matches(Regex),
    State {
        field: StateField,
        op: Comparison,
        value: String,
    },
}

/// Report state exposed to `assert:state:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    Selected,
    State,
    ShowChart,
    ChartRows,
    ChartBars,
    ResultRows,
    QueriesEnabled,
    Running,
}

impl FromStr for StateField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "selected" => Self::Selected,
            "state" => Self::State,
            "show_chart" => Self::ShowChart,
            "chart_rows" => Self::ChartRows,
            "chart_bars" => Self::ChartBars,
            "result_rows" => Self::ResultRows,
            "queries_enabled" => Self::QueriesEnabled,
            "running" => Self::Running,
            other => {
                return Err(ReportError::config(format!(
                    "Unknown state field '{other}'. Fields: selected, state, show_chart, \
                     chart_rows, chart_bars, result_rows, queries_enabled, running"
                )))
            }
        })
    }
}

/// Comparison operator of a state check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

impl Comparison {
    /// Longest operators first so `>=` is not read as `>`.
    const TOKENS: [(&'static str, Comparison); 6] = [
        (">=", Comparison::Ge),
        ("<=", Comparison::Le),
        ("!=", Comparison::Ne),
        ("=", Comparison::Eq),
        (">", Comparison::Gt),
        ("<", Comparison::Lt),
    ];

    /// Compares numerically when both sides are numbers, otherwise as text.
    /// Ordering operators never match text.
    fn holds(self, actual: &str, expected: &str) -> bool {
        match (actual.parse::<f64>(), expected.parse::<f64>()) {
            (Ok(a), Ok(b)) => match self {
                Self::Eq => a == b,
                Self::Ne => a != b,
                Self::Ge => a >= b,
                Self::Le => a <= b,
                Self::Gt => a > b,
                Self::Lt => a < b,
            },
            _ => match self {
                Self::Eq => actual == expected,
                Self::Ne => actual != expected,
                _ => false,
            },
        }
    }
}

impl Check {
    /// Returns true if the check holds for this screen and state.
    pub fn holds(&self, screen: &str, state: &HeadlessState) -> bool {
        match self {
            Self::Contains(text) => screen.to_lowercase().contains(&text.to_lowercase()),
            Self::ContainsExact(text) => screen.contains(text.as_str()),
            Self::NotContains(text) => !screen.to_lowercase().contains(&text.to_lowercase()),
            Self::Matches(pattern) => pattern.is_match(screen),
            Self::State { field, op, value } => op.holds(&state.value(*field), value),
        }
    }
}

/// Parses a whole script.
pub fn parse_script(input: &str) -> Result<Vec<Step>> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_step)
        .collect()
}

/// Parses one step such as `select:10` or `assert:state:chart_bars>=2`.
pub fn parse_step(source: &str) -> Result<Step> {
    let (kind, arg) = source.split_once(':').ok_or_else(|| {
        ReportError::config(format!("Step '{source}' must look like <action>:<argument>"))
    })?;
    let arg = arg.trim();

    let action = match kind.trim() {
        "key" => Action::Key(parse_key(arg)?),
        "select" => Action::Select(
            arg.parse::<usize>()
                .map_err(|_| ReportError::config(format!("Invalid query number: '{arg}'")))?,
        ),
        "wait" => Action::Wait(parse_duration(arg)?),
        "resize" => {
            let (w, h) = parse_dimensions(arg)?;
            Action::Resize(w, h)
        }
        "snapshot" if !arg.is_empty() => Action::Snapshot(arg.to_string()),
        "snapshot" => return Err(ReportError::config("Snapshot needs a name")),
        "assert" => Action::Assert(parse_check(arg)?),
        other => {
            return Err(ReportError::config(format!(
                "Unknown action '{other}' in step '{source}'. \
                 Actions: key, select, wait, resize, snapshot, assert"
            )))
        }
    };

    Ok(Step {
        source: source.to_string(),
        action,
    })
}

fn parse_key(name: &str) -> Result<KeyEvent> {
    if let Some(rest) = name.strip_prefix("ctrl+") {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)),
            _ => Err(ReportError::config(format!("Invalid ctrl key: '{name}'"))),
        };
    }

    let code = match name.to_lowercase().as_str() {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" | "pageup" => KeyCode::PageUp,
        "pgdn" | "pagedown" => KeyCode::PageDown,
        "plus" => KeyCode::Char('+'),
        "minus" => KeyCode::Char('-'),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(ReportError::config(format!("Unknown key: '{name}'"))),
            }
        }
    };
    Ok(KeyEvent::new(code, KeyModifiers::empty()))
}

fn parse_duration(arg: &str) -> Result<Duration> {
    let invalid = || ReportError::config(format!("Invalid duration: '{arg}'"));
    if let Some(ms) = arg.strip_suffix("ms") {
        ms.parse().map(Duration::from_millis).map_err(|_| invalid())
    } else if let Some(secs) = arg.strip_suffix('s') {
        secs.parse().map(Duration::from_secs).map_err(|_| invalid())
    } else {
        arg.parse().map(Duration::from_millis).map_err(|_| invalid())
    }
}

fn parse_dimensions(arg: &str) -> Result<(u16, u16)> {
    arg.split_once('x')
        .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
        .filter(|&(w, h)| w > 0 && h > 0)
        .ok_or_else(|| ReportError::config(format!("Invalid size: '{arg}'. Expected WxH")))
}

fn parse_check(arg: &str) -> Result<Check> {
    let (kind, operand) = arg.split_once(':').ok_or_else(|| {
        ReportError::config(format!("Assertion '{arg}' must look like <check>:<operand>"))
    })?;

    Ok(match kind {
        "contains" => Check::Contains(operand.to_string()),
        "contains-exact" => Check::ContainsExact(operand.to_string()),
        "not-contains" => Check::NotContains(operand.to_string()),
        "matches" => Check::Matches(
            Regex::new(operand)
                .map_err(|e| ReportError::config(format!("Invalid pattern '{operand}': {e}")))?,
        ),
        "state" => parse_state_check(operand)?,
        other => {
            return Err(ReportError::config(format!(
                "Unknown assertion '{other}'. \
                 Assertions: contains, contains-exact, not-contains, matches, state"
            )))
        }
    })
}

fn parse_state_check(operand: &str) -> Result<Check> {
    let (at, token, op) = Comparison::TOKENS
        .iter()
        .filter_map(|&(token, op)| operand.find(token).map(|at| (at, token, op)))
        .min_by_key(|&(at, token, _)| (at, std::cmp::Reverse(token.len())))
        .ok_or_else(|| {
            ReportError::config(format!(
                "State assertion '{operand}' needs one of =, !=, >=, <=, >, <"
            ))
        })?;

    Ok(Check::State {
        field: operand[..at].trim().parse()?,
        op,
        value: operand[at + token.len()..].trim().to_string(),
    })
}
