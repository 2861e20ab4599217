//! Bar-chart model for chart-eligible results.
//!
//! Turns a result set plus a [`ChartSpec`] into an ordered list of bars,
//! capped by the operator's row slider.

use crate::catalog::ChartSpec;
use crate::db::{QueryResult, Value};
use crate::error::{ReportError, Result};

/// Smallest number of bars the slider allows.
pub const MIN_CHART_ROWS: usize = 2;

/// Largest number of bars the slider allows.
pub const MAX_CHART_ROWS: usize = 20;

/// The row-count slider bound to a result.
///
/// The upper bound is `min(20, total)`, lowered further by [`RowCap::fit`]
/// when the screen has room for fewer bars. The lower bound is 2, or the
/// upper bound itself when it is smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCap {
    value: usize,
    ceiling: usize,
    max: usize,
}

impl RowCap {
    /// Creates a slider for a result with `total` rows, starting at the minimum.
    pub fn new(total: usize) -> Self {
        let ceiling = total.min(MAX_CHART_ROWS);
        Self {
            value: MIN_CHART_ROWS.min(ceiling),
            ceiling,
            max: ceiling,
        }
    }

    /// Creates a slider starting at `value`, clamped into range.
    pub fn with_value(total: usize, value: usize) -> Self {
        let mut cap = Self::new(total);
        cap.value = value.clamp(cap.min(), cap.max);
        cap
    }

    /// Limits the upper bound to the `capacity` bars the screen can draw.
    pub fn fit(&mut self, capacity: usize) {
        self.max = self.ceiling.min(capacity);
        self.value = self.value.clamp(self.min(), self.max);
    }

    pub fn value(&self) -> usize {
        self.value
    }

    pub fn min(&self) -> usize {
        MIN_CHART_ROWS.min(self.max)
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Moves the slider up one step. Returns false at the upper bound.
    pub fn increment(&mut self) -> bool {
        if self.value < self.max {
            self.value += 1;
            true
        } else {
            false
        }
    }

    /// Moves the slider down one step. Returns false at the lower bound.
    pub fn decrement(&mut self) -> bool {
        if self.value > self.min() {
            self.value -= 1;
            true
        } else {
            false
        }
    }
}

/// One horizontal bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Category shown on the vertical axis.
    pub key: String,
    /// Bar length.
    pub value: f64,
    /// Optional text drawn at the bar tip.
    pub annotation: Option<String>,
}

/// A horizontal bar chart over the first rows of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Builds the chart from the first `rows` rows of `result`, in result order.
    ///
    /// NULL y values plot as zero. Any other non-numeric y value, or a spec
    /// naming a column the result lacks, is a chart error.
    pub fn build(result: &QueryResult, spec: &ChartSpec, rows: usize) -> Result<Self> {
        let x_idx = column(result, spec.x_column)?;
        let y_idx = column(result, spec.y_column)?;
        let label_idx = spec
            .label_column
            .map(|name| column(result, name))
            .transpose()?;

        let bars = result
            .rows
            .iter()
            .take(rows)
            .map(|row| {
                let key = cell(row, x_idx).to_display_string();
                let value = bar_value(cell(row, y_idx), spec.y_column)?;
                let annotation = label_idx.map(|idx| cell(row, idx).to_display_string());
                Ok(Bar {
                    key,
                    value,
                    annotation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            x_label: spec.x_column.to_string(),
            y_label: spec.y_column.to_string(),
            bars,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Largest absolute bar value, or zero for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|bar| bar.value.abs()).fold(0.0, f64::max)
    }
}

fn column(result: &QueryResult, name: &str) -> Result<usize> {
    result
        .column_index(name)
        .ok_or_else(|| ReportError::chart(format!("Column '{}' not found in result", name)))
}

fn cell(row: &[Value], idx: usize) -> &Value {
    static NULL: Value = Value::Null;
    row.get(idx).unwrap_or(&NULL)
}

fn bar_value(value: &Value, column: &str) -> Result<f64> {
    if value.is_null() {
        return Ok(0.0);
    }
    value.as_f64().ok_or_else(|| {
        ReportError::chart(format!(
            "Value '{}' in column '{}' is not numeric",
            value, column
        ))
    })
}
