//! Untyped spreadsheet cells as handed over by a grid decoder.

use chrono::NaiveDateTime;
use serde_json::Value;

/// A single decoded cell.
///
/// Decoders fill unused cells with [`CellValue::Empty`] rather than omitting
/// them, but rows are still not guaranteed to share a length.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// A cell the decoder recognised as date-formatted.
    Date(NaiveDateTime),
}

/// One row of cells.
pub type Row = Vec<CellValue>;

/// Ordered rows of one worksheet.
pub type RawGrid = Vec<Row>;

static EMPTY: CellValue = CellValue::Empty;

impl CellValue {
    /// Build a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// `true` for absent cells and zero-length text.
    ///
    /// Whitespace-only text is *not* blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// The string payload when this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell the way a spreadsheet would display it as plain text.
    ///
    /// Integral numbers print without a fractional part (`2024`, not `2024.0`).
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => number_to_text(*n),
            CellValue::Date(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Fetch column `idx` of `row`, treating missing trailing cells as empty.
pub fn cell_at(row: &[CellValue], idx: usize) -> &CellValue {
    row.get(idx).unwrap_or(&EMPTY)
}

fn number_to_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<&Value> for CellValue {
    /// Map a JSON grid cell: `null` → empty, numbers → number, strings →
    /// text, booleans → their text form. Nested values are kept as JSON text.
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Text(b.to_string()),
            Value::Number(n) => n
                .as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Empty),
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::Date(dt)
    }
}

/// Convert a JSON array-of-arrays into a [`RawGrid`].
///
/// Non-array rows become empty rows so row positions are preserved.
pub fn grid_from_json(value: &Value) -> RawGrid {
    let Some(rows) = value.as_array() else {
        return Vec::new();
    };
    rows.iter()
        .map(|row| match row.as_array() {
            Some(cells) => cells.iter().map(CellValue::from).collect(),
            None => Vec::new(),
        })
        .collect()
}
