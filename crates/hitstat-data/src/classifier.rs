//! Table shape detection.
//!
//! Uploads carry no schema, so the shape is inferred from the first two rows:
//! explicit header text first, then a count of populated cells. Each rule is
//! a standalone predicate; [`classify`] takes the first one that matches.

use std::fmt;

use hitstat_core::cell::{cell_at, Row};
use hitstat_core::models::TableKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header terms that mark the first column as a month column.
const MONTH_TERMS: &[&str] = &["month", "월"];

/// Header terms that mark the first column as a date column.
const DATE_TERMS: &[&str] = &["date", "일자"];

/// Populated cells in the first data row at or above which a table is monthly.
const MONTHLY_MIN_COLUMNS: usize = 5;

/// Populated cells in the first data row that mark a daily table.
const DAILY_COLUMNS: usize = 2;

/// Result of classifying a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    Monthly,
    DailyUsers,
    Unknown,
}

impl From<TableKind> for FileKind {
    fn from(kind: TableKind) -> Self {
        match kind {
            TableKind::Monthly => FileKind::Monthly,
            TableKind::DailyUsers => FileKind::DailyUsers,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Monthly => write!(f, "monthly"),
            FileKind::DailyUsers => write!(f, "dailyUsers"),
            FileKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A classification rule: returns a shape when it recognises the grid.
pub type ClassifierRule = fn(&[Row]) -> Option<TableKind>;

/// Rules in priority order.
pub const RULES: &[(&str, ClassifierRule)] = &[
    ("header", classify_by_header),
    ("column-count", classify_by_column_count),
];

/// Classify `rows` by running [`RULES`] in order.
///
/// Grids with fewer than two rows are always [`FileKind::Unknown`].
pub fn classify(rows: &[Row]) -> FileKind {
    if rows.len() < 2 {
        return FileKind::Unknown;
    }

    for (name, rule) in RULES {
        if let Some(kind) = rule(rows) {
            debug!(rule = name, %kind, "grid classified");
            return kind.into();
        }
    }

    debug!("no classification rule matched");
    FileKind::Unknown
}

/// Inspect the first header cell for month- or date-indicating text.
///
/// Month terms win over date terms when both appear.
pub fn classify_by_header(rows: &[Row]) -> Option<TableKind> {
    let header = rows.first()?;
    let h0 = cell_at(header, 0).as_text()?.to_lowercase();

    if MONTH_TERMS.iter().any(|t| h0.contains(t)) {
        return Some(TableKind::Monthly);
    }
    if DATE_TERMS.iter().any(|t| h0.contains(t)) {
        return Some(TableKind::DailyUsers);
    }
    None
}

/// Count populated cells in the second row.
///
/// Monthly tables have seven columns and daily tables two, so five or more
/// populated cells still reads as monthly when a few trailing cells are blank.
pub fn classify_by_column_count(rows: &[Row]) -> Option<TableKind> {
    let row = rows.get(1)?;
    let populated = row.iter().filter(|c| !c.is_blank()).count();

    if populated >= MONTHLY_MIN_COLUMNS {
        Some(TableKind::Monthly)
    } else if populated == DAILY_COLUMNS {
        Some(TableKind::DailyUsers)
    } else {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
