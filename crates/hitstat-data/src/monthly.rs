//! Monthly menu-hit table parser.
//!
//! Column positions are fixed; header text only ever supplies menu labels.

use hitstat_core::cell::{cell_at, CellValue, Row};
use hitstat_core::models::{MenuLabels, Metric, MonthlyDataset, MonthlyRecord, TableKind};
use hitstat_core::normalizers::{normalize_month, to_number};
use hitstat_core::{Result, StatsError};
use tracing::debug;

use crate::ingest::Parsed;

const COL_MONTH: usize = 0;
const COL_MENU1: usize = 1;
const COL_MENU2: usize = 2;
const COL_MENU3: usize = 3;
const COL_MENU4: usize = 4;
const COL_USERS: usize = 5;
const COL_TOTAL: usize = 6;

const MENU_COLUMNS: [(Metric, usize); 4] = [
    (Metric::Menu1, COL_MENU1),
    (Metric::Menu2, COL_MENU2),
    (Metric::Menu3, COL_MENU3),
    (Metric::Menu4, COL_MENU4),
];

/// `true` when the first cell of `row` is text mentioning "month".
pub fn has_month_header(row: &[CellValue]) -> bool {
    cell_at(row, COL_MONTH)
        .as_text()
        .map(|s| s.to_lowercase().contains("month"))
        .unwrap_or(false)
}

/// Read menu labels from a header row, keeping defaults for blank cells.
pub fn menu_labels_from_header(header: &[CellValue]) -> MenuLabels {
    let mut labels = MenuLabels::default();
    for (metric, col) in MENU_COLUMNS {
        let Some(text) = cell_at(header, col).as_text() else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(slot) = labels.label_mut(metric) {
            *slot = trimmed.to_string();
        }
    }
    labels
}

/// Parse a grid already classified as monthly.
///
/// Rows whose month cell normalises to the empty string are skipped; every
/// other row is kept in source order, without deduplication. Fails with
/// [`StatsError::NoUsableRows`] when nothing survives.
pub fn parse_monthly(rows: &[Row]) -> Result<Parsed<MonthlyDataset>> {
    let header = rows.first().filter(|r| has_month_header(r));
    let menu_labels = header
        .map(|h| menu_labels_from_header(h))
        .unwrap_or_default();
    let data_rows = if header.is_some() { &rows[1..] } else { rows };

    let mut records = Vec::with_capacity(data_rows.len());
    let mut skipped_rows = 0usize;

    for (idx, row) in data_rows.iter().enumerate() {
        let month = normalize_month(cell_at(row, COL_MONTH));
        if month.is_empty() {
            debug!(row = idx, "skipping monthly row without a month");
            skipped_rows += 1;
            continue;
        }

        records.push(MonthlyRecord {
            month,
            menu1: to_number(cell_at(row, COL_MENU1)),
            menu2: to_number(cell_at(row, COL_MENU2)),
            menu3: to_number(cell_at(row, COL_MENU3)),
            menu4: to_number(cell_at(row, COL_MENU4)),
            unique_users: to_number(cell_at(row, COL_USERS)),
            total_hits: to_number(cell_at(row, COL_TOTAL)),
        });
    }

    if records.is_empty() {
        return Err(StatsError::NoUsableRows {
            kind: TableKind::Monthly,
        });
    }

    let accepted_rows = records.len();
    let dataset = MonthlyDataset::new(records, menu_labels)?;

    Ok(Parsed {
        value: dataset,
        accepted_rows,
        skipped_rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
