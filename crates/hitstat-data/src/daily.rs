//! Daily active-user table parser.

use hitstat_core::cell::{cell_at, CellValue, Row};
use hitstat_core::models::{sort_by_date, DailyRecord, TableKind};
use hitstat_core::normalizers::{is_canonical_date, normalize_date, to_number};
use hitstat_core::{Result, StatsError};
use tracing::{debug, warn};

use crate::ingest::Parsed;

const COL_DATE: usize = 0;
const COL_USERS: usize = 1;

/// `true` when the first cell of `row` is text mentioning "date".
pub fn has_date_header(row: &[CellValue]) -> bool {
    cell_at(row, COL_DATE)
        .as_text()
        .map(|s| s.to_lowercase().contains("date"))
        .unwrap_or(false)
}

/// Parse a grid already classified as daily users.
///
/// Rows whose date cell normalises to the empty string are skipped. The
/// accepted rows come back sorted ascending by date string. Fails with
/// [`StatsError::NoUsableRows`] when nothing survives.
pub fn parse_daily(rows: &[Row]) -> Result<Parsed<Vec<DailyRecord>>> {
    let data_rows = match rows.first() {
        Some(first) if has_date_header(first) => &rows[1..],
        _ => rows,
    };

    let mut records = Vec::with_capacity(data_rows.len());
    let mut skipped_rows = 0usize;
    let mut irregular_dates = 0usize;

    for (idx, row) in data_rows.iter().enumerate() {
        let date = normalize_date(cell_at(row, COL_DATE));
        if date.is_empty() {
            debug!(row = idx, "skipping daily row without a date");
            skipped_rows += 1;
            continue;
        }
        if !is_canonical_date(&date) {
            irregular_dates += 1;
        }

        records.push(DailyRecord {
            date,
            users: to_number(cell_at(row, COL_USERS)),
        });
    }

    if records.is_empty() {
        return Err(StatsError::NoUsableRows {
            kind: TableKind::DailyUsers,
        });
    }

    if irregular_dates > 0 {
        warn!(
            count = irregular_dates,
            "daily rows with non YYYY-MM-DD dates; date ordering may be off"
        );
    }

    sort_by_date(&mut records);

    Ok(Parsed {
        accepted_rows: records.len(),
        value: records,
        skipped_rows,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
