//! Ingestion entry point: raw grid → classification → typed dataset.

use hitstat_core::cell::Row;
use hitstat_core::models::{DailyRecord, MonthlyDataset, TableKind};
use hitstat_core::{Result, StatsError};
use tracing::{debug, info};

use crate::classifier::{classify, FileKind};
use crate::daily::parse_daily;
use crate::monthly::parse_monthly;

/// Minimum number of rows a grid needs before it is classified.
pub const MIN_GRID_ROWS: usize = 2;

/// A successfully parsed value plus the row accounting behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// Data rows that made it into `value`.
    pub accepted_rows: usize,
    /// Data rows dropped because their month/date cell was empty.
    pub skipped_rows: usize,
}

impl<T> Parsed<T> {
    /// `true` when at least one data row was silently dropped.
    pub fn has_skipped_rows(&self) -> bool {
        self.skipped_rows > 0
    }
}

/// A grid that was classified and parsed into one of the known shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    Monthly(Parsed<MonthlyDataset>),
    Daily(Parsed<Vec<DailyRecord>>),
}

impl ParseOutcome {
    pub fn kind(&self) -> TableKind {
        match self {
            ParseOutcome::Monthly(_) => TableKind::Monthly,
            ParseOutcome::Daily(_) => TableKind::DailyUsers,
        }
    }

    pub fn skipped_rows(&self) -> usize {
        match self {
            ParseOutcome::Monthly(p) => p.skipped_rows,
            ParseOutcome::Daily(p) => p.skipped_rows,
        }
    }
}

/// Classify `rows` and run the matching parser.
///
/// All-or-nothing: either every accepted row is in the returned dataset, or
/// an error names why nothing was produced.
pub fn ingest_grid(rows: &[Row]) -> Result<ParseOutcome> {
    if rows.len() < MIN_GRID_ROWS {
        return Err(StatsError::EmptyInput { rows: rows.len() });
    }

    let kind = classify(rows);
    debug!(%kind, rows = rows.len(), "ingesting grid");

    let outcome = match kind {
        FileKind::Monthly => ParseOutcome::Monthly(parse_monthly(rows)?),
        FileKind::DailyUsers => ParseOutcome::Daily(parse_daily(rows)?),
        FileKind::Unknown => return Err(StatsError::UnclassifiableFormat),
    };

    info!(
        kind = %outcome.kind(),
        skipped = outcome.skipped_rows(),
        "grid parsed"
    );

    Ok(outcome)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
