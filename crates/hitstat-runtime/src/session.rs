//! Session-scoped dataset state.
//!
//! [`SessionState`] is owned by the composition root and passed by reference
//! to whatever handles uploads. It holds at most one monthly dataset, which
//! each monthly upload replaces wholesale, and an append-only list of daily
//! datasets that shrinks only through [`SessionState::remove_daily`] or
//! [`SessionState::reset`]. Datasets are immutable once stored.

use std::fmt;

use hitstat_core::cell::Row;
use hitstat_core::models::{DailyDataset, MonthlyDataset};
use hitstat_core::{Result, StatsError};
use hitstat_data::aggregator::{DailyDatasetStats, MonthlyKpi, UsageAggregator};
use hitstat_data::charts::{daily_users_chart, menu_hits_chart, users_and_hits_chart, LineChart};
use hitstat_data::ingest::{ingest_grid, ParseOutcome};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ── Public types ──────────────────────────────────────────────────────────────

/// The active monthly dataset and the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySource {
    pub file_name: String,
    pub dataset: MonthlyDataset,
}

/// What a successful upload changed.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The monthly dataset was replaced.
    MonthlyReplaced {
        file_name: String,
        months: usize,
        skipped_rows: usize,
    },
    /// A new daily dataset was appended.
    DailyAdded {
        id: String,
        file_name: String,
        days: usize,
        skipped_rows: usize,
    },
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadOutcome::MonthlyReplaced { .. } => write!(f, "classified as monthly"),
            UploadOutcome::DailyAdded { .. } => write!(f, "classified as daily"),
        }
    }
}

/// Read-only view of the whole session for the presentation boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub monthly: Option<MonthlySource>,
    pub monthly_kpi: Option<MonthlyKpi>,
    pub monthly_charts: Vec<LineChart>,
    pub daily: Vec<DailyDataset>,
    pub daily_stats: Vec<DailyDatasetStats>,
    pub daily_charts: Vec<LineChart>,
}

// ── SessionState ──────────────────────────────────────────────────────────────

/// Uploaded datasets for one session.
#[derive(Debug, Default)]
pub struct SessionState {
    monthly: Option<MonthlySource>,
    daily: Vec<DailyDataset>,
}

impl SessionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Uploads ───────────────────────────────────────────────────────────

    /// Classify and parse one decoded grid, then store the result.
    ///
    /// A monthly grid replaces the current monthly dataset; a daily grid is
    /// appended under a fresh identifier. On failure the session is left
    /// untouched.
    pub fn apply_grid(&mut self, file_name: &str, rows: &[Row]) -> Result<UploadOutcome> {
        let outcome = match ingest_grid(rows) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(file = file_name, error = %e, "upload rejected");
                return Err(e);
            }
        };

        let result = match outcome {
            ParseOutcome::Monthly(parsed) => {
                let months = parsed.value.len();
                self.monthly = Some(MonthlySource {
                    file_name: file_name.to_string(),
                    dataset: parsed.value,
                });
                UploadOutcome::MonthlyReplaced {
                    file_name: file_name.to_string(),
                    months,
                    skipped_rows: parsed.skipped_rows,
                }
            }
            ParseOutcome::Daily(parsed) => {
                let id = new_dataset_id();
                let dataset = DailyDataset::new(id.clone(), file_name, parsed.value)?;
                let days = dataset.len();
                self.daily.push(dataset);
                UploadOutcome::DailyAdded {
                    id,
                    file_name: file_name.to_string(),
                    days,
                    skipped_rows: parsed.skipped_rows,
                }
            }
        };

        info!(file = file_name, outcome = %result, "upload applied");
        Ok(result)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn monthly(&self) -> Option<&MonthlySource> {
        self.monthly.as_ref()
    }

    pub fn daily_datasets(&self) -> &[DailyDataset] {
        &self.daily
    }

    /// Look up a daily dataset by identifier.
    pub fn daily(&self, id: &str) -> Option<&DailyDataset> {
        self.daily.iter().find(|d| d.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.is_none() && self.daily.is_empty()
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Remove one daily dataset. Other datasets are unaffected.
    pub fn remove_daily(&mut self, id: &str) -> Result<DailyDataset> {
        let pos = self
            .daily
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| StatsError::DatasetNotFound(id.to_string()))?;
        let removed = self.daily.remove(pos);
        debug!(id, file = removed.file_name(), "daily dataset removed");
        Ok(removed)
    }

    /// Drop the monthly dataset, returning it if there was one.
    pub fn clear_monthly(&mut self) -> Option<MonthlySource> {
        self.monthly.take()
    }

    /// Drop every dataset.
    pub fn reset(&mut self) {
        self.monthly = None;
        self.daily.clear();
        debug!("session reset");
    }

    // ── Derived views ─────────────────────────────────────────────────────

    /// KPIs of the monthly dataset, if one is loaded.
    pub fn monthly_kpi(&self) -> Option<MonthlyKpi> {
        self.monthly
            .as_ref()
            .map(|m| UsageAggregator::monthly_kpi(&m.dataset))
    }

    /// Stats for every daily dataset, in upload order.
    pub fn daily_stats(&self) -> Vec<DailyDatasetStats> {
        UsageAggregator::daily_stats_all(&self.daily)
    }

    /// Stats for one daily dataset.
    pub fn daily_stats_by_id(&self, id: &str) -> Option<DailyDatasetStats> {
        self.daily(id).map(UsageAggregator::daily_stats)
    }

    /// Snapshot everything the presentation layer consumes.
    pub fn snapshot(&self) -> SessionSnapshot {
        let monthly_charts = self
            .monthly
            .as_ref()
            .map(|m| vec![menu_hits_chart(&m.dataset), users_and_hits_chart(&m.dataset)])
            .unwrap_or_default();

        let daily_stats = self.daily_stats();
        let daily_charts = self
            .daily
            .iter()
            .zip(daily_stats.iter())
            .map(|(ds, stats)| daily_users_chart(ds, Some(stats)))
            .collect();

        SessionSnapshot {
            monthly: self.monthly.clone(),
            monthly_kpi: self.monthly_kpi(),
            monthly_charts,
            daily: self.daily.clone(),
            daily_stats,
            daily_charts,
        }
    }
}

fn new_dataset_id() -> String {
    Uuid::new_v4().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
