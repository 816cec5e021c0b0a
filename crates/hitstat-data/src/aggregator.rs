//! Rollup statistics over monthly and daily datasets.

use std::collections::BTreeMap;

use hitstat_core::models::{DailyDataset, Metric, MonthlyDataset, MonthlyRecord};
use serde::{Deserialize, Serialize};

/// `round(sum / count)` with ties away from zero; `0` for an empty group.
pub fn rounded_average(sum: f64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (sum / count as f64).round() as i64
}

// ── MetricTotals ──────────────────────────────────────────────────────────────

/// Running sums of the six monthly metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    pub menu1: f64,
    pub menu2: f64,
    pub menu3: f64,
    pub menu4: f64,
    pub unique_users: f64,
    pub total_hits: f64,
    pub count: usize,
}

impl MetricTotals {
    /// Add one month's counters to the running totals.
    pub fn add_record(&mut self, record: &MonthlyRecord) {
        self.menu1 += record.menu1;
        self.menu2 += record.menu2;
        self.menu3 += record.menu3;
        self.menu4 += record.menu4;
        self.unique_users += record.unique_users;
        self.total_hits += record.total_hits;
        self.count += 1;
    }

    /// Sum of the four menu counters.
    pub fn menu_total(&self) -> f64 {
        self.menu1 + self.menu2 + self.menu3 + self.menu4
    }

    /// Sum for a single metric.
    pub fn sum(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Menu1 => self.menu1,
            Metric::Menu2 => self.menu2,
            Metric::Menu3 => self.menu3,
            Metric::Menu4 => self.menu4,
            Metric::UniqueUsers => self.unique_users,
            Metric::TotalHits => self.total_hits,
        }
    }

    /// Rounded per-month average for a single metric.
    pub fn average(&self, metric: Metric) -> i64 {
        rounded_average(self.sum(metric), self.count)
    }
}

// ── YearlyAggregate ───────────────────────────────────────────────────────────

/// Sums and rounded averages for one calendar year of monthly rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyAggregate {
    pub year: String,
    /// Number of monthly rows that fell into this year.
    pub count: usize,
    pub menu1_sum: f64,
    pub menu2_sum: f64,
    pub menu3_sum: f64,
    pub menu4_sum: f64,
    pub menu_all_sum: f64,
    pub user_sum: f64,
    pub hit_sum: f64,
    pub menu1_avg: i64,
    pub menu2_avg: i64,
    pub menu3_avg: i64,
    pub menu4_avg: i64,
    pub menu_all_avg: i64,
    pub user_avg: i64,
    pub hit_avg: i64,
}

impl YearlyAggregate {
    fn from_totals(year: String, totals: &MetricTotals) -> Self {
        let menu_all_sum = totals.menu_total();
        Self {
            year,
            count: totals.count,
            menu1_sum: totals.menu1,
            menu2_sum: totals.menu2,
            menu3_sum: totals.menu3,
            menu4_sum: totals.menu4,
            menu_all_sum,
            user_sum: totals.unique_users,
            hit_sum: totals.total_hits,
            menu1_avg: totals.average(Metric::Menu1),
            menu2_avg: totals.average(Metric::Menu2),
            menu3_avg: totals.average(Metric::Menu3),
            menu4_avg: totals.average(Metric::Menu4),
            menu_all_avg: rounded_average(menu_all_sum, totals.count),
            user_avg: totals.average(Metric::UniqueUsers),
            hit_avg: totals.average(Metric::TotalHits),
        }
    }
}

// ── MonthlyKpi ────────────────────────────────────────────────────────────────

/// Headline numbers for a monthly dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyKpi {
    /// Sums of all six metrics over every month.
    pub totals: MetricTotals,
    pub total_hit_sum: f64,
    pub total_user_sum: f64,
    pub total_menu_all_sum: f64,
    pub total_hit_avg: i64,
    pub total_user_avg: i64,
    pub total_menu_all_avg: i64,
    /// Month of the last row in upload order, which is not necessarily the
    /// chronologically latest month.
    pub latest_month: Option<String>,
    /// Aggregate for the lexicographically largest year.
    pub latest_year: Option<YearlyAggregate>,
    /// Every year, ascending.
    pub yearly: Vec<YearlyAggregate>,
}

// ── DailyDatasetStats ─────────────────────────────────────────────────────────

/// Per-dataset summary of a daily-users upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDatasetStats {
    pub id: String,
    pub file_name: String,
    pub avg: i64,
    pub max: f64,
    pub min: f64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days: usize,
}

// ── UsageAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing rollups over parsed datasets.
pub struct UsageAggregator;

impl UsageAggregator {
    /// Sum every metric over all months.
    pub fn calculate_totals(dataset: &MonthlyDataset) -> MetricTotals {
        let mut totals = MetricTotals::default();
        for record in dataset.records() {
            totals.add_record(record);
        }
        totals
    }

    /// Group months by year and compute per-year sums and averages.
    ///
    /// The year is the part of the month key before the first `-`; rows
    /// without one are left out. Returns years sorted ascending.
    pub fn aggregate_yearly(dataset: &MonthlyDataset) -> Vec<YearlyAggregate> {
        let mut map: BTreeMap<String, MetricTotals> = BTreeMap::new();

        for record in dataset.records() {
            let year = year_of(&record.month);
            if year.is_empty() {
                continue;
            }
            map.entry(year.to_string())
                .or_default()
                .add_record(record);
        }

        map.into_iter()
            .map(|(year, totals)| YearlyAggregate::from_totals(year, &totals))
            .collect()
    }

    /// Compute the headline KPIs of a monthly dataset.
    pub fn monthly_kpi(dataset: &MonthlyDataset) -> MonthlyKpi {
        let totals = Self::calculate_totals(dataset);
        let count = totals.count;
        let menu_all = totals.menu_total();

        let yearly = Self::aggregate_yearly(dataset);
        let latest_year = yearly.last().cloned();

        MonthlyKpi {
            total_hit_sum: totals.total_hits,
            total_user_sum: totals.unique_users,
            total_menu_all_sum: menu_all,
            total_hit_avg: rounded_average(totals.total_hits, count),
            total_user_avg: rounded_average(totals.unique_users, count),
            total_menu_all_avg: rounded_average(menu_all, count),
            latest_month: dataset.records().last().map(|r| r.month.clone()),
            latest_year,
            yearly,
            totals,
        }
    }

    /// Summarise one daily dataset. Each dataset is summarised on its own.
    pub fn daily_stats(dataset: &DailyDataset) -> DailyDatasetStats {
        let records = dataset.records();
        let sum: f64 = records.iter().map(|r| r.users).sum();
        let max = records
            .iter()
            .map(|r| r.users)
            .reduce(f64::max)
            .unwrap_or(0.0);
        let min = records
            .iter()
            .map(|r| r.users)
            .reduce(f64::min)
            .unwrap_or(0.0);

        DailyDatasetStats {
            id: dataset.id().to_string(),
            file_name: dataset.file_name().to_string(),
            avg: rounded_average(sum, records.len()),
            max,
            min,
            start_date: records.first().map(|r| r.date.clone()),
            end_date: records.last().map(|r| r.date.clone()),
            days: records.len(),
        }
    }

    /// Summaries for every dataset, in the order given.
    pub fn daily_stats_all(datasets: &[DailyDataset]) -> Vec<DailyDatasetStats> {
        datasets.iter().map(Self::daily_stats).collect()
    }
}

fn year_of(month: &str) -> &str {
    month.split('-').next().unwrap_or("")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
