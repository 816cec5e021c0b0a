use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, StatsError};

/// The table shapes the ingestion pipeline knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableKind {
    /// Month, four menu hit counters, unique users, total hits.
    Monthly,
    /// Date and daily active users.
    DailyUsers,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Monthly => write!(f, "monthly"),
            TableKind::DailyUsers => write!(f, "daily users"),
        }
    }
}

// ── Monthly ───────────────────────────────────────────────────────────────────

/// One of the six counters carried by a monthly row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Menu1,
    Menu2,
    Menu3,
    Menu4,
    UniqueUsers,
    TotalHits,
}

impl Metric {
    /// All metrics in column order.
    pub const ALL: [Metric; 6] = [
        Metric::Menu1,
        Metric::Menu2,
        Metric::Menu3,
        Metric::Menu4,
        Metric::UniqueUsers,
        Metric::TotalHits,
    ];

    /// The four menu counters.
    pub const MENUS: [Metric; 4] = [Metric::Menu1, Metric::Menu2, Metric::Menu3, Metric::Menu4];
}

/// A single month of menu-hit statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    /// Month key, normally `YYYY-MM`.
    pub month: String,
    pub menu1: f64,
    pub menu2: f64,
    pub menu3: f64,
    pub menu4: f64,
    pub unique_users: f64,
    pub total_hits: f64,
}

impl MonthlyRecord {
    /// Value of `metric` for this month.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Menu1 => self.menu1,
            Metric::Menu2 => self.menu2,
            Metric::Menu3 => self.menu3,
            Metric::Menu4 => self.menu4,
            Metric::UniqueUsers => self.unique_users,
            Metric::TotalHits => self.total_hits,
        }
    }

    /// Sum of the four menu counters.
    pub fn menu_total(&self) -> f64 {
        self.menu1 + self.menu2 + self.menu3 + self.menu4
    }
}

/// Display names for the four menu columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuLabels {
    pub menu1: String,
    pub menu2: String,
    pub menu3: String,
    pub menu4: String,
}

impl Default for MenuLabels {
    fn default() -> Self {
        Self {
            menu1: "Menu1".to_string(),
            menu2: "Menu2".to_string(),
            menu3: "Menu3".to_string(),
            menu4: "Menu4".to_string(),
        }
    }
}

impl MenuLabels {
    /// Label for a menu metric. Non-menu metrics get their fixed series name.
    pub fn label(&self, metric: Metric) -> &str {
        match metric {
            Metric::Menu1 => &self.menu1,
            Metric::Menu2 => &self.menu2,
            Metric::Menu3 => &self.menu3,
            Metric::Menu4 => &self.menu4,
            Metric::UniqueUsers => "Unique Users",
            Metric::TotalHits => "Total Hits",
        }
    }

    /// Mutable slot for a menu label; `None` for non-menu metrics.
    pub fn label_mut(&mut self, metric: Metric) -> Option<&mut String> {
        match metric {
            Metric::Menu1 => Some(&mut self.menu1),
            Metric::Menu2 => Some(&mut self.menu2),
            Metric::Menu3 => Some(&mut self.menu3),
            Metric::Menu4 => Some(&mut self.menu4),
            Metric::UniqueUsers | Metric::TotalHits => None,
        }
    }
}

/// Validated monthly table: rows in source order plus menu labels.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDataset {
    records: Vec<MonthlyRecord>,
    menu_labels: MenuLabels,
}

impl MonthlyDataset {
    /// Build a dataset, rejecting an empty record list.
    pub fn new(records: Vec<MonthlyRecord>, menu_labels: MenuLabels) -> Result<Self> {
        if records.is_empty() {
            return Err(StatsError::NoUsableRows {
                kind: TableKind::Monthly,
            });
        }
        Ok(Self {
            records,
            menu_labels,
        })
    }

    /// Records in source row order (not necessarily chronological).
    pub fn records(&self) -> &[MonthlyRecord] {
        &self.records
    }

    pub fn menu_labels(&self) -> &MenuLabels {
        &self.menu_labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Month keys in source order.
    pub fn months(&self) -> Vec<String> {
        self.records.iter().map(|r| r.month.clone()).collect()
    }

    /// One metric as a column, in source order.
    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.value(metric)).collect()
    }
}

// ── Daily ─────────────────────────────────────────────────────────────────────

/// Active users on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Date key, normally `YYYY-MM-DD`.
    pub date: String,
    pub users: f64,
}

/// One uploaded daily-users file. Datasets are independent and never merge.
///
/// Records are sorted ascending by `date` and never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDataset {
    id: String,
    file_name: String,
    records: Vec<DailyRecord>,
}

impl DailyDataset {
    /// Build a dataset, sorting `records` by date. Rejects an empty list.
    ///
    /// The sort compares date strings lexicographically, which is only
    /// chronological for zero-padded `YYYY-MM-DD` keys.
    pub fn new(
        id: impl Into<String>,
        file_name: impl Into<String>,
        mut records: Vec<DailyRecord>,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(StatsError::NoUsableRows {
                kind: TableKind::DailyUsers,
            });
        }
        sort_by_date(&mut records);
        Ok(Self {
            id: id.into(),
            file_name: file_name.into(),
            records,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Stable ascending sort on the date string.
pub fn sort_by_date(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| a.date.cmp(&b.date));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: &str, base: f64) -> MonthlyRecord {
        MonthlyRecord {
            month: month.to_string(),
            menu1: base,
            menu2: base + 1.0,
            menu3: base + 2.0,
            menu4: base + 3.0,
            unique_users: base * 10.0,
            total_hits: base * 100.0,
        }
    }

    #[test]
    fn test_monthly_dataset_rejects_empty() {
        let err = MonthlyDataset::new(vec![], MenuLabels::default()).unwrap_err();
        assert!(matches!(
            err,
            StatsError::NoUsableRows {
                kind: TableKind::Monthly
            }
        ));
    }

    #[test]
    fn test_monthly_dataset_columns_follow_source_order() {
        let ds = MonthlyDataset::new(
            vec![record("2024-02", 2.0), record("2024-01", 1.0)],
            MenuLabels::default(),
        )
        .unwrap();

        assert_eq!(ds.months(), vec!["2024-02", "2024-01"]);
        assert_eq!(ds.column(Metric::Menu1), vec![2.0, 1.0]);
        assert_eq!(ds.column(Metric::TotalHits), vec![200.0, 100.0]);
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_menu_total() {
        assert_eq!(record("2024-01", 1.0).menu_total(), 10.0);
    }

    #[test]
    fn test_menu_labels_default_and_lookup() {
        let mut labels = MenuLabels::default();
        assert_eq!(labels.label(Metric::Menu3), "Menu3");
        assert_eq!(labels.label(Metric::TotalHits), "Total Hits");

        *labels.label_mut(Metric::Menu2).unwrap() = "Search".to_string();
        assert_eq!(labels.menu2, "Search");
        assert!(labels.label_mut(Metric::UniqueUsers).is_none());
    }

    #[test]
    fn test_daily_dataset_sorts_on_construction() {
        let ds = DailyDataset::new(
            "id-1",
            "users.xlsx",
            vec![
                DailyRecord {
                    date: "2024-01-02".to_string(),
                    users: 5.0,
                },
                DailyRecord {
                    date: "2024-01-01".to_string(),
                    users: 9.0,
                },
            ],
        )
        .unwrap();

        let dates: Vec<&str> = ds.records().iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(ds.id(), "id-1");
        assert_eq!(ds.file_name(), "users.xlsx");
    }

    #[test]
    fn test_daily_dataset_rejects_empty() {
        let err = DailyDataset::new("x", "y.xlsx", vec![]).unwrap_err();
        assert!(matches!(
            err,
            StatsError::NoUsableRows {
                kind: TableKind::DailyUsers
            }
        ));
    }

    #[test]
    fn test_table_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&TableKind::DailyUsers).unwrap(),
            "\"dailyUsers\""
        );
        assert_eq!(serde_json::to_string(&TableKind::Monthly).unwrap(), "\"monthly\"");
    }
}
