//! Chart-ready series for the presentation layer.
//!
//! Only data lives here: categories, named series and titles. Colours,
//! axes and other styling belong to whoever renders the chart.

use hitstat_core::formatting::format_count;
use hitstat_core::models::{DailyDataset, Metric, MonthlyDataset};
use serde::{Deserialize, Serialize};

use crate::aggregator::DailyDatasetStats;

/// One named line of values aligned with the chart categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub data: Vec<f64>,
}

/// A category-axis line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineChart {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    /// Names of every series, in order. Used as the chart legend.
    pub fn legend(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }
}

fn metric_series(dataset: &MonthlyDataset, metric: Metric) -> ChartSeries {
    ChartSeries {
        name: dataset.menu_labels().label(metric).to_string(),
        data: dataset.column(metric),
    }
}

/// Monthly hits per menu, one series per menu named by its label.
pub fn menu_hits_chart(dataset: &MonthlyDataset) -> LineChart {
    LineChart {
        title: "Monthly hits by menu".to_string(),
        subtitle: None,
        categories: dataset.months(),
        series: Metric::MENUS
            .iter()
            .map(|m| metric_series(dataset, *m))
            .collect(),
    }
}

/// Monthly unique users against total hits.
pub fn users_and_hits_chart(dataset: &MonthlyDataset) -> LineChart {
    LineChart {
        title: "Monthly unique users / total hits".to_string(),
        subtitle: None,
        categories: dataset.months(),
        series: vec![
            metric_series(dataset, Metric::UniqueUsers),
            metric_series(dataset, Metric::TotalHits),
        ],
    }
}

/// Daily users for one dataset, with a day-count/average/max subtitle when
/// stats are supplied.
pub fn daily_users_chart(dataset: &DailyDataset, stats: Option<&DailyDatasetStats>) -> LineChart {
    let records = dataset.records();
    LineChart {
        title: "Daily users".to_string(),
        subtitle: stats.map(|s| {
            format!(
                "Days: {} / Avg: {} / Max: {}",
                s.days,
                format_count(s.avg as f64),
                format_count(s.max)
            )
        }),
        categories: records.iter().map(|r| r.date.clone()).collect(),
        series: vec![ChartSeries {
            name: "Users".to_string(),
            data: records.iter().map(|r| r.users).collect(),
        }],
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::UsageAggregator;
    use hitstat_core::models::{DailyRecord, MenuLabels, MonthlyRecord};

    fn monthly() -> MonthlyDataset {
        let labels = MenuLabels {
            menu1: "Search".to_string(),
            ..MenuLabels::default()
        };
        MonthlyDataset::new(
            vec![
                MonthlyRecord {
                    month: "2024-01".to_string(),
                    menu1: 1.0,
                    menu2: 2.0,
                    menu3: 3.0,
                    menu4: 4.0,
                    unique_users: 50.0,
                    total_hits: 1500.0,
                },
                MonthlyRecord {
                    month: "2024-02".to_string(),
                    menu1: 5.0,
                    menu2: 6.0,
                    menu3: 7.0,
                    menu4: 8.0,
                    unique_users: 60.0,
                    total_hits: 1600.0,
                },
            ],
            labels,
        )
        .unwrap()
    }

    #[test]
    fn test_menu_hits_chart() {
        let chart = menu_hits_chart(&monthly());

        assert_eq!(chart.categories, vec!["2024-01", "2024-02"]);
        assert_eq!(chart.legend(), vec!["Search", "Menu2", "Menu3", "Menu4"]);
        assert_eq!(chart.series[0].data, vec![1.0, 5.0]);
        assert_eq!(chart.series[3].data, vec![4.0, 8.0]);
    }

    #[test]
    fn test_users_and_hits_chart() {
        let chart = users_and_hits_chart(&monthly());

        assert_eq!(chart.legend(), vec!["Unique Users", "Total Hits"]);
        assert_eq!(chart.series[0].data, vec![50.0, 60.0]);
        assert_eq!(chart.series[1].data, vec![1500.0, 1600.0]);
    }

    #[test]
    fn test_daily_users_chart_with_subtitle() {
        let ds = DailyDataset::new(
            "d1",
            "users.xlsx",
            vec![
                DailyRecord {
                    date: "2024-01-02".to_string(),
                    users: 1200.0,
                },
                DailyRecord {
                    date: "2024-01-01".to_string(),
                    users: 800.0,
                },
            ],
        )
        .unwrap();
        let stats = UsageAggregator::daily_stats(&ds);

        let chart = daily_users_chart(&ds, Some(&stats));

        assert_eq!(chart.categories, vec!["2024-01-01", "2024-01-02"]);
        assert_eq!(chart.series[0].data, vec![800.0, 1200.0]);
        assert_eq!(
            chart.subtitle.as_deref(),
            Some("Days: 2 / Avg: 1,000 / Max: 1,200")
        );

        let bare = daily_users_chart(&ds, None);
        assert!(bare.subtitle.is_none());
    }
}
