//! Text and JSON reports printed to stdout.

use std::fmt::Write;

use hitstat_core::formatting::{format_count, or_dash};
use hitstat_data::aggregator::{DailyDatasetStats, MonthlyKpi, YearlyAggregate};
use hitstat_runtime::session::SessionState;
use hitstat_runtime::upload::{display_name, FileReport};
use serde_json::{json, Value};

/// Render the human-readable report.
pub fn render_table(session: &SessionState, reports: &[FileReport]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Uploads");
    for report in reports {
        let _ = writeln!(out, "  {}", report.message());
    }

    if let (Some(source), Some(kpi)) = (session.monthly(), session.monthly_kpi()) {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Monthly ({}, {} months)",
            source.file_name,
            source.dataset.len()
        );
        write_monthly_kpi(&mut out, &kpi);
    }

    let stats = session.daily_stats();
    if !stats.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Daily users");
        for s in &stats {
            write_daily_stats(&mut out, s);
        }
    }

    out
}

fn write_monthly_kpi(out: &mut String, kpi: &MonthlyKpi) {
    let _ = writeln!(
        out,
        "  Total hits     {:>14}   avg/month {:>10}",
        format_count(kpi.total_hit_sum),
        format_count(kpi.total_hit_avg as f64)
    );
    let _ = writeln!(
        out,
        "  Unique users   {:>14}   avg/month {:>10}",
        format_count(kpi.total_user_sum),
        format_count(kpi.total_user_avg as f64)
    );
    let _ = writeln!(
        out,
        "  Menu hits      {:>14}   avg/month {:>10}",
        format_count(kpi.total_menu_all_sum),
        format_count(kpi.total_menu_all_avg as f64)
    );
    let _ = writeln!(out, "  Latest month   {}", or_dash(kpi.latest_month.as_deref()));
    if let Some(year) = &kpi.latest_year {
        let _ = writeln!(
            out,
            "  Latest year    {} ({} months)  hits {}  users {}  menus {}",
            year.year,
            year.count,
            format_count(year.hit_sum),
            format_count(year.user_sum),
            format_count(year.menu_all_sum)
        );
    }

    if !kpi.yearly.is_empty() {
        let _ = writeln!(
            out,
            "  {:<6} {:>6} {:>14} {:>10} {:>14} {:>10} {:>14} {:>10}",
            "Year", "Months", "Hits", "Avg", "Users", "Avg", "Menus", "Avg"
        );
        for year in &kpi.yearly {
            write_year_row(out, year);
        }
    }
}

fn write_year_row(out: &mut String, y: &YearlyAggregate) {
    let _ = writeln!(
        out,
        "  {:<6} {:>6} {:>14} {:>10} {:>14} {:>10} {:>14} {:>10}",
        y.year,
        y.count,
        format_count(y.hit_sum),
        format_count(y.hit_avg as f64),
        format_count(y.user_sum),
        format_count(y.user_avg as f64),
        format_count(y.menu_all_sum),
        format_count(y.menu_all_avg as f64)
    );
}

fn write_daily_stats(out: &mut String, s: &DailyDatasetStats) {
    let _ = writeln!(
        out,
        "  {} [{}]  {} .. {}  days {}  avg {}  min {}  max {}",
        s.file_name,
        s.id,
        or_dash(s.start_date.as_deref()),
        or_dash(s.end_date.as_deref()),
        s.days,
        format_count(s.avg as f64),
        format_count(s.min),
        format_count(s.max)
    );
}

/// Build the JSON report: per-file outcomes plus the session snapshot.
pub fn render_json(session: &SessionState, reports: &[FileReport]) -> serde_json::Result<Value> {
    let uploads: Vec<Value> = reports
        .iter()
        .map(|r| {
            json!({
                "file": display_name(&r.path),
                "ok": r.is_success(),
                "message": r.message(),
            })
        })
        .collect();

    Ok(json!({
        "uploads": uploads,
        "session": serde_json::to_value(session.snapshot())?,
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
