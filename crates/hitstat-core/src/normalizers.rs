//! Cell normalizers.
//!
//! Exported sheets mix decoded date cells with free-text dates and numbers
//! typed as text. These helpers coerce a single [`CellValue`] into the
//! canonical month (`YYYY-MM`), date (`YYYY-MM-DD`) or numeric form. None of
//! them fail: unusable input yields the empty string or `0`.

use std::sync::OnceLock;

use chrono::Datelike;
use regex::Regex;

use crate::cell::CellValue;

fn month_or_date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}(-[0-9]{2})?$").expect("regex is valid"))
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("regex is valid"))
}

/// `true` when `s` is a zero-padded `YYYY-MM-DD` string.
pub fn is_canonical_date(s: &str) -> bool {
    date_pattern().is_match(s)
}

// ── Month ─────────────────────────────────────────────────────────────────────

/// Coerce a cell into a `YYYY-MM` month key.
///
/// * date cell → `YYYY-MM` from its calendar fields
/// * `YYYY-MM` / `YYYY-MM-DD` text → first seven characters
/// * any other text → trimmed, lowercased passthrough
/// * empty → `""`
///
/// ```
/// use hitstat_core::cell::CellValue;
/// use hitstat_core::normalizers::normalize_month;
///
/// assert_eq!(normalize_month(&CellValue::text("2024-03-15")), "2024-03");
/// assert_eq!(normalize_month(&CellValue::text(" JAN 2024 ")), "jan 2024");
/// assert_eq!(normalize_month(&CellValue::Empty), "");
/// ```
pub fn normalize_month(value: &CellValue) -> String {
    if value.is_blank() {
        return String::new();
    }

    if let CellValue::Date(dt) = value {
        return format!("{:04}-{:02}", dt.year(), dt.month());
    }

    let raw = value.display_text().to_lowercase().trim().to_string();

    if month_or_date_pattern().is_match(&raw) {
        if let Some(month) = raw.get(..7) {
            return month.to_string();
        }
    }

    raw
}

// ── Date ──────────────────────────────────────────────────────────────────────

/// Coerce a cell into a `YYYY-MM-DD` date key.
///
/// Dotted and slashed separators are rewritten to dashes. Text that still
/// does not look like a date is returned trimmed but otherwise unchanged.
///
/// ```
/// use hitstat_core::cell::CellValue;
/// use hitstat_core::normalizers::normalize_date;
///
/// assert_eq!(normalize_date(&CellValue::text("2024.03.05")), "2024-03-05");
/// assert_eq!(normalize_date(&CellValue::text("2024/03/05")), "2024-03-05");
/// ```
pub fn normalize_date(value: &CellValue) -> String {
    match value {
        CellValue::Empty => return String::new(),
        CellValue::Number(n) if *n == 0.0 || n.is_nan() => return String::new(),
        CellValue::Date(dt) => {
            return format!("{:04}-{:02}-{:02}", dt.year(), dt.month(), dt.day());
        }
        _ => {}
    }

    let raw = value.display_text().trim().to_string();

    if is_canonical_date(&raw) {
        return raw;
    }

    let replaced = raw.replace(['.', '/'], "-");
    if is_canonical_date(&replaced) {
        return replaced;
    }

    raw
}

// ── Number ────────────────────────────────────────────────────────────────────

/// Coerce a cell into a number.
///
/// Numeric cells pass through unchanged (no clamping). Text has thousands
/// separators stripped before parsing. Anything unparseable or non-finite
/// (`inf`, `NaN`) becomes `0.0`.
///
/// ```
/// use hitstat_core::cell::CellValue;
/// use hitstat_core::normalizers::to_number;
///
/// assert_eq!(to_number(&CellValue::text("1,234")), 1234.0);
/// assert_eq!(to_number(&CellValue::text("abc")), 0.0);
/// assert_eq!(to_number(&CellValue::Number(42.0)), 42.0);
/// ```
pub fn to_number(value: &CellValue) -> f64 {
    match value {
        CellValue::Empty | CellValue::Date(_) => 0.0,
        CellValue::Number(n) if n.is_nan() => 0.0,
        CellValue::Number(n) => *n,
        CellValue::Text(s) => {
            let cleaned = s.replace(',', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return 0.0;
            }
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => n,
                _ => 0.0,
            }
        }
    }
}
