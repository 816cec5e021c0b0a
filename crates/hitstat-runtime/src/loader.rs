//! Input discovery and grid decoding.
//!
//! Reading bytes is the only asynchronous step; decoding runs synchronously
//! once the bytes are in memory. Only the first worksheet of a workbook is
//! read.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use hitstat_core::cell::{grid_from_json, CellValue, RawGrid};
use hitstat_core::{Result, StatsError};
use tracing::{debug, warn};

/// Workbook extensions handed to the spreadsheet decoder.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// How a file's bytes are turned into a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A workbook decoded with calamine.
    Spreadsheet,
    /// A JSON array of row arrays.
    JsonGrid,
}

/// Pick the decoder for `path` from its extension (case-insensitive).
pub fn input_format(path: &Path) -> Option<InputFormat> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    if ext == "json" {
        Some(InputFormat::JsonGrid)
    } else if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
        Some(InputFormat::Spreadsheet)
    } else {
        None
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Expand `path` into the input files it names.
///
/// A file is returned as-is, whatever its extension. A directory is walked
/// recursively for supported files, sorted by path.
pub fn find_input_files(path: &Path) -> Vec<PathBuf> {
    if !path.exists() {
        warn!("Input path does not exist: {}", path.display());
        return Vec::new();
    }
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && input_format(entry.path()).is_some())
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!("Found {} input files under {}", files.len(), path.display());
    files
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Map one calamine cell onto the grid cell model.
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return CellValue::Number(dt.as_f64());
            }
            dt.as_datetime()
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(dt.as_f64()))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Decode the first worksheet of an in-memory workbook.
pub fn decode_workbook(bytes: Vec<u8>) -> Result<RawGrid> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| StatsError::Decode(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(StatsError::NoWorksheet)?
        .map_err(|e| StatsError::Decode(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

/// Decode a JSON array-of-arrays grid.
pub fn decode_json_grid(bytes: &[u8]) -> Result<RawGrid> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    if !value.is_array() {
        return Err(StatsError::Decode(
            "JSON grid must be an array of rows".to_string(),
        ));
    }
    Ok(grid_from_json(&value))
}

/// Decode `bytes` according to the extension of `path`.
pub fn decode_grid(path: &Path, bytes: Vec<u8>) -> Result<RawGrid> {
    match input_format(path) {
        Some(InputFormat::Spreadsheet) => decode_workbook(bytes),
        Some(InputFormat::JsonGrid) => decode_json_grid(&bytes),
        None => Err(StatsError::UnsupportedFile(path.to_path_buf())),
    }
}

/// Read `path` into memory and decode it into a grid.
pub async fn read_grid(path: &Path) -> Result<RawGrid> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| StatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    decode_grid(path, bytes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_input_format_by_extension() {
        assert_eq!(
            input_format(Path::new("stats.XLSX")),
            Some(InputFormat::Spreadsheet)
        );
        assert_eq!(
            input_format(Path::new("stats.ods")),
            Some(InputFormat::Spreadsheet)
        );
        assert_eq!(
            input_format(Path::new("grid.json")),
            Some(InputFormat::JsonGrid)
        );
        assert_eq!(input_format(Path::new("notes.txt")), None);
        assert_eq!(input_format(Path::new("README")), None);
    }

    #[test]
    fn test_find_input_files_walks_directory() {
        let tmp = TempDir::new().expect("tempdir");
        let nested = tmp.path().join("2024");
        std::fs::create_dir_all(&nested).expect("mkdir");
        std::fs::write(tmp.path().join("b.xlsx"), b"").expect("write");
        std::fs::write(nested.join("a.json"), b"[]").expect("write");
        std::fs::write(tmp.path().join("notes.txt"), b"").expect("write");

        let files = find_input_files(tmp.path());

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("b.xlsx")));
        assert!(files.iter().any(|p| p.ends_with("2024/a.json")));
    }

    #[test]
    fn test_find_input_files_single_file_and_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let file = tmp.path().join("notes.txt");
        std::fs::write(&file, b"").expect("write");

        assert_eq!(find_input_files(&file), vec![file]);
        assert!(find_input_files(&tmp.path().join("missing")).is_empty());
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_from_data(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(
            cell_from_data(&Data::String("Month".to_string())),
            CellValue::text("Month")
        );
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::text("true"));
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-03-05".to_string())),
            CellValue::Date(
                NaiveDate::from_ymd_opt(2024, 3, 5)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            )
        );
    }

    #[test]
    fn test_decode_json_grid() {
        let grid = decode_json_grid(br#"[["Date","Users"],["2024-01-01",10]]"#).expect("decode");
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][1], CellValue::Number(10.0));
    }

    #[test]
    fn test_decode_json_grid_rejects_non_array() {
        let err = decode_json_grid(br#"{"rows":[]}"#).unwrap_err();
        assert!(matches!(err, StatsError::Decode(_)));

        let err = decode_json_grid(b"not json").unwrap_err();
        assert!(matches!(err, StatsError::JsonParse(_)));
    }

    #[test]
    fn test_decode_workbook_rejects_garbage() {
        let err = decode_workbook(b"definitely not a workbook".to_vec()).unwrap_err();
        assert!(matches!(err, StatsError::Decode(_)));
    }

    #[test]
    fn test_decode_grid_unsupported_extension() {
        let err = decode_grid(Path::new("notes.txt"), Vec::new()).unwrap_err();
        assert!(matches!(err, StatsError::UnsupportedFile(_)));
    }

    #[tokio::test]
    async fn test_read_grid_from_json_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("daily.json");
        std::fs::write(&path, br#"[["Date","Users"],["2024.01.01","1,500"]]"#).expect("write");

        let grid = read_grid(&path).await.expect("read");

        assert_eq!(grid[1][0], CellValue::text("2024.01.01"));
        assert_eq!(grid[1][1], CellValue::text("1,500"));
    }

    #[tokio::test]
    async fn test_read_grid_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        let err = read_grid(&tmp.path().join("gone.xlsx")).await.unwrap_err();
        assert!(matches!(err, StatsError::FileRead { .. }));
        assert_eq!(err.user_message(), "failed to read or parse the file");
    }
}
