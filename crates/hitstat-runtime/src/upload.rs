//! Upload driver.
//!
//! File reads run concurrently; each decoded grid is then applied to the
//! session one at a time, in the order the reads complete. Classification,
//! parsing and aggregation for a file finish before the next grid is applied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::anyhow;
use hitstat_core::cell::RawGrid;
use hitstat_core::{Result, StatsError};
use tokio::task::{Id, JoinSet};
use tracing::warn;

use crate::loader::read_grid;
use crate::session::{SessionState, UploadOutcome};

/// Result of uploading one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<UploadOutcome>,
}

impl FileReport {
    /// One line for the user: the file name and what happened to it.
    pub fn message(&self) -> String {
        let name = display_name(&self.path);
        match &self.result {
            Ok(outcome) => format!("{name}: {outcome}"),
            Err(e) => format!("{name}: {}", e.user_message()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// File name shown to the user and stored on datasets.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read `paths` concurrently and apply each grid to `session` as it arrives.
///
/// Reports come back in completion order, so when several files finish
/// close together the order of appended daily datasets is not fixed. Every
/// path gets a report, including one whose read task crashed.
pub async fn upload_all(session: &mut SessionState, paths: Vec<PathBuf>) -> Vec<FileReport> {
    let mut reads = JoinSet::new();
    let mut pending = HashMap::new();
    for path in paths {
        let task_path = path.clone();
        let handle = reads.spawn(async move { read_grid(&task_path).await });
        pending.insert(handle.id(), path);
    }

    apply_reads(session, reads, pending).await
}

/// Drain `reads`, applying each grid to `session` and mapping task ids back
/// to the path they were reading.
async fn apply_reads(
    session: &mut SessionState,
    mut reads: JoinSet<Result<RawGrid>>,
    mut pending: HashMap<Id, PathBuf>,
) -> Vec<FileReport> {
    let mut reports = Vec::new();
    while let Some(joined) = reads.join_next_with_id().await {
        let (id, grid) = match joined {
            Ok((id, grid)) => (id, grid),
            Err(e) => {
                warn!(error = %e, "file read task failed");
                let id = e.id();
                (id, Err(StatsError::Other(anyhow!("file read task failed: {e}"))))
            }
        };

        let Some(path) = pending.remove(&id) else {
            continue;
        };

        let result = match grid {
            Ok(rows) => session.apply_grid(&display_name(&path), &rows),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not load file");
                Err(e)
            }
        };

        reports.push(FileReport { path, result });
    }

    reports
}

/// Upload a single file.
pub async fn upload_file(session: &mut SessionState, path: &Path) -> FileReport {
    let result = match read_grid(path).await {
        Ok(rows) => session.apply_grid(&display_name(path), &rows),
        Err(e) => Err(e),
    };
    FileReport {
        path: path.to_path_buf(),
        result,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).expect("write");
        path
    }

    #[tokio::test]
    async fn test_upload_all_mixed_files() {
        let tmp = TempDir::new().expect("tempdir");
        let monthly = write(
            &tmp,
            "monthly.json",
            r#"[["Month","Search","Notice","Board","FAQ","Users","Total"],
                ["2024-01",10,20,30,40,50,150],
                ["2024-02",11,21,31,41,51,160]]"#,
        );
        let daily = write(
            &tmp,
            "daily.json",
            r#"[["Date","Users"],["2024-01-02",5],["2024-01-01",9]]"#,
        );
        let unknown = write(&tmp, "odd.json", r#"[["A","B"],["x","y","z"]]"#);
        let missing = tmp.path().join("missing.json");

        let mut session = SessionState::new();
        let reports = upload_all(
            &mut session,
            vec![monthly, daily, unknown, missing.clone()],
        )
        .await;

        assert_eq!(reports.len(), 4);
        assert_eq!(reports.iter().filter(|r| r.is_success()).count(), 2);

        let missing_report = reports.iter().find(|r| r.path == missing).unwrap();
        assert_eq!(
            missing_report.message(),
            "missing.json: failed to read or parse the file"
        );

        let odd = reports
            .iter()
            .find(|r| r.path.ends_with("odd.json"))
            .unwrap();
        assert_eq!(odd.message(), "odd.json: format unrecognized");

        let kpi = session.monthly_kpi().unwrap();
        assert_eq!(kpi.total_hit_sum, 310.0);
        assert_eq!(session.monthly().unwrap().dataset.menu_labels().menu1, "Search");

        let stats = session.daily_stats();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].start_date.as_deref(), Some("2024-01-01"));
        assert_eq!(stats[0].file_name, "daily.json");
    }

    #[tokio::test]
    async fn test_upload_file_reports_outcome() {
        let tmp = TempDir::new().expect("tempdir");
        let daily = write(&tmp, "users.json", r#"[["Date","Users"],["2024-01-01",1]]"#);

        let mut session = SessionState::new();
        let report = upload_file(&mut session, &daily).await;

        assert_eq!(report.message(), "users.json: classified as daily");
        assert_eq!(session.daily_datasets().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_file_empty_grid() {
        let tmp = TempDir::new().expect("tempdir");
        let path = write(&tmp, "empty.json", "[]");

        let mut session = SessionState::new();
        let report = upload_file(&mut session, &path).await;

        assert_eq!(report.message(), "empty.json: no data");
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_crashed_read_task_is_still_reported() {
        let tmp = TempDir::new().expect("tempdir");
        let daily = write(&tmp, "users.json", r#"[["Date","Users"],["2024-01-01",3]]"#);
        let broken = tmp.path().join("broken.xlsx");

        let mut reads: JoinSet<Result<RawGrid>> = JoinSet::new();
        let mut pending = HashMap::new();

        let daily_path = daily.clone();
        let ok = reads.spawn(async move { read_grid(&daily_path).await });
        pending.insert(ok.id(), daily);

        let crashed = reads.spawn(async {
            let rows: RawGrid = Vec::new();
            if rows.is_empty() {
                panic!("decoder crashed");
            }
            Ok(rows)
        });
        pending.insert(crashed.id(), broken.clone());

        let mut session = SessionState::new();
        let reports = apply_reads(&mut session, reads, pending).await;

        assert_eq!(reports.len(), 2);
        let failed = reports.iter().find(|r| r.path == broken).unwrap();
        assert!(!failed.is_success());
        assert!(matches!(failed.result, Err(StatsError::Other(_))));
        assert_eq!(failed.message(), "broken.xlsx: failed to read or parse the file");
        assert_eq!(session.daily_datasets().len(), 1);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/x/menu.xlsx")), "menu.xlsx");
    }
}
