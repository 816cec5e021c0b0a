use std::path::PathBuf;
use thiserror::Error;

use crate::models::TableKind;

/// All errors produced while ingesting and summarising usage tables.
#[derive(Error, Debug)]
pub enum StatsError {
    /// The grid has fewer than two rows, so there is nothing to classify.
    #[error("Grid has {rows} row(s); at least 2 are required")]
    EmptyInput { rows: usize },

    /// Neither the header text nor the column count matched a known shape.
    #[error("Table format could not be classified as monthly or daily")]
    UnclassifiableFormat,

    /// Every data row was rejected because its month/date cell was empty.
    #[error("No parseable rows in {kind} table")]
    NoUsableRows { kind: TableKind },

    /// No daily dataset is registered under the given identifier.
    #[error("Daily dataset not found: {0}")]
    DatasetNotFound(String),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet decoder rejected the file contents.
    #[error("Failed to decode spreadsheet: {0}")]
    Decode(String),

    /// The workbook contains no worksheet to read.
    #[error("Workbook has no worksheets")]
    NoWorksheet,

    /// The file extension is not one the loader knows how to decode.
    #[error("Unsupported input file: {0}")]
    UnsupportedFile(PathBuf),

    /// A JSON grid document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Catch-all for failures outside the decoders, such as a crashed read task.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StatsError {
    /// Short message suitable for showing to the person who selected the file.
    pub fn user_message(&self) -> &'static str {
        match self {
            StatsError::EmptyInput { .. } => "no data",
            StatsError::UnclassifiableFormat => "format unrecognized",
            StatsError::NoUsableRows { .. } => "parse failed with zero usable rows",
            StatsError::DatasetNotFound(_) => "dataset not found",
            _ => "failed to read or parse the file",
        }
    }
}

/// Convenience alias used throughout the hitstat crates.
pub type Result<T> = std::result::Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_input() {
        let err = StatsError::EmptyInput { rows: 1 };
        assert_eq!(err.to_string(), "Grid has 1 row(s); at least 2 are required");
    }

    #[test]
    fn test_error_display_no_usable_rows() {
        let err = StatsError::NoUsableRows {
            kind: TableKind::Monthly,
        };
        assert_eq!(err.to_string(), "No parseable rows in monthly table");

        let err = StatsError::NoUsableRows {
            kind: TableKind::DailyUsers,
        };
        assert_eq!(err.to_string(), "No parseable rows in daily users table");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = StatsError::FileRead {
            path: PathBuf::from("/uploads/menu.xlsx"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/uploads/menu.xlsx"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(StatsError::EmptyInput { rows: 0 }.user_message(), "no data");
        assert_eq!(
            StatsError::UnclassifiableFormat.user_message(),
            "format unrecognized"
        );
        assert_eq!(
            StatsError::NoUsableRows {
                kind: TableKind::Monthly
            }
            .user_message(),
            "parse failed with zero usable rows"
        );
        assert_eq!(
            StatsError::Decode("bad zip".to_string()).user_message(),
            "failed to read or parse the file"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: StatsError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: StatsError = anyhow::anyhow!("read task panicked").into();
        assert_eq!(err.to_string(), "read task panicked");
        assert_eq!(err.user_message(), "failed to read or parse the file");
    }
}
