use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Classify usage-statistics spreadsheets and summarise their hits and users
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hitstat",
    about = "Classify usage-statistics spreadsheets and summarise their hits and users",
    version
)]
pub struct Settings {
    /// Spreadsheet or JSON grid files, or directories to scan for them
    #[arg(required = true, env = "HITSTAT_INPUTS", value_delimiter = ',')]
    pub inputs: Vec<PathBuf>,

    /// Report format
    #[arg(long, default_value = "table", env = "HITSTAT_OUTPUT", value_parser = ["table", "json"])]
    pub output: String,

    /// Logging level
    #[arg(long, default_value = "INFO", env = "HITSTAT_LOG_LEVEL", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, env = "HITSTAT_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// `true` when the JSON snapshot was requested instead of the text table.
    pub fn wants_json(&self) -> bool {
        self.output == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::load_from_args(["hitstat", "menu.xlsx"]).expect("parse");

        assert_eq!(settings.inputs, vec![PathBuf::from("menu.xlsx")]);
        assert_eq!(settings.output, "table");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.wants_json());
    }

    #[test]
    fn test_settings_multiple_inputs() {
        let settings =
            Settings::load_from_args(["hitstat", "a.xlsx", "b.xlsx", "uploads/"]).expect("parse");
        assert_eq!(settings.inputs.len(), 3);
        assert_eq!(settings.inputs[2], PathBuf::from("uploads/"));
    }

    #[test]
    fn test_settings_json_output() {
        let settings =
            Settings::load_from_args(["hitstat", "--output", "json", "a.xlsx"]).expect("parse");
        assert!(settings.wants_json());
    }

    #[test]
    fn test_settings_rejects_unknown_output() {
        assert!(Settings::load_from_args(["hitstat", "--output", "xml", "a.xlsx"]).is_err());
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings =
            Settings::load_from_args(["hitstat", "--debug", "a.xlsx"]).expect("parse");
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_settings_log_file() {
        let settings =
            Settings::load_from_args(["hitstat", "--log-file", "/tmp/hitstat.log", "a.xlsx"])
                .expect("parse");
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/hitstat.log")));
    }
}
