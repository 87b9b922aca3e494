//! `[logging]` section: filter level and the optional JSON log file
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [logging.file]          # present = enabled; every key is optional
//! dir = "/var/log/vitrine"
//! rotation = "hourly"     # hourly | daily | never
//! prefix = "vitrine"
//! ```

use serde::Deserialize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// When the log file starts over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Where JSON log lines go when file logging is on
#[derive(Debug, Clone, PartialEq)]
pub struct LogFileConfig {
    pub dir: PathBuf,
    /// File name prefix ("vitrine" -> "vitrine.2026-10-17")
    pub prefix: String,
    pub rotation: LogRotation,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            prefix: "vitrine".to_string(),
            rotation: LogRotation::Daily,
        }
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("vitrine").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level for vitrine's own targets; RUST_LOG overrides it
    pub level: LevelFilter,
    /// `None` keeps logs in the TUI buffer (or stderr) only
    pub file: Option<LogFileConfig>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            file: None,
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file: Option<FileLogFile>,
}

/// `[logging.file]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogFile {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
    pub rotation: Option<LogRotation>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        Self {
            // Unknown level names keep the default rather than silencing logs
            level: file
                .level
                .and_then(|level| level.trim().parse().ok())
                .unwrap_or(LevelFilter::INFO),
            file: file.file.map(|f| {
                let defaults = LogFileConfig::default();
                LogFileConfig {
                    dir: f.dir.unwrap_or(defaults.dir),
                    prefix: f
                        .prefix
                        .filter(|p| !p.trim().is_empty())
                        .unwrap_or(defaults.prefix),
                    rotation: f.rotation.unwrap_or(defaults.rotation),
                }
            }),
        }
    }

    /// Level as written in the config file
    pub fn level_name(&self) -> String {
        self.level.to_string().to_lowercase()
    }
}
