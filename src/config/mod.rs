//! Configuration for the portfolio page host
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/vitrine/config.toml)
//! 3. Built-in defaults (lowest priority)

use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod page;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use logging::{FileLogFile, FileLogging, LogFileConfig, LogRotation, LoggingConfig};
pub use page::{CarouselConfig, FileCarousel, FileObservers, ObserverConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Locale variables consulted, in POSIX precedence order
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Language forced at startup (behaves like clicking a language button)
    pub lang: Option<Language>,

    /// Reported user locale, the fallback when no preference is stored
    pub locale: Option<String>,

    /// Key-value storage file for the language preference.
    /// `None` keeps the preference in memory only.
    pub storage_path: Option<PathBuf>,

    /// Optional dictionary file replacing the embedded translations
    pub dictionaries: Option<PathBuf>,

    /// Whether to run the terminal UI (false prints the page outline)
    pub enable_tui: bool,

    /// Carousel behaviour
    pub carousel: CarouselConfig,

    /// Reveal and scroll-spy observer tuning
    pub observers: ObserverConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lang: None,
            locale: None,
            storage_path: Self::default_storage_path(),
            dictionaries: None,
            enable_tui: true,
            carousel: CarouselConfig::default(),
            observers: ObserverConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub lang: Option<String>,
    pub storage_path: Option<String>,
    pub dictionaries: Option<String>,

    /// Optional [carousel] section
    pub carousel: Option<FileCarousel>,

    /// Optional [observers] section
    pub observers: Option<FileObservers>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/vitrine/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("vitrine").join("config.toml"))
    }

    /// Default storage file: <data dir>/vitrine/storage.json
    pub fn default_storage_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("vitrine").join("storage.json"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Parse a config file. A missing file yields defaults; a broken one is an error.
    pub(crate) fn read_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Cannot read config file {}", path.display()))
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn load() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::read_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::resolve(file, |name| std::env::var(name).ok()))
    }

    /// Merge a parsed file with environment lookups over the defaults
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        // Language: env > file > none (stored preference or locale decides)
        let lang = env("VITRINE_LANG")
            .or(file.lang)
            .map(|code| Language::parse(&code));

        let locale = LOCALE_VARS
            .iter()
            .filter_map(|name| env(name))
            .find(|value| !value.is_empty());

        // Storage: env > file > default; "memory" disables the file store
        let storage_path = match env("VITRINE_STORAGE").or(file.storage_path) {
            Some(value) if value.eq_ignore_ascii_case("memory") => None,
            Some(value) => Some(PathBuf::from(value)),
            None => Self::default_storage_path(),
        };

        let dictionaries = file.dictionaries.map(PathBuf::from);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("VITRINE_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        Self {
            lang,
            locale,
            storage_path,
            dictionaries,
            enable_tui,
            carousel: CarouselConfig::from_file(file.carousel),
            observers: ObserverConfig::from_file(file.observers),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
