// CLI module - command-line argument parsing and handlers
//
// Runs the page by default. Subcommands manage configuration and the stored
// language preference without starting the page:
// - config --show: Display effective configuration
// - config --path: Show config file path
// - config --reset: Regenerate config file with defaults
// - lang --show | --set <code> | --clear: Inspect or change the stored language

use crate::config::{Config, VERSION};
use crate::i18n::Language;
use crate::storage::PreferenceStore;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

/// Vitrine - interactive two-language portfolio page
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version = VERSION)]
#[command(about = "Interactive two-language portfolio page", long_about = None)]
pub struct Cli {
    /// Language to show, as if its button were clicked (pt or en)
    #[arg(long, value_name = "CODE")]
    pub lang: Option<String>,

    /// Print a text outline of the page instead of opening the terminal UI
    #[arg(long)]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,
    },
    /// Manage the stored language preference
    Lang {
        /// Show the stored language
        #[arg(long)]
        show: bool,

        /// Store a language (unknown codes store pt)
        #[arg(long, value_name = "CODE")]
        set: Option<String>,

        /// Forget the stored language
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    /// Language forced from the command line
    pub fn forced_language(&self) -> Option<Language> {
        self.lang.as_deref().map(Language::parse)
    }
}

/// Handle CLI subcommands. Returns true if a command was handled (exit after).
pub fn handle_cli(cli: &Cli, config: &Config) -> Result<bool> {
    match &cli.command {
        Some(Commands::Config { show, path, reset }) => {
            if *path {
                handle_config_path()?;
            } else if *show {
                handle_config_show(config);
            } else if *reset {
                handle_config_reset()?;
            } else {
                println!("Usage: vitrine config [--show|--path|--reset]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --path    Show config file path");
                println!("  --reset   Reset config file to defaults");
            }
            Ok(true)
        }
        Some(Commands::Lang { show, set, clear }) => {
            let mut store = PreferenceStore::open(config.storage_path.as_deref());
            if let Some(code) = set {
                let lang = Language::parse(code);
                store.save_language(lang);
                println!("Stored language: {}", lang.code());
            } else if *clear {
                store.clear_language();
                println!("Stored language cleared");
            } else if *show {
                println!("{}", describe_language(&store, config));
            } else {
                println!("Usage: vitrine lang [--show|--set <CODE>|--clear]");
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Which language the next start shows, and why
fn describe_language(store: &PreferenceStore, config: &Config) -> String {
    match store.stored_code() {
        Some(code) => format!("{} (stored)", code),
        None => {
            let lang = config
                .locale
                .as_deref()
                .map(Language::from_locale)
                .unwrap_or_default();
            format!("{} (from locale, nothing stored)", lang.code())
        }
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush().context("Failed to flush prompt")?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read answer")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::parse_from(["vitrine", "--lang", "en", "--headless"]);
        assert!(cli.headless);
        assert_eq!(cli.forced_language(), Some(Language::En));
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["vitrine", "--lang", "xx"]);
        assert_eq!(cli.forced_language(), Some(Language::Pt));
    }

    #[test]
    fn test_parse_lang_subcommand() {
        let cli = Cli::parse_from(["vitrine", "lang", "--set", "en"]);
        match cli.command {
            Some(Commands::Lang { set, show, clear }) => {
                assert_eq!(set.as_deref(), Some("en"));
                assert!(!show && !clear);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_describe_language_sources() {
        let config = Config {
            locale: Some("en_US.UTF-8".to_string()),
            ..Config::default()
        };
        let mut store = PreferenceStore::new(MemoryStore::default());
        assert_eq!(
            describe_language(&store, &config),
            "en (from locale, nothing stored)"
        );
        store.save_language(Language::Pt);
        assert_eq!(describe_language(&store, &config), "pt (stored)");
    }

    #[test]
    fn test_lang_set_persists_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            storage_path: Some(dir.path().join("storage.json")),
            ..Config::default()
        };
        let cli = Cli::parse_from(["vitrine", "lang", "--set", "en"]);
        assert!(handle_cli(&cli, &config).expect("handled"));

        let store = PreferenceStore::open(config.storage_path.as_deref());
        assert_eq!(store.load_language(), Some(Language::En));
    }
}
