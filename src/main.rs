// Vitrine - interactive two-language portfolio page
//
// The page is an in-memory document with independent controllers bound to
// it (carousel, slide-out menu, reveal + scroll-spy observers, translations).
// This binary wires them to a terminal.
//
// Architecture:
// - Page (vitrine::page): document + controllers, fed DOM-style events
// - TUI (ratatui): renders the document, turns input into page events
// - Storage: language preference in a JSON key-value file
// - Diagnostics: panic hook + overlay for anything the page can't handle

use anyhow::{Context, Result};
use clap::Parser;
use vitrine::cli::{self, Cli};
use vitrine::config::Config;
use vitrine::diagnostics::DiagnosticOverlay;
use vitrine::i18n::{Dictionaries, TranslationStore};
use vitrine::logging::{self, LogBuffer};
use vitrine::page::{build_portfolio, Page, Startup};
use vitrine::storage::PreferenceStore;
use vitrine::tui::{self, app::App};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    // A broken config file shouldn't keep the page from starting
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Subcommands (config, lang) run and exit
    if cli::handle_cli(&cli, &config)? {
        return Ok(());
    }

    let headless = cli.headless || !config.enable_tui;

    // In TUI mode logs are captured to the buffer (keeps the display clean);
    // headless mode writes them to stderr. The guard keeps the file writer alive.
    let log_buffer = LogBuffer::new();
    let _log_guard = logging::init(&config.logging, (!headless).then(|| log_buffer.clone()));

    let overlay = DiagnosticOverlay::new();
    if let Some(e) = &config_error {
        tracing::warn!("Using default configuration: {:#}", e);
        overlay.report_error(e);
    }

    let preferences = PreferenceStore::open(config.storage_path.as_deref());
    let dictionaries = Dictionaries::load_or_embedded(config.dictionaries.as_deref())
        .context("Failed to load dictionaries")?;
    let doc = build_portfolio(&dictionaries);
    let translations = TranslationStore::new(dictionaries, preferences);

    let startup = Startup {
        locale: config.locale.clone(),
        forced: cli.forced_language().or(config.lang),
    };
    let page = Page::ready(doc, &config, translations, &startup);

    if headless {
        print!("{}", page.outline());
        return Ok(());
    }

    overlay.install_panic_hook();
    let mut app = App::new(page, overlay, log_buffer);
    tui::run(&mut app).await
}
