//! Two-language text swapping
//!
//! Languages are a closed enum; dictionaries are plain key → string maps
//! loaded from TOML (embedded at compile time, optionally replaced by a file
//! from config). [`TranslationStore`] applies them to tagged elements.

mod store;

pub use store::TranslationStore;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Dictionaries compiled into the binary
const EMBEDDED_DICTIONARIES: &str = include_str!("dictionaries.toml");

/// Supported page languages. Portuguese is the primary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Pt,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Pt, Language::En];

    /// Lenient parse used by `apply`: anything that isn't English is Portuguese
    pub fn parse(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// Strict parse: only the two supported codes
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "pt" => Some(Self::Pt),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Default language for a reported locale (`en-US`, `en_GB.UTF-8`, `pt-BR`...)
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_ascii_lowercase().starts_with("en") {
            Self::En
        } else {
            Self::Pt
        }
    }

    /// Storage / dictionary code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Pt => "pt",
            Self::En => "en",
        }
    }

    /// Value written to the document's `lang` metadata
    pub fn html_lang(&self) -> &'static str {
        match self {
            Self::Pt => "pt-br",
            Self::En => "en",
        }
    }

    /// Short label for language buttons
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pt => "PT",
            Self::En => "EN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Translation dictionaries for every supported language
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dictionaries {
    #[serde(default)]
    pt: HashMap<String, String>,
    #[serde(default)]
    en: HashMap<String, String>,
}

impl Dictionaries {
    /// The dictionaries shipped with the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_DICTIONARIES).context("Embedded dictionaries are malformed")
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse dictionaries")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionaries {}", path.display()))?;
        Self::from_toml(&source)
    }

    /// Dictionary file if one is configured and usable, otherwise the embedded set
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(dictionaries) => return Ok(dictionaries),
                Err(e) => tracing::warn!("Using embedded dictionaries: {:#}", e),
            }
        }
        Self::embedded()
    }

    pub fn for_language(&self, lang: Language) -> &HashMap<String, String> {
        match lang {
            Language::Pt => &self.pt,
            Language::En => &self.en,
        }
    }

    pub fn lookup(&self, lang: Language, key: &str) -> Option<&str> {
        self.for_language(lang).get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!(Language::parse("en"), Language::En);
        assert_eq!(Language::parse(" EN "), Language::En);
        assert_eq!(Language::parse("pt"), Language::Pt);
        assert_eq!(Language::parse("xx"), Language::Pt);
        assert_eq!(Language::from_code("xx"), None);
    }

    #[test]
    fn test_locale_prefix_match() {
        assert_eq!(Language::from_locale("en-US"), Language::En);
        assert_eq!(Language::from_locale("en_GB.UTF-8"), Language::En);
        assert_eq!(Language::from_locale("pt-BR"), Language::Pt);
        assert_eq!(Language::from_locale("fr-FR"), Language::Pt);
        assert_eq!(Language::from_locale(""), Language::Pt);
    }

    #[test]
    fn test_html_lang_metadata() {
        assert_eq!(Language::Pt.html_lang(), "pt-br");
        assert_eq!(Language::En.html_lang(), "en");
    }

    #[test]
    fn test_embedded_dictionaries_parse() {
        let dictionaries = Dictionaries::embedded().expect("embedded dictionaries");
        assert_eq!(dictionaries.lookup(Language::Pt, "nav.home"), Some("Inicial"));
        assert_eq!(dictionaries.lookup(Language::En, "nav.home"), Some("Home"));
        // Present only in Portuguese
        assert!(dictionaries.lookup(Language::En, "section.what").is_none());
    }

    #[test]
    fn test_every_english_key_exists_in_portuguese() {
        let dictionaries = Dictionaries::embedded().expect("embedded dictionaries");
        for key in dictionaries.for_language(Language::En).keys() {
            assert!(
                dictionaries.lookup(Language::Pt, key).is_some(),
                "{} has no Portuguese entry; switching back would leave English text",
                key
            );
        }
    }

    #[test]
    fn test_broken_dictionary_file_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dict.toml");
        std::fs::write(&path, "[pt\n").expect("write");
        let dictionaries = Dictionaries::load_or_embedded(Some(&path)).expect("fallback");
        assert_eq!(dictionaries.lookup(Language::Pt, "nav.home"), Some("Inicial"));
    }
}
