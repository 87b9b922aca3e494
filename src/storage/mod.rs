// Storage module - persistent key-value entries (the page's "local storage")
//
// Only one entry is ever written: `site_lang`. The file backend keeps a JSON
// object on disk so it can be inspected or edited by hand:
//
//   { "site_lang": "en" }
//
// Every failure is swallowed at the PreferenceStore level: a blocked or broken
// store degrades to "no stored preference", never to a broken page.

use crate::i18n::Language;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the chosen language is persisted
pub const LANGUAGE_KEY: &str = "site_lang";

/// String key-value storage backend
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Volatile store, used when no file is configured or the file is unusable
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON-object file store
///
/// The file is re-read on every access so separate runs (and hand edits)
/// always see the latest value.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Malformed storage file {}", self.path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read storage file {}", self.path.display())),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create storage directory")?;
        }
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize storage")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write storage file {}", self.path.display()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Language preference on top of a key-value backend
pub struct PreferenceStore {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

impl PreferenceStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// File-backed store at `path`, or an in-memory one when no path is configured
    pub fn open(path: Option<&Path>) -> Self {
        match path {
            Some(path) => {
                tracing::debug!("Preference storage: {}", path.display());
                Self::new(FileStore::new(path))
            }
            None => {
                tracing::debug!("Preference storage: in memory");
                Self::in_memory()
            }
        }
    }

    /// Raw stored value, if any (empty values count as absent)
    pub fn stored_code(&self) -> Option<String> {
        match self.backend.get(LANGUAGE_KEY) {
            Ok(value) => value.filter(|v| !v.trim().is_empty()),
            Err(e) => {
                tracing::debug!("Language preference unreadable: {:#}", e);
                None
            }
        }
    }

    /// Stored language; unknown codes resolve to Portuguese like any other apply
    pub fn load_language(&self) -> Option<Language> {
        self.stored_code().map(|code| Language::parse(&code))
    }

    pub fn save_language(&mut self, lang: Language) {
        if let Err(e) = self.backend.set(LANGUAGE_KEY, lang.code()) {
            tracing::warn!("Could not persist language preference: {:#}", e);
        }
    }

    pub fn clear_language(&mut self) {
        if let Err(e) = self.backend.remove(LANGUAGE_KEY) {
            tracing::warn!("Could not clear language preference: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    /// Backend that refuses everything, like storage blocked by the user
    struct BlockedStore;

    impl KeyValueStore for BlockedStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("storage blocked"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("storage blocked"))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(anyhow!("storage blocked"))
        }
    }

    #[test]
    fn test_blocked_storage_is_swallowed() {
        let mut prefs = PreferenceStore::new(BlockedStore);
        prefs.save_language(Language::En);
        prefs.clear_language();
        assert_eq!(prefs.load_language(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let mut prefs = PreferenceStore::open(Some(&path));
        assert_eq!(prefs.load_language(), None);
        prefs.save_language(Language::En);

        let reopened = PreferenceStore::open(Some(&path));
        assert_eq!(reopened.load_language(), Some(Language::En));

        let raw = fs::read_to_string(&path).expect("storage file written");
        assert!(raw.contains("\"site_lang\": \"en\""));
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"theme":"dark"}"#).expect("seed");

        let mut store = FileStore::new(&path);
        store.set(LANGUAGE_KEY, "pt").expect("set");
        store.remove(LANGUAGE_KEY).expect("remove");
        assert_eq!(store.get("theme").expect("get"), Some("dark".to_string()));
        assert_eq!(store.get(LANGUAGE_KEY).expect("get"), None);
    }

    #[test]
    fn test_malformed_file_reads_as_absent_preference() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").expect("seed");

        let prefs = PreferenceStore::open(Some(&path));
        assert_eq!(prefs.load_language(), None);
    }

    #[test]
    fn test_unknown_stored_code_resolves_to_portuguese() {
        let mut backend = MemoryStore::default();
        backend.set(LANGUAGE_KEY, "fr").expect("set");
        let prefs = PreferenceStore::new(backend);
        assert_eq!(prefs.stored_code().as_deref(), Some("fr"));
        assert_eq!(prefs.load_language(), Some(Language::Pt));
    }
}
