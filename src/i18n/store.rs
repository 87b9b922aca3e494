// TranslationStore - applies a language to the document and remembers it
//
// Three passes over tagged elements:
//   [data-i18n]        → element content
//   [data-i18n-alt]    → alt attribute
//   [data-i18n-title]  → title attribute
// Keys missing from the dictionary (or empty key attributes) are skipped
// element by element; nothing aborts a pass.

use super::{Dictionaries, Language};
use crate::dom::{Document, ElementId};
use crate::storage::PreferenceStore;

/// Where a translated value lands
#[derive(Debug, Clone, Copy)]
enum Slot {
    Content,
    Attribute(&'static str),
}

const PASSES: [(&str, Slot); 3] = [
    ("data-i18n", Slot::Content),
    ("data-i18n-alt", Slot::Attribute("alt")),
    ("data-i18n-title", Slot::Attribute("title")),
];

/// Language buttons carry their code in this attribute
const LANG_ATTR: &str = "data-lang";

#[derive(Debug)]
pub struct TranslationStore {
    dictionaries: Dictionaries,
    preferences: PreferenceStore,
    current: Language,
    buttons: Vec<ElementId>,
}

impl TranslationStore {
    pub fn new(dictionaries: Dictionaries, preferences: PreferenceStore) -> Self {
        Self {
            dictionaries,
            preferences,
            current: Language::default(),
            buttons: Vec::new(),
        }
    }

    /// Find the `.lang-btn` controls. Pages without them still translate.
    pub fn bind(&mut self, doc: &Document) {
        self.buttons = doc.query_all(".lang-btn");
        tracing::debug!("Language buttons bound: {}", self.buttons.len());
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    /// Startup language: stored preference, else derived from the locale
    pub fn initial_language(&self, locale: Option<&str>) -> Language {
        self.preferences
            .load_language()
            .unwrap_or_else(|| locale.map(Language::from_locale).unwrap_or_default())
    }

    /// Apply the startup language
    pub fn init(&mut self, doc: &mut Document, locale: Option<&str>) -> Language {
        let lang = self.initial_language(locale);
        tracing::info!("Initial language: {}", lang);
        self.apply_language(doc, lang);
        lang
    }

    /// Apply a language by code; unknown codes behave exactly like `pt`
    pub fn apply(&mut self, doc: &mut Document, code: &str) -> Language {
        let lang = Language::parse(code);
        if Language::from_code(code).is_none() {
            tracing::debug!("Unknown language {:?}, using {}", code, lang);
        }
        self.apply_language(doc, lang);
        lang
    }

    pub fn apply_language(&mut self, doc: &mut Document, lang: Language) {
        let dictionary = self.dictionaries.for_language(lang);

        for (marker, slot) in PASSES {
            for id in doc.query_all(&format!("[{}]", marker)) {
                let Some(key) = doc.attribute(id, marker).filter(|k| !k.is_empty()) else {
                    continue;
                };
                let Some(value) = dictionary.get(key).cloned() else {
                    continue;
                };
                match slot {
                    Slot::Content => doc.set_text(id, value),
                    Slot::Attribute(name) => doc.set_attribute(id, name, value),
                }
            }
        }

        doc.set_lang(lang.html_lang());
        self.sync_buttons(doc, lang);
        self.current = lang;
        self.preferences.save_language(lang);
    }

    /// Mark the button for `lang` active and clear the others
    fn sync_buttons(&self, doc: &mut Document, lang: Language) {
        for &button in &self.buttons {
            let matches = doc.attribute(button, LANG_ATTR) == Some(lang.code());
            doc.toggle_class(button, "active", matches);
        }
    }

    /// Click listener for language buttons. Returns true if `target` was one.
    pub fn handle_click(&mut self, doc: &mut Document, target: ElementId) -> bool {
        let Some(button) = self
            .buttons
            .iter()
            .copied()
            .find(|b| doc.contains(*b, target))
        else {
            return false;
        };
        let code = doc
            .attribute(button, LANG_ATTR)
            .unwrap_or(Language::Pt.code())
            .to_string();
        let lang = self.apply(doc, &code);
        tracing::info!("Language switched to {}", lang);
        true
    }
}
