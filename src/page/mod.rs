//! The portfolio page: document plus its controllers
//!
//! Controllers bind independently on [`Page::ready`] and never share state.
//! Events are routed to them in registration order (carousel, menu,
//! language buttons), then the browser-style default action runs unless a
//! handler prevented it.

mod builder;

pub use builder::{build_portfolio, stack_sections, SECTIONS};

use crate::carousel::CarouselController;
use crate::config::Config;
use crate::dom::focus::is_focusable;
use crate::dom::{Document, DomEvent, ElementId, Key, KeyboardEvent};
use crate::i18n::{Language, TranslationStore};
use crate::menu::MenuController;
use crate::observer::ScrollObserverSet;
use std::fmt::Write as _;

/// Startup inputs that decide the initial language
#[derive(Debug, Clone, Default)]
pub struct Startup {
    /// Reported locale (e.g. `en_US.UTF-8`)
    pub locale: Option<String>,
    /// Language forced by flag or config, applied like a button click
    pub forced: Option<Language>,
}

#[derive(Debug)]
pub struct Page {
    doc: Document,
    carousel: CarouselController,
    observers: ScrollObserverSet,
    menu: MenuController,
    translations: TranslationStore,
}

impl Page {
    /// Bind every controller to `doc` and run their start-up work
    pub fn ready(
        mut doc: Document,
        config: &Config,
        mut translations: TranslationStore,
        startup: &Startup,
    ) -> Self {
        let mut carousel = CarouselController::bind(&doc, config.carousel.clone());
        carousel.initialize(&mut doc);

        let mut observers = ScrollObserverSet::bind(&doc, &config.observers);
        observers.update(&mut doc);

        let menu = MenuController::bind(&doc);

        translations.bind(&doc);
        translations.init(&mut doc, startup.locale.as_deref());
        if let Some(lang) = startup.forced {
            translations.apply_language(&mut doc, lang);
        }

        tracing::info!(
            "Page ready (carousel: {}, menu: {}, lang: {})",
            carousel.is_active(),
            menu.is_active(),
            translations.current()
        );

        Self {
            doc,
            carousel,
            observers,
            menu,
            translations,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn translations(&self) -> &TranslationStore {
        &self.translations
    }

    pub fn language(&self) -> Language {
        self.translations.current()
    }

    /// The body has `overflow: hidden` (open menu); the viewport stays put
    pub fn scroll_locked(&self) -> bool {
        self.doc.style(self.doc.body(), "overflow") == Some("hidden")
    }

    /// Route one event through the page
    pub fn dispatch(&mut self, event: DomEvent) {
        match event {
            DomEvent::Click(target) => self.click(target),
            DomEvent::KeyDown(event) => self.key_down(event),
            DomEvent::TouchStart { target, x } => {
                self.carousel.on_touch_start(&self.doc, target, x);
            }
            DomEvent::TouchEnd { target, x } => {
                self.carousel.on_touch_end(&mut self.doc, target, x);
            }
            DomEvent::Resize { width, height } => self.resize(width, height),
            DomEvent::Scroll { y } => {
                if !self.scroll_locked() {
                    self.observers.on_scroll(&mut self.doc, y);
                }
            }
        }
    }

    fn click(&mut self, target: ElementId) {
        if is_focusable(&self.doc, target) {
            self.doc.focus(target);
        }

        self.carousel.handle_click(&mut self.doc, target);
        self.menu.handle_click(&mut self.doc, target);
        self.translations.handle_click(&mut self.doc, target);

        // Default action: in-page anchors scroll their section into view
        if let Some(id) = self.anchor_target(target) {
            self.scroll_into_view(id);
        }
    }

    fn key_down(&mut self, mut event: KeyboardEvent) {
        self.menu.handle_key(&mut self.doc, &mut event);
        if event.default_prevented() {
            return;
        }
        match event.key {
            Key::Tab => self.doc.focus_sequential(event.shift),
            Key::Enter => {
                if let Some(active) = self.doc.active_element() {
                    self.click(active);
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.doc.set_viewport_size(width, height);
        stack_sections(&mut self.doc, None);
        self.carousel.on_resize(&mut self.doc);
        self.observers.update(&mut self.doc);
    }

    /// Apply measured section heights (host layout pass) and re-evaluate observers
    pub fn relayout(&mut self, section_heights: &[f64]) {
        stack_sections(&mut self.doc, Some(section_heights));
        self.carousel.on_resize(&mut self.doc);
        self.observers.update(&mut self.doc);
    }

    /// Language selection from outside the page (CLI, host shortcut)
    pub fn set_language(&mut self, lang: Language) {
        self.translations.apply_language(&mut self.doc, lang);
    }

    /// Enclosing `a[href^="#"]` of a click target, resolved to its section
    fn anchor_target(&self, target: ElementId) -> Option<ElementId> {
        let mut current = Some(target);
        while let Some(id) = current {
            let element = self.doc.element(id);
            if element.tag() == "a" {
                let fragment = element.attribute("href")?.strip_prefix('#')?;
                return self.doc.get_element_by_id(fragment);
            }
            current = element.parent();
        }
        None
    }

    fn scroll_into_view(&mut self, id: ElementId) {
        let top = self.doc.layout(id).top;
        self.observers.on_scroll(&mut self.doc, top);
    }

    /// Plain-text rendering of the current page state
    pub fn outline(&self) -> String {
        let doc = &self.doc;
        let mut out = String::new();
        let _ = writeln!(out, "lang: {}", doc.lang().unwrap_or("-"));

        let nav: Vec<String> = doc
            .query_all("nav ul li a")
            .into_iter()
            .map(|link| {
                let label = plain_text(doc.text(link));
                if doc.has_class(link, "active") {
                    format!("[{}]", label)
                } else {
                    label
                }
            })
            .collect();
        let _ = writeln!(out, "nav: {}", nav.join(" | "));

        for section in doc.query_all("main section") {
            let _ = writeln!(out);
            let _ = writeln!(out, "#{}", doc.attribute(section, "id").unwrap_or_default());
            for id in doc.query_all_within(section, "[data-i18n]") {
                if doc.query_all_within(id, "[data-i18n]").is_empty() {
                    for line in plain_text(doc.text(id)).lines() {
                        let _ = writeln!(out, "  {}", line.trim());
                    }
                }
            }
            if doc.query_within(section, ".slider-track").is_some() {
                let _ = writeln!(
                    out,
                    "  slide {}/{}",
                    self.carousel.current_index() + 1,
                    self.carousel.state().len().max(1)
                );
            }
        }
        out
    }
}

/// Content markup as display text: `<br>` becomes a newline, other tags drop
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let tag = rest[start + 1..start + end].trim().trim_end_matches('/').trim();
        if tag.eq_ignore_ascii_case("br") {
            out.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);
    out
}
