// Portfolio document builder
//
// Produces the markup the controllers bind to. Every translatable string is
// rendered from the Portuguese dictionary, which is what the page ships with.

use crate::carousel::SLIDER_ID;
use crate::dom::{Document, ElementId, LayoutBox};
use crate::i18n::{Dictionaries, Language};
use std::collections::HashMap;

/// Section ids with their nav label keys, in page order
pub const SECTIONS: [(&str, &str); 5] = [
    ("home", "nav.home"),
    ("about", "nav.about"),
    ("portfolio", "nav.portfolio"),
    ("experience", "nav.experience"),
    ("contact", "nav.contact"),
];

struct Slide {
    key: &'static str,
    image: &'static str,
    url: &'static str,
    social: bool,
}

const SLIDES: [Slide; 3] = [
    Slide {
        key: "slide.ecommerce",
        image: "img/portfolio/ecommerce.webp",
        url: "https://example.com/loja",
        social: false,
    },
    Slide {
        key: "slide.dashboard",
        image: "img/portfolio/dashboard.webp",
        url: "https://example.com/painel",
        social: false,
    },
    Slide {
        key: "slide.social",
        image: "img/portfolio/social.webp",
        url: "https://example.com/social",
        social: true,
    },
];

struct Builder<'a> {
    doc: Document,
    strings: &'a HashMap<String, String>,
}

impl Builder<'_> {
    fn el(&mut self, parent: ElementId, tag: &str, classes: &[&str]) -> ElementId {
        let id = self.doc.append(parent, tag);
        for class in classes {
            self.doc.add_class(id, class);
        }
        id
    }

    fn string(&self, key: &str) -> String {
        self.strings.get(key).cloned().unwrap_or_default()
    }

    /// Element whose content comes from `key`
    fn text(&mut self, parent: ElementId, tag: &str, key: &str) -> ElementId {
        let id = self.el(parent, tag, &[]);
        self.doc.set_attribute(id, "data-i18n", key);
        let value = self.string(key);
        self.doc.set_text(id, value);
        id
    }

    /// Attach a translated attribute (`alt` / `title`)
    fn translated_attr(&mut self, id: ElementId, marker: &str, attr: &str, key: &str) {
        self.doc.set_attribute(id, marker, key);
        let value = self.string(key);
        self.doc.set_attribute(id, attr, value);
    }

    fn header(&mut self, body: ElementId) {
        let header = self.el(body, "header", &[]);

        let toggle = self.el(header, "button", &["menu-toggle"]);
        self.doc.set_attribute(toggle, "aria-expanded", "false");
        self.doc.set_attribute(toggle, "aria-controls", "site-nav");
        self.translated_attr(toggle, "data-i18n-title", "title", "menu.toggle");
        self.doc.set_text(toggle, "☰");

        let nav = self.el(header, "nav", &[]);
        self.doc.set_attribute(nav, "id", "site-nav");
        self.doc.set_attribute(nav, "aria-hidden", "true");
        let list = self.el(nav, "ul", &[]);
        for (id, key) in SECTIONS {
            let item = self.el(list, "li", &[]);
            let link = self.text(item, "a", key);
            self.doc.set_attribute(link, "href", format!("#{}", id));
        }

        let switch = self.el(header, "div", &["lang-switch"]);
        for lang in Language::ALL {
            let button = self.el(switch, "button", &["lang-btn"]);
            self.doc.set_attribute(button, "data-lang", lang.code());
            self.translated_attr(
                button,
                "data-i18n-title",
                "title",
                &format!("lang.{}", lang.code()),
            );
            self.doc.set_text(button, lang.label());
        }

        self.el(body, "div", &["menu-overlay"]);
    }

    fn section(&mut self, main: ElementId, id: &str) -> ElementId {
        let section = self.el(main, "section", &["fade-in-section"]);
        self.doc.set_attribute(section, "id", id);
        section
    }

    fn carousel(&mut self, parent: ElementId) {
        let slider = self.el(parent, "div", &["portfolio-slider"]);
        self.doc.set_attribute(slider, "id", SLIDER_ID);

        let view = self.el(slider, "div", &["slider-main-view"]);
        let track = self.el(view, "div", &["slider-track"]);
        for entry in &SLIDES {
            let classes: &[&str] = if entry.social {
                &["slider-slide", "midia-social-slide"]
            } else {
                &["slider-slide"]
            };
            let slide = self.el(track, "div", classes);
            let img = self.el(slide, "img", &[]);
            self.doc.set_attribute(img, "src", entry.image);
            self.translated_attr(img, "data-i18n-alt", "alt", &format!("{}.alt", entry.key));
            self.text(slide, "p", &format!("{}.caption", entry.key));
            let link = self.text(slide, "a", "btn.view");
            self.doc.add_class(link, "btn");
            self.doc.set_attribute(link, "href", entry.url);
            self.translated_attr(link, "data-i18n-title", "title", "btn.view");
        }

        let prev = self.el(slider, "button", &["slider-btn", "prev-btn"]);
        self.translated_attr(prev, "data-i18n-title", "title", "carousel.prev");
        self.doc.set_text(prev, "‹");
        let next = self.el(slider, "button", &["slider-btn", "next-btn"]);
        self.translated_attr(next, "data-i18n-title", "title", "carousel.next");
        self.doc.set_text(next, "›");
        self.el(slider, "div", &["slider-indicators"]);
    }

    fn main(&mut self, body: ElementId) {
        let main = self.el(body, "main", &[]);

        let home = self.section(main, "home");
        self.text(home, "h1", "hero.title");
        self.text(home, "p", "hero.subtitle");

        let about = self.section(main, "about");
        self.text(about, "h2", "section.what");
        self.text(about, "p", "about.body");

        let portfolio = self.section(main, "portfolio");
        self.text(portfolio, "h2", "portfolio.title");
        self.carousel(portfolio);

        let experience = self.section(main, "experience");
        self.text(experience, "h2", "experience.title");
        self.text(experience, "p", "experience.body");

        let contact = self.section(main, "contact");
        self.text(contact, "h2", "contact.title");
        self.text(contact, "p", "contact.body");
    }
}

/// Build the portfolio page in its shipped (Portuguese) state
pub fn build_portfolio(dictionaries: &Dictionaries) -> Document {
    let mut builder = Builder {
        doc: Document::new(),
        strings: dictionaries.for_language(Language::Pt),
    };
    let body = builder.doc.body();
    builder.header(body);
    builder.main(body);

    let mut doc = builder.doc;
    doc.set_lang(Language::Pt.html_lang());
    stack_sections(&mut doc, None);
    doc
}

/// Lay sections out top to bottom and size the carousel view to the viewport
///
/// `heights` gives each `main section` its measured height; without it every
/// section is one viewport tall.
pub fn stack_sections(doc: &mut Document, heights: Option<&[f64]>) {
    let viewport = doc.viewport();
    let mut top = 0.0;
    for (i, section) in doc.query_all("main section").into_iter().enumerate() {
        let height = heights
            .and_then(|h| h.get(i).copied())
            .unwrap_or(viewport.height);
        doc.set_layout(
            section,
            LayoutBox {
                top,
                height,
                width: viewport.width,
            },
        );
        top += height;
    }
    if let Some(view) = doc.query(".slider-main-view") {
        let mut layout = doc.layout(view);
        layout.width = viewport.width;
        doc.set_layout(view, layout);
    }
}
