//! Scroll-driven observers: fade-in reveal and nav scroll-spy
//!
//! Both are polled after anything that can move sections relative to the
//! viewport (ready, scroll, resize, relayout).

mod intersection;

pub use intersection::{
    intersect, IntersectionEntry, IntersectionObserver, MarginLength, ObserverOptions, RootMargin,
};

use crate::config::ObserverConfig;
use crate::dom::{Document, ElementId};

/// One-shot fade-in: first time a section is visible enough, mark it and stop watching
#[derive(Debug)]
pub struct RevealObserver {
    observer: IntersectionObserver,
}

impl RevealObserver {
    pub const SELECTOR: &'static str = ".fade-in-section";
    pub const VISIBLE_CLASS: &'static str = "is-visible";

    pub fn bind(doc: &Document, threshold: f64) -> Self {
        let mut observer = IntersectionObserver::new(ObserverOptions {
            root_margin: RootMargin::default(),
            threshold,
        });
        for section in doc.query_all(Self::SELECTOR) {
            observer.observe(section);
        }
        Self { observer }
    }

    pub fn pending(&self) -> usize {
        self.observer.observed().count()
    }

    pub fn update(&mut self, doc: &mut Document) {
        for entry in self.observer.take_records(doc) {
            if entry.is_intersecting {
                doc.add_class(entry.target, Self::VISIBLE_CLASS);
                self.observer.unobserve(entry.target);
            }
        }
    }
}

/// Highlights the nav link of the section crossing the upper half of the viewport
#[derive(Debug)]
pub struct ScrollSpy {
    observer: IntersectionObserver,
    links: Vec<ElementId>,
}

impl ScrollSpy {
    pub const SECTION_SELECTOR: &'static str = "main section";
    pub const LINK_SELECTOR: &'static str = "nav ul li a";

    pub fn bind(doc: &Document, bottom_margin_percent: f64) -> Self {
        let rule = format!("0px 0px -{}% 0px", bottom_margin_percent);
        let root_margin = RootMargin::parse(&rule).unwrap_or_else(|| {
            tracing::warn!("Invalid scroll-spy margin '{}', using 0px", rule);
            RootMargin::default()
        });
        let mut observer = IntersectionObserver::new(ObserverOptions {
            root_margin,
            threshold: 0.0,
        });
        for section in doc.query_all(Self::SECTION_SELECTOR) {
            observer.observe(section);
        }
        Self {
            observer,
            links: doc.query_all(Self::LINK_SELECTOR),
        }
    }

    pub fn update(&mut self, doc: &mut Document) {
        for entry in self.observer.take_records(doc) {
            if !entry.is_intersecting {
                continue;
            }
            let href = format!("#{}", doc.attribute(entry.target, "id").unwrap_or_default());
            for &link in &self.links {
                let matches = doc.attribute(link, "href") == Some(href.as_str());
                doc.toggle_class(link, "active", matches);
            }
        }
    }
}

/// Both observers, bound together at page ready
#[derive(Debug)]
pub struct ScrollObserverSet {
    reveal: RevealObserver,
    spy: ScrollSpy,
}

impl ScrollObserverSet {
    pub fn bind(doc: &Document, config: &ObserverConfig) -> Self {
        let reveal = RevealObserver::bind(doc, config.reveal_threshold);
        let spy = ScrollSpy::bind(doc, config.spy_bottom_margin_percent);
        tracing::debug!(
            "Observing {} reveal sections, {} spy links",
            reveal.pending(),
            spy.links.len()
        );
        Self { reveal, spy }
    }

    pub fn reveal(&self) -> &RevealObserver {
        &self.reveal
    }

    /// Deliver pending intersection changes to both observers
    pub fn update(&mut self, doc: &mut Document) {
        self.reveal.update(doc);
        self.spy.update(doc);
    }

    pub fn on_scroll(&mut self, doc: &mut Document, y: f64) {
        doc.scroll_to(y);
        self.update(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::LayoutBox;

    struct Fixture {
        doc: Document,
        sections: Vec<ElementId>,
        links: Vec<ElementId>,
    }

    /// Three 600px sections under a 600px viewport
    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append(body, "nav");
        let ul = doc.append(nav, "ul");
        let main = doc.append(body, "main");
        let mut sections = Vec::new();
        let mut links = Vec::new();
        for (i, id) in ["home", "about", "contact"].into_iter().enumerate() {
            let li = doc.append(ul, "li");
            let link = doc.append(li, "a");
            doc.set_attribute(link, "href", format!("#{}", id));
            links.push(link);

            let section = doc.append(main, "section");
            doc.set_attribute(section, "id", id);
            doc.add_class(section, "fade-in-section");
            doc.set_layout(
                section,
                LayoutBox {
                    top: i as f64 * 600.0,
                    height: 600.0,
                    width: 800.0,
                },
            );
            sections.push(section);
        }
        doc.set_viewport_size(800.0, 600.0);
        Fixture {
            doc,
            sections,
            links,
        }
    }

    fn active_links(f: &Fixture) -> Vec<usize> {
        f.links
            .iter()
            .enumerate()
            .filter(|(_, l)| f.doc.has_class(**l, "active"))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let mut f = fixture();
        let mut set = ScrollObserverSet::bind(&f.doc, &ObserverConfig::default());
        set.update(&mut f.doc);

        assert!(f.doc.has_class(f.sections[0], "is-visible"));
        assert!(!f.doc.has_class(f.sections[1], "is-visible"));
        assert_eq!(set.reveal().pending(), 2);

        set.on_scroll(&mut f.doc, 600.0);
        assert!(f.doc.has_class(f.sections[1], "is-visible"));

        // Scrolling away never removes the class
        set.on_scroll(&mut f.doc, 1200.0);
        assert!(f.doc.has_class(f.sections[0], "is-visible"));
        assert!(f.doc.has_class(f.sections[1], "is-visible"));
        assert_eq!(set.reveal().pending(), 0);
    }

    #[test]
    fn test_reveal_needs_ten_percent() {
        let mut f = fixture();
        let mut set = ScrollObserverSet::bind(&f.doc, &ObserverConfig::default());
        set.update(&mut f.doc);

        // 59px of the second section in view: under 10 %
        set.on_scroll(&mut f.doc, 59.0);
        assert!(!f.doc.has_class(f.sections[1], "is-visible"));
        set.on_scroll(&mut f.doc, 61.0);
        assert!(f.doc.has_class(f.sections[1], "is-visible"));
    }

    #[test]
    fn test_spy_tracks_upper_half() {
        let mut f = fixture();
        let mut set = ScrollObserverSet::bind(&f.doc, &ObserverConfig::default());
        set.update(&mut f.doc);
        assert_eq!(active_links(&f), vec![0]);

        // Root is scroll..scroll+300, so "about" enters past 300
        set.on_scroll(&mut f.doc, 250.0);
        assert_eq!(active_links(&f), vec![0]);
        set.on_scroll(&mut f.doc, 350.0);
        assert_eq!(active_links(&f), vec![1]);
        // "home" leaving does not clear the highlight
        set.on_scroll(&mut f.doc, 700.0);
        assert_eq!(active_links(&f), vec![1]);
        set.on_scroll(&mut f.doc, 1300.0);
        assert_eq!(active_links(&f), vec![2]);

        // Back up: home re-enters and wins
        set.on_scroll(&mut f.doc, 0.0);
        assert_eq!(active_links(&f), vec![0]);
    }

    #[test]
    fn test_spy_margin_follows_config() {
        let f = fixture();
        let spy = ScrollSpy::bind(&f.doc, 25.0);
        let margin = spy.observer.options().root_margin;
        assert_eq!(margin.bottom, MarginLength::Percent(-25.0));
        assert_eq!(margin.top, MarginLength::Px(0.0));

        let spy = ScrollSpy::bind(&f.doc, 0.0);
        assert_eq!(
            spy.observer.options().root_margin.bottom,
            MarginLength::Percent(0.0)
        );
    }

    #[test]
    fn test_spy_last_intersecting_entry_wins() {
        let mut f = fixture();
        // Shrink sections so two fit inside the spy root at once
        for (i, &section) in f.sections.iter().enumerate() {
            f.doc.set_layout(
                section,
                LayoutBox {
                    top: i as f64 * 100.0,
                    height: 100.0,
                    width: 800.0,
                },
            );
        }
        let mut set = ScrollObserverSet::bind(&f.doc, &ObserverConfig::default());
        set.update(&mut f.doc);
        assert_eq!(active_links(&f), vec![2]);
    }
}
