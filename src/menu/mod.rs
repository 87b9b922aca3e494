//! Slide-out navigation menu
//!
//! `MenuState` and [`FocusTrap`] decide; [`MenuController`] applies the
//! decisions to the document (classes, aria attributes, body overflow, focus).

mod focus_trap;

pub use focus_trap::{FocusTrap, TrapAction};

use crate::dom::focus::focusable_within;
use crate::dom::{Document, ElementId, KeyboardEvent};

/// Open/closed state of the panel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open {
        /// Focus before opening; `None` was the body
        previously_focused: Option<ElementId>,
        trap: FocusTrap,
    },
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Parts {
    toggle: ElementId,
    panel: ElementId,
    overlay: Option<ElementId>,
}

#[derive(Debug)]
pub struct MenuController {
    parts: Option<Parts>,
    links: Vec<ElementId>,
    state: MenuState,
}

impl MenuController {
    pub fn bind(doc: &Document) -> Self {
        let toggle = doc.query(".menu-toggle");
        let panel = doc.query("nav");
        let parts = match (toggle, panel) {
            (Some(toggle), Some(panel)) => Some(Parts {
                toggle,
                panel,
                overlay: doc.query(".menu-overlay"),
            }),
            _ => {
                tracing::warn!("Menu elements not found: .menu-toggle or nav missing");
                None
            }
        };
        let links = if parts.is_some() {
            doc.query_all("nav ul li a")
        } else {
            Vec::new()
        };
        Self {
            parts,
            links,
            state: MenuState::Closed,
        }
    }

    pub fn is_active(&self) -> bool {
        self.parts.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn toggle_button(&self) -> Option<ElementId> {
        self.parts.map(|p| p.toggle)
    }

    pub fn open(&mut self, doc: &mut Document) {
        let Some(parts) = self.parts else {
            return;
        };
        if self.state.is_open() {
            return;
        }
        let previously_focused = doc.active_element();

        self.set_markers(doc, parts, true);
        let body = doc.body();
        doc.set_style(body, "overflow", "hidden");

        let trap = FocusTrap::new(focusable_within(doc, parts.panel), parts.panel);
        doc.focus(trap.first());
        tracing::debug!("Menu opened ({} focusable)", trap.focusable().len());

        self.state = MenuState::Open {
            previously_focused,
            trap,
        };
    }

    /// Close the menu. Safe to call in any state.
    pub fn close(&mut self, doc: &mut Document) {
        let Some(parts) = self.parts else {
            return;
        };
        self.set_markers(doc, parts, false);
        let body = doc.body();
        doc.set_style(body, "overflow", "");

        if let MenuState::Open {
            previously_focused, ..
        } = std::mem::take(&mut self.state)
        {
            match previously_focused {
                Some(element) if doc.can_receive_focus(element) => {
                    doc.focus(element);
                }
                Some(_) => {}
                None => doc.blur(),
            }
            tracing::debug!("Menu closed");
        }
    }

    pub fn toggle(&mut self, doc: &mut Document) {
        // The panel's class is the source of truth, like the page's listener
        let open = self
            .parts
            .is_some_and(|p| doc.has_class(p.panel, "active"));
        if open {
            self.close(doc);
        } else {
            self.open(doc);
        }
    }

    /// Toggle, overlay and nav link clicks. Returns true if the click was ours.
    pub fn handle_click(&mut self, doc: &mut Document, target: ElementId) -> bool {
        let Some(parts) = self.parts else {
            return false;
        };
        if doc.contains(parts.toggle, target) {
            self.toggle(doc);
            return true;
        }
        let on_overlay = parts.overlay.is_some_and(|o| doc.contains(o, target));
        let on_link = self.links.iter().any(|l| doc.contains(*l, target));
        if on_overlay || on_link {
            self.close(doc);
            return true;
        }
        false
    }

    /// Key trap, active only while open
    pub fn handle_key(&mut self, doc: &mut Document, event: &mut KeyboardEvent) {
        let MenuState::Open { trap, .. } = &self.state else {
            return;
        };
        match trap.on_key(event, doc.active_element()) {
            TrapAction::Pass => {}
            TrapAction::Suppress => event.prevent_default(),
            TrapAction::MoveFocus(target) => {
                event.prevent_default();
                doc.focus(target);
            }
            TrapAction::Close => self.close(doc),
        }
    }

    fn set_markers(&self, doc: &mut Document, parts: Parts, open: bool) {
        doc.toggle_class(parts.toggle, "active", open);
        doc.toggle_class(parts.panel, "active", open);
        if let Some(overlay) = parts.overlay {
            doc.toggle_class(overlay, "active", open);
        }
        doc.set_attribute(parts.toggle, "aria-expanded", open.to_string());
        doc.set_attribute(parts.panel, "aria-hidden", (!open).to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Key;

    struct Fixture {
        doc: Document,
        toggle: ElementId,
        nav: ElementId,
        overlay: ElementId,
        links: Vec<ElementId>,
        outside: ElementId,
    }

    fn fixture(link_count: usize) -> Fixture {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.append(body, "button");
        doc.add_class(toggle, "menu-toggle");
        let nav = doc.append(body, "nav");
        let ul = doc.append(nav, "ul");
        let links = (0..link_count)
            .map(|i| {
                let li = doc.append(ul, "li");
                let a = doc.append(li, "a");
                doc.set_attribute(a, "href", format!("#s{}", i));
                a
            })
            .collect();
        let overlay = doc.append(body, "div");
        doc.add_class(overlay, "menu-overlay");
        let outside = doc.append(body, "a");
        Fixture {
            doc,
            toggle,
            nav,
            overlay,
            links,
            outside,
        }
    }

    fn press(menu: &mut MenuController, doc: &mut Document, event: KeyboardEvent) -> bool {
        let mut event = event;
        menu.handle_key(doc, &mut event);
        event.default_prevented()
    }

    #[test]
    fn test_open_marks_and_focuses_first_link() {
        let mut f = fixture(3);
        let mut menu = MenuController::bind(&f.doc);
        f.doc.focus(f.outside);
        menu.open(&mut f.doc);

        assert!(menu.is_open());
        for id in [f.toggle, f.nav, f.overlay] {
            assert!(f.doc.has_class(id, "active"));
        }
        assert_eq!(f.doc.attribute(f.toggle, "aria-expanded"), Some("true"));
        assert_eq!(f.doc.attribute(f.nav, "aria-hidden"), Some("false"));
        assert_eq!(f.doc.style(f.doc.body(), "overflow"), Some("hidden"));
        assert_eq!(f.doc.active_element(), Some(f.links[0]));
    }

    #[test]
    fn test_tab_cycles_inside_panel() {
        let mut f = fixture(3);
        let mut menu = MenuController::bind(&f.doc);
        menu.open(&mut f.doc);

        f.doc.focus(f.links[2]);
        assert!(press(&mut menu, &mut f.doc, KeyboardEvent::new(Key::Tab)));
        assert_eq!(f.doc.active_element(), Some(f.links[0]));

        assert!(press(&mut menu, &mut f.doc, KeyboardEvent::with_shift(Key::Tab)));
        assert_eq!(f.doc.active_element(), Some(f.links[2]));

        // Middle of the list: default Tab runs
        f.doc.focus(f.links[1]);
        assert!(!press(&mut menu, &mut f.doc, KeyboardEvent::new(Key::Tab)));
    }

    #[test]
    fn test_escape_closes_and_restores_focus() {
        let mut f = fixture(2);
        let mut menu = MenuController::bind(&f.doc);
        f.doc.focus(f.outside);
        menu.open(&mut f.doc);
        press(&mut menu, &mut f.doc, KeyboardEvent::new(Key::Escape));

        assert!(!menu.is_open());
        assert_eq!(f.doc.active_element(), Some(f.outside));
        for id in [f.toggle, f.nav, f.overlay] {
            assert!(!f.doc.has_class(id, "active"));
        }
        assert_eq!(f.doc.attribute(f.toggle, "aria-expanded"), Some("false"));
        assert_eq!(f.doc.attribute(f.nav, "aria-hidden"), Some("true"));
        assert_eq!(f.doc.style(f.doc.body(), "overflow"), None);

        // Trap is gone once closed
        f.doc.focus(f.links[1]);
        assert!(!press(&mut menu, &mut f.doc, KeyboardEvent::new(Key::Tab)));
    }

    #[test]
    fn test_close_twice_is_harmless() {
        let mut f = fixture(1);
        let mut menu = MenuController::bind(&f.doc);
        menu.open(&mut f.doc);
        menu.close(&mut f.doc);
        menu.close(&mut f.doc);
        assert_eq!(menu.state(), &MenuState::Closed);
    }

    #[test]
    fn test_detached_previous_focus_is_not_restored() {
        let mut f = fixture(1);
        let mut menu = MenuController::bind(&f.doc);
        f.doc.focus(f.outside);
        menu.open(&mut f.doc);
        f.doc.remove(f.outside);
        menu.close(&mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.links[0]));
    }

    #[test]
    fn test_empty_panel_focuses_itself_and_suppresses_tab() {
        let mut f = fixture(0);
        let mut menu = MenuController::bind(&f.doc);
        menu.open(&mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.nav));
        assert!(press(&mut menu, &mut f.doc, KeyboardEvent::new(Key::Tab)));
        assert_eq!(f.doc.active_element(), Some(f.nav));
    }

    #[test]
    fn test_click_triggers() {
        let mut f = fixture(2);
        let mut menu = MenuController::bind(&f.doc);

        assert!(menu.handle_click(&mut f.doc, f.toggle));
        assert!(menu.is_open());
        assert!(menu.handle_click(&mut f.doc, f.toggle));
        assert!(!menu.is_open());

        menu.open(&mut f.doc);
        assert!(menu.handle_click(&mut f.doc, f.overlay));
        assert!(!menu.is_open());

        menu.open(&mut f.doc);
        assert!(menu.handle_click(&mut f.doc, f.links[1]));
        assert!(!menu.is_open());

        assert!(!menu.handle_click(&mut f.doc, f.outside));
    }

    #[test]
    fn test_missing_toggle_is_inert_and_missing_overlay_tolerated() {
        let mut f = fixture(2);
        f.doc.remove(f.toggle);
        let mut menu = MenuController::bind(&f.doc);
        menu.open(&mut f.doc);
        assert!(!menu.is_active());
        assert!(!menu.is_open());
        assert!(!f.doc.has_class(f.nav, "active"));

        let mut f = fixture(2);
        f.doc.remove(f.overlay);
        let mut menu = MenuController::bind(&f.doc);
        menu.open(&mut f.doc);
        assert!(menu.is_open());
        menu.close(&mut f.doc);
        assert!(!menu.is_open());
    }
}
