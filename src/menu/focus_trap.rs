// Focus containment for the open menu panel
//
// Pure decision function: given a keydown and the currently focused element,
// say what the controller should do. The controller applies it.

use crate::dom::{ElementId, Key, KeyboardEvent};

/// What the trap wants done with a keydown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapAction {
    /// Let the default Tab behaviour run
    Pass,
    /// Swallow the key (no focusable elements to move between)
    Suppress,
    /// Prevent the default and focus this element instead
    MoveFocus(ElementId),
    /// Escape: close the menu
    Close,
}

/// Ordered focusable elements of the panel, captured when the menu opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    focusable: Vec<ElementId>,
    panel: ElementId,
}

impl FocusTrap {
    pub fn new(focusable: Vec<ElementId>, panel: ElementId) -> Self {
        Self { focusable, panel }
    }

    /// Element that receives focus on open: first focusable, else the panel
    pub fn first(&self) -> ElementId {
        self.focusable.first().copied().unwrap_or(self.panel)
    }

    pub fn last(&self) -> ElementId {
        self.focusable.last().copied().unwrap_or(self.panel)
    }

    pub fn focusable(&self) -> &[ElementId] {
        &self.focusable
    }

    pub fn on_key(&self, event: &KeyboardEvent, active: Option<ElementId>) -> TrapAction {
        match event.key {
            Key::Escape => TrapAction::Close,
            Key::Tab if self.focusable.is_empty() => TrapAction::Suppress,
            Key::Tab if event.shift && active == Some(self.first()) => {
                TrapAction::MoveFocus(self.last())
            }
            Key::Tab if !event.shift && active == Some(self.last()) => {
                TrapAction::MoveFocus(self.first())
            }
            _ => TrapAction::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn ids(n: usize) -> (ElementId, Vec<ElementId>) {
        let mut doc = Document::new();
        let panel = doc.append(doc.body(), "nav");
        let links = (0..n).map(|_| doc.append(panel, "a")).collect();
        (panel, links)
    }

    #[test]
    fn test_tab_wraps_at_both_ends() {
        let (panel, links) = ids(3);
        let trap = FocusTrap::new(links.clone(), panel);

        let tab = KeyboardEvent::new(Key::Tab);
        let back = KeyboardEvent::with_shift(Key::Tab);
        assert_eq!(trap.on_key(&tab, Some(links[2])), TrapAction::MoveFocus(links[0]));
        assert_eq!(trap.on_key(&back, Some(links[0])), TrapAction::MoveFocus(links[2]));
        assert_eq!(trap.on_key(&tab, Some(links[0])), TrapAction::Pass);
        assert_eq!(trap.on_key(&back, Some(links[1])), TrapAction::Pass);
    }

    #[test]
    fn test_empty_panel_suppresses_tab() {
        let (panel, _) = ids(0);
        let trap = FocusTrap::new(Vec::new(), panel);
        assert_eq!(trap.first(), panel);
        assert_eq!(
            trap.on_key(&KeyboardEvent::new(Key::Tab), Some(panel)),
            TrapAction::Suppress
        );
    }

    #[test]
    fn test_escape_closes_and_other_keys_pass() {
        let (panel, links) = ids(1);
        let trap = FocusTrap::new(links, panel);
        assert_eq!(trap.on_key(&KeyboardEvent::new(Key::Escape), None), TrapAction::Close);
        assert_eq!(trap.on_key(&KeyboardEvent::new(Key::Enter), None), TrapAction::Pass);
    }
}
