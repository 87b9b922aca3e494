//! Focusability rules
//!
//! Mirrors the selector `a, button, input, textarea, [tabindex]:not([tabindex="-1"])`
//! with disabled elements filtered out.

use super::{Document, ElementId};

const INTERACTIVE_TAGS: [&str; 4] = ["a", "button", "input", "textarea"];

/// Whether the element takes part in Tab navigation
pub fn is_focusable(doc: &Document, id: ElementId) -> bool {
    let element = doc.element(id);
    if !element.is_attached() || element.has_attribute("disabled") {
        return false;
    }
    if INTERACTIVE_TAGS.contains(&element.tag()) {
        return true;
    }
    matches!(element.attribute("tabindex"), Some(index) if index.trim() != "-1")
}

/// Focusable descendants of `scope`, in document order
pub fn focusable_within(doc: &Document, scope: ElementId) -> Vec<ElementId> {
    doc.descendants(scope)
        .into_iter()
        .filter(|id| is_focusable(doc, *id))
        .collect()
}
