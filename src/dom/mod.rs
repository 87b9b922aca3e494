//! In-memory document model
//!
//! A small element tree standing in for the browser DOM. Controllers only
//! touch it through this API: classes, attributes, inline styles, text
//! content, focus and layout boxes. The terminal host renders from it and
//! feeds it events.
//!
//! Elements live in an arena and are addressed by [`ElementId`]. Removing an
//! element detaches its subtree; detached ids stay valid but are skipped by
//! queries and can no longer receive focus.

pub mod event;
pub mod focus;
mod selector;

pub use event::{DomEvent, Key, KeyboardEvent};
pub use selector::Selector;

use std::collections::BTreeMap;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// Vertical placement and width of an element, in document pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    pub top: f64,
    pub height: f64,
    pub width: f64,
}

impl LayoutBox {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    layout: LayoutBox,
    attached: bool,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            layout: LayoutBox::default(),
            attached: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// The page document: `<html>` root, `<body>`, focus and viewport
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    body: ElementId,
    active: Option<ElementId>,
    viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut root = Element::new("html");
        root.attached = true;
        let mut doc = Self {
            elements: vec![root],
            root: ElementId(0),
            body: ElementId(0),
            active: None,
            viewport: Viewport::default(),
        };
        doc.body = doc.append(doc.root, "body");
        doc
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0]
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tree construction
    // ─────────────────────────────────────────────────────────────────────

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.push(Element::new(tag));
        ElementId(self.elements.len() - 1)
    }

    /// Attach `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(old_parent) = self.element(child).parent {
            self.element_mut(old_parent).children.retain(|c| *c != child);
        }
        self.element_mut(child).parent = Some(parent);
        self.element_mut(parent).children.push(child);
        let attached = self.element(parent).attached;
        self.set_attached(child, attached);
    }

    /// Create an element and append it to `parent` in one step
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let child = self.create_element(tag);
        self.append_child(parent, child);
        child
    }

    /// Detach an element (and its subtree) from the tree
    pub fn remove(&mut self, id: ElementId) {
        if let Some(parent) = self.element(id).parent {
            self.element_mut(parent).children.retain(|c| *c != id);
        }
        self.element_mut(id).parent = None;
        self.set_attached(id, false);
    }

    /// Detach every child of `id` (the `innerHTML = ""` reset)
    pub fn clear_children(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.element_mut(id).children);
        for child in children {
            self.element_mut(child).parent = None;
            self.set_attached(child, false);
        }
    }

    fn set_attached(&mut self, id: ElementId, attached: bool) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let element = self.element_mut(current);
            element.attached = attached;
            stack.extend(element.children.iter().copied());
            if !attached && self.active == Some(current) {
                self.active = None;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Classes, attributes, styles, text
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let element = self.element_mut(id);
        if !element.has_class(class) {
            element.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        self.element_mut(id).classes.retain(|c| c != class);
    }

    /// `classList.toggle(class, force)`
    pub fn toggle_class(&mut self, id: ElementId, class: &str, force: bool) {
        if force {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.element(id).has_class(class)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        self.element_mut(id)
            .attributes
            .insert(name.to_string(), value.into());
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        self.element_mut(id).attributes.remove(name);
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).attribute(name)
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        let value = value.into();
        let style = &mut self.element_mut(id).style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value);
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).style(property)
    }

    /// Replace the element's content markup
    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.element_mut(id).text = text.into();
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.element(id).text()
    }

    /// Language metadata on the root element
    pub fn lang(&self) -> Option<&str> {
        self.attribute(self.root, "lang")
    }

    pub fn set_lang(&mut self, lang: &str) {
        let root = self.root;
        self.set_attribute(root, "lang", lang);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout and viewport
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_layout(&mut self, id: ElementId, layout: LayoutBox) {
        self.element_mut(id).layout = layout;
    }

    pub fn layout(&self, id: ElementId) -> LayoutBox {
        self.element(id).layout
    }

    /// Rendered width of the element (`clientWidth`)
    pub fn client_width(&self, id: ElementId) -> f64 {
        self.element(id).layout.width
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
    }

    pub fn scroll_to(&mut self, y: f64) {
        self.viewport.scroll_y = y.max(0.0);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Traversal and queries
    // ─────────────────────────────────────────────────────────────────────

    /// Attached descendants of `scope` in document (pre-)order, excluding `scope`
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.element(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let element = self.element(id);
            if !element.attached {
                continue;
            }
            out.push(id);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` contains `id` (an element contains itself)
    pub fn contains(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.element(c).parent;
        }
        false
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|e| self.element(*e).id() == Some(id))
    }

    /// First attached element matching `selector`, in document order
    pub fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_within(self.root, selector)
    }

    pub fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.query_all_within(self.root, selector)
    }

    pub fn query_within(&self, scope: ElementId, selector: &str) -> Option<ElementId> {
        let selector = Selector::parse(selector);
        self.descendants(scope)
            .into_iter()
            .find(|id| selector.matches(self, *id))
    }

    pub fn query_all_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let selector = Selector::parse(selector);
        self.descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────

    /// Currently focused element; `None` means the body has focus
    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Whether `focus()` on this element would take effect
    pub fn can_receive_focus(&self, id: ElementId) -> bool {
        self.element(id).attached
    }

    /// Move focus to `id`. Returns false (focus unchanged) for detached elements.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.can_receive_focus(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Return focus to the body
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// Default Tab action: sequential focus navigation over the whole page
    pub fn focus_sequential(&mut self, backwards: bool) {
        let order = focus::focusable_within(self, self.root);
        if order.is_empty() {
            return;
        }
        let position = self
            .active
            .and_then(|active| order.iter().position(|e| *e == active));
        let next = match (position, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.active = Some(order[next]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId, ElementId, ElementId) {
        let mut doc = Document::new();
        let body = doc.body();
        let nav = doc.append(body, "nav");
        let ul = doc.append(nav, "ul");
        let li = doc.append(ul, "li");
        let link = doc.append(li, "a");
        doc.set_attribute(link, "href", "#home");
        let main = doc.append(body, "main");
        let section = doc.append(main, "section");
        doc.set_attribute(section, "id", "home");
        doc.add_class(section, "fade-in-section");
        (doc, nav, link, section)
    }

    #[test]
    fn test_query_by_tag_class_and_id() {
        let (doc, nav, link, section) = sample();
        assert_eq!(doc.query("nav"), Some(nav));
        assert_eq!(doc.query(".fade-in-section"), Some(section));
        assert_eq!(doc.get_element_by_id("home"), Some(section));
        assert_eq!(doc.query_all("nav ul li a"), vec![link]);
        assert!(doc.query("main a").is_none());
    }

    #[test]
    fn test_clear_children_detaches_subtree() {
        let (mut doc, nav, link, _) = sample();
        doc.focus(link);
        doc.clear_children(nav);
        assert!(!doc.element(link).is_attached());
        assert_eq!(doc.active_element(), None);
        assert!(!doc.focus(link));
        assert!(doc.query("a").is_none());
    }

    #[test]
    fn test_toggle_class_and_styles() {
        let (mut doc, nav, _, _) = sample();
        doc.toggle_class(nav, "active", true);
        doc.toggle_class(nav, "active", true);
        assert_eq!(doc.element(nav).classes(), ["active".to_string()]);
        doc.toggle_class(nav, "active", false);
        assert!(!doc.has_class(nav, "active"));

        doc.set_style(nav, "overflow", "hidden");
        assert_eq!(doc.style(nav, "overflow"), Some("hidden"));
        doc.set_style(nav, "overflow", "");
        assert_eq!(doc.style(nav, "overflow"), None);
    }

    #[test]
    fn test_sequential_focus_wraps_over_page() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append(body, "a");
        let b = doc.append(body, "button");
        doc.focus_sequential(false);
        assert_eq!(doc.active_element(), Some(a));
        doc.focus_sequential(false);
        assert_eq!(doc.active_element(), Some(b));
        doc.focus_sequential(false);
        assert_eq!(doc.active_element(), Some(a));
        doc.focus_sequential(true);
        assert_eq!(doc.active_element(), Some(b));
    }
}
