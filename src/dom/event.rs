// Events delivered to the page
//
// The host translates terminal input into these; `Page::dispatch` routes them
// to controllers in registration order, then runs the default action unless a
// handler prevented it.

use super::ElementId;

/// Keys the page reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Enter,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Other,
}

/// A `keydown` event with `preventDefault` semantics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key: Key,
    pub shift: bool,
    default_prevented: bool,
}

impl KeyboardEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            default_prevented: false,
        }
    }

    pub fn with_shift(key: Key) -> Self {
        Self {
            key,
            shift: true,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Everything that can happen to the page
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Pointer activation of an element
    Click(ElementId),
    /// Key pressed while the page has focus
    KeyDown(KeyboardEvent),
    /// Finger/pointer down at horizontal position `x`
    TouchStart { target: ElementId, x: f64 },
    /// Finger/pointer up at horizontal position `x`
    TouchEnd { target: ElementId, x: f64 },
    /// Window resized to `width` × `height`
    Resize { width: f64, height: f64 },
    /// Page scrolled to vertical offset `y`
    Scroll { y: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_sticks() {
        let mut event = KeyboardEvent::with_shift(Key::Tab);
        assert!(event.shift);
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
