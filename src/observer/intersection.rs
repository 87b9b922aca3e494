// Intersection math and a polled IntersectionObserver
//
// Only the vertical axis is considered: sections span the full page width.
// The root is the viewport, grown or shrunk by the root margin.

use crate::dom::{Document, ElementId, LayoutBox, Viewport};

/// A root margin component: absolute px or percent of the viewport height
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(value) = token.strip_suffix('%') {
            return value.trim().parse().ok().map(Self::Percent);
        }
        let value = token.strip_suffix("px").unwrap_or(token);
        match value.trim().parse::<f64>() {
            // Unitless lengths other than zero are invalid in CSS
            Ok(v) if token.ends_with("px") || v == 0.0 => Some(Self::Px(v)),
            _ => None,
        }
    }

    fn resolve(&self, extent: f64) -> f64 {
        match self {
            Self::Px(px) => *px,
            Self::Percent(p) => extent * p / 100.0,
        }
    }
}

/// `rootMargin` in CSS shorthand order: top, right, bottom, left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(MarginLength::Px(0.0))
    }
}

impl RootMargin {
    pub fn uniform(length: MarginLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Parse 1 to 4 space-separated lengths, expanded like CSS `margin`
    pub fn parse(source: &str) -> Option<Self> {
        let parts = source
            .split_whitespace()
            .map(MarginLength::parse)
            .collect::<Option<Vec<_>>>()?;
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return None,
        };
        Some(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Vertical root bounds for a viewport: (top, bottom) in document px
    pub fn root_bounds(&self, viewport: &Viewport) -> (f64, f64) {
        let top = viewport.scroll_y - self.top.resolve(viewport.height);
        let bottom = viewport.scroll_y + viewport.height + self.bottom.resolve(viewport.height);
        (top, bottom)
    }
}

/// Observer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: RootMargin,
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: RootMargin::default(),
            threshold: 0.0,
        }
    }
}

/// One observation of one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    /// Visible fraction of the target's height, 0..=1
    pub ratio: f64,
    pub is_intersecting: bool,
}

/// Geometry of a target against the (margin-adjusted) viewport
pub fn intersect(layout: &LayoutBox, viewport: &Viewport, options: &ObserverOptions) -> (f64, bool) {
    let (root_top, root_bottom) = options.root_margin.root_bounds(viewport);
    if root_bottom < root_top {
        return (0.0, false);
    }
    let top = layout.top.max(root_top);
    let bottom = layout.bottom().min(root_bottom);
    // Edge-adjacent boxes still intersect
    let touches = top <= bottom;
    let ratio = if !touches {
        0.0
    } else if layout.height <= 0.0 {
        1.0
    } else {
        ((bottom - top) / layout.height).clamp(0.0, 1.0)
    };
    let is_intersecting = touches && ratio >= options.threshold;
    (ratio, is_intersecting)
}

/// Polled intersection observer
///
/// `take_records` reports every target on the first call and afterwards only
/// targets whose intersecting state changed, in observation order.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: Vec<(ElementId, Option<bool>)>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn observe(&mut self, target: ElementId) {
        if !self.targets.iter().any(|(t, _)| *t == target) {
            self.targets.push((target, None));
        }
    }

    pub fn unobserve(&mut self, target: ElementId) {
        self.targets.retain(|(t, _)| *t != target);
    }

    pub fn observed(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.targets.iter().map(|(t, _)| *t)
    }

    pub fn take_records(&mut self, doc: &Document) -> Vec<IntersectionEntry> {
        let viewport = doc.viewport();
        let mut records = Vec::new();
        for (target, last) in &mut self.targets {
            let (ratio, is_intersecting) = if doc.element(*target).is_attached() {
                intersect(&doc.layout(*target), &viewport, &self.options)
            } else {
                (0.0, false)
            };
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                records.push(IntersectionEntry {
                    target: *target,
                    ratio,
                    is_intersecting,
                });
            }
        }
        records
    }
}
