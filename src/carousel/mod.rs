//! Portfolio image carousel
//!
//! [`CarouselState`] holds the position math; [`CarouselController`] binds it
//! to the `#portfolioSlider` markup and writes the resulting styles, classes
//! and indicator dots back into the document.

mod state;

pub use state::{CarouselError, CarouselState, Swipe};

use crate::config::CarouselConfig;
use crate::dom::{Document, ElementId};

/// Carousel container id
pub const SLIDER_ID: &str = "portfolioSlider";

const INDICATOR_CLASS: &str = "indicator-dot";
const INDEX_ATTR: &str = "data-index";

/// Elements the carousel drives, resolved once at bind time
#[derive(Debug, Clone)]
struct Parts {
    track: ElementId,
    slides: Vec<ElementId>,
    prev: ElementId,
    next: ElementId,
    indicators: ElementId,
    view: ElementId,
}

impl Parts {
    fn resolve(doc: &Document, container: ElementId) -> Result<Self, &'static str> {
        let find = |selector: &'static str| doc.query_within(container, selector).ok_or(selector);
        Ok(Self {
            track: find(".slider-track")?,
            slides: doc.query_all_within(container, ".slider-slide"),
            prev: find(".prev-btn")?,
            next: find(".next-btn")?,
            indicators: find(".slider-indicators")?,
            view: find(".slider-main-view")?,
        })
    }
}

/// Carousel bound to a document. Inert when the markup is missing.
#[derive(Debug)]
pub struct CarouselController {
    parts: Option<Parts>,
    state: CarouselState,
    config: CarouselConfig,
    dots: Vec<ElementId>,
    touch_start_x: Option<f64>,
}

impl CarouselController {
    pub fn bind(doc: &Document, config: CarouselConfig) -> Self {
        let parts = match doc.get_element_by_id(SLIDER_ID) {
            None => {
                tracing::debug!("No #{} on the page, carousel inactive", SLIDER_ID);
                None
            }
            Some(container) => match Parts::resolve(doc, container) {
                Ok(parts) => Some(parts),
                Err(missing) => {
                    tracing::warn!("Carousel element {} not found, carousel inactive", missing);
                    None
                }
            },
        };
        let len = parts.as_ref().map_or(0, |p| p.slides.len());
        Self {
            parts,
            state: CarouselState::new(len),
            config,
            dots: Vec::new(),
            touch_start_x: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.parts.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.state.current()
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Expose the social slide's image, build indicators, size and position at 0
    pub fn initialize(&mut self, doc: &mut Document) {
        let Some(parts) = self.parts.clone() else {
            return;
        };
        self.apply_social_background(doc);
        self.rebuild_indicators(doc, &parts);
        self.state.reset();
        self.adjust_dimensions(doc, &parts);
        tracing::debug!("Carousel ready with {} slides", self.state.len());
    }

    pub fn go_to_next(&mut self, doc: &mut Document) {
        if self.parts.is_none() || self.state.is_empty() {
            return;
        }
        self.state.next();
        self.update_position(doc, true);
    }

    pub fn go_to_previous(&mut self, doc: &mut Document) {
        if self.parts.is_none() || self.state.is_empty() {
            return;
        }
        self.state.previous();
        self.update_position(doc, true);
    }

    /// Jump to a slide; indices outside `0..N` are rejected without moving
    pub fn go_to_index(&mut self, doc: &mut Document, index: usize) -> Result<(), CarouselError> {
        self.state.go_to(index)?;
        self.update_position(doc, true);
        Ok(())
    }

    /// Re-measure after a viewport change and snap without animation
    pub fn on_resize(&mut self, doc: &mut Document) {
        if let Some(parts) = self.parts.clone() {
            self.adjust_dimensions(doc, &parts);
        }
    }

    pub fn on_touch_start(&mut self, doc: &Document, target: ElementId, x: f64) -> bool {
        if !self.targets_view(doc, target) {
            return false;
        }
        self.touch_start_x = Some(x);
        true
    }

    /// Finish a gesture begun on the main view
    pub fn on_touch_end(&mut self, doc: &mut Document, target: ElementId, x: f64) -> bool {
        if !self.targets_view(doc, target) {
            return false;
        }
        // touchstart that never reached us counts as starting at 0
        let start = self.touch_start_x.take().unwrap_or(0.0);
        self.on_touch_gesture(doc, x - start);
        true
    }

    pub fn on_touch_gesture(&mut self, doc: &mut Document, delta_x: f64) -> Swipe {
        let swipe = Swipe::classify(delta_x, self.config.swipe_threshold);
        match swipe {
            Swipe::Next => self.go_to_next(doc),
            Swipe::Previous => self.go_to_previous(doc),
            Swipe::Ignore => {}
        }
        swipe
    }

    /// Click listeners on the arrows and indicator dots
    pub fn handle_click(&mut self, doc: &mut Document, target: ElementId) -> bool {
        let Some((prev, next)) = self.buttons() else {
            return false;
        };
        if doc.contains(prev, target) {
            self.go_to_previous(doc);
            return true;
        }
        if doc.contains(next, target) {
            self.go_to_next(doc);
            return true;
        }
        let Some(dot) = self.dots.iter().copied().find(|d| doc.contains(*d, target)) else {
            return false;
        };
        let index = doc
            .attribute(dot, INDEX_ATTR)
            .and_then(|i| i.parse::<usize>().ok());
        match index.map(|i| self.go_to_index(doc, i)) {
            Some(Ok(())) => {}
            Some(Err(e)) => tracing::debug!("Indicator ignored: {}", e),
            None => tracing::debug!("Indicator without a usable {}", INDEX_ATTR),
        }
        true
    }

    /// Arrow buttons, exposed for hosts that map keys onto them
    pub fn buttons(&self) -> Option<(ElementId, ElementId)> {
        self.parts.as_ref().map(|p| (p.prev, p.next))
    }

    pub fn indicator_dots(&self) -> &[ElementId] {
        &self.dots
    }

    fn targets_view(&self, doc: &Document, target: ElementId) -> bool {
        self.parts
            .as_ref()
            .is_some_and(|p| doc.contains(p.view, target))
    }

    fn apply_social_background(&self, doc: &mut Document) {
        let Some(container) = doc.get_element_by_id(SLIDER_ID) else {
            return;
        };
        let Some(slide) = doc.query_within(container, ".midia-social-slide") else {
            return;
        };
        let Some(img) = doc.query_within(slide, "img") else {
            return;
        };
        let src = doc.attribute(img, "src").unwrap_or_default().to_string();
        doc.set_style(slide, "--bg-image", format!("url('{}')", src));
    }

    fn rebuild_indicators(&mut self, doc: &mut Document, parts: &Parts) {
        doc.clear_children(parts.indicators);
        self.dots = (0..parts.slides.len())
            .map(|i| {
                let dot = doc.append(parts.indicators, "span");
                doc.add_class(dot, INDICATOR_CLASS);
                doc.set_attribute(dot, INDEX_ATTR, i.to_string());
                dot
            })
            .collect();
    }

    fn adjust_dimensions(&mut self, doc: &mut Document, parts: &Parts) {
        let width = doc.client_width(parts.view).max(0.0).round() as u32;
        self.state.set_slide_width(width);
        for &slide in &parts.slides {
            doc.set_style(slide, "width", format!("{}px", width));
        }
        let track_width = u64::from(width) * parts.slides.len() as u64;
        doc.set_style(parts.track, "width", format!("{}px", track_width));
        self.update_position(doc, false);
    }

    fn update_position(&mut self, doc: &mut Document, animate: bool) {
        let Some(parts) = self.parts.as_ref() else {
            return;
        };
        doc.set_style(
            parts.track,
            "transform",
            format!("translateX({}px)", self.state.offset()),
        );
        let transition = if animate {
            self.config.transition_css()
        } else {
            "none".to_string()
        };
        doc.set_style(parts.track, "transition", transition);

        for (index, &dot) in self.dots.iter().enumerate() {
            doc.toggle_class(dot, "active", index == self.state.current());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::LayoutBox;

    struct Slider {
        doc: Document,
        track: ElementId,
        slides: Vec<ElementId>,
        prev: ElementId,
        next: ElementId,
        indicators: ElementId,
        view: ElementId,
    }

    fn slider(count: usize, width: f64) -> Slider {
        let mut doc = Document::new();
        let body = doc.body();
        let container = doc.append(body, "div");
        doc.set_attribute(container, "id", SLIDER_ID);
        let view = doc.append(container, "div");
        doc.add_class(view, "slider-main-view");
        doc.set_layout(
            view,
            LayoutBox {
                top: 0.0,
                height: 300.0,
                width,
            },
        );
        let track = doc.append(view, "div");
        doc.add_class(track, "slider-track");
        let slides = (0..count)
            .map(|i| {
                let slide = doc.append(track, "div");
                doc.add_class(slide, "slider-slide");
                if i == count - 1 {
                    doc.add_class(slide, "midia-social-slide");
                    let img = doc.append(slide, "img");
                    doc.set_attribute(img, "src", "img/social.png");
                }
                slide
            })
            .collect();
        let prev = doc.append(container, "button");
        doc.add_class(prev, "prev-btn");
        let next = doc.append(container, "button");
        doc.add_class(next, "next-btn");
        let indicators = doc.append(container, "div");
        doc.add_class(indicators, "slider-indicators");
        Slider {
            doc,
            track,
            slides,
            prev,
            next,
            indicators,
            view,
        }
    }

    fn active_dots(doc: &Document, carousel: &CarouselController) -> Vec<usize> {
        carousel
            .indicator_dots()
            .iter()
            .enumerate()
            .filter(|(_, d)| doc.has_class(**d, "active"))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_initialize_sizes_track_and_builds_dots() {
        let mut s = slider(3, 640.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);

        assert!(carousel.is_active());
        for &slide in &s.slides {
            assert_eq!(s.doc.style(slide, "width"), Some("640px"));
        }
        assert_eq!(s.doc.style(s.track, "width"), Some("1920px"));
        assert_eq!(s.doc.style(s.track, "transform"), Some("translateX(0px)"));
        assert_eq!(s.doc.style(s.track, "transition"), Some("none"));
        assert_eq!(s.doc.element(s.indicators).children().len(), 3);
        assert_eq!(active_dots(&s.doc, &carousel), vec![0]);
        assert_eq!(
            s.doc.style(s.slides[2], "--bg-image"),
            Some("url('img/social.png')")
        );
    }

    #[test]
    fn test_initialize_twice_keeps_one_dot_per_slide() {
        let mut s = slider(3, 640.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);
        carousel.initialize(&mut s.doc);
        assert_eq!(s.doc.element(s.indicators).children().len(), 3);
        assert_eq!(s.doc.query_all(".indicator-dot").len(), 3);
    }

    #[test]
    fn test_buttons_wrap_and_animate() {
        let mut s = slider(3, 500.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);

        assert!(carousel.handle_click(&mut s.doc, s.prev));
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(s.doc.style(s.track, "transform"), Some("translateX(-1000px)"));
        assert_eq!(
            s.doc.style(s.track, "transition"),
            Some("transform 0.6s cubic-bezier(0.25, 1, 0.5, 1)")
        );
        assert_eq!(active_dots(&s.doc, &carousel), vec![2]);

        assert!(carousel.handle_click(&mut s.doc, s.next));
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(active_dots(&s.doc, &carousel), vec![0]);
    }

    #[test]
    fn test_indicator_click_jumps() {
        let mut s = slider(3, 500.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);

        let dot = carousel.indicator_dots()[1];
        assert!(carousel.handle_click(&mut s.doc, dot));
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(s.doc.style(s.track, "transform"), Some("translateX(-500px)"));
        assert!(carousel.go_to_index(&mut s.doc, 7).is_err());
        assert_eq!(carousel.current_index(), 1);
    }

    #[test]
    fn test_touch_gesture_threshold() {
        let mut s = slider(3, 500.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);

        assert_eq!(carousel.on_touch_gesture(&mut s.doc, 49.0), Swipe::Ignore);
        assert_eq!(carousel.on_touch_gesture(&mut s.doc, -49.0), Swipe::Ignore);
        assert_eq!(carousel.current_index(), 0);

        assert!(carousel.on_touch_start(&s.doc, s.view, 300.0));
        assert!(carousel.on_touch_end(&mut s.doc, s.view, 249.0));
        assert_eq!(carousel.current_index(), 1);

        assert!(carousel.on_touch_start(&s.doc, s.view, 100.0));
        assert!(carousel.on_touch_end(&mut s.doc, s.view, 151.0));
        assert_eq!(carousel.current_index(), 0);

        // Gestures outside the view are not ours
        assert!(!carousel.on_touch_start(&s.doc, s.prev, 0.0));
    }

    #[test]
    fn test_resize_snaps_without_animation() {
        let mut s = slider(2, 500.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);
        carousel.go_to_next(&mut s.doc);

        s.doc.set_layout(
            s.view,
            LayoutBox {
                top: 0.0,
                height: 300.0,
                width: 320.0,
            },
        );
        carousel.on_resize(&mut s.doc);
        assert_eq!(carousel.current_index(), 1);
        assert_eq!(s.doc.style(s.track, "width"), Some("640px"));
        assert_eq!(s.doc.style(s.track, "transform"), Some("translateX(-320px)"));
        assert_eq!(s.doc.style(s.track, "transition"), Some("none"));
    }

    #[test]
    fn test_zero_slides_never_fail() {
        let mut s = slider(0, 500.0);
        let mut carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        carousel.initialize(&mut s.doc);
        carousel.go_to_next(&mut s.doc);
        carousel.go_to_previous(&mut s.doc);
        carousel.on_touch_gesture(&mut s.doc, -200.0);
        carousel.on_resize(&mut s.doc);
        assert_eq!(carousel.current_index(), 0);
        assert_eq!(s.doc.style(s.track, "width"), Some("0px"));
        assert!(carousel.indicator_dots().is_empty());
    }

    #[test]
    fn test_missing_markup_is_inert() {
        let mut doc = Document::new();
        let mut carousel = CarouselController::bind(&doc, CarouselConfig::default());
        carousel.initialize(&mut doc);
        carousel.go_to_next(&mut doc);
        assert!(!carousel.is_active());
        assert_eq!(carousel.current_index(), 0);

        // Container present but without a track
        let mut s = slider(2, 500.0);
        s.doc.remove(s.track);
        let carousel = CarouselController::bind(&s.doc, CarouselConfig::default());
        assert!(!carousel.is_active());
    }

    #[test]
    fn test_custom_threshold_and_duration() {
        let mut s = slider(2, 500.0);
        let config = CarouselConfig {
            swipe_threshold: 10.0,
            transition_ms: 250,
            ..Default::default()
        };
        let mut carousel = CarouselController::bind(&s.doc, config);
        carousel.initialize(&mut s.doc);
        assert_eq!(carousel.on_touch_gesture(&mut s.doc, -11.0), Swipe::Next);
        assert_eq!(
            s.doc.style(s.track, "transition"),
            Some("transform 0.25s cubic-bezier(0.25, 1, 0.5, 1)")
        );
    }
}
