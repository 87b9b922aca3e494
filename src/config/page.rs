//! Page behaviour configuration: carousel and viewport observers

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Carousel
// ─────────────────────────────────────────────────────────────────────────────

/// Carousel tuning
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselConfig {
    /// Minimum horizontal travel (px) for a touch gesture to change slides
    pub swipe_threshold: f64,
    /// Duration of animated slide transitions
    pub transition_ms: u64,
    /// CSS timing function for animated transitions
    pub easing: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
            transition_ms: 600,
            easing: "cubic-bezier(0.25, 1, 0.5, 1)".to_string(),
        }
    }
}

impl CarouselConfig {
    /// The `transition` style applied to the track when animating
    pub fn transition_css(&self) -> String {
        format!(
            "transform {}s {}",
            self.transition_ms as f64 / 1000.0,
            self.easing
        )
    }

    pub fn from_file(file: Option<FileCarousel>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            swipe_threshold: file
                .swipe_threshold
                .filter(|t| t.is_finite() && *t >= 0.0)
                .unwrap_or(defaults.swipe_threshold),
            transition_ms: file.transition_ms.unwrap_or(defaults.transition_ms),
            easing: file.easing.unwrap_or(defaults.easing),
        }
    }
}

/// Carousel section as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCarousel {
    pub swipe_threshold: Option<f64>,
    pub transition_ms: Option<u64>,
    pub easing: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Observers
// ─────────────────────────────────────────────────────────────────────────────

/// Intersection observer tuning
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Visible fraction at which a section fades in
    pub reveal_threshold: f64,
    /// How far (percent of viewport height) the scroll-spy root is shrunk from the bottom
    pub spy_bottom_margin_percent: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.1,
            spy_bottom_margin_percent: 50.0,
        }
    }
}

impl ObserverConfig {
    pub fn from_file(file: Option<FileObservers>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            reveal_threshold: file
                .reveal_threshold
                .filter(|t| t.is_finite())
                .map(|t| t.clamp(0.0, 1.0))
                .unwrap_or(defaults.reveal_threshold),
            spy_bottom_margin_percent: file
                .spy_bottom_margin_percent
                .filter(|m| m.is_finite())
                .map(|m| m.clamp(0.0, 100.0))
                .unwrap_or(defaults.spy_bottom_margin_percent),
        }
    }
}

/// Observers section as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileObservers {
    pub reveal_threshold: Option<f64>,
    pub spy_bottom_margin_percent: Option<f64>,
}
