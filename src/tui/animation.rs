// Slide transition playback
//
// The carousel only writes `transform` and `transition` styles; this module
// turns them into motion on screen. A change of `translateX` with a
// transition other than `none` animates along the timing curve, otherwise
// the track snaps.

use std::time::{Duration, Instant};

/// CSS `cubic-bezier(x1, y1, x2, y2)` timing function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Parse a CSS timing function keyword or `cubic-bezier(...)`
    pub fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        match source {
            "linear" => return Some(Self::LINEAR),
            "ease" => return Some(Self::EASE),
            "ease-in" => return Some(Self::EASE_IN),
            "ease-out" => return Some(Self::EASE_OUT),
            "ease-in-out" => return Some(Self::EASE_IN_OUT),
            _ => {}
        }
        let args = source.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
        let values = args
            .split(',')
            .map(|v| v.trim().parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        match values.as_slice() {
            // x coordinates must stay within [0, 1] for the curve to be a function
            [x1, y1, x2, y2] if (0.0..=1.0).contains(x1) && (0.0..=1.0).contains(x2) => {
                Some(Self::new(*x1, *y1, *x2, *y2))
            }
            _ => None,
        }
    }

    fn sample(a: f64, b: f64, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    }

    fn sample_dx(&self, t: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * self.x1 + 6.0 * u * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Eased progress for linear progress `x` in 0..=1
    pub fn ease(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // Newton first, bisection if the slope is too flat
        let mut t = x;
        for _ in 0..8 {
            let error = Self::sample(self.x1, self.x2, t) - x;
            if error.abs() < 1e-7 {
                return Self::sample(self.y1, self.y2, t);
            }
            let slope = self.sample_dx(t);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= error / slope;
        }

        let (mut low, mut high) = (0.0, 1.0);
        t = x;
        for _ in 0..50 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < 1e-7 {
                break;
            }
            if value < x {
                low = t;
            } else {
                high = t;
            }
            t = (low + high) / 2.0;
        }
        Self::sample(self.y1, self.y2, t)
    }
}

/// A parsed `transition` declaration for `transform`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl Transition {
    /// Parse `transform 0.6s cubic-bezier(...)`. `none` and anything for
    /// another property yield `None`.
    pub fn parse(style: &str) -> Option<Self> {
        let rest = style.trim().strip_prefix("transform")?.trim_start();
        let (duration, easing) = rest.split_once(char::is_whitespace).unwrap_or((rest, "ease"));
        let duration = parse_duration(duration)?;
        let easing = CubicBezier::parse(easing)?;
        Some(Self { duration, easing })
    }
}

fn parse_duration(token: &str) -> Option<Duration> {
    let seconds = if let Some(ms) = token.strip_suffix("ms") {
        ms.parse::<f64>().ok()? / 1000.0
    } else {
        token.strip_suffix('s')?.parse::<f64>().ok()?
    };
    (seconds.is_finite() && seconds >= 0.0)
        .then(|| Duration::from_micros((seconds * 1_000_000.0).round() as u64))
}

/// Horizontal offset from `translateX(<n>px)`
pub fn parse_translate_x(transform: &str) -> Option<f64> {
    transform
        .trim()
        .strip_prefix("translateX(")?
        .strip_suffix(')')?
        .trim()
        .strip_suffix("px")?
        .parse()
        .ok()
}

/// Displayed track position, following the document's transform
#[derive(Debug, Clone)]
pub struct TrackMotion {
    target: f64,
    from: f64,
    started: Instant,
    transition: Option<Transition>,
}

impl TrackMotion {
    pub fn new(now: Instant) -> Self {
        Self {
            target: 0.0,
            from: 0.0,
            started: now,
            transition: None,
        }
    }

    /// Feed the current `transform` / `transition` styles
    pub fn sync(&mut self, transform: Option<&str>, transition: Option<&str>, now: Instant) {
        let target = transform.and_then(parse_translate_x).unwrap_or(0.0);
        if target == self.target {
            return;
        }
        let current = self.position(now);
        self.from = current;
        self.target = target;
        self.started = now;
        self.transition = transition.and_then(Transition::parse);
    }

    pub fn position(&self, now: Instant) -> f64 {
        let Some(transition) = self.transition else {
            return self.target;
        };
        if transition.duration.is_zero() {
            return self.target;
        }
        let elapsed = now.saturating_duration_since(self.started);
        let progress = elapsed.as_secs_f64() / transition.duration.as_secs_f64();
        if progress >= 1.0 {
            return self.target;
        }
        self.from + (self.target - self.from) * transition.easing.ease(progress)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.position(now) != self.target
    }
}
