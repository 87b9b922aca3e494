// Pure carousel position logic, no document access

use std::fmt;

/// Rejected carousel commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselError {
    /// Indicator index outside `0..len`
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "slide index {} out of range (0..{})", index, len)
            }
        }
    }
}

impl std::error::Error for CarouselError {}

/// Slide position over a fixed number of slides
///
/// `current` is always a valid index, or 0 when there are no slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselState {
    current: usize,
    len: usize,
    slide_width: u32,
}

impl CarouselState {
    pub fn new(len: usize) -> Self {
        Self {
            current: 0,
            len,
            slide_width: 0,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn slide_width(&self) -> u32 {
        self.slide_width
    }

    pub fn set_slide_width(&mut self, width: u32) {
        self.slide_width = width;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
    }

    pub fn previous(&mut self) {
        if self.len > 0 {
            self.current = (self.current + self.len - 1) % self.len;
        }
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        self.current = index;
        Ok(())
    }

    /// Horizontal track offset in px (`-index × slide_width`)
    pub fn offset(&self) -> i64 {
        -(self.current as i64) * i64::from(self.slide_width)
    }
}

/// Outcome of a horizontal touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Next,
    Previous,
    Ignore,
}

impl Swipe {
    /// Finger moved left (negative delta) past the threshold → next slide
    pub fn classify(delta_x: f64, threshold: f64) -> Self {
        if !delta_x.is_finite() || delta_x.abs() <= threshold {
            Self::Ignore
        } else if delta_x < 0.0 {
            Self::Next
        } else {
            Self::Previous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_back_to_start() {
        for len in 1..=5 {
            let mut state = CarouselState::new(len);
            for _ in 0..len {
                state.next();
            }
            assert_eq!(state.current(), 0, "len {}", len);
        }
    }

    #[test]
    fn test_previous_undoes_next() {
        let mut state = CarouselState::new(3);
        state.go_to(2).expect("in range");
        state.next();
        assert_eq!(state.current(), 0);
        state.previous();
        assert_eq!(state.current(), 2);
        state.previous();
        state.previous();
        state.previous();
        assert_eq!(state.current(), 2);
    }

    #[test]
    fn test_empty_carousel_stays_at_zero() {
        let mut state = CarouselState::new(0);
        state.set_slide_width(800);
        state.next();
        state.previous();
        assert_eq!(state.current(), 0);
        assert_eq!(state.offset(), 0);
        assert!(state.go_to(0).is_err());
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut state = CarouselState::new(3);
        state.go_to(1).expect("in range");
        assert_eq!(
            state.go_to(3),
            Err(CarouselError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(state.current(), 1);
    }

    #[test]
    fn test_offset_is_negative_multiple_of_width() {
        let mut state = CarouselState::new(3);
        state.set_slide_width(640);
        assert_eq!(state.offset(), 0);
        state.go_to(2).expect("in range");
        assert_eq!(state.offset(), -1280);
    }

    #[test]
    fn test_swipe_threshold_is_strict() {
        assert_eq!(Swipe::classify(49.0, 50.0), Swipe::Ignore);
        assert_eq!(Swipe::classify(-50.0, 50.0), Swipe::Ignore);
        assert_eq!(Swipe::classify(-51.0, 50.0), Swipe::Next);
        assert_eq!(Swipe::classify(51.0, 50.0), Swipe::Previous);
        assert_eq!(Swipe::classify(f64::NAN, 50.0), Swipe::Ignore);
    }
}
