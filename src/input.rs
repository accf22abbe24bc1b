//! Keyboard and swipe adapters
//!
//! Translate raw DOM input into the handful of gestures the presentation knows.

use crate::consts::SWIPE_THRESHOLD;

/// Keys the presentation reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }

    /// Enter and Space click a focused button
    pub fn activates_button(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// Finger travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right to left: show the next slide
    Left,
    /// Finger moved left to right: show the previous slide
    Right,
}

/// Horizontal swipe detector fed by touch-start / touch-end screen X
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finish a touch. Returns a direction when the travel beats the threshold.
    pub fn end(&mut self, x: f64) -> Option<SwipeDirection> {
        let start = self.start_x.take()?;
        let diff = start - x;
        if diff.abs() <= self.threshold {
            return None;
        }
        if diff > 0.0 {
            Some(SwipeDirection::Left)
        } else {
            Some(SwipeDirection::Right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_dom("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_dom("a"), Key::Other);
        assert!(Key::Space.activates_button());
        assert!(!Key::ArrowLeft.activates_button());
    }

    #[test]
    fn test_swipe_directions() {
        let mut swipe = SwipeTracker::default();

        swipe.begin(300.0);
        assert_eq!(swipe.end(200.0), Some(SwipeDirection::Left));

        swipe.begin(100.0);
        assert_eq!(swipe.end(180.0), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_short_swipe_is_ignored() {
        let mut swipe = SwipeTracker::default();
        swipe.begin(100.0);
        assert_eq!(swipe.end(150.0), None);
        swipe.begin(100.0);
        assert_eq!(swipe.end(49.0), Some(SwipeDirection::Left));
    }

    #[test]
    fn test_end_without_begin() {
        let mut swipe = SwipeTracker::new(10.0);
        assert_eq!(swipe.end(500.0), None);

        swipe.begin(0.0);
        swipe.end(100.0);
        // Start is consumed by the first end
        assert_eq!(swipe.end(300.0), None);
    }
}
