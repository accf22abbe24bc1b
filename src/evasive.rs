//! The runaway "No" button
//!
//! Every time the pointer, a finger or keyboard focus reaches the button it jumps
//! to a random spot in the viewport, tilts a little and changes its label.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Lifecycle;
use crate::analytics::{Analytics, events};
use crate::consts::*;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Placement tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRules {
    /// Gap kept to every viewport edge
    pub margin: f64,
    /// Preferred per-axis jump from the previous position
    pub min_distance: f64,
    /// Draws before the last one is accepted as-is
    pub max_attempts: u32,
    /// Tilt range either side of upright (degrees)
    pub max_rotation_deg: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            margin: EVASIVE_MARGIN,
            min_distance: EVASIVE_MIN_DISTANCE,
            max_attempts: EVASIVE_MAX_ATTEMPTS,
            max_rotation_deg: EVASIVE_MAX_ROTATION_DEG,
        }
    }
}

/// Where the button goes next
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Top-left corner in viewport coordinates
    pub position: Point,
    pub rotation_deg: f64,
    pub label: String,
}

/// Pick a new top-left corner for an element of `size` inside `viewport`.
///
/// Draws uniformly until the candidate is at least `min_distance` away from
/// `prior` on one axis, giving up after `max_attempts` draws and keeping the last
/// one. The result is clamped into the margin box; if the box is empty (element
/// wider than the viewport) the margin corner wins.
pub fn pick_position<R: Rng>(
    rng: &mut R,
    rules: &PlacementRules,
    viewport: Size,
    size: Size,
    prior: Point,
) -> Point {
    let min_x = rules.margin;
    let min_y = rules.margin;
    let max_x = viewport.width - size.width - rules.margin;
    let max_y = viewport.height - size.height - rules.margin;

    let mut candidate;
    let mut attempts = 0;
    loop {
        candidate = Point::new(
            rng.random::<f64>() * (max_x - min_x) + min_x,
            rng.random::<f64>() * (max_y - min_y) + min_y,
        );
        attempts += 1;

        let too_close = (candidate.x - prior.x).abs() < rules.min_distance
            && (candidate.y - prior.y).abs() < rules.min_distance;
        if attempts >= rules.max_attempts.max(1) || !too_close {
            break;
        }
    }

    // max/min instead of clamp: the box can be inverted on tiny viewports
    Point::new(
        candidate.x.min(max_x).max(min_x),
        candidate.y.min(max_y).max(min_y),
    )
}

/// Random tilt in [-max, +max] degrees
pub fn pick_rotation<R: Rng>(rng: &mut R, max_deg: f64) -> f64 {
    rng.random::<f64>() * 2.0 * max_deg - max_deg
}

/// DOM side of the button
pub trait TargetView {
    fn viewport_size(&self) -> Size;

    fn target_size(&self) -> Size;

    /// Current top-left corner in viewport coordinates
    fn target_position(&self) -> Point;

    /// Move the button out of clipping/transformed ancestors into the page section
    fn detach_target(&mut self) -> Result<()>;

    /// Apply fixed position, rotation and label
    fn place_target(&mut self, placement: &Placement);

    /// Attach pointer-enter, touch-start and focus handlers
    fn bind_target_handlers(&mut self) -> Result<()>;
}

/// Runaway button state
#[derive(Debug, Clone)]
pub struct EvasiveTarget {
    rules: PlacementRules,
    labels: Vec<String>,
    rng: Pcg32,
    lifecycle: Lifecycle,
    detached: bool,
    attempts: u32,
}

impl EvasiveTarget {
    pub fn new(rules: PlacementRules, labels: Vec<String>, seed: u64) -> Self {
        Self {
            rules,
            labels,
            rng: Pcg32::seed_from_u64(seed),
            lifecycle: Lifecycle::Uninitialized,
            detached: false,
            attempts: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Times the button has run away
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Bind handlers on first call
    pub fn ensure_bound<V: TargetView + ?Sized>(&mut self, view: &mut V) -> Result<()> {
        if !self.lifecycle.is_ready() {
            view.bind_target_handlers()?;
            self.lifecycle = Lifecycle::Ready;
        }
        Ok(())
    }

    /// Run away from the pointer
    pub fn activate<V: TargetView + ?Sized>(
        &mut self,
        view: &mut V,
        analytics: &Analytics,
    ) -> Result<Placement> {
        if !self.detached {
            view.detach_target()?;
            self.detached = true;
        }

        analytics.report_bare(events::NO_BUTTON_ATTEMPTED);
        self.attempts += 1;

        let position = pick_position(
            &mut self.rng,
            &self.rules,
            view.viewport_size(),
            view.target_size(),
            view.target_position(),
        );
        let rotation_deg = pick_rotation(&mut self.rng, self.rules.max_rotation_deg);
        let label = if self.labels.is_empty() {
            String::new()
        } else {
            self.labels[self.rng.random_range(0..self.labels.len())].clone()
        };

        let placement = Placement {
            position,
            rotation_deg,
            label,
        };
        view.place_target(&placement);
        log::debug!(
            "No button moved to ({:.0}, {:.0})",
            placement.position.x,
            placement.position.y
        );
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeViews, RecordingSink};
    use proptest::prelude::*;
    use std::rc::Rc;

    fn labels() -> Vec<String> {
        vec!["Mann Jao!".to_string(), "Hehe!".to_string()]
    }

    #[test]
    fn test_thousand_placements_stay_inside_margin_box() {
        let rules = PlacementRules::default();
        let viewport = Size::new(390.0, 844.0);
        let size = Size::new(120.0, 48.0);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut prior = Point::new(135.0, 400.0);

        for _ in 0..1000 {
            let p = pick_position(&mut rng, &rules, viewport, size, prior);
            assert!(p.x >= 20.0 && p.x <= viewport.width - size.width - 20.0);
            assert!(p.y >= 20.0 && p.y <= viewport.height - size.height - 20.0);
            prior = p;
        }
    }

    #[test]
    fn test_prefers_distant_positions() {
        let rules = PlacementRules::default();
        let viewport = Size::new(1280.0, 800.0);
        let size = Size::new(100.0, 40.0);
        let mut rng = Pcg32::seed_from_u64(42);
        let prior = Point::new(600.0, 380.0);

        let far = (0..200)
            .map(|_| pick_position(&mut rng, &rules, viewport, size, prior))
            .filter(|p| (p.x - prior.x).abs() >= 120.0 || (p.y - prior.y).abs() >= 120.0)
            .count();
        // 20 retries make a near miss vanishingly rare on a roomy viewport
        assert_eq!(far, 200);
    }

    #[test]
    fn test_gives_up_when_nothing_is_far_enough() {
        // Box is 10x10 px, every draw is within 120 px of the prior position
        let rules = PlacementRules::default();
        let viewport = Size::new(150.0, 90.0);
        let size = Size::new(100.0, 40.0);
        let mut rng = Pcg32::seed_from_u64(1);

        let p = pick_position(&mut rng, &rules, viewport, size, Point::new(25.0, 25.0));
        assert!((20.0..=30.0).contains(&p.x));
        assert!((20.0..=30.0).contains(&p.y));
    }

    #[test]
    fn test_inverted_box_pins_to_margin() {
        let rules = PlacementRules::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let p = pick_position(
            &mut rng,
            &rules,
            Size::new(100.0, 100.0),
            Size::new(200.0, 200.0),
            Point::default(),
        );
        assert_eq!(p, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_activate_detaches_once_and_reports() {
        let sink = Rc::new(RecordingSink::default());
        let analytics = Analytics::new(sink.clone());
        let mut target = EvasiveTarget::new(PlacementRules::default(), labels(), 9);
        let mut view = FakeViews::default();

        target.ensure_bound(&mut view).unwrap();
        target.ensure_bound(&mut view).unwrap();
        let first = target.activate(&mut view, &analytics).unwrap();
        target.activate(&mut view, &analytics).unwrap();

        assert_eq!(view.target_bindings, 1);
        assert_eq!(view.target_detaches, 1);
        assert_eq!(target.attempts(), 2);
        assert_eq!(view.placements.len(), 2);
        assert_eq!(view.placements[0], first);
        assert!(labels().contains(&first.label));
        assert!(first.rotation_deg.abs() <= 10.0);
        assert_eq!(
            sink.names(),
            vec![events::NO_BUTTON_ATTEMPTED, events::NO_BUTTON_ATTEMPTED]
        );
    }

    proptest! {
        #[test]
        fn prop_position_inside_viewport(
            seed in any::<u64>(),
            vw in 200.0f64..2000.0,
            vh in 200.0f64..2000.0,
            w in 10.0f64..150.0,
            h in 10.0f64..150.0,
            px in 0.0f64..2000.0,
            py in 0.0f64..2000.0,
        ) {
            let rules = PlacementRules::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = pick_position(&mut rng, &rules, Size::new(vw, vh), Size::new(w, h), Point::new(px, py));
            prop_assert!(p.x >= rules.margin && p.x <= vw - w - rules.margin);
            prop_assert!(p.y >= rules.margin && p.y <= vh - h - rules.margin);
            let r = pick_rotation(&mut rng, rules.max_rotation_deg);
            prop_assert!((-10.0..=10.0).contains(&r));
        }
    }
}
