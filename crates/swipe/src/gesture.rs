//! Drag geometry: release thresholds and the visuals derived from an offset.
//!
//! Positive offsets point right (interested), negative offsets point left
//! (ignored). Velocities use the same sign convention in pixels per second.

use model::Decision;
use std::time::Duration;

/// Thresholds and exit geometry for a swipe.
///
/// ## Usage
/// ```ignore
/// let thresholds = SwipeThresholds::new()
///     .with_offset(100.0)
///     .with_exit_duration(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThresholds {
    /// Release distance beyond which the swipe commits (strictly greater)
    pub offset: f32,
    /// Release speed beyond which the swipe commits (strictly greater)
    pub velocity: f32,
    /// Where the card is animated to when a decision commits
    pub exit_offset: f32,
    pub exit_duration: Duration,
}

impl SwipeThresholds {
    pub fn new() -> Self {
        Self {
            offset: 120.0,
            velocity: 500.0,
            exit_offset: 500.0,
            exit_duration: Duration::from_millis(300),
        }
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset.abs();
        self
    }

    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity.abs();
        self
    }

    pub fn with_exit_offset(mut self, exit_offset: f32) -> Self {
        self.exit_offset = exit_offset.abs();
        self
    }

    pub fn with_exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    /// Decide what a release at `offset` moving at `velocity` means.
    ///
    /// ## Algorithm
    /// 1. Distance past the offset threshold commits in the offset's direction
    /// 2. Otherwise speed past the velocity threshold commits in the
    ///    velocity's direction
    /// 3. Otherwise the card springs back
    ///
    /// The offset is checked first, so a far drag released with a flick the
    /// other way still follows the drag.
    pub fn evaluate_release(&self, offset: f32, velocity: f32) -> ReleaseOutcome {
        if offset.abs() > self.offset {
            ReleaseOutcome::Commit(Decision::from_direction(offset))
        } else if velocity.abs() > self.velocity {
            ReleaseOutcome::Commit(Decision::from_direction(velocity))
        } else {
            ReleaseOutcome::Cancel
        }
    }

    /// Signed offset the card exits to for `decision`
    pub fn exit_target(&self, decision: Decision) -> f32 {
        decision.direction() * self.exit_offset
    }
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Commit(Decision),
    Cancel,
}

/// Presentation values derived from a horizontal drag offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragVisuals {
    pub offset: f32,
    /// Card rotation in degrees
    pub rotation: f32,
    pub opacity: f32,
    /// Opacity of the "interested" label shown on right drags
    pub interested_opacity: f32,
    /// Opacity of the "ignore" label shown on left drags
    pub ignore_opacity: f32,
}

impl DragVisuals {
    pub fn at(offset: f32) -> Self {
        Self {
            offset,
            rotation: interpolate(offset, &[-200.0, 200.0], &[-25.0, 25.0]),
            opacity: interpolate(
                offset,
                &[-200.0, -120.0, 0.0, 120.0, 200.0],
                &[0.0, 1.0, 1.0, 1.0, 0.0],
            ),
            interested_opacity: interpolate(offset, &[120.0, 200.0], &[0.0, 1.0]),
            ignore_opacity: interpolate(offset, &[-200.0, -120.0], &[1.0, 0.0]),
        }
    }

    pub fn resting() -> Self {
        Self::at(0.0)
    }
}

/// Piecewise-linear interpolation clamped to the end values.
///
/// `input` must be ascending and the same length as `output`; an empty
/// mapping yields 0.
pub fn interpolate(x: f32, input: &[f32], output: &[f32]) -> f32 {
    let len = input.len().min(output.len());
    if len == 0 {
        return 0.0;
    }
    if x <= input[0] {
        return output[0];
    }
    if x >= input[len - 1] {
        return output[len - 1];
    }

    for i in 1..len {
        if x <= input[i] {
            let (x0, x1) = (input[i - 1], input[i]);
            let (y0, y1) = (output[i - 1], output[i]);
            if x1 == x0 {
                return y1;
            }
            return y0 + (x - x0) / (x1 - x0) * (y1 - y0);
        }
    }
    output[len - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_thresholds_are_strict() {
        let t = SwipeThresholds::default();
        assert_eq!(t.evaluate_release(119.0, 0.0), ReleaseOutcome::Cancel);
        assert_eq!(t.evaluate_release(120.0, 0.0), ReleaseOutcome::Cancel);
        assert_eq!(
            t.evaluate_release(121.0, 0.0),
            ReleaseOutcome::Commit(Decision::Interested)
        );
        assert_eq!(
            t.evaluate_release(-121.0, 0.0),
            ReleaseOutcome::Commit(Decision::Ignored)
        );
        assert_eq!(t.evaluate_release(0.0, 500.0), ReleaseOutcome::Cancel);
        assert_eq!(
            t.evaluate_release(0.0, -501.0),
            ReleaseOutcome::Commit(Decision::Ignored)
        );
    }

    #[test]
    fn test_offset_wins_over_opposite_velocity() {
        let t = SwipeThresholds::default();
        assert_eq!(
            t.evaluate_release(150.0, -900.0),
            ReleaseOutcome::Commit(Decision::Interested)
        );
        assert_eq!(
            t.evaluate_release(30.0, -900.0),
            ReleaseOutcome::Commit(Decision::Ignored)
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let t = SwipeThresholds::new().with_offset(50.0).with_velocity(-100.0);
        assert_eq!(t.velocity, 100.0);
        assert_eq!(
            t.evaluate_release(60.0, 0.0),
            ReleaseOutcome::Commit(Decision::Interested)
        );
        assert_eq!(t.exit_target(Decision::Ignored), -500.0);
    }

    #[test]
    fn test_visuals_at_rest() {
        let v = DragVisuals::resting();
        assert!(approx(v.rotation, 0.0));
        assert!(approx(v.opacity, 1.0));
        assert!(approx(v.interested_opacity, 0.0));
        assert!(approx(v.ignore_opacity, 0.0));
    }

    #[test]
    fn test_visuals_follow_the_drag() {
        let v = DragVisuals::at(160.0);
        assert!(approx(v.rotation, 20.0));
        assert!(approx(v.opacity, 0.5));
        assert!(approx(v.interested_opacity, 0.5));
        assert!(approx(v.ignore_opacity, 0.0));

        let v = DragVisuals::at(-400.0);
        assert!(approx(v.rotation, -25.0));
        assert!(approx(v.opacity, 0.0));
        assert!(approx(v.ignore_opacity, 1.0));
    }

    #[test]
    fn test_interpolate_clamps() {
        assert_eq!(interpolate(-10.0, &[0.0, 10.0], &[1.0, 2.0]), 1.0);
        assert_eq!(interpolate(50.0, &[0.0, 10.0], &[1.0, 2.0]), 2.0);
        assert!(approx(interpolate(5.0, &[0.0, 10.0], &[1.0, 2.0]), 1.5));
        assert_eq!(interpolate(5.0, &[], &[]), 0.0);
    }
}
