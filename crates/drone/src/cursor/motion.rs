use super::REFERENCE_FRAME_RATE;
use super::lock::LockState;
use dronectl::{Point, Ring};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothingMode {
    /// The lerp factor is applied once per frame, so the marker moves faster
    /// on high refresh rate displays.
    #[default]
    #[strum(to_string = "per-frame", serialize = "frame")]
    PerFrame,
    /// The lerp factor is rescaled by `dt` so a 60 Hz frame applies it exactly.
    #[strum(to_string = "time-scaled", serialize = "time")]
    TimeScaled,
}

impl SmoothingMode {
    pub fn factor(self, lerp_factor: f64, dt: f64) -> f64 {
        match self {
            Self::PerFrame => lerp_factor,
            Self::TimeScaled => {
                1.0 - (1.0 - lerp_factor).powf(dt.max(0.0) * REFERENCE_FRAME_RATE)
            }
        }
    }
}

/// Sole writer of the marker position.
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    marker: Point,
    lerp_factor: f64,
    mode: SmoothingMode,
}

impl MotionSmoother {
    pub fn new(lerp_factor: f64, mode: SmoothingMode) -> Self {
        Self {
            marker: Point::default(),
            lerp_factor,
            mode,
        }
    }

    pub fn marker(&self) -> Point {
        self.marker
    }

    pub fn retune(&mut self, lerp_factor: f64, mode: SmoothingMode) {
        self.lerp_factor = lerp_factor;
        self.mode = mode;
    }

    /// Pulls the marker toward `pointer`. Frozen while `lock` is locked.
    /// Returns whether the marker moved.
    pub fn step(&mut self, dt: f64, pointer: Point, lock: LockState) -> bool {
        if lock.is_locked() {
            return false;
        }
        let k = self.mode.factor(self.lerp_factor, dt);
        let next = self.marker.approach(pointer, k);
        let moved = next != self.marker;
        self.marker = next;
        moved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OrbitAngles {
    pub inner: f64,
    pub outer: f64,
}

impl OrbitAngles {
    pub fn get(&self, ring: Ring) -> f64 {
        match ring {
            Ring::Inner => self.inner,
            Ring::Outer => self.outer,
        }
    }
}

/// Sole writer of the orbit angles. Angles are never wrapped; they are only
/// ever read through `sin`/`cos`.
#[derive(Debug, Clone)]
pub struct AngularOscillator {
    angles: OrbitAngles,
    inner_speed: f64,
    outer_speed: f64,
}

impl AngularOscillator {
    pub fn new(inner_speed: f64, outer_speed: f64) -> Self {
        Self {
            angles: OrbitAngles::default(),
            inner_speed,
            outer_speed,
        }
    }

    pub fn angles(&self) -> OrbitAngles {
        self.angles
    }

    pub fn retune(&mut self, inner_speed: f64, outer_speed: f64) {
        self.inner_speed = inner_speed;
        self.outer_speed = outer_speed;
    }

    pub fn step(&mut self, dt: f64) {
        self.angles.inner += self.inner_speed * dt;
        self.angles.outer += self.outer_speed * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{INNER_SPEED, LERP_FACTOR, OUTER_SPEED};

    #[test]
    fn test_unlocked_marker_closes_in_without_overshoot() {
        let mut smoother = MotionSmoother::new(LERP_FACTOR, SmoothingMode::PerFrame);
        let pointer = Point::new(300.0, -120.0);
        let mut last = smoother.marker().distance(pointer);

        for dt in [0.0, 0.016, 0.5, 0.0, 2.0] {
            assert!(smoother.step(dt, pointer, LockState::Unlocked));
            let marker = smoother.marker();
            let dist = marker.distance(pointer);
            assert!(dist < last);
            assert!(marker.x <= pointer.x && marker.y >= pointer.y);
            last = dist;
        }
    }

    #[test]
    fn test_first_step_matches_lerp_factor() {
        let mut smoother = MotionSmoother::new(LERP_FACTOR, SmoothingMode::PerFrame);
        smoother.step(0.016, Point::new(100.0, 50.0), LockState::Unlocked);
        let marker = smoother.marker();
        assert!((marker.x - 8.0).abs() < 1e-12);
        assert!((marker.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_marker_at_pointer_stays_put() {
        let mut smoother = MotionSmoother::new(LERP_FACTOR, SmoothingMode::PerFrame);
        assert!(!smoother.step(0.016, Point::default(), LockState::Unlocked));
        assert_eq!(smoother.marker(), Point::default());
    }

    #[test]
    fn test_locked_marker_is_frozen() {
        let mut smoother = MotionSmoother::new(LERP_FACTOR, SmoothingMode::TimeScaled);
        for dt in [0.0, 0.016, 1.0] {
            assert!(!smoother.step(dt, Point::new(500.0, 500.0), LockState::Locked));
        }
        assert_eq!(smoother.marker(), Point::default());
    }

    #[test]
    fn test_per_frame_ignores_dt() {
        assert_eq!(SmoothingMode::PerFrame.factor(0.08, 0.0), 0.08);
        assert_eq!(SmoothingMode::PerFrame.factor(0.08, 0.1), 0.08);
    }

    #[test]
    fn test_time_scaled_matches_per_frame_at_reference_rate() {
        let k = SmoothingMode::TimeScaled.factor(0.08, 1.0 / REFERENCE_FRAME_RATE);
        assert!((k - 0.08).abs() < 1e-12);
        assert_eq!(SmoothingMode::TimeScaled.factor(0.08, 0.0), 0.0);

        // two 120 Hz frames cover the same ground as one 60 Hz frame
        let half = SmoothingMode::TimeScaled.factor(0.08, 0.5 / REFERENCE_FRAME_RATE);
        assert!((1.0 - (1.0 - half).powi(2) - 0.08).abs() < 1e-12);
        assert!(SmoothingMode::TimeScaled.factor(0.08, 10.0) <= 1.0);
    }

    #[test]
    fn test_rings_rotate_in_opposite_directions() {
        let mut osc = AngularOscillator::new(INNER_SPEED, OUTER_SPEED);
        let mut before = osc.angles();
        for dt in [0.001, 0.016, 0.5, 3.0] {
            osc.step(dt);
            let after = osc.angles();
            assert!(after.inner > before.inner);
            assert!(after.outer < before.outer);
            before = after;
        }
    }

    #[test]
    fn test_oscillator_integrates_speed() {
        let mut osc = AngularOscillator::new(INNER_SPEED, OUTER_SPEED);
        osc.step(2.0);
        osc.step(0.0);
        let angles = osc.angles();
        assert!((angles.inner - 1.3).abs() < 1e-12);
        assert!((angles.outer + 0.7).abs() < 1e-12);
        assert_eq!(angles.get(Ring::Inner), angles.inner);
        assert_eq!(angles.get(Ring::Outer), angles.outer);
    }
}
