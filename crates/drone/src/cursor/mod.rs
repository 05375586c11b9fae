pub mod document;
pub mod frame;
pub mod geometry;
pub mod lock;
pub mod motion;
pub mod pointer;
pub mod widget;

pub use document::{ClickEvent, Document, ListenerId, Phase, Propagation};
pub use frame::FrameScheduler;
pub use lock::{LockMachine, LockState, Transition};
pub use motion::{AngularOscillator, MotionSmoother, OrbitAngles, SmoothingMode};
pub use pointer::{DeviceClass, PointerSource};
pub use widget::{DroneCursor, FrameUpdate, Snapshot};

use dronectl::Ring;

pub const LERP_FACTOR: f64 = 0.08; // fraction of the remaining gap closed per frame
pub const INNER_RADIUS: f64 = 50.0;
pub const OUTER_RADIUS: f64 = 120.0; // also the unlock hit circle
pub const INNER_SPEED: f64 = 0.65; // rad/s
pub const OUTER_SPEED: f64 = -0.35; // rad/s, opposite direction
pub const HIT_SLOP: f64 = 15.0;
pub const COMPACT_BREAKPOINT: f64 = 768.0; // max-width of a compact viewport
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

/// Tuning shared by every part of the engine. Built from
/// [`crate::config::DroneConfig`] by the daemon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub lerp_factor: f64,
    pub smoothing: SmoothingMode,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub inner_speed: f64,
    pub outer_speed: f64,
    pub hit_slop: f64,
    pub compact_breakpoint: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lerp_factor: LERP_FACTOR,
            smoothing: SmoothingMode::default(),
            inner_radius: INNER_RADIUS,
            outer_radius: OUTER_RADIUS,
            inner_speed: INNER_SPEED,
            outer_speed: OUTER_SPEED,
            hit_slop: HIT_SLOP,
            compact_breakpoint: COMPACT_BREAKPOINT,
        }
    }
}

impl Settings {
    pub fn radius(&self, ring: Ring) -> f64 {
        match ring {
            Ring::Inner => self.inner_radius,
            Ring::Outer => self.outer_radius,
        }
    }

    /// Clicks within this distance of a locked marker release it.
    pub fn unlock_radius(&self) -> f64 {
        self.outer_radius + self.hit_slop
    }
}
