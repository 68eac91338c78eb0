//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::REFERENCE_FRAME_MS;

/// Unit direction for a yaw/pitch pair.
///
/// World axes: x = left/right, y = downrange (negative is away from the
/// shooter), z = up. Positive pitch looks down, so the vertical component is
/// `-sin(pitch)`.
pub fn aim_direction(yaw: f64, pitch: f64) -> DVec3 {
    DVec3::new(
        pitch.cos() * yaw.cos(),
        pitch.cos() * yaw.sin(),
        -pitch.sin(),
    )
}

/// Number of reference frames spanned by `dt_ms`.
pub fn frame_scale(dt_ms: f64) -> f64 {
    dt_ms / REFERENCE_FRAME_MS
}

/// Linear remap of `value` from `[from_lo, from_hi]` onto `[to_lo, to_hi]`.
/// Not clamped.
pub fn remap(value: f64, from_lo: f64, from_hi: f64, to_lo: f64, to_hi: f64) -> f64 {
    to_lo + (value - from_lo) * (to_hi - to_lo) / (from_hi - from_lo)
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick of `dt_ms`.
    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms * 0.001
    }
}
