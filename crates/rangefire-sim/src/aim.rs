//! First-person camera: position plus yaw/pitch orientation.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use rangefire_core::constants::*;
use rangefire_core::types::aim_direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: DVec3,
    pub yaw: f64,
    /// Clamped to `±PITCH_LIMIT`.
    pub pitch: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: DVec3::from_array(CAMERA_START),
            yaw: CANONICAL_YAW,
            pitch: CANONICAL_PITCH,
        }
    }
}

impl CameraState {
    /// Rotate by a pointer delta. Moving the pointer up (negative `dy`)
    /// raises the aim.
    pub fn apply_look_delta(&mut self, dx: f64, dy: f64, sensitivity: f64) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn forward(&self) -> DVec3 {
        aim_direction(self.yaw, self.pitch)
    }

    /// Walk along the ground plane. Height never changes.
    pub fn apply_move_delta(&mut self, forward: f64, strafe: f64, speed: f64) {
        let (sin, cos) = self.yaw.sin_cos();
        self.position.x += (forward * cos - strafe * sin) * speed;
        self.position.y += (forward * sin + strafe * cos) * speed;
    }

    pub fn reset_orientation(&mut self) {
        self.yaw = CANONICAL_YAW;
        self.pitch = CANONICAL_PITCH;
    }
}

/// Held movement input. Each axis is -1, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub forward: i8,
    pub strafe: i8,
}

impl MoveIntent {
    pub fn new(forward: i8, strafe: i8) -> Self {
        Self {
            forward: forward.clamp(-1, 1),
            strafe: strafe.clamp(-1, 1),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.forward == 0 && self.strafe == 0
    }
}
