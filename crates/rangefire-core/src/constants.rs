//! Simulation constants and tuning parameters.
//!
//! Values that a match configuration may override live in
//! [`SimConfig`](crate::config::SimConfig); these are the fixed ones.

use std::f64::consts::FRAC_PI_2;

// --- Timing ---

/// Reference frame duration (ms). Per-frame kinematic constants are tuned
/// against this frame length and scaled by `dt / REFERENCE_FRAME_MS`.
pub const REFERENCE_FRAME_MS: f64 = 16.6667;

/// Default round duration (ms).
pub const ROUND_DURATION_MS: f64 = 45_000.0;

/// Default number of rounds in a match.
pub const ROUNDS_TOTAL: usize = 4;

// --- Camera ---

/// Default pointer sensitivity (radians per pointer unit).
pub const MOUSE_SENSITIVITY: f64 = 0.0025;

/// Margin kept between the pitch limit and the poles.
pub const PITCH_EPSILON: f64 = 0.01;

/// Absolute pitch bound (radians).
pub const PITCH_LIMIT: f64 = FRAC_PI_2 - PITCH_EPSILON;

/// Canonical yaw at round start: facing downrange (negative Y).
pub const CANONICAL_YAW: f64 = -FRAC_PI_2;

/// Canonical pitch at round start.
pub const CANONICAL_PITCH: f64 = 0.0;

/// Camera spawn position (x, y, z). Z is up.
pub const CAMERA_START: [f64; 3] = [0.0, 100.0, 150.0];

/// Default base movement speed.
pub const MOVE_SPEED: f64 = 8.0;

/// World units are large; movement speed is scaled down by this factor.
pub const MOVE_SPEED_SCALE: f64 = 0.01;

// --- Bullets ---

/// Vertical acceleration per reference frame applied to dropping bullets.
pub const BULLET_GRAVITY: f64 = -0.01;

/// Bullet hit-sphere radius.
pub const BULLET_RADIUS: f64 = 6.0;

/// Bullet lifetime bound, in accumulated travel distance.
pub const BULLET_MAX_TRAVEL: f64 = 10_000.0;

/// Bullets spawn this many frames of travel ahead of the camera.
pub const BULLET_SPAWN_LEAD_FRAMES: f64 = 2.0;

/// Default cap on simultaneously live bullets.
pub const MAX_BULLETS: usize = 400;

// --- Grenades ---

/// Vertical acceleration per reference frame applied to grenades.
pub const GRENADE_GRAVITY: f64 = -0.08;

/// Grenade contact radius used for proximity detonation.
pub const GRENADE_RADIUS: f64 = 10.0;

/// Grenade throw speed along the camera forward vector.
pub const GRENADE_SPEED: f64 = 16.0;

/// Upward velocity added to a thrown grenade.
pub const GRENADE_LOFT: f64 = 2.0;

/// Grenades spawn this far in front of the camera.
pub const GRENADE_SPAWN_FORWARD: f64 = 30.0;

/// Grenades spawn this far below the camera.
pub const GRENADE_SPAWN_DROP: f64 = 20.0;

/// Maximum airtime before forced detonation (ms).
pub const GRENADE_FUSE_MS: f64 = 1800.0;

/// Every alive target within this distance of a detonation is destroyed.
pub const GRENADE_BLAST_RADIUS: f64 = 300.0;

/// How long an explosion stays visible after detonation (ms).
pub const EXPLOSION_VISIBLE_MS: f64 = 500.0;

/// Default number of grenades per match.
pub const GRENADE_SUPPLY: u32 = 1;

// --- Screen shake ---

/// Shake duration after a detonation (ms).
pub const SHAKE_DURATION_MS: f64 = 400.0;

/// Shake amplitude after a detonation (screen pixels).
pub const SHAKE_STRENGTH: f64 = 18.0;

// --- Targets ---

/// Downrange distances per round.
pub const ROUND_DISTANCES: [[f64; 3]; ROUNDS_TOTAL] = [
    [500.0, 800.0, 1100.0],
    [700.0, 1200.0, 1700.0],
    [900.0, 1500.0, 2100.0],
    [1400.0, 2000.0, 2800.0],
];

/// Distance range that the radius and points maps are defined over.
pub const TARGET_DISTANCE_NEAR: f64 = 500.0;
pub const TARGET_DISTANCE_FAR: f64 = 2800.0;

/// Hit radius at the near and far ends of the distance range.
pub const TARGET_RADIUS_NEAR: f64 = 60.0;
pub const TARGET_RADIUS_FAR: f64 = 28.0;

/// Point value at the near and far ends of the distance range.
pub const TARGET_POINTS_NEAR: f64 = 20.0;
pub const TARGET_POINTS_FAR: f64 = 120.0;

/// Base lateral offset of targets from the center line.
pub const TARGET_LATERAL_OFFSET: f64 = 200.0;

/// Additional lateral offset per round index.
pub const TARGET_LATERAL_GROWTH: f64 = 40.0;

/// Random lateral jitter bound.
pub const TARGET_LATERAL_JITTER: f64 = 150.0;

/// Random downrange jitter bound.
pub const TARGET_DEPTH_JITTER: f64 = 60.0;

/// Target height range.
pub const TARGET_HEIGHT_MIN: f64 = 20.0;
pub const TARGET_HEIGHT_MAX: f64 = 80.0;

/// Horizontal oscillation amplitude of the nearest target.
pub const TARGET_SWAY_AMPLITUDE: f64 = 60.0;

// --- Advisory display durations (ms) ---

pub const ALERT_OUT_OF_AMMO_MS: f64 = 1800.0;
pub const ALERT_TARGET_HIT_MS: f64 = 900.0;
pub const ALERT_GRENADE_MS: f64 = 1600.0;
pub const ALERT_NO_GRENADES_MS: f64 = 1400.0;
pub const ALERT_ROUND_START_MS: f64 = 1200.0;
pub const ALERT_ROUND_END_MS: f64 = 1800.0;
pub const ALERT_MATCH_OVER_MS: f64 = 2000.0;
pub const ALERT_RELOAD_REJECTED_MS: f64 = 1200.0;
