//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A shootable target sphere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Spawn order within the round. Collision checks walk targets by slot.
    pub slot: usize,
    /// World position. Only `x` changes after spawn, and only while this
    /// target is the nearest one.
    pub position: DVec3,
    /// Oscillation anchor.
    pub base_x: f64,
    /// Oscillation phase offset (radians).
    pub phase: f64,
    /// Hit-sphere radius. Smaller for farther targets.
    pub radius: f64,
    /// Score credited on kill. Larger for farther targets.
    pub points: u32,
    pub alive: bool,
}

/// A bullet or shotgun pellet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub position: DVec3,
    /// Velocity in world units per reference frame.
    pub velocity: DVec3,
    pub radius: f64,
    /// Distance travelled so far.
    pub travel: f64,
    /// Travel bound after which the bullet expires.
    pub max_travel: f64,
    pub gravity: bool,
    /// Terminal: hit a target or ran out of travel.
    pub hit: bool,
}

/// A thrown grenade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub position: DVec3,
    /// Velocity in world units per reference frame.
    pub velocity: DVec3,
    /// Time since the throw (ms).
    pub age_ms: f64,
    /// Terminal for gameplay. The entity lingers while the blast fades.
    pub exploded: bool,
    /// Time since detonation (ms).
    pub explosion_elapsed_ms: f64,
    /// Captured at detonation.
    pub explosion_position: Option<DVec3>,
}

/// Any in-flight projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Projectile {
    Bullet(Bullet),
    Grenade(Grenade),
}

/// Monotonic spawn counter attached to projectile entities.
/// Orders collision checks and the live-bullet cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

/// Camera shake requested by detonations, applied by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenShake {
    pub remaining_ms: f64,
    pub strength: f64,
}
