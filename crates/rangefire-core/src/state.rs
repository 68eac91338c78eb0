//! Game state snapshot: the complete visible state handed to the renderer each tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::components::ScreenShake;
use crate::enums::*;
use crate::events::{Alert, SimEvent};
use crate::types::SimTime;

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: MatchPhase,
    pub camera: CameraView,
    pub projectiles: Vec<ProjectileView>,
    pub targets: Vec<TargetView>,
    pub weapons: WeaponsView,
    pub score: ScoreView,
    pub alerts: Vec<Alert>,
    pub events: Vec<SimEvent>,
}

/// Camera pose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub position: DVec3,
    pub yaw: f64,
    pub pitch: f64,
    /// Unit aim direction.
    pub forward: DVec3,
    pub shake: ScreenShake,
}

/// An active projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub kind: ProjectileKind,
    pub position: DVec3,
    pub radius: f64,
    pub exploded: bool,
    /// Blast center, once detonated.
    pub explosion_position: Option<DVec3>,
    /// Time since detonation (ms), for fading the blast.
    pub explosion_elapsed_ms: f64,
}

/// A target in the current round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    pub slot: usize,
    pub position: DVec3,
    pub radius: f64,
    pub points: u32,
    pub alive: bool,
    /// Whether this target is the current mover.
    pub oscillating: bool,
}

/// Weapon status for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponsView {
    pub selected: WeaponKind,
    /// One entry per weapon kind, in `WeaponKind::ALL` order.
    pub weapons: Vec<WeaponView>,
    pub grenades_remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub phase: WeaponPhase,
    pub ammo: u32,
    pub reserve: u32,
    pub magazine_capacity: u32,
    /// Reload completion in [0, 1]; 0 when not reloading.
    pub reload_progress: f64,
}

/// Running score and round counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub hits: u32,
    /// Current or most recent round, 0-based. `None` before the first round.
    pub round: Option<usize>,
    pub rounds_total: usize,
    pub round_elapsed_ms: f64,
    pub round_remaining_ms: f64,
    pub targets_alive: u32,
    /// Points earned in each completed round.
    pub round_scores: Vec<u32>,
}
