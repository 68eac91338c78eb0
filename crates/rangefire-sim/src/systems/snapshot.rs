//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only: it never modifies the world.

use hecs::World;

use rangefire_core::components::*;
use rangefire_core::config::SimConfig;
use rangefire_core::constants::GRENADE_RADIUS;
use rangefire_core::enums::ProjectileKind;
use rangefire_core::events::{Alert, SimEvent};
use rangefire_core::state::*;
use rangefire_core::types::SimTime;
use rangefire_weapons::armory::Armory;

use crate::aim::CameraState;
use crate::match_state::MatchState;

/// Everything outside the world that a snapshot reports.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub camera: &'a CameraState,
    pub shake: ScreenShake,
    pub armory: &'a Armory,
    pub match_state: &'a MatchState,
    pub config: &'a SimConfig,
    /// Slot of the target currently swaying.
    pub mover: Option<usize>,
    pub alerts: &'a [Alert],
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    inputs: &SnapshotInputs<'_>,
    events: Vec<SimEvent>,
) -> GameStateSnapshot {
    let targets = build_targets(world, inputs.mover);
    let targets_alive = targets.iter().filter(|t| t.alive).count() as u32;

    GameStateSnapshot {
        time: inputs.time,
        phase: inputs.match_state.phase,
        camera: build_camera(inputs.camera, inputs.shake),
        projectiles: build_projectiles(world),
        targets,
        weapons: build_weapons(inputs.armory, inputs.match_state),
        score: build_score(inputs.match_state, inputs.config, targets_alive),
        alerts: inputs.alerts.to_vec(),
        events,
    }
}

fn build_camera(camera: &CameraState, shake: ScreenShake) -> CameraView {
    CameraView {
        position: camera.position,
        yaw: camera.yaw,
        pitch: camera.pitch,
        forward: camera.forward(),
        shake,
    }
}

/// Build ProjectileView list from all projectile entities, oldest first.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Projectile, &SpawnOrder)>()
        .iter()
        .map(|(_, (projectile, order))| match projectile {
            Projectile::Bullet(bullet) => ProjectileView {
                id: order.0,
                kind: ProjectileKind::Bullet,
                position: bullet.position,
                radius: bullet.radius,
                exploded: false,
                explosion_position: None,
                explosion_elapsed_ms: 0.0,
            },
            Projectile::Grenade(grenade) => ProjectileView {
                id: order.0,
                kind: ProjectileKind::Grenade,
                position: grenade.position,
                radius: GRENADE_RADIUS,
                exploded: grenade.exploded,
                explosion_position: grenade.explosion_position,
                explosion_elapsed_ms: grenade.explosion_elapsed_ms,
            },
        })
        .collect();

    projectiles.sort_by_key(|p| p.id);
    projectiles
}

/// Build TargetView list, including destroyed targets of the current round.
fn build_targets(world: &World, mover: Option<usize>) -> Vec<TargetView> {
    let mut targets: Vec<TargetView> = world
        .query::<&Target>()
        .iter()
        .map(|(_, target)| TargetView {
            slot: target.slot,
            position: target.position,
            radius: target.radius,
            points: target.points,
            alive: target.alive,
            oscillating: target.alive && mover == Some(target.slot),
        })
        .collect();

    targets.sort_by_key(|t| t.slot);
    targets
}

fn build_weapons(armory: &Armory, match_state: &MatchState) -> WeaponsView {
    WeaponsView {
        selected: armory.selected(),
        weapons: armory
            .states()
            .map(|(state, profile)| WeaponView {
                kind: state.kind,
                phase: state.phase,
                ammo: state.ammo,
                reserve: state.reserve,
                magazine_capacity: profile.magazine_capacity,
                reload_progress: state.reload_progress(profile),
            })
            .collect(),
        grenades_remaining: match_state.grenades_remaining,
    }
}

fn build_score(match_state: &MatchState, config: &SimConfig, targets_alive: u32) -> ScoreView {
    let round = match_state.round.as_ref();
    ScoreView {
        score: match_state.score,
        hits: match_state.hits,
        round: round.map(|r| r.index),
        rounds_total: config.rounds_total(),
        round_elapsed_ms: round.map_or(0.0, |r| r.elapsed_ms),
        round_remaining_ms: round.map_or(config.round_duration_ms, |r| {
            r.remaining_ms(config.round_duration_ms)
        }),
        targets_alive,
        round_scores: match_state.round_scores.clone(),
    }
}
