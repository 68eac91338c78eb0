//! Entity spawn factories for targets and projectiles.

use std::f64::consts::TAU;

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rangefire_core::components::*;
use rangefire_core::config::RoundSpec;
use rangefire_core::constants::*;
use rangefire_core::types::remap;

use crate::aim::CameraState;

/// Despawn every target and projectile. Called before a new round spawns.
pub fn clear_world(world: &mut World) {
    world.clear();
}

/// Spawn the target batch for round `round`.
///
/// Targets alternate sides starting on the left. Radius shrinks and points
/// grow with the configured distance, so far targets are worth more.
pub fn spawn_round_targets(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    batch: &RoundSpec,
    round: usize,
) {
    let lateral = TARGET_LATERAL_OFFSET + TARGET_LATERAL_GROWTH * round as f64;

    for (slot, &distance) in batch.distances.iter().enumerate() {
        let side = if slot % 2 == 0 { -1.0 } else { 1.0 };
        let x = side
            * (lateral + rng.gen_range(-TARGET_LATERAL_JITTER..TARGET_LATERAL_JITTER));
        let y = -distance + rng.gen_range(-TARGET_DEPTH_JITTER..TARGET_DEPTH_JITTER);
        let z = rng.gen_range(TARGET_HEIGHT_MIN..TARGET_HEIGHT_MAX);
        let phase = rng.gen_range(0.0..TAU);

        spawn_target(world, slot, DVec3::new(x, y, z), phase, distance);
    }
}

/// Spawn one target at `position` with size and value derived from `distance`.
pub fn spawn_target(
    world: &mut World,
    slot: usize,
    position: DVec3,
    phase: f64,
    distance: f64,
) -> Entity {
    let radius = remap(
        distance,
        TARGET_DISTANCE_NEAR,
        TARGET_DISTANCE_FAR,
        TARGET_RADIUS_NEAR,
        TARGET_RADIUS_FAR,
    )
    // Very far distances would extrapolate to a non-positive radius.
    .max(1.0);
    let points = remap(
        distance,
        TARGET_DISTANCE_NEAR,
        TARGET_DISTANCE_FAR,
        TARGET_POINTS_NEAR,
        TARGET_POINTS_FAR,
    )
    .round()
    .max(0.0) as u32;

    world.spawn((Target {
        slot,
        position,
        base_x: position.x,
        phase,
        radius,
        points,
        alive: true,
    },))
}

/// Spawn a bullet travelling at `velocity`, placed a short lead ahead of the
/// muzzle so it clears the camera.
pub fn spawn_bullet(
    world: &mut World,
    next_order: &mut u64,
    camera: &CameraState,
    velocity: DVec3,
) -> Entity {
    let bullet = Bullet {
        position: camera.position + velocity * BULLET_SPAWN_LEAD_FRAMES,
        velocity,
        radius: BULLET_RADIUS,
        travel: 0.0,
        max_travel: BULLET_MAX_TRAVEL,
        gravity: true,
        hit: false,
    };
    spawn_projectile(world, next_order, Projectile::Bullet(bullet))
}

/// Throw a grenade from just in front of and below the camera.
pub fn spawn_grenade(world: &mut World, next_order: &mut u64, camera: &CameraState) -> Entity {
    let forward = camera.forward();
    let position = DVec3::new(
        camera.position.x + forward.x * GRENADE_SPAWN_FORWARD,
        camera.position.y + forward.y * GRENADE_SPAWN_FORWARD,
        camera.position.z - GRENADE_SPAWN_DROP,
    );
    let grenade = Grenade {
        position,
        velocity: forward * GRENADE_SPEED + DVec3::new(0.0, 0.0, GRENADE_LOFT),
        age_ms: 0.0,
        exploded: false,
        explosion_elapsed_ms: 0.0,
        explosion_position: None,
    };
    spawn_projectile(world, next_order, Projectile::Grenade(grenade))
}

pub fn spawn_projectile(
    world: &mut World,
    next_order: &mut u64,
    projectile: Projectile,
) -> Entity {
    let order = SpawnOrder(*next_order);
    *next_order += 1;
    world.spawn((projectile, order))
}

/// Drop the oldest bullets until at most `max_bullets` remain.
/// Returns how many were dropped.
pub fn enforce_bullet_cap(world: &mut World, max_bullets: usize) -> usize {
    let mut bullets: Vec<(SpawnOrder, Entity)> = world
        .query::<(&Projectile, &SpawnOrder)>()
        .iter()
        .filter(|(_, (projectile, _))| matches!(projectile, Projectile::Bullet(_)))
        .map(|(entity, (_, order))| (*order, entity))
        .collect();

    if bullets.len() <= max_bullets {
        return 0;
    }

    bullets.sort_unstable_by_key(|(order, _)| *order);
    let excess = bullets.len() - max_bullets;
    for (_, entity) in bullets.drain(..excess) {
        let _ = world.despawn(entity);
    }
    log::trace!("bullet cap dropped {} oldest bullets", excess);
    excess
}
