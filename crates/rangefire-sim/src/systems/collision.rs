//! Hit resolution: bullet impacts, grenade detonation and blast damage.
//!
//! Grenades resolve before bullets. Within each kind projectiles go in spawn
//! order and targets in slot order, so a tick always scores the same way.

use glam::DVec3;
use hecs::{Entity, World};

use rangefire_core::components::{Projectile, ScreenShake, SpawnOrder, Target};
use rangefire_core::constants::*;
use rangefire_core::enums::ProjectileKind;
use rangefire_core::events::{Alert, SimEvent};

use crate::match_state::MatchState;

/// Local copy of a target so projectile borrows never overlap target borrows.
struct TargetHit {
    entity: Entity,
    slot: usize,
    position: DVec3,
    radius: f64,
    points: u32,
    alive: bool,
}

/// Per-tick sinks for everything collision produces.
pub struct CollisionOutput<'a> {
    pub score: &'a mut MatchState,
    pub events: &'a mut Vec<SimEvent>,
    pub alerts: &'a mut Vec<Alert>,
    pub shake: &'a mut ScreenShake,
    /// Simulation time for raised alerts (ms).
    pub now_ms: f64,
}

/// Run collision for every live projectile against every alive target.
pub fn run(world: &mut World, out: &mut CollisionOutput<'_>) {
    let mut targets = collect_targets(world);
    if targets.iter().all(|t| !t.alive) && !has_armed_grenade(world) {
        return;
    }

    let order = projectiles_in_spawn_order(world);
    for &entity in &order {
        resolve_grenade(world, entity, &mut targets, out);
    }
    for &entity in &order {
        resolve_bullet(world, entity, &mut targets, out);
    }

    for target in &targets {
        if !target.alive {
            if let Ok(mut t) = world.get::<&mut Target>(target.entity) {
                t.alive = false;
            }
        }
    }
}

fn collect_targets(world: &World) -> Vec<TargetHit> {
    let mut targets: Vec<TargetHit> = world
        .query::<&Target>()
        .iter()
        .map(|(entity, t)| TargetHit {
            entity,
            slot: t.slot,
            position: t.position,
            radius: t.radius,
            points: t.points,
            alive: t.alive,
        })
        .collect();
    targets.sort_by_key(|t| t.slot);
    targets
}

fn has_armed_grenade(world: &World) -> bool {
    world
        .query::<&Projectile>()
        .iter()
        .any(|(_, p)| matches!(p, Projectile::Grenade(g) if !g.exploded))
}

fn projectiles_in_spawn_order(world: &World) -> Vec<Entity> {
    let mut order: Vec<(SpawnOrder, Entity)> = world
        .query::<(&Projectile, &SpawnOrder)>()
        .iter()
        .map(|(entity, (_, order))| (*order, entity))
        .collect();
    order.sort_unstable_by_key(|(order, _)| *order);
    order.into_iter().map(|(_, entity)| entity).collect()
}

fn resolve_bullet(
    world: &mut World,
    entity: Entity,
    targets: &mut [TargetHit],
    out: &mut CollisionOutput<'_>,
) {
    let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
        return;
    };
    let Projectile::Bullet(bullet) = &mut *projectile else {
        return;
    };
    if bullet.hit {
        return;
    }

    // At most one target per bullet.
    let Some(target) = targets.iter_mut().find(|t| {
        t.alive && bullet.position.distance(t.position) < t.radius + bullet.radius
    }) else {
        return;
    };

    bullet.hit = true;
    target.alive = false;
    out.score.credit_kill(target.points);
    out.events.push(SimEvent::TargetDestroyed {
        slot: target.slot,
        points: target.points,
        by: ProjectileKind::Bullet,
    });
    out.alerts.push(Alert::info(
        format!("Target hit! +{}", target.points),
        out.now_ms,
        ALERT_TARGET_HIT_MS,
    ));
    log::debug!(
        "bullet destroyed target {} for {} points",
        target.slot,
        target.points
    );
}

fn resolve_grenade(
    world: &mut World,
    entity: Entity,
    targets: &mut [TargetHit],
    out: &mut CollisionOutput<'_>,
) {
    let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
        return;
    };
    let Projectile::Grenade(grenade) = &mut *projectile else {
        return;
    };
    if grenade.exploded {
        return;
    }

    let contact = targets.iter().any(|t| {
        t.alive && grenade.position.distance(t.position) < t.radius + GRENADE_RADIUS
    });
    if !contact && grenade.age_ms < GRENADE_FUSE_MS {
        return;
    }

    let center = grenade.position;
    grenade.exploded = true;
    grenade.explosion_elapsed_ms = 0.0;
    grenade.explosion_position = Some(center);

    let mut kills = 0;
    for target in targets.iter_mut() {
        if target.alive && center.distance(target.position) < GRENADE_BLAST_RADIUS {
            target.alive = false;
            kills += 1;
            out.score.credit_kill(target.points);
            out.events.push(SimEvent::TargetDestroyed {
                slot: target.slot,
                points: target.points,
                by: ProjectileKind::Grenade,
            });
        }
    }

    *out.shake = ScreenShake {
        remaining_ms: SHAKE_DURATION_MS,
        strength: SHAKE_STRENGTH,
    };
    out.events.push(SimEvent::GrenadeExploded { center, kills });
    out.alerts.push(Alert::info(
        "Boom! grenade exploded",
        out.now_ms,
        ALERT_GRENADE_MS,
    ));
    log::debug!(
        "grenade detonated at {:?} ({}), {} kills",
        center,
        if contact { "contact" } else { "fuse" },
        kills
    );
}
