//! Cleanup system: removes spent projectiles.

use hecs::{Entity, World};

use rangefire_core::components::Projectile;
use rangefire_core::constants::EXPLOSION_VISIBLE_MS;

/// Despawn bullets that hit or ran out of travel, and grenades whose blast
/// has finished fading. Uses a caller-owned buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, projectile) in world.query_mut::<&Projectile>() {
        let spent = match projectile {
            Projectile::Bullet(bullet) => bullet.hit,
            Projectile::Grenade(grenade) => {
                grenade.exploded && grenade.explosion_elapsed_ms >= EXPLOSION_VISIBLE_MS
            }
        };
        if spent {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
