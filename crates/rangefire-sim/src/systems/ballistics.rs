//! Projectile integration.
//!
//! Per-frame constants are scaled by `dt / REFERENCE_FRAME_MS`, so a tick of
//! any length moves a projectile as far as that many reference frames would.

use hecs::World;

use rangefire_core::components::{Bullet, Grenade, Projectile};
use rangefire_core::constants::{BULLET_GRAVITY, GRENADE_GRAVITY};
use rangefire_core::types::frame_scale;

/// Advance every live projectile by `dt_ms`.
pub fn run(world: &mut World, dt_ms: f64) {
    let scale = frame_scale(dt_ms);

    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        match projectile {
            Projectile::Bullet(bullet) => integrate_bullet(bullet, scale),
            Projectile::Grenade(grenade) => integrate_grenade(grenade, dt_ms, scale),
        }
    }
}

pub fn integrate_bullet(bullet: &mut Bullet, scale: f64) {
    if bullet.hit {
        return;
    }
    if bullet.gravity {
        bullet.velocity.z += BULLET_GRAVITY * scale;
    }
    bullet.position += bullet.velocity * scale;
    bullet.travel += bullet.velocity.length() * scale;
    if bullet.travel > bullet.max_travel {
        bullet.hit = true;
    }
}

/// Fuse and contact checks happen in collision, after every projectile has moved.
pub fn integrate_grenade(grenade: &mut Grenade, dt_ms: f64, scale: f64) {
    if grenade.exploded {
        grenade.explosion_elapsed_ms += dt_ms;
        return;
    }
    grenade.velocity.z += GRENADE_GRAVITY * scale;
    grenade.position += grenade.velocity * scale;
    grenade.age_ms += dt_ms;
}
