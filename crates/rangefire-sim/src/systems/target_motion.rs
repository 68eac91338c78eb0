//! Target motion: only the nearest alive target sways side to side.

use glam::DVec3;
use hecs::World;

use rangefire_core::components::Target;
use rangefire_core::constants::TARGET_SWAY_AMPLITUDE;

/// Slot of the alive target nearest `camera`, ties going to the lower slot.
/// Distance is taken from where the target currently is, sway included.
pub fn nearest_slot(world: &World, camera: DVec3) -> Option<usize> {
    world
        .query::<&Target>()
        .iter()
        .filter(|(_, target)| target.alive)
        .map(|(_, target)| (target.slot, target.position.distance_squared(camera)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        .map(|(slot, _)| slot)
}

/// Move the nearest target to its sway position at `time_secs`.
/// Returns the slot that moved.
pub fn run(world: &mut World, camera: DVec3, time_secs: f64) -> Option<usize> {
    let mover = nearest_slot(world, camera)?;

    for (_entity, target) in world.query_mut::<&mut Target>() {
        if target.slot == mover {
            target.position.x =
                target.base_x + TARGET_SWAY_AMPLITUDE * (time_secs + target.phase).sin();
        }
    }
    Some(mover)
}
