//! Pellet direction generation for a single firing event.

use glam::DVec3;
use rand::Rng;

use rangefire_core::config::WeaponProfile;
use rangefire_core::types::aim_direction;

/// Muzzle velocities for one shot fired along `(yaw, pitch)`.
///
/// Each pellet gets independent uniform yaw and pitch offsets within the
/// profile's spread bounds. Zero-spread weapons consume no randomness.
pub fn pellet_velocities<R: Rng>(
    profile: &WeaponProfile,
    yaw: f64,
    pitch: f64,
    rng: &mut R,
) -> Vec<DVec3> {
    (0..profile.pellets)
        .map(|_| {
            let yaw_offset = jitter(rng, profile.yaw_spread);
            let pitch_offset = jitter(rng, profile.pitch_spread);
            aim_direction(yaw + yaw_offset, pitch + pitch_offset) * profile.muzzle_speed
        })
        .collect()
}

fn jitter<R: Rng>(rng: &mut R, bound: f64) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..bound)
    } else {
        0.0
    }
}
