//! Weapon finite state machine.
//!
//! One `WeaponState` per weapon kind. Transitions are driven by fire/reload
//! commands and by elapsed-time comparisons against the kind's profile.
//! No ECS dependency: operates on plain data.

use serde::{Deserialize, Serialize};

use rangefire_core::config::WeaponProfile;
use rangefire_core::enums::{CommandRejection, WeaponKind, WeaponPhase};

/// Mutable runtime state of one weapon kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    pub phase: WeaponPhase,
    /// Rounds in the magazine.
    pub ammo: u32,
    /// Rounds held in reserve.
    pub reserve: u32,
    /// Shots already fired in the current burst.
    pub shot_index: u32,
    pub burst_elapsed_ms: f64,
    pub reload_elapsed_ms: f64,
}

/// Output of one `advance` step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeaponUpdate {
    /// Firing events produced this tick. Each spawns `profile.pellets` projectiles.
    pub shots: u32,
    /// Rounds loaded, if a reload finished this tick.
    pub reload_completed: Option<u32>,
    /// The burst window closed this tick.
    pub burst_finished: bool,
}

impl WeaponState {
    /// Full magazine and the profile's starting reserve.
    pub fn new(profile: &WeaponProfile) -> Self {
        Self {
            kind: profile.kind,
            phase: WeaponPhase::Ready,
            ammo: profile.magazine_capacity,
            reserve: profile.starting_reserve,
            shot_index: 0,
            burst_elapsed_ms: 0.0,
            reload_elapsed_ms: 0.0,
        }
    }

    /// `Ready → Bursting`. Requires ammo in the magazine.
    pub fn try_fire(&mut self) -> Result<(), CommandRejection> {
        match self.phase {
            WeaponPhase::Reloading => Err(CommandRejection::AlreadyReloading),
            WeaponPhase::Bursting => Err(CommandRejection::Busy),
            WeaponPhase::Ready if self.ammo == 0 => Err(CommandRejection::OutOfAmmo),
            WeaponPhase::Ready => {
                self.phase = WeaponPhase::Bursting;
                self.shot_index = 0;
                self.burst_elapsed_ms = 0.0;
                Ok(())
            }
        }
    }

    /// `Ready → Reloading`. Requires room in the magazine and reserve to draw from.
    pub fn try_reload(&mut self, profile: &WeaponProfile) -> Result<(), CommandRejection> {
        match self.phase {
            WeaponPhase::Reloading => return Err(CommandRejection::AlreadyReloading),
            WeaponPhase::Bursting => return Err(CommandRejection::Busy),
            WeaponPhase::Ready => {}
        }
        if self.ammo >= profile.magazine_capacity {
            return Err(CommandRejection::MagazineFull);
        }
        if self.reserve == 0 {
            return Err(CommandRejection::NoReserve);
        }
        self.phase = WeaponPhase::Reloading;
        self.reload_elapsed_ms = 0.0;
        log::debug!(
            "{:?} reload started ({} + {} reserve)",
            self.kind,
            self.ammo,
            self.reserve
        );
        Ok(())
    }

    /// Advance timers by `dt_ms` and run any due transitions.
    pub fn advance(&mut self, profile: &WeaponProfile, dt_ms: f64) -> WeaponUpdate {
        let mut update = WeaponUpdate::default();

        match self.phase {
            WeaponPhase::Ready => {}
            WeaponPhase::Bursting => {
                self.burst_elapsed_ms += dt_ms;

                // At most one shot per tick. A long tick can skip slots.
                if self.shot_index < profile.burst_shots
                    && self.ammo > 0
                    && self.burst_elapsed_ms > self.shot_index as f64 * profile.shot_interval_ms
                {
                    self.ammo -= 1;
                    self.shot_index += 1;
                    update.shots += 1;
                }

                if self.burst_elapsed_ms >= profile.burst_duration_ms() {
                    log::debug!(
                        "{:?} burst finished after {} shots, {} left",
                        self.kind,
                        self.shot_index,
                        self.ammo
                    );
                    self.phase = WeaponPhase::Ready;
                    self.shot_index = 0;
                    self.burst_elapsed_ms = 0.0;
                    update.burst_finished = true;
                }
            }
            WeaponPhase::Reloading => {
                self.reload_elapsed_ms += dt_ms;

                if self.reload_elapsed_ms >= profile.reload_ms {
                    let needed = profile.magazine_capacity.saturating_sub(self.ammo);
                    let loaded = needed.min(self.reserve);
                    self.ammo += loaded;
                    self.reserve -= loaded;
                    self.phase = WeaponPhase::Ready;
                    self.reload_elapsed_ms = 0.0;
                    update.reload_completed = Some(loaded);
                    log::debug!(
                        "{:?} reload complete: loaded {}, {} in reserve",
                        self.kind,
                        loaded,
                        self.reserve
                    );
                }
            }
        }

        update
    }

    /// Reload completion in `[0, 1]`.
    pub fn reload_progress(&self, profile: &WeaponProfile) -> f64 {
        if self.phase == WeaponPhase::Reloading {
            (self.reload_elapsed_ms / profile.reload_ms).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
