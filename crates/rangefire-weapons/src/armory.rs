//! The player's weapons: one state machine per kind plus the selection.
//!
//! Selection only decides which kind receives fire and reload commands.
//! Every kind keeps advancing each tick, so a reload or burst started on one
//! weapon finishes even after switching away from it.

use serde::{Deserialize, Serialize};

use rangefire_core::config::{ConfigError, SimConfig, WeaponProfile};
use rangefire_core::enums::{CommandRejection, WeaponKind};

use crate::fsm::{WeaponState, WeaponUpdate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armory {
    selected: WeaponKind,
    /// Indexed by `WeaponKind::index`.
    profiles: Vec<WeaponProfile>,
    /// Indexed by `WeaponKind::index`.
    states: Vec<WeaponState>,
}

impl Armory {
    /// Build an armory with full magazines. Fails if any kind lacks a profile.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let profiles = WeaponKind::ALL
            .iter()
            .map(|&kind| {
                config
                    .profile(kind)
                    .cloned()
                    .ok_or(ConfigError::MissingWeapon(kind))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let states = profiles.iter().map(WeaponState::new).collect();

        Ok(Self {
            selected: WeaponKind::default(),
            profiles,
            states,
        })
    }

    pub fn selected(&self) -> WeaponKind {
        self.selected
    }

    /// Change the selected kind. Returns whether the selection changed.
    pub fn select(&mut self, kind: WeaponKind) -> bool {
        let changed = self.selected != kind;
        self.selected = kind;
        changed
    }

    pub fn profile(&self, kind: WeaponKind) -> &WeaponProfile {
        &self.profiles[kind.index()]
    }

    pub fn state(&self, kind: WeaponKind) -> &WeaponState {
        &self.states[kind.index()]
    }

    /// Start a burst on the selected weapon.
    pub fn fire(&mut self) -> Result<(), CommandRejection> {
        self.states[self.selected.index()].try_fire()
    }

    /// Start reloading the selected weapon.
    pub fn reload(&mut self) -> Result<(), CommandRejection> {
        let idx = self.selected.index();
        self.states[idx].try_reload(&self.profiles[idx])
    }

    /// Advance every kind's state machine by `dt_ms`.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<(WeaponKind, WeaponUpdate)> {
        self.states
            .iter_mut()
            .zip(&self.profiles)
            .map(|(state, profile)| (state.kind, state.advance(profile, dt_ms)))
            .collect()
    }

    /// Per-kind states in `WeaponKind::ALL` order.
    pub fn states(&self) -> impl Iterator<Item = (&WeaponState, &WeaponProfile)> {
        self.states.iter().zip(&self.profiles)
    }
}
