//! Match configuration and construction-time validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::enums::WeaponKind;

/// Configuration problems. Raised once, when an engine is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no weapon profile for {0:?}")]
    MissingWeapon(WeaponKind),
    #[error("more than one weapon profile for {0:?}")]
    DuplicateWeapon(WeaponKind),
    #[error("invalid {kind:?} profile: {reason}")]
    InvalidWeapon {
        kind: WeaponKind,
        reason: &'static str,
    },
    #[error("match has no rounds")]
    NoRounds,
    #[error("round {0} has no targets")]
    EmptyRound(usize),
    #[error("round {round} has invalid target distance {distance}")]
    InvalidDistance { round: usize, distance: f64 },
    #[error("round duration must be positive, got {0} ms")]
    InvalidRoundDuration(f64),
    #[error("bullet cap must be at least 1")]
    InvalidMaxBullets,
    #[error("{field} must be positive and finite, got {value}")]
    InvalidTuning { field: &'static str, value: f64 },
}

/// Strictly positive and finite. NaN fails.
fn is_positive(x: f64) -> bool {
    x > 0.0 && x.is_finite()
}

/// Immutable per-kind weapon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub kind: WeaponKind,
    pub magazine_capacity: u32,
    /// Reserve rounds at match start.
    pub starting_reserve: u32,
    pub reload_ms: f64,
    /// Shots per fire command.
    pub burst_shots: u32,
    /// Delay between shots within a burst (ms).
    pub shot_interval_ms: f64,
    /// Muzzle speed in world units per reference frame.
    pub muzzle_speed: f64,
    /// Projectiles per shot.
    pub pellets: u32,
    /// Uniform random yaw offset bound per pellet (radians).
    pub yaw_spread: f64,
    /// Uniform random pitch offset bound per pellet (radians).
    pub pitch_spread: f64,
}

impl WeaponProfile {
    pub fn pistol() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            magazine_capacity: 12,
            starting_reserve: 60,
            reload_ms: 1200.0,
            burst_shots: 3,
            shot_interval_ms: 100.0,
            muzzle_speed: 20.0,
            pellets: 1,
            yaw_spread: 0.0,
            pitch_spread: 0.0,
        }
    }

    pub fn shotgun() -> Self {
        Self {
            kind: WeaponKind::Shotgun,
            magazine_capacity: 5,
            starting_reserve: 25,
            reload_ms: 1800.0,
            burst_shots: 3,
            shot_interval_ms: 100.0,
            muzzle_speed: 13.0,
            pellets: 5,
            yaw_spread: 0.08,
            pitch_spread: 0.06,
        }
    }

    /// Total duration of one burst (ms).
    pub fn burst_duration_ms(&self) -> f64 {
        self.burst_shots as f64 * self.shot_interval_ms
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidWeapon {
            kind: self.kind,
            reason,
        };
        if self.magazine_capacity == 0 {
            return Err(invalid("magazine capacity must be at least 1"));
        }
        if self.burst_shots == 0 {
            return Err(invalid("burst must fire at least one shot"));
        }
        if self.pellets == 0 {
            return Err(invalid("a shot must spawn at least one pellet"));
        }
        if !is_positive(self.reload_ms) || !is_positive(self.shot_interval_ms) {
            return Err(invalid("durations must be positive"));
        }
        if !is_positive(self.muzzle_speed) {
            return Err(invalid("muzzle speed must be positive"));
        }
        let spread_ok = |x: f64| x >= 0.0 && x.is_finite();
        if !spread_ok(self.yaw_spread) || !spread_ok(self.pitch_spread) {
            return Err(invalid("spread bounds must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Target batch for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSpec {
    /// Downrange spawn distance of each target, nearest first.
    pub distances: Vec<f64>,
}

/// Configuration for starting a new match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    pub rounds: Vec<RoundSpec>,
    pub round_duration_ms: f64,
    pub mouse_sensitivity: f64,
    pub move_speed: f64,
    pub weapons: Vec<WeaponProfile>,
    /// Grenades available for the whole match.
    pub grenade_supply: u32,
    /// Live-bullet cap. The oldest bullets are dropped past it.
    pub max_bullets: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rounds: ROUND_DISTANCES
                .iter()
                .map(|d| RoundSpec {
                    distances: d.to_vec(),
                })
                .collect(),
            round_duration_ms: ROUND_DURATION_MS,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            move_speed: MOVE_SPEED,
            weapons: vec![WeaponProfile::pistol(), WeaponProfile::shotgun()],
            grenade_supply: GRENADE_SUPPLY,
            max_bullets: MAX_BULLETS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Profile for `kind`. Always present once the config has validated.
    pub fn profile(&self, kind: WeaponKind) -> Option<&WeaponProfile> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn rounds_total(&self) -> usize {
        self.rounds.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in WeaponKind::ALL {
            match self.weapons.iter().filter(|w| w.kind == kind).count() {
                0 => return Err(ConfigError::MissingWeapon(kind)),
                1 => {}
                _ => return Err(ConfigError::DuplicateWeapon(kind)),
            }
        }
        for profile in &self.weapons {
            profile.validate()?;
        }

        if self.rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        for (round, batch) in self.rounds.iter().enumerate() {
            if batch.distances.is_empty() {
                return Err(ConfigError::EmptyRound(round));
            }
            if let Some(&distance) = batch.distances.iter().find(|d| !is_positive(**d)) {
                return Err(ConfigError::InvalidDistance { round, distance });
            }
        }

        if !is_positive(self.round_duration_ms) {
            return Err(ConfigError::InvalidRoundDuration(self.round_duration_ms));
        }
        for (field, value) in [
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("move_speed", self.move_speed),
        ] {
            if !is_positive(value) {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        if self.max_bullets == 0 {
            return Err(ConfigError::InvalidMaxBullets);
        }
        Ok(())
    }
}
