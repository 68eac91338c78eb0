//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon kinds the player can select.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WeaponKind {
    #[default]
    Pistol,
    Shotgun,
}

impl WeaponKind {
    /// Every kind, in selection order.
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Pistol, WeaponKind::Shotgun];

    /// Position of this kind in `ALL`.
    pub fn index(self) -> usize {
        match self {
            WeaponKind::Pistol => 0,
            WeaponKind::Shotgun => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "PISTOL",
            WeaponKind::Shotgun => "SHOTGUN",
        }
    }
}

/// Per-weapon state machine phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponPhase {
    /// Idle and able to fire or reload.
    #[default]
    Ready,
    /// Working through a fire command's shot sequence.
    Bursting,
    /// Moving rounds from reserve into the magazine.
    Reloading,
}

/// Top-level match phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    NotStarted,
    InRound,
    BetweenRounds,
    /// Terminal. Score is frozen.
    Finished,
}

/// Projectile variant tag (for snapshots and events).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Grenade,
}

/// Why a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEndReason {
    /// Every target was destroyed.
    Cleared,
    /// The round clock ran out.
    TimeExpired,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
}

/// A command that was refused by a state guard. Not an error: the command
/// is a no-op and may surface an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandRejection {
    /// Fire, reload and grenade commands only apply during a round.
    NotInRound,
    /// Fire with an empty magazine.
    OutOfAmmo,
    /// Fire or reload while the weapon is mid-burst.
    Busy,
    /// Fire or reload while already reloading.
    AlreadyReloading,
    /// Reload with a full magazine.
    MagazineFull,
    /// Reload with nothing left in reserve.
    NoReserve,
    /// Grenade supply exhausted.
    NoGrenades,
}
