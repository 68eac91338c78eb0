//! Events emitted by the simulation for rendering and HUD feedback.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// Discrete things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A weapon produced one firing event (one or more pellets).
    ShotFired { kind: WeaponKind, pellets: u32 },
    /// A target was destroyed.
    TargetDestroyed {
        slot: usize,
        points: u32,
        by: ProjectileKind,
    },
    GrenadeThrown,
    /// A grenade detonated; `kills` targets were caught in the blast.
    GrenadeExploded { center: DVec3, kills: u32 },
    ReloadStarted { kind: WeaponKind },
    /// Reload finished, `loaded` rounds moved from reserve.
    ReloadCompleted { kind: WeaponKind, loaded: u32 },
    WeaponSelected { kind: WeaponKind },
    RoundStarted { round: usize },
    RoundEnded {
        round: usize,
        points: u32,
        reason: RoundEndReason,
    },
    MatchFinished { score: u32, hits: u32 },
}

/// Advisory message for the HUD popup line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    pub message: String,
    /// Simulation time the alert was raised (ms).
    pub at_ms: f64,
    /// How long the HUD should keep it visible (ms).
    pub duration_ms: f64,
}

impl Alert {
    pub fn info(message: impl Into<String>, at_ms: f64, duration_ms: f64) -> Self {
        Self {
            level: AlertLevel::Info,
            message: message.into(),
            at_ms,
            duration_ms,
        }
    }

    pub fn warning(message: impl Into<String>, at_ms: f64, duration_ms: f64) -> Self {
        Self {
            level: AlertLevel::Warning,
            message: message.into(),
            at_ms,
            duration_ms,
        }
    }

    /// Advisory for a refused command. Rejections outside a round and
    /// mid-burst refusals stay silent.
    pub fn for_rejection(rejection: CommandRejection, at_ms: f64) -> Option<Self> {
        match rejection {
            CommandRejection::NotInRound | CommandRejection::Busy => None,
            CommandRejection::OutOfAmmo => Some(Self::warning(
                "Out of ammo! Press R to reload.",
                at_ms,
                ALERT_OUT_OF_AMMO_MS,
            )),
            CommandRejection::AlreadyReloading => Some(Self::info(
                "Already reloading.",
                at_ms,
                ALERT_RELOAD_REJECTED_MS,
            )),
            CommandRejection::MagazineFull => Some(Self::info(
                "Magazine full.",
                at_ms,
                ALERT_RELOAD_REJECTED_MS,
            )),
            CommandRejection::NoReserve => Some(Self::warning(
                "No reserve ammo.",
                at_ms,
                ALERT_RELOAD_REJECTED_MS,
            )),
            CommandRejection::NoGrenades => {
                Some(Self::info("Grenades over.", at_ms, ALERT_NO_GRENADES_MS))
            }
        }
    }
}
