//! Input events sent from the input layer to the simulation.
//!
//! Events are applied in order at the start of the tick they arrive with.

use serde::{Deserialize, Serialize};

use crate::enums::WeaponKind;

/// All possible player inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InputEvent {
    // --- Aim & movement ---
    /// Pointer movement in pointer units.
    LookDelta { dx: f64, dy: f64 },
    /// Held movement intent. Each axis is -1, 0 or 1; held until replaced.
    MoveIntent { forward: i8, strafe: i8 },

    // --- Weapons ---
    /// Start a burst with the selected weapon.
    Fire,
    /// Reload the selected weapon.
    Reload,
    /// Change the selected weapon.
    SelectWeapon { kind: WeaponKind },
    /// Throw a grenade along the aim direction.
    ThrowGrenade,

    // --- Match flow ---
    /// Start the first round, or the next one between rounds.
    AdvanceRound,
}
