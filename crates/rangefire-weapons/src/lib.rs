//! Weapon and ammunition logic for Rangefire.
//!
//! Implements the per-kind Ready/Bursting/Reloading state machine, the
//! armory that holds one machine per kind, and shotgun pellet spread.

pub mod armory;
pub mod fsm;
pub mod spread;

pub use rangefire_core as core;
