//! Simulation engine for Rangefire.
//!
//! Owns the hecs ECS world of targets and projectiles, advances it by caller
//! supplied time steps, and produces GameStateSnapshots for the renderer.

pub mod aim;
pub mod engine;
pub mod match_state;
pub mod systems;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use rangefire_core as core;

#[cfg(test)]
mod tests;
