//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Match-wide state is passed in explicitly. They only run while a round is
//! in progress.

pub mod ballistics;
pub mod cleanup;
pub mod collision;
pub mod snapshot;
pub mod target_motion;
