//! Simulation engine for BULWARK.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate (or per
//! variable frame), and produces SimSnapshots for the driver.

pub mod engagement;
pub mod engine;
pub mod handle;
pub mod pool;
pub mod systems;
pub mod timers;
pub mod world_setup;

pub use bulwark_core as core;
pub use engine::SimulationEngine;
pub use handle::ActorHandle;

#[cfg(test)]
mod tests;
