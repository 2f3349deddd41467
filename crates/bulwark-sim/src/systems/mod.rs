//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state — all state lives in components or is passed in by
//! the engine.

pub mod cleanup;
pub mod defense;
pub mod overlap;
pub mod resolve;
pub mod snapshot;
pub mod threat_motion;
pub mod wave_scheduler;
