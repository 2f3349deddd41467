//! BULWARK headless runner.
//!
//! This crate wires the simulation into a game loop thread and drives
//! waves from a match configuration, reporting how each one went.

pub mod game_loop;
pub mod state;

pub use bulwark_core as core;
