//! Threat AI for BULWARK.
//!
//! Implements the per-kind threat motion rules and one-shot action triggers,
//! plus the kind-driven flight profiles they read.

pub mod fsm;
pub mod profiles;

pub use bulwark_core as core;
