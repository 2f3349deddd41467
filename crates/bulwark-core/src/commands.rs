//! Player commands sent from the driver to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Start the next wave with a fresh roster and ledger.
    StartWave,
    /// Deploy a defense from the catalog at a world position.
    /// Shields ignore the position and anchor on the protected target.
    Deploy { defense: String, position: DVec3 },
    /// Set time scale (1.0 = normal, 0.0 = frozen).
    SetTimeScale { scale: f64 },
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,
}
