//! Events emitted by the simulation for presentation and score consumers.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Fire-and-forget notifications for the presentation collaborator
/// (audio, flashes, camera). The core never waits on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// A threat was spawned by the wave scheduler.
    Spawned { kind: ThreatKind, cue: SpawnCue },
    /// A threat was destroyed by a defense.
    InterceptionCue { position: DVec3 },
    /// A threat reached or struck the protected target.
    FailureCue { position: DVec3 },
    Flash { polarity: Flash },
    CameraShake { intensity: f64 },
    /// A mortar or EMP shell hit the ground.
    Detonation {
        defense: DefenseKind,
        position: DVec3,
        radius: f64,
    },
    /// A walker, swimmer or sentry fired its weapon.
    WeaponFired { from: DVec3, at: DVec3 },
    /// A glider released its payload.
    PayloadDropped { position: DVec3 },
}

/// Signals for the score ledger's consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WaveEvent {
    WaveStarted { wave: u32, total: u32 },
    /// A threat termination was credited to a defense.
    Intercepted { kind: ThreatKind, cause: InterceptCause },
    /// Emitted exactly once per wave.
    WaveComplete { wave: u32, score: u32 },
}
