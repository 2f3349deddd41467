//! Simulation snapshot — the complete visible state handed to the driver
//! after each tick.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{PresentationEvent, WaveEvent};
use crate::types::SimTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub phase: MatchPhase,
    pub wave: WaveView,
    pub actors: Vec<ActorView>,
    pub score: ScoreView,
    pub presentation_events: Vec<PresentationEvent>,
    pub wave_events: Vec<WaveEvent>,
}

/// One active actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorView {
    pub kind: ActorKind,
    pub position: DVec3,
    pub orientation: DQuat,
    /// Weapon sub-part orientation, for walkers and sentries.
    pub weapon: Option<DQuat>,
    /// Radius of the area-of-effect circle drawn under a defense.
    pub indicator_radius: Option<f64>,
    pub collider_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave: u32,
    pub phase: WavePhase,
    pub spawned: u32,
    pub total: u32,
    pub roster_remaining: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub intercepts: u32,
    pub failures: u32,
}
