//! ECS components for hecs entities.
//!
//! Components are plain data. Behavior rules live in `bulwark-threat-ai`
//! (threats) and the sim systems (defenses), not here.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Stable name of an object pool (the defense catalog key).
pub type PoolKey = String;

/// Base state every actor carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub kind: ActorKind,
    pub active: bool,
    /// Incremented on every activation; pairs with the entity id to form a
    /// liveness token.
    pub lifecycle: u32,
    /// Owning pool, fixed when the instance is created. `None` for actors
    /// despawned on termination.
    pub pool_key: Option<PoolKey>,
}

/// Sphere collider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f64,
    pub class: ColliderClass,
    pub enabled: bool,
}

impl Collider {
    pub fn new(radius: f64, class: ColliderClass) -> Self {
        Self {
            radius,
            class,
            enabled: true,
        }
    }
}

/// Orientation of a rotating weapon sub-part, in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    pub orientation: DQuat,
    /// Turn rate (rad/s).
    pub turn_rate: f64,
}

/// Marks an actor terminated this tick; consumed by cleanup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Terminated {
    pub outcome: Outcome,
}

// --- Threat behavior ---

/// Per-variant threat state. One update function dispatches on this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ThreatBehavior {
    Ballistic(BallisticState),
    Glider(GliderState),
    Walker(WalkerState),
    Swimmer(SwimmerState),
    Drifter(DrifterState),
    Bomb(BombState),
}

impl ThreatBehavior {
    pub fn kind(&self) -> ThreatKind {
        match self {
            ThreatBehavior::Ballistic(_) => ThreatKind::Ballistic,
            ThreatBehavior::Glider(_) => ThreatKind::Glider,
            ThreatBehavior::Walker(_) => ThreatKind::Walker,
            ThreatBehavior::Swimmer(_) => ThreatKind::Swimmer,
            ThreatBehavior::Drifter(_) => ThreatKind::Drifter,
            ThreatBehavior::Bomb(_) => ThreatKind::Bomb,
        }
    }

    /// Whether the one-shot action (drop / fire) has already happened.
    /// Kinds without one never complete it.
    pub fn action_taken(&self) -> bool {
        match self {
            ThreatBehavior::Glider(s) => s.dropped,
            ThreatBehavior::Walker(s) => s.fired,
            ThreatBehavior::Swimmer(s) => s.fired,
            ThreatBehavior::Ballistic(_)
            | ThreatBehavior::Drifter(_)
            | ThreatBehavior::Bomb(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BallisticState {
    pub start: DVec3,
    pub target: DVec3,
    /// Fraction of the path covered, in [0, 1].
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GliderPhase {
    #[default]
    Approach,
    Departure,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GliderState {
    pub target: DVec3,
    pub phase: GliderPhase,
    /// Horizontal unit heading, frozen at the drop.
    pub heading: DVec3,
    pub dropped: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkerPhase {
    #[default]
    Advance,
    Aim,
    Fired,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkerState {
    /// Land anchor the walker drives to.
    pub anchor: DVec3,
    /// Defended target the weapon aims at.
    pub target: DVec3,
    pub phase: WalkerPhase,
    pub aim_elapsed_secs: f64,
    pub fired: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwimmerState {
    /// Water anchor the swimmer advances to.
    pub anchor: DVec3,
    pub target: DVec3,
    pub fired: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrifterState {
    pub target: DVec3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BombState {
    pub target: DVec3,
}

// --- Defense behavior ---

/// Per-variant defense state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DefenseBehavior {
    AreaDenial(ShieldState),
    Mortar(ShellState),
    Emp(ShellState),
    Sentry(SentryState),
}

impl DefenseBehavior {
    pub fn kind(&self) -> DefenseKind {
        match self {
            DefenseBehavior::AreaDenial(_) => DefenseKind::AreaDenial,
            DefenseBehavior::Mortar(_) => DefenseKind::Mortar,
            DefenseBehavior::Emp(_) => DefenseKind::Emp,
            DefenseBehavior::Sentry(_) => DefenseKind::Sentry,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShieldState {
    pub lifetime_secs: f64,
}

/// Falling mortar / EMP shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellState {
    pub fall: FallModel,
    /// Current downward speed (m/s); grows under `FallModel::Gravity`.
    pub fall_speed: f64,
    pub detonated: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentryState {
    pub lifetime_secs: f64,
    pub aim_secs: f64,
    /// Entity bits and lifecycle of the locked target, if engaged.
    pub engaged: Option<EngagementLock>,
}

/// Exclusive lock a sentry holds on its current target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementLock {
    pub target_bits: u64,
    pub target_lifecycle: u32,
}

/// Area-effect parameters of a defense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaEffect {
    pub radius: f64,
    /// Threat kinds this defense may destroy.
    pub targets: Vec<ThreatKind>,
}

impl AreaEffect {
    pub fn matches(&self, kind: ThreatKind) -> bool {
        self.targets.contains(&kind)
    }
}
