//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Threat variant. `Bomb` is the glider's released sub-munition and is never
/// drawn from a wave roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ThreatKind {
    /// Parabolic-arc rocket.
    Ballistic,
    /// Fly-over-and-drop airstrike.
    Glider,
    /// Ground unit that halts, aims, fires.
    Walker,
    /// Submarine that advances and fires once.
    Swimmer,
    /// Direct-approach drone.
    Drifter,
    /// Sub-munition released by a glider.
    Bomb,
}

impl ThreatKind {
    /// Kinds a wave roster may contain.
    pub const ROSTER_KINDS: [ThreatKind; 5] = [
        ThreatKind::Ballistic,
        ThreatKind::Glider,
        ThreatKind::Walker,
        ThreatKind::Swimmer,
        ThreatKind::Drifter,
    ];

    pub fn domain(self) -> ThreatDomain {
        match self {
            ThreatKind::Walker => ThreatDomain::Ground,
            ThreatKind::Swimmer => ThreatDomain::Sea,
            ThreatKind::Ballistic
            | ThreatKind::Glider
            | ThreatKind::Drifter
            | ThreatKind::Bomb => ThreatDomain::Air,
        }
    }
}

/// Broad movement class of a threat, used by area-damage filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatDomain {
    Air,
    Ground,
    Sea,
}

/// Defense variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenseKind {
    /// Duration-limited shield anchored on the protected target.
    AreaDenial,
    /// Falling shell that kills at most one ground threat.
    Mortar,
    /// Falling pulse that kills every air threat in radius.
    Emp,
    /// SAM site: detect, aim, fire against one target at a time.
    Sentry,
}

/// Kind tag carried by every actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Threat(ThreatKind),
    Defense(DefenseKind),
    /// The protected target.
    Target,
}

/// Collision class of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderClass {
    Threat,
    Shield,
    Target,
    /// Present in the world but never matched by any rule.
    Inert,
}

/// What caused a threat to be intercepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterceptCause {
    Shield,
    AreaDamage,
    Sentry,
}

/// How an actor's lifecycle ended. Mutually exclusive per lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Destroyed by a defense. The only outcome that credits the ledger.
    Intercepted(InterceptCause),
    /// Reached or struck the protected target.
    Impact,
    /// Removed after its post-action grace period or lifespan.
    Expired,
    /// Single-use defense consumed by its detonation.
    Spent,
    /// Isolated after producing an invalid state.
    Faulted,
}

impl Outcome {
    pub fn is_interception(self) -> bool {
        matches!(self, Outcome::Intercepted(_))
    }
}

/// Audio cue played when a threat spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnCue {
    JetFlyby,
    SonarPing,
    SirenLow,
    SirenHigh,
}

/// Flash polarity for presentation feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flash {
    Positive,
    Negative,
}

/// Wave scheduler state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    #[default]
    Idle,
    Spawning,
    Complete,
}

/// Top-level match state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    Setup,
    Active,
    Paused,
}

/// What the object pool does when asked for an instance it does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolPolicy {
    /// Fail the acquire; the caller drops the request.
    #[default]
    Fixed,
    /// Instantiate one more instance from the pool's prototype.
    Grow,
}

/// How a projectile-drop defense falls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FallModel {
    /// Constant downward speed (m/s).
    ConstantSpeed(f64),
    /// Free fall from rest under the given acceleration (m/s²).
    Gravity(f64),
}
