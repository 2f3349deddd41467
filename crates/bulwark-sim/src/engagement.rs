//! Termination, scoring and the feedback they emit.
//!
//! Every actor lifecycle ends through `terminate`, which is the only place
//! that flips `Actor::active` off and the only place that credits the
//! ledger.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::{Actor, Collider, Terminated};
use bulwark_core::constants::FAILURE_SHAKE;
use bulwark_core::enums::{ActorKind, Flash, Outcome};
use bulwark_core::events::{PresentationEvent, WaveEvent};
use bulwark_core::types::Pose;

/// Interceptions and failures for the current wave.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    intercepts: u32,
    failures: u32,
}

impl ScoreLedger {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn intercepts(&self) -> u32 {
        self.intercepts
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    fn credit(&mut self) {
        self.intercepts += 1;
    }

    fn record_failure(&mut self) {
        self.failures += 1;
    }
}

/// Outgoing event buffers, drained into each tick's snapshot.
#[derive(Debug, Default)]
pub struct Feedback {
    pub presentation: Vec<PresentationEvent>,
    pub wave: Vec<WaveEvent>,
}

impl Feedback {
    pub fn present(&mut self, event: PresentationEvent) {
        self.presentation.push(event);
    }
}

/// End an actor's lifecycle with `outcome`.
///
/// Returns `false` (and does nothing) if the actor was already inactive, so
/// a second attempt in the same tick can neither double-credit nor
/// double-fail. The actor is marked `Terminated` for cleanup to release or
/// despawn at the end of the tick.
pub fn terminate(
    world: &mut World,
    entity: Entity,
    outcome: Outcome,
    ledger: &mut ScoreLedger,
    feedback: &mut Feedback,
) -> bool {
    let Ok((actor, collider, pose)) =
        world.query_one_mut::<(&mut Actor, &mut Collider, &Pose)>(entity)
    else {
        return false;
    };
    if !actor.active {
        return false;
    }
    actor.active = false;
    collider.enabled = false;
    let kind = actor.kind;
    let position = pose.position;

    debug!(?entity, ?kind, ?outcome, "terminated");
    match outcome {
        Outcome::Intercepted(cause) => {
            if let ActorKind::Threat(threat) = kind {
                ledger.credit();
                feedback.wave.push(WaveEvent::Intercepted {
                    kind: threat,
                    cause,
                });
                feedback.present(PresentationEvent::InterceptionCue { position });
                feedback.present(PresentationEvent::Flash {
                    polarity: Flash::Positive,
                });
            }
        }
        Outcome::Impact => strike_target(position, ledger, feedback),
        Outcome::Expired | Outcome::Spent | Outcome::Faulted => {}
    }

    let _ = world.insert_one(entity, Terminated { outcome });
    true
}

/// Record a hit on the protected target and play the failure feedback at
/// `position`.
pub fn strike_target(position: DVec3, ledger: &mut ScoreLedger, feedback: &mut Feedback) {
    ledger.record_failure();
    feedback.present(PresentationEvent::FailureCue { position });
    feedback.present(PresentationEvent::Flash {
        polarity: Flash::Negative,
    });
    feedback.present(PresentationEvent::CameraShake {
        intensity: FAILURE_SHAKE,
    });
}
