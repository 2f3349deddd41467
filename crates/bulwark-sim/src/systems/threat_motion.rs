//! Threat motion system — runs each threat's behavior for one tick.
//!
//! Calls the threat FSM from bulwark-threat-ai for every active threat,
//! writes back pose and weapon, then applies the reported actions.

use hecs::{Entity, World};
use tracing::{debug, warn};

use bulwark_core::components::{Actor, Collider, ThreatBehavior, Weapon};
use bulwark_core::enums::{Outcome, ThreatKind};
use bulwark_core::error::ActorFault;
use bulwark_core::events::PresentationEvent;
use bulwark_core::types::Pose;

use bulwark_threat_ai::fsm::{evaluate, LaunchTargets, ThreatAction, ThreatContext};
use bulwark_threat_ai::profiles::get_profile;

use crate::engagement::{self, Feedback, ScoreLedger};
use crate::handle::ActorHandle;
use crate::timers::{DeferredAction, TimerQueue};
use crate::world_setup;

enum Applied {
    Action(ThreatKind, ThreatAction),
    Fault(ActorFault),
}

/// Run the threat motion system.
pub fn run(
    world: &mut World,
    dt: f64,
    now: f64,
    targets: &LaunchTargets,
    timers: &mut TimerQueue,
    ledger: &mut ScoreLedger,
    feedback: &mut Feedback,
) {
    // Collect in a buffer; spawning bombs and terminating needs the world.
    let mut applied: Vec<(Entity, Applied)> = Vec::new();

    for (entity, (actor, pose, behavior, weapon)) in world.query_mut::<(
        &Actor,
        &mut Pose,
        &mut ThreatBehavior,
        Option<&mut Weapon>,
    )>() {
        if !actor.active {
            continue;
        }

        let ctx = ThreatContext {
            pose: *pose,
            weapon: weapon.as_ref().map(|w| w.orientation),
            dt,
        };
        let update = evaluate(behavior, &ctx);

        if !update.pose.is_finite() {
            applied.push((entity, Applied::Fault(ActorFault::NonFinitePose)));
            continue;
        }
        *pose = update.pose;
        if let (Some(weapon), Some(orientation)) = (weapon, update.weapon) {
            weapon.orientation = orientation;
        }
        if let Some(action) = update.action {
            applied.push((entity, Applied::Action(behavior.kind(), action)));
        }
    }

    for (entity, applied) in applied {
        match applied {
            Applied::Fault(fault) => {
                warn!(?entity, %fault, "threat update faulted");
                engagement::terminate(world, entity, Outcome::Faulted, ledger, feedback);
            }
            Applied::Action(_, ThreatAction::Arrived) => {
                engagement::terminate(world, entity, Outcome::Impact, ledger, feedback);
            }
            Applied::Action(kind, ThreatAction::Dropped { at }) => {
                disable_collider(world, entity);
                let bomb = world_setup::spawn_threat(world, ThreatKind::Bomb, at, targets);
                debug!(?entity, bomb = ?bomb.entity, ?at, "payload dropped");
                feedback.present(PresentationEvent::PayloadDropped { position: at });
                schedule_removal(world, entity, kind, now, timers);
            }
            Applied::Action(kind, ThreatAction::Fired { from, at }) => {
                disable_collider(world, entity);
                debug!(?entity, ?kind, "fired on target");
                feedback.present(PresentationEvent::WeaponFired { from, at });
                engagement::strike_target(at, ledger, feedback);
                schedule_removal(world, entity, kind, now, timers);
            }
        }
    }
}

fn disable_collider(world: &mut World, entity: Entity) {
    if let Ok(mut collider) = world.get::<&mut Collider>(entity) {
        collider.enabled = false;
    }
}

/// Removal after the one-shot action always goes through the timer queue.
fn schedule_removal(world: &World, entity: Entity, kind: ThreatKind, now: f64, timers: &mut TimerQueue) {
    if let Some(handle) = ActorHandle::of(world, entity) {
        timers.schedule(now + get_profile(kind).grace_secs, handle, DeferredAction::Expire);
    }
}
