//! Defense update system — falling shells, detonations and sentry
//! engagements.
//!
//! Shields have no per-tick behavior: they are a collider the resolver
//! checks, released by their lifetime timer.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::components::*;
use bulwark_core::constants::{DETONATION_SHAKE, GROUND_LEVEL};
use bulwark_core::enums::{DefenseKind, FallModel, InterceptCause, Outcome};
use bulwark_core::events::PresentationEvent;
use bulwark_core::types::{look_rotation, rotate_towards, Pose};

use crate::engagement::{self, Feedback, ScoreLedger};
use crate::handle::ActorHandle;
use crate::systems::overlap;
use crate::timers::{DeferredAction, TimerQueue};

struct Detonation {
    shell: Entity,
    kind: DefenseKind,
    position: DVec3,
    area: AreaEffect,
}

struct IdleSentry {
    entity: Entity,
    position: DVec3,
    area: AreaEffect,
    aim_secs: f64,
}

/// Run the defense update system.
pub fn run(
    world: &mut World,
    dt: f64,
    now: f64,
    timers: &mut TimerQueue,
    ledger: &mut ScoreLedger,
    feedback: &mut Feedback,
) {
    let mut detonations = Vec::new();
    let mut idle_sentries = Vec::new();
    let mut aiming: Vec<(Entity, EngagementLock)> = Vec::new();

    for (entity, (actor, pose, behavior, area)) in
        world.query_mut::<(&Actor, &mut Pose, &mut DefenseBehavior, &AreaEffect)>()
    {
        if !actor.active {
            continue;
        }
        let kind = behavior.kind();
        match behavior {
            DefenseBehavior::Mortar(shell) | DefenseBehavior::Emp(shell) => {
                if shell.detonated {
                    continue;
                }
                if let FallModel::Gravity(g) = shell.fall {
                    shell.fall_speed += g * dt;
                }
                pose.position.z -= shell.fall_speed * dt;
                if pose.position.z <= GROUND_LEVEL {
                    pose.position.z = GROUND_LEVEL;
                    shell.detonated = true;
                    detonations.push(Detonation {
                        shell: entity,
                        kind,
                        position: pose.position,
                        area: area.clone(),
                    });
                }
            }
            DefenseBehavior::Sentry(state) => match state.engaged {
                Some(lock) => aiming.push((entity, lock)),
                None => idle_sentries.push(IdleSentry {
                    entity,
                    position: pose.position,
                    area: area.clone(),
                    aim_secs: state.aim_secs,
                }),
            },
            DefenseBehavior::AreaDenial(_) => {}
        }
    }

    for detonation in detonations {
        detonate(world, detonation, ledger, feedback);
    }
    for sentry in idle_sentries {
        scan(world, sentry, now, timers);
    }
    for (entity, lock) in aiming {
        aim(world, entity, lock, dt);
    }
}

/// Ground contact: feedback, area query, kills, then the shell is spent.
/// The blast covers its radius on the ground at every altitude. A mortar
/// kills at most one threat per detonation; an EMP kills every match.
fn detonate(world: &mut World, detonation: Detonation, ledger: &mut ScoreLedger, feedback: &mut Feedback) {
    let Detonation {
        shell,
        kind,
        position,
        area,
    } = detonation;

    feedback.present(PresentationEvent::Detonation {
        defense: kind,
        position,
        radius: area.radius,
    });
    feedback.present(PresentationEvent::CameraShake {
        intensity: DETONATION_SHAKE,
    });

    let single_kill = kind == DefenseKind::Mortar;
    let mut killed = 0u32;
    for victim in overlap::threats_in_footprint(world, position, &area) {
        if single_kill && killed > 0 {
            break;
        }
        let outcome = Outcome::Intercepted(InterceptCause::AreaDamage);
        if engagement::terminate(world, victim.entity, outcome, ledger, feedback) {
            killed += 1;
        }
    }
    debug!(?shell, ?kind, ?position, killed, "detonation");

    engagement::terminate(world, shell, Outcome::Spent, ledger, feedback);
}

/// Lock the nearest engageable threat and schedule the shot.
fn scan(world: &mut World, sentry: IdleSentry, now: f64, timers: &mut TimerQueue) {
    let Some(contact) = overlap::first_engageable(world, sentry.position, &sentry.area) else {
        return;
    };
    let (Some(target), Some(owner)) = (
        ActorHandle::of(world, contact.entity),
        ActorHandle::of(world, sentry.entity),
    ) else {
        return;
    };

    if let Ok(mut behavior) = world.get::<&mut DefenseBehavior>(sentry.entity) {
        if let DefenseBehavior::Sentry(state) = &mut *behavior {
            state.engaged = Some(EngagementLock {
                target_bits: target.entity.to_bits().get(),
                target_lifecycle: target.lifecycle,
            });
        }
    }
    timers.schedule(now + sentry.aim_secs, owner, DeferredAction::SentryFire);
    debug!(sentry = ?sentry.entity, target = ?target.entity, kind = ?contact.kind, "sentry locked");
}

/// Turn the sentry's weapon toward its locked target.
fn aim(world: &mut World, entity: Entity, lock: EngagementLock, dt: f64) {
    let Some(target) = lock_handle(&lock).filter(|h| h.is_live(world)) else {
        return;
    };
    let Ok(target_position) = world.get::<&Pose>(target.entity).map(|p| p.position) else {
        return;
    };
    if let Ok((pose, weapon)) = world.query_one_mut::<(&Pose, &mut Weapon)>(entity) {
        if let Some(wanted) = look_rotation(target_position - pose.position) {
            weapon.orientation = rotate_towards(weapon.orientation, wanted, weapon.turn_rate * dt);
        }
    }
}

/// Resolve a sentry's engagement when its aim delay runs out.
///
/// Fires only if the target is still live and has not completed its
/// one-shot action. The lock is released either way.
pub fn fire_sentry(world: &mut World, sentry: Entity, ledger: &mut ScoreLedger, feedback: &mut Feedback) {
    let lock = match world.get::<&mut DefenseBehavior>(sentry) {
        Ok(mut behavior) => match &mut *behavior {
            DefenseBehavior::Sentry(state) => state.engaged.take(),
            _ => None,
        },
        Err(_) => None,
    };
    let Some(target) = lock.as_ref().and_then(lock_handle) else {
        return;
    };
    if !target.is_live(world) {
        debug!(?sentry, target = ?target.entity, "target gone before the shot");
        return;
    }
    let acted = world
        .get::<&ThreatBehavior>(target.entity)
        .map(|b| b.action_taken())
        .unwrap_or(true);
    if acted {
        debug!(?sentry, target = ?target.entity, "target already acted, holding fire");
        return;
    }

    let from = world.get::<&Pose>(sentry).map(|p| p.position).unwrap_or_default();
    let at = world
        .get::<&Pose>(target.entity)
        .map(|p| p.position)
        .unwrap_or_default();
    feedback.present(PresentationEvent::WeaponFired { from, at });
    engagement::terminate(
        world,
        target.entity,
        Outcome::Intercepted(InterceptCause::Sentry),
        ledger,
        feedback,
    );
}

fn lock_handle(lock: &EngagementLock) -> Option<ActorHandle> {
    Some(ActorHandle {
        entity: Entity::from_bits(lock.target_bits)?,
        lifecycle: lock.target_lifecycle,
    })
}
