//! Threat behavior state machines.
//!
//! One entry point per tick, `evaluate`, dispatches on the behavior variant,
//! advances the pose and reports at most one action for the sim to apply.
//! One-shot guards (`dropped`, `fired`) are set in the same call that reports
//! the action, so repeated evaluation can never report it twice.
//! No ECS dependency — operates on plain data.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};

use bulwark_core::components::*;
use bulwark_core::constants::GLIDER_MAX_BANK;
use bulwark_core::enums::ThreatKind;
use bulwark_core::types::{horizontal_distance, look_rotation, rotate_towards, Pose, FORWARD, UP};

use crate::profiles::get_profile;

/// Input to the threat FSM for a single entity.
pub struct ThreatContext {
    pub pose: Pose,
    /// Current weapon sub-part orientation, if the kind has one.
    pub weapon: Option<DQuat>,
    pub dt: f64,
}

/// Side effect the sim must apply after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThreatAction {
    /// Glider released its payload at this position.
    Dropped { at: DVec3 },
    /// Walker or swimmer fired at the protected target.
    Fired { from: DVec3, at: DVec3 },
    /// Reached the end of its path.
    Arrived,
}

/// Output from the threat FSM.
#[derive(Debug, Clone)]
pub struct ThreatUpdate {
    pub pose: Pose,
    pub weapon: Option<DQuat>,
    pub action: Option<ThreatAction>,
}

/// Where a launched threat is headed.
#[derive(Debug, Clone, Copy)]
pub struct LaunchTargets {
    /// The protected target.
    pub target: DVec3,
    /// Halt point for walkers.
    pub land_anchor: DVec3,
    /// Firing point for swimmers.
    pub water_anchor: DVec3,
}

/// Build the launched behavior and initial pose for a threat spawned at
/// `spawn`.
pub fn launch(kind: ThreatKind, spawn: DVec3, targets: &LaunchTargets) -> (ThreatBehavior, Pose) {
    let profile = get_profile(kind);
    let mut position = spawn;
    if let Some(altitude) = profile.cruise_altitude {
        position.z = altitude;
    }

    let (behavior, heading_to) = match kind {
        ThreatKind::Ballistic => (
            ThreatBehavior::Ballistic(BallisticState {
                start: position,
                target: targets.target,
                progress: 0.0,
            }),
            targets.target,
        ),
        ThreatKind::Glider => {
            let heading = (targets.target - position)
                .truncate()
                .extend(0.0)
                .try_normalize()
                .unwrap_or(FORWARD);
            (
                ThreatBehavior::Glider(GliderState {
                    target: targets.target,
                    phase: GliderPhase::Approach,
                    heading,
                    dropped: false,
                }),
                position + heading,
            )
        }
        ThreatKind::Walker => (
            ThreatBehavior::Walker(WalkerState {
                anchor: targets.land_anchor,
                target: targets.target,
                ..WalkerState::default()
            }),
            targets.land_anchor,
        ),
        ThreatKind::Swimmer => (
            ThreatBehavior::Swimmer(SwimmerState {
                anchor: targets.water_anchor,
                target: targets.target,
                fired: false,
            }),
            targets.water_anchor,
        ),
        ThreatKind::Drifter => (
            ThreatBehavior::Drifter(DrifterState {
                target: targets.target,
            }),
            targets.target,
        ),
        ThreatKind::Bomb => (
            ThreatBehavior::Bomb(BombState {
                target: targets.target,
            }),
            targets.target,
        ),
    };

    let orientation = look_rotation(heading_to - position).unwrap_or(DQuat::IDENTITY);
    (behavior, Pose::new(position, orientation))
}

/// Evaluate the FSM for one threat.
pub fn evaluate(behavior: &mut ThreatBehavior, ctx: &ThreatContext) -> ThreatUpdate {
    match behavior {
        ThreatBehavior::Ballistic(state) => evaluate_ballistic(state, ctx),
        ThreatBehavior::Glider(state) => evaluate_glider(state, ctx),
        ThreatBehavior::Walker(state) => evaluate_walker(state, ctx),
        ThreatBehavior::Swimmer(state) => evaluate_swimmer(state, ctx),
        ThreatBehavior::Drifter(state) => {
            evaluate_direct(ThreatKind::Drifter, state.target, ctx)
        }
        ThreatBehavior::Bomb(state) => evaluate_direct(ThreatKind::Bomb, state.target, ctx),
    }
}

/// Point on the ballistic arc at progress `t`: the straight line from start
/// to target lifted by `sin(t·π)·arc_height`.
pub fn arc_position(start: DVec3, target: DVec3, t: f64, arc_height: f64) -> DVec3 {
    start.lerp(target, t) + UP * ((t * PI).sin() * arc_height)
}

/// Step from `from` toward `to` by at most `max_step`, landing exactly on
/// `to` when it is within reach.
pub fn move_towards(from: DVec3, to: DVec3, max_step: f64) -> DVec3 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance <= f64::EPSILON {
        to
    } else {
        from + delta / distance * max_step
    }
}

fn evaluate_ballistic(state: &mut BallisticState, ctx: &ThreatContext) -> ThreatUpdate {
    let profile = get_profile(ThreatKind::Ballistic);
    let distance = state.start.distance(state.target);
    state.progress = if distance <= f64::EPSILON {
        1.0
    } else {
        (state.progress + profile.speed * ctx.dt / distance).min(1.0)
    };

    let position = arc_position(state.start, state.target, state.progress, profile.arc_height);
    // Keep the previous facing when the step is degenerate.
    let orientation = look_rotation(position - ctx.pose.position).unwrap_or(ctx.pose.orientation);

    ThreatUpdate {
        pose: Pose::new(position, orientation),
        weapon: None,
        action: (state.progress >= 1.0).then_some(ThreatAction::Arrived),
    }
}

fn evaluate_glider(state: &mut GliderState, ctx: &ThreatContext) -> ThreatUpdate {
    let profile = get_profile(ThreatKind::Glider);
    let altitude = profile.cruise_altitude.unwrap_or(ctx.pose.position.z);
    let step = profile.speed * ctx.dt;

    match state.phase {
        GliderPhase::Approach => {
            let aim_point = DVec3::new(state.target.x, state.target.y, altitude);
            let mut position = move_towards(ctx.pose.position, aim_point, step);
            position.z = altitude;

            let to_aim = aim_point - position;
            if let Some(heading) = to_aim.truncate().extend(0.0).try_normalize() {
                state.heading = heading;
            }
            let orientation = bank_towards(ctx.pose.orientation, to_aim, profile.turn_rate * ctx.dt);

            let mut action = None;
            if !state.dropped
                && horizontal_distance(position, state.target) <= profile.action_distance
            {
                state.dropped = true;
                state.phase = GliderPhase::Departure;
                action = Some(ThreatAction::Dropped { at: position });
            }

            ThreatUpdate {
                pose: Pose::new(position, orientation),
                weapon: None,
                action,
            }
        }
        GliderPhase::Departure => {
            let mut position = ctx.pose.position + state.heading * step;
            position.z = altitude;
            let level = look_rotation(state.heading).unwrap_or(ctx.pose.orientation);
            let orientation = rotate_towards(ctx.pose.orientation, level, profile.turn_rate * ctx.dt);

            ThreatUpdate {
                pose: Pose::new(position, orientation),
                weapon: None,
                action: None,
            }
        }
    }
}

/// Turn toward `direction`, rolling into the turn proportionally to the
/// remaining heading change.
fn bank_towards(current: DQuat, direction: DVec3, max_angle: f64) -> DQuat {
    let Some(desired) = look_rotation(direction) else {
        return current;
    };
    let forward = (current * FORWARD).truncate();
    let wanted = direction.truncate();
    let turn = forward.perp_dot(wanted).atan2(forward.dot(wanted));
    let bank = turn.clamp(-GLIDER_MAX_BANK, GLIDER_MAX_BANK);
    // Positive turn is counter-clockwise seen from above; roll left into it.
    let banked = desired * DQuat::from_axis_angle(FORWARD, -bank);
    rotate_towards(current, banked, max_angle)
}

fn evaluate_walker(state: &mut WalkerState, ctx: &ThreatContext) -> ThreatUpdate {
    let profile = get_profile(ThreatKind::Walker);
    let mut pose = ctx.pose;
    let mut weapon = ctx.weapon.unwrap_or(pose.orientation);
    let mut action = None;

    match state.phase {
        WalkerPhase::Advance => {
            let anchor = DVec3::new(state.anchor.x, state.anchor.y, pose.position.z);
            if pose.position.distance(anchor) <= profile.action_distance {
                state.phase = WalkerPhase::Aim;
            } else {
                let next = move_towards(pose.position, anchor, profile.speed * ctx.dt);
                pose.orientation = look_rotation(next - pose.position).unwrap_or(pose.orientation);
                pose.position = next;
                weapon = pose.orientation;
                if pose.position.distance(anchor) <= profile.action_distance {
                    state.phase = WalkerPhase::Aim;
                }
            }
        }
        WalkerPhase::Aim => {
            if let Some(aim) = look_rotation(state.target - pose.position) {
                weapon = rotate_towards(weapon, aim, profile.turn_rate * ctx.dt);
            }
            state.aim_elapsed_secs += ctx.dt;
            if !state.fired && state.aim_elapsed_secs >= profile.action_delay_secs {
                state.fired = true;
                state.phase = WalkerPhase::Fired;
                action = Some(ThreatAction::Fired {
                    from: pose.position,
                    at: state.target,
                });
            }
        }
        WalkerPhase::Fired => {}
    }

    ThreatUpdate {
        pose,
        weapon: Some(weapon),
        action,
    }
}

fn evaluate_swimmer(state: &mut SwimmerState, ctx: &ThreatContext) -> ThreatUpdate {
    let profile = get_profile(ThreatKind::Swimmer);
    let mut pose = ctx.pose;
    let mut action = None;

    if !state.fired {
        let next = move_towards(pose.position, state.anchor, profile.speed * ctx.dt);
        pose.orientation = look_rotation(next - pose.position).unwrap_or(pose.orientation);
        pose.position = next;

        if pose.position.distance(state.anchor) <= profile.action_distance {
            state.fired = true;
            action = Some(ThreatAction::Fired {
                from: pose.position,
                at: state.target,
            });
        }
    }

    ThreatUpdate {
        pose,
        weapon: None,
        action,
    }
}

/// Drifter and bomb: straight at the target at constant speed. Termination
/// comes from the collision with the target, not from here.
fn evaluate_direct(kind: ThreatKind, target: DVec3, ctx: &ThreatContext) -> ThreatUpdate {
    let profile = get_profile(kind);
    let position = move_towards(ctx.pose.position, target, profile.speed * ctx.dt);
    let orientation = look_rotation(position - ctx.pose.position).unwrap_or(ctx.pose.orientation);

    ThreatUpdate {
        pose: Pose::new(position, orientation),
        weapon: None,
        action: None,
    }
}
