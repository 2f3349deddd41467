//! Entity spawn factories for setting up the simulation world.
//!
//! Creates the protected target, launched threats, and pooled defense
//! instances with the appropriate component bundles.

use glam::DVec3;
use hecs::{Entity, EntityBuilder, World};

use bulwark_core::components::*;
use bulwark_core::config::{DefenseEntry, SpawnConfig};
use bulwark_core::constants::*;
use bulwark_core::enums::*;
use bulwark_core::types::Pose;

use bulwark_threat_ai::fsm::{launch, LaunchTargets};

use crate::handle::ActorHandle;

/// Spawn the protected target. It never terminates.
pub fn spawn_target(world: &mut World, position: DVec3) -> Entity {
    world.spawn((
        Actor {
            kind: ActorKind::Target,
            active: true,
            lifecycle: 1,
            pool_key: None,
        },
        Pose::at(position),
        Collider::new(TARGET_RADIUS, ColliderClass::Target),
    ))
}

/// Destinations threats launched under this spawn layout head for.
pub fn launch_targets(spawn: &SpawnConfig) -> LaunchTargets {
    LaunchTargets {
        target: spawn.target,
        land_anchor: spawn.land_anchor,
        water_anchor: spawn.water_anchor,
    }
}

/// Spawn and launch a threat. Threats are not pooled: they are despawned
/// when they terminate.
pub fn spawn_threat(
    world: &mut World,
    kind: ThreatKind,
    position: DVec3,
    targets: &LaunchTargets,
) -> ActorHandle {
    let (behavior, pose) = launch(kind, position, targets);

    let mut builder = EntityBuilder::new();
    builder
        .add(Actor {
            kind: ActorKind::Threat(kind),
            active: true,
            lifecycle: 1,
            pool_key: None,
        })
        .add(pose)
        .add(behavior)
        .add(Collider::new(THREAT_COLLIDER_RADIUS, ColliderClass::Threat));
    if kind == ThreatKind::Walker {
        builder.add(Weapon {
            orientation: pose.orientation,
            turn_rate: WALKER_WEAPON_TURN_RATE,
        });
    }

    ActorHandle {
        entity: world.spawn(builder.build()),
        lifecycle: 1,
    }
}

/// Prototype a defense pool instantiates and resets instances from.
#[derive(Debug, Clone)]
pub struct DefenseTemplate {
    pub kind: DefenseKind,
    pub behavior: DefenseBehavior,
    pub collider: Collider,
    pub area: AreaEffect,
    pub weapon: Option<Weapon>,
    /// Lifespan after which the instance releases itself.
    pub lifetime_secs: Option<f64>,
}

impl DefenseTemplate {
    pub fn from_entry(entry: &DefenseEntry) -> Self {
        let lifetime = entry.effective_lifetime();
        let shell = || {
            let fall = entry.effective_fall();
            ShellState {
                fall,
                fall_speed: match fall {
                    FallModel::ConstantSpeed(speed) => speed,
                    FallModel::Gravity(_) => 0.0,
                },
                detonated: false,
            }
        };

        let (behavior, collider, weapon) = match entry.kind {
            DefenseKind::AreaDenial => (
                DefenseBehavior::AreaDenial(ShieldState {
                    lifetime_secs: lifetime.unwrap_or(SHIELD_LIFETIME_SECS),
                }),
                Collider::new(entry.radius, ColliderClass::Shield),
                None,
            ),
            DefenseKind::Mortar => (
                DefenseBehavior::Mortar(shell()),
                Collider::new(SHELL_RADIUS, ColliderClass::Inert),
                None,
            ),
            DefenseKind::Emp => (
                DefenseBehavior::Emp(shell()),
                Collider::new(SHELL_RADIUS, ColliderClass::Inert),
                None,
            ),
            DefenseKind::Sentry => (
                DefenseBehavior::Sentry(SentryState {
                    lifetime_secs: lifetime.unwrap_or(SENTRY_LIFETIME_SECS),
                    aim_secs: entry.effective_aim_secs(),
                    engaged: None,
                }),
                Collider::new(SENTRY_BODY_RADIUS, ColliderClass::Inert),
                Some(Weapon {
                    orientation: glam::DQuat::IDENTITY,
                    turn_rate: SENTRY_WEAPON_TURN_RATE,
                }),
            ),
        };

        Self {
            kind: entry.kind,
            behavior,
            collider,
            area: AreaEffect {
                radius: entry.radius,
                targets: entry.effective_targets(),
            },
            weapon,
            lifetime_secs: lifetime,
        }
    }
}

/// Create an idle pooled defense instance owned by pool `key`.
pub fn instantiate_defense(world: &mut World, key: &str, template: &DefenseTemplate) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(Actor {
            kind: ActorKind::Defense(template.kind),
            active: false,
            lifecycle: 0,
            pool_key: Some(key.to_string()),
        })
        .add(Pose::default())
        .add(template.behavior.clone())
        .add(Collider {
            enabled: false,
            ..template.collider
        })
        .add(template.area.clone());
    if let Some(weapon) = template.weapon {
        builder.add(weapon);
    }
    world.spawn(builder.build())
}

/// Re-activate an idle instance at `pose`, resetting its behavior state to
/// the template's. Returns the new lifecycle.
pub fn activate_defense(
    world: &mut World,
    entity: Entity,
    template: &DefenseTemplate,
    pose: Pose,
) -> Option<u32> {
    let (actor, current, behavior, collider, weapon) = world
        .query_one_mut::<(
            &mut Actor,
            &mut Pose,
            &mut DefenseBehavior,
            &mut Collider,
            Option<&mut Weapon>,
        )>(entity)
        .ok()?;

    actor.active = true;
    actor.lifecycle = actor.lifecycle.wrapping_add(1);
    *current = pose;
    *behavior = template.behavior.clone();
    *collider = template.collider;
    if let Some(weapon) = weapon {
        weapon.orientation = pose.orientation;
    }
    Some(actor.lifecycle)
}

/// Mark an actor inactive and take it out of collision.
pub fn deactivate(world: &mut World, entity: Entity) {
    if let Ok((actor, collider)) = world.query_one_mut::<(&mut Actor, &mut Collider)>(entity) {
        actor.active = false;
        collider.enabled = false;
    }
}

/// Where a defense of `kind` deployed at `point` actually appears.
pub fn deploy_pose(kind: DefenseKind, point: DVec3, target: DVec3) -> Pose {
    match kind {
        DefenseKind::AreaDenial => Pose::at(target),
        DefenseKind::Mortar | DefenseKind::Emp => {
            Pose::at(DVec3::new(point.x, point.y, GROUND_LEVEL + DROP_HEIGHT))
        }
        DefenseKind::Sentry => Pose::at(DVec3::new(point.x, point.y, GROUND_LEVEL)),
    }
}
