//! Overlap queries.
//!
//! Brute force over every collider in the world. Spheres measure in 3D;
//! footprints measure in the ground plane, so a blast on the ground reaches
//! threats flying over it. Results are ordered nearest first, with entity id
//! as the tie-break, so "first match" is stable across runs.

use glam::DVec3;
use hecs::{Entity, World};

use bulwark_core::components::{Actor, AreaEffect, Collider, ThreatBehavior};
use bulwark_core::enums::{ActorKind, ColliderClass};
use bulwark_core::types::{horizontal_distance, Pose};

/// An active actor whose collider overlaps the query sphere.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub entity: Entity,
    pub kind: ActorKind,
    pub class: ColliderClass,
    /// Center-to-center distance from the query point.
    pub distance: f64,
}

/// Every active, collidable actor overlapping the sphere at `center`.
pub fn query_sphere(world: &World, center: DVec3, radius: f64) -> Vec<Contact> {
    query(world, center, radius, DVec3::distance)
}

/// Every active, collidable actor whose ground position lies within `radius`
/// of `center`, at any altitude.
pub fn query_footprint(world: &World, center: DVec3, radius: f64) -> Vec<Contact> {
    query(world, center, radius, horizontal_distance)
}

fn query(world: &World, center: DVec3, radius: f64, metric: fn(DVec3, DVec3) -> f64) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = world
        .query::<(&Actor, &Pose, &Collider)>()
        .iter()
        .filter(|(_, (actor, _, collider))| actor.active && collider.enabled)
        .filter_map(|(entity, (actor, pose, collider))| {
            let distance = metric(pose.position, center);
            (distance <= radius + collider.radius).then_some(Contact {
                entity,
                kind: actor.kind,
                class: collider.class,
                distance,
            })
        })
        .collect();
    sort_nearest_first(&mut contacts);
    contacts
}

/// Threats inside `effect`'s sphere whose kind it may destroy.
pub fn threats_in_area(world: &World, center: DVec3, effect: &AreaEffect) -> Vec<Contact> {
    only_targets(query_sphere(world, center, effect.radius), effect)
}

/// Threats above or inside a ground blast of `effect`'s radius whose kind it
/// may destroy.
pub fn threats_in_footprint(world: &World, center: DVec3, effect: &AreaEffect) -> Vec<Contact> {
    only_targets(query_footprint(world, center, effect.radius), effect)
}

fn only_targets(contacts: Vec<Contact>, effect: &AreaEffect) -> Vec<Contact> {
    contacts
        .into_iter()
        .filter(|contact| contact.class == ColliderClass::Threat)
        .filter(|contact| matches!(contact.kind, ActorKind::Threat(kind) if effect.matches(kind)))
        .collect()
}

/// Nearest threat a sentry at `center` may engage: in range, of a kind it
/// targets, and with its one-shot action still pending.
pub fn first_engageable(world: &World, center: DVec3, effect: &AreaEffect) -> Option<Contact> {
    threats_in_area(world, center, effect)
        .into_iter()
        .find(|contact| {
            world
                .get::<&ThreatBehavior>(contact.entity)
                .map(|behavior| !behavior.action_taken())
                .unwrap_or(false)
        })
}

fn sort_nearest_first(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.entity.id().cmp(&b.entity.id()))
    });
}
