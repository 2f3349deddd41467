//! Engagement resolver — turns this tick's contacts into outcomes.
//!
//! Runs after motion and defense updates so it sees current positions.
//! Area damage has already been applied by the defense system, which leaves
//! shield blocks and target impacts. A shield block takes precedence over an
//! impact in the same tick.

use hecs::{Entity, World};

use bulwark_core::components::{Actor, AreaEffect, Collider};
use bulwark_core::enums::{ActorKind, ColliderClass, InterceptCause, Outcome, ThreatKind};
use bulwark_core::types::Pose;

use crate::engagement::{self, Feedback, ScoreLedger};
use crate::systems::overlap;

/// Run the resolver.
pub fn run(world: &mut World, ledger: &mut ScoreLedger, feedback: &mut Feedback) {
    let threats: Vec<(Entity, ThreatKind, glam::DVec3, f64)> = world
        .query::<(&Actor, &Pose, &Collider)>()
        .iter()
        .filter(|(_, (actor, _, collider))| {
            actor.active && collider.enabled && collider.class == ColliderClass::Threat
        })
        .filter_map(|(entity, (actor, pose, collider))| match actor.kind {
            ActorKind::Threat(kind) => Some((entity, kind, pose.position, collider.radius)),
            _ => None,
        })
        .collect();

    let mut outcomes = Vec::new();
    for (entity, kind, position, radius) in threats {
        let contacts = overlap::query_sphere(world, position, radius);

        let blocked = contacts.iter().any(|contact| {
            contact.class == ColliderClass::Shield
                && world
                    .get::<&AreaEffect>(contact.entity)
                    .map(|area| area.matches(kind))
                    .unwrap_or(false)
        });
        if blocked {
            outcomes.push((entity, Outcome::Intercepted(InterceptCause::Shield)));
            continue;
        }

        if contacts
            .iter()
            .any(|contact| contact.class == ColliderClass::Target)
        {
            outcomes.push((entity, Outcome::Impact));
        }
    }

    for (entity, outcome) in outcomes {
        engagement::terminate(world, entity, outcome, ledger, feedback);
    }
}
