//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! This system is read-only — it never modifies the world.

use hecs::World;

use bulwark_core::components::*;
use bulwark_core::enums::MatchPhase;
use bulwark_core::events::{PresentationEvent, WaveEvent};
use bulwark_core::state::*;
use bulwark_core::types::{Pose, SimTime};

use crate::engagement::ScoreLedger;

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: MatchPhase,
    wave: WaveView,
    ledger: &ScoreLedger,
    presentation_events: Vec<PresentationEvent>,
    wave_events: Vec<WaveEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        phase,
        wave,
        actors: build_actors(world),
        score: ScoreView {
            intercepts: ledger.intercepts(),
            failures: ledger.failures(),
        },
        presentation_events,
        wave_events,
    }
}

/// Build ActorView list from every active actor, in entity order.
fn build_actors(world: &World) -> Vec<ActorView> {
    let mut actors: Vec<(u32, ActorView)> = world
        .query::<(&Actor, &Pose, Option<&Collider>, Option<&Weapon>, Option<&AreaEffect>)>()
        .iter()
        .filter(|(_, (actor, ..))| actor.active)
        .map(|(entity, (actor, pose, collider, weapon, area))| {
            (
                entity.id(),
                ActorView {
                    kind: actor.kind,
                    position: pose.position,
                    orientation: pose.orientation,
                    weapon: weapon.map(|w| w.orientation),
                    indicator_radius: area.map(|a| a.radius),
                    collider_enabled: collider.is_some_and(|c| c.enabled),
                },
            )
        })
        .collect();

    actors.sort_by_key(|(id, _)| *id);
    actors.into_iter().map(|(_, view)| view).collect()
}
