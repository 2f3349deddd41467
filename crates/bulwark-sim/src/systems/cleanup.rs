//! Cleanup system: returns terminated defenses to their pools and despawns
//! terminated threats.

use hecs::{Entity, World};

use bulwark_core::components::{Actor, Terminated};

use crate::pool::ActorPools;

/// Release or despawn every actor terminated this tick.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, pools: &mut ActorPools, buffer: &mut Vec<(Entity, Option<String>)>) {
    buffer.clear();
    for (entity, (actor, _terminated)) in world.query_mut::<(&Actor, &Terminated)>() {
        buffer.push((entity, actor.pool_key.clone()));
    }

    for (entity, pool_key) in buffer.drain(..) {
        match pool_key {
            Some(key) => {
                let _ = world.remove_one::<Terminated>(entity);
                pools.release(world, &key, entity);
            }
            None => {
                let _ = world.despawn(entity);
            }
        }
    }
}
