//! Liveness tokens for actors.

use hecs::{Entity, World};

use bulwark_core::components::Actor;

/// (entity, lifecycle) pair naming one activation of one actor.
///
/// A handle survives its actor being released and re-acquired from a pool,
/// but stops being live the moment that happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorHandle {
    pub entity: Entity,
    pub lifecycle: u32,
}

impl ActorHandle {
    /// Handle for the actor's current lifecycle.
    pub fn of(world: &World, entity: Entity) -> Option<Self> {
        let actor = world.get::<&Actor>(entity).ok()?;
        Some(Self {
            entity,
            lifecycle: actor.lifecycle,
        })
    }

    pub fn is_live(&self, world: &World) -> bool {
        world
            .get::<&Actor>(self.entity)
            .map(|actor| actor.active && actor.lifecycle == self.lifecycle)
            .unwrap_or(false)
    }
}
