//! Object pooling for reusable actors.
//!
//! `ObjectPool` is the generic registry: idle instances per key plus the
//! prototype each key grows from. `ActorPools` binds it to the hecs world
//! for defense instances, resetting components on acquire and release.
//! Single-threaded; mutated only through acquire / release.

use std::collections::HashMap;

use hecs::{Entity, World};
use tracing::{debug, trace, warn};

use bulwark_core::components::PoolKey;
use bulwark_core::enums::PoolPolicy;
use bulwark_core::error::{ConfigError, PoolError};
use bulwark_core::types::Pose;

use crate::handle::ActorHandle;
use crate::world_setup::{self, DefenseTemplate};

struct Pool<P, T> {
    prototype: P,
    idle: Vec<T>,
    /// Instances ever created for this key, idle or in use.
    size: usize,
}

/// Reusable-instance registry keyed by `PoolKey`.
pub struct ObjectPool<P, T> {
    pools: HashMap<PoolKey, Pool<P, T>>,
    policy: PoolPolicy,
}

impl<P, T: Copy + PartialEq> ObjectPool<P, T> {
    pub fn new(policy: PoolPolicy) -> Self {
        Self {
            pools: HashMap::new(),
            policy,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pools.contains_key(key)
    }

    pub fn prototype(&self, key: &str) -> Option<&P> {
        self.pools.get(key).map(|pool| &pool.prototype)
    }

    pub fn idle_count(&self, key: &str) -> Option<usize> {
        self.pools.get(key).map(|pool| pool.idle.len())
    }

    pub fn size(&self, key: &str) -> Option<usize> {
        self.pools.get(key).map(|pool| pool.size)
    }

    /// Register a pool and fill it with `initial_count` instances.
    pub fn create_pool(
        &mut self,
        key: &str,
        prototype: P,
        initial_count: usize,
        mut instantiate: impl FnMut(&P) -> T,
    ) -> Result<(), ConfigError> {
        if self.pools.contains_key(key) {
            return Err(ConfigError::DuplicatePool(key.to_string()));
        }
        let idle = (0..initial_count).map(|_| instantiate(&prototype)).collect();
        self.pools.insert(
            key.to_string(),
            Pool {
                prototype,
                idle,
                size: initial_count,
            },
        );
        Ok(())
    }

    /// Take an idle instance. An empty pool grows from its prototype under
    /// `PoolPolicy::Grow` and fails otherwise.
    pub fn take(&mut self, key: &str, instantiate: impl FnOnce(&P) -> T) -> Result<T, PoolError> {
        let policy = self.policy;
        let pool = self
            .pools
            .get_mut(key)
            .ok_or_else(|| PoolError::UnknownKey(key.to_string()))?;

        if let Some(instance) = pool.idle.pop() {
            return Ok(instance);
        }
        match policy {
            PoolPolicy::Fixed => Err(PoolError::Exhausted(key.to_string())),
            PoolPolicy::Grow => {
                pool.size += 1;
                Ok(instantiate(&pool.prototype))
            }
        }
    }

    /// Forget a taken instance that will never come back.
    pub fn discard(&mut self, key: &str) {
        if let Some(pool) = self.pools.get_mut(key) {
            pool.size = pool.size.saturating_sub(1);
        }
    }

    /// Return an instance to its pool. `Ok(false)` if it was already idle.
    pub fn put_back(&mut self, key: &str, instance: T) -> Result<bool, PoolError> {
        let pool = self
            .pools
            .get_mut(key)
            .ok_or_else(|| PoolError::UnknownKey(key.to_string()))?;
        if pool.idle.contains(&instance) {
            return Ok(false);
        }
        pool.idle.push(instance);
        Ok(true)
    }
}

/// Defense pools living in a hecs world.
pub struct ActorPools {
    inner: ObjectPool<DefenseTemplate, Entity>,
}

impl ActorPools {
    pub fn new(policy: PoolPolicy) -> Self {
        Self {
            inner: ObjectPool::new(policy),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(key)
    }

    pub fn template(&self, key: &str) -> Option<&DefenseTemplate> {
        self.inner.prototype(key)
    }

    pub fn idle_count(&self, key: &str) -> Option<usize> {
        self.inner.idle_count(key)
    }

    pub fn size(&self, key: &str) -> Option<usize> {
        self.inner.size(key)
    }

    pub fn create_pool(
        &mut self,
        world: &mut World,
        key: &str,
        template: DefenseTemplate,
        initial_count: usize,
    ) -> Result<(), ConfigError> {
        self.inner.create_pool(key, template, initial_count, |template| {
            world_setup::instantiate_defense(world, key, template)
        })?;
        debug!(key, initial_count, "pool created");
        Ok(())
    }

    /// Re-activate an idle instance at `pose`.
    pub fn acquire(
        &mut self,
        world: &mut World,
        key: &str,
        pose: Pose,
    ) -> Result<ActorHandle, PoolError> {
        let entity = self.inner.take(key, |template| {
            world_setup::instantiate_defense(world, key, template)
        })?;
        let template = self
            .inner
            .prototype(key)
            .ok_or_else(|| PoolError::UnknownKey(key.to_string()))?;

        match world_setup::activate_defense(world, entity, template, pose) {
            Some(lifecycle) => {
                trace!(key, ?entity, lifecycle, "acquired");
                Ok(ActorHandle { entity, lifecycle })
            }
            None => {
                // The instance lost its components; drop it rather than
                // handing out a broken actor.
                warn!(key, ?entity, "pooled instance is missing components, discarding");
                let _ = world.despawn(entity);
                self.inner.discard(key);
                Err(PoolError::BrokenInstance(key.to_string()))
            }
        }
    }

    /// Deactivate an instance and return it to pool `key`. An instance whose
    /// key has no pool is despawned instead.
    pub fn release(&mut self, world: &mut World, key: &str, entity: Entity) {
        if !self.inner.contains(key) {
            warn!(key, ?entity, "release to unknown pool, discarding instance");
            let _ = world.despawn(entity);
            return;
        }

        world_setup::deactivate(world, entity);
        match self.inner.put_back(key, entity) {
            Ok(true) => trace!(key, ?entity, "released"),
            Ok(false) => debug!(key, ?entity, "release of an idle instance ignored"),
            Err(e) => warn!(%e, "release failed"),
        }
    }
}
