//! Simulation engine — the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the defense pools, the timer
//! queue, the wave scheduler and the score ledger. It processes player
//! commands, runs all systems, and produces `SimSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::config::MatchConfig;
use bulwark_core::constants::DT;
use bulwark_core::enums::{MatchPhase, Outcome, ThreatKind};
use bulwark_core::error::{ConfigError, DeployError};
use bulwark_core::events::WaveEvent;
use bulwark_core::state::{SimSnapshot, WaveView};
use bulwark_core::types::{Pose, SimTime};

use crate::engagement::{self, Feedback, ScoreLedger};
use crate::handle::ActorHandle;
use crate::pool::ActorPools;
use crate::systems;
use crate::systems::wave_scheduler::WaveScheduler;
use crate::timers::{DeferredAction, TimerQueue};
use crate::world_setup::{self, DefenseTemplate};

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: MatchPhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    config: MatchConfig,
    target: Entity,
    pools: ActorPools,
    timers: TimerQueue,
    /// Lifespans of defenses deployed since the last tick, started at the
    /// end of the next tick like every other deadline.
    pending_lifetimes: Vec<(ActorHandle, f64)>,
    scheduler: WaveScheduler,
    ledger: ScoreLedger,
    command_queue: VecDeque<PlayerCommand>,
    cleanup_buffer: Vec<(Entity, Option<String>)>,
    feedback: Feedback,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    ///
    /// The protected target is placed and every catalog pool is filled up
    /// front. Pool errors are logged and leave that defense undeployable.
    pub fn new(config: MatchConfig) -> Self {
        if let Err(e) = config.validate() {
            warn!(%e, "match config failed validation; waves may degrade");
        }

        let mut world = World::new();
        let target = world_setup::spawn_target(&mut world, config.spawn.target);

        let mut pools = ActorPools::new(config.pool_policy);
        for entry in &config.catalog {
            let template = DefenseTemplate::from_entry(entry);
            if let Err(e) = pools.create_pool(&mut world, &entry.key, template, entry.pool_size) {
                warn!(%e, key = %entry.key, "pool not created");
            }
        }

        Self {
            world,
            time: SimTime::default(),
            phase: MatchPhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            target,
            pools,
            timers: TimerQueue::default(),
            pending_lifetimes: Vec::new(),
            scheduler: WaveScheduler::default(),
            ledger: ScoreLedger::default(),
            command_queue: VecDeque::new(),
            cleanup_buffer: Vec::new(),
            feedback: Feedback::default(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one fixed tick and return the resulting
    /// snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.advance(DT)
    }

    /// Advance the simulation by a variable frame of `dt` seconds, scaled by
    /// the current time scale.
    pub fn advance(&mut self, dt: f64) -> SimSnapshot {
        self.process_commands();

        if self.phase != MatchPhase::Paused {
            let step = dt * self.time_scale;
            if step > 0.0 && step.is_finite() {
                self.run_systems(step);
                self.time.advance_by(step);
            }
        }

        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.scheduler.view(),
            &self.ledger,
            std::mem::take(&mut self.feedback.presentation),
            std::mem::take(&mut self.feedback.wave),
        )
    }

    /// Get the current match phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the current time scale.
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn pools(&self) -> &ActorPools {
        &self.pools
    }

    pub fn wave(&self) -> WaveView {
        self.scheduler.view()
    }

    /// Whether the current wave has finished.
    pub fn wave_complete(&self) -> bool {
        self.scheduler.wave() > 0 && !self.scheduler.is_spawning()
    }

    pub fn is_live(&self, handle: ActorHandle) -> bool {
        handle.is_live(&self.world)
    }

    /// Spawn and launch a threat outside the wave schedule.
    pub fn spawn_threat(&mut self, kind: ThreatKind, position: DVec3) -> ActorHandle {
        let targets = world_setup::launch_targets(&self.config.spawn);
        let handle = world_setup::spawn_threat(&mut self.world, kind, position, &targets);
        debug!(?kind, ?position, entity = ?handle.entity, "threat spawned directly");
        handle
    }

    /// Deploy a defense from the catalog at a world position.
    ///
    /// Shields anchor on the protected target; shells appear above the point
    /// and fall. A lifespan starts counting from the end of the next tick.
    pub fn deploy(&mut self, key: &str, position: DVec3) -> Result<ActorHandle, DeployError> {
        let template = self
            .pools
            .template(key)
            .ok_or_else(|| ConfigError::UnknownDefense(key.to_string()))?;
        let kind = template.kind;
        let lifetime = template.lifetime_secs;

        let target = self
            .world
            .get::<&Pose>(self.target)
            .map(|p| p.position)
            .unwrap_or(self.config.spawn.target);
        let pose = world_setup::deploy_pose(kind, position, target);
        let handle = self.pools.acquire(&mut self.world, key, pose)?;

        if let Some(lifetime) = lifetime {
            self.pending_lifetimes.push((handle, lifetime));
        }
        debug!(key, ?kind, position = ?pose.position, entity = ?handle.entity, "defense deployed");
        Ok(handle)
    }

    /// Get a mutable reference to the ECS world (for tests that need to
    /// corrupt actor state).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartWave => {
                if self.scheduler.is_spawning() {
                    warn!(wave = self.scheduler.wave(), "wave already in progress");
                    return;
                }
                if let Err(e) = self.config.spawn.validate() {
                    warn!(%e, "spawn config invalid, wave degraded");
                }
                if self.config.spawn.roster.is_empty() {
                    warn!(e = %ConfigError::EmptyRoster, "wave will complete without spawning");
                }
                self.ledger.reset();
                let wave = self.scheduler.start(&self.config.spawn);
                let total = self.config.spawn.total;
                info!(wave, total, "wave started");
                self.feedback.wave.push(WaveEvent::WaveStarted { wave, total });
                if self.phase == MatchPhase::Setup {
                    self.phase = MatchPhase::Active;
                }
            }
            PlayerCommand::Deploy { defense, position } => {
                if let Err(e) = self.deploy(&defense, position) {
                    warn!(%e, defense, "deploy dropped");
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = if scale.is_finite() {
                    scale.clamp(0.0, 4.0)
                } else {
                    1.0
                };
            }
            PlayerCommand::Pause => {
                if self.phase == MatchPhase::Active {
                    self.phase = MatchPhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == MatchPhase::Paused {
                    self.phase = MatchPhase::Active;
                }
            }
        }
    }

    /// Run all systems in order for a frame of `dt` seconds.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs + dt;

        // 1. Deferred actions
        for (handle, lifetime) in self.pending_lifetimes.drain(..) {
            self.timers.schedule(now + lifetime, handle, DeferredAction::Expire);
        }
        self.run_timers(now);
        // 2. Wave scheduling
        systems::wave_scheduler::run(
            &mut self.scheduler,
            &mut self.world,
            &mut self.rng,
            &self.config.spawn,
            dt,
            &self.ledger,
            &mut self.feedback,
        );
        // 3. Threat motion
        let targets = world_setup::launch_targets(&self.config.spawn);
        systems::threat_motion::run(
            &mut self.world,
            dt,
            now,
            &targets,
            &mut self.timers,
            &mut self.ledger,
            &mut self.feedback,
        );
        // 4. Defense update (falling shells, detonations, sentries)
        systems::defense::run(
            &mut self.world,
            dt,
            now,
            &mut self.timers,
            &mut self.ledger,
            &mut self.feedback,
        );
        // 5. Contact resolution (shield block, target impact)
        systems::resolve::run(&mut self.world, &mut self.ledger, &mut self.feedback);
        // 6. Cleanup (release pooled, despawn the rest)
        systems::cleanup::run(&mut self.world, &mut self.pools, &mut self.cleanup_buffer);
    }

    /// Apply every timer due at `now` whose owner is still live.
    fn run_timers(&mut self, now: f64) {
        while let Some((owner, action)) = self.timers.pop_due(now, &self.world) {
            match action {
                DeferredAction::Expire => {
                    engagement::terminate(
                        &mut self.world,
                        owner.entity,
                        Outcome::Expired,
                        &mut self.ledger,
                        &mut self.feedback,
                    );
                }
                DeferredAction::SentryFire => {
                    systems::defense::fire_sentry(
                        &mut self.world,
                        owner.entity,
                        &mut self.ledger,
                        &mut self.feedback,
                    );
                }
            }
        }
    }
}
