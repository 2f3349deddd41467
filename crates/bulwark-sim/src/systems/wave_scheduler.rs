//! Wave scheduler — spawns one roster entry at a time.
//!
//! Each step draws a random entry from the shrinking roster, spawns it at
//! its spawn point, then waits for the spawned threat to stop being live and
//! for the inter-spawn delay before the next step. Completion is signalled
//! exactly once per wave.

use glam::DVec3;
use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use bulwark_core::config::SpawnConfig;
use bulwark_core::enums::{SpawnCue, ThreatKind, WavePhase};
use bulwark_core::error::ConfigError;
use bulwark_core::events::{PresentationEvent, WaveEvent};
use bulwark_core::state::WaveView;

use crate::engagement::{Feedback, ScoreLedger};
use crate::handle::ActorHandle;
use crate::world_setup;

#[derive(Debug, Clone, Default)]
pub struct WaveScheduler {
    phase: WavePhase,
    wave: u32,
    roster: Vec<ThreatKind>,
    total: u32,
    /// Steps taken this wave, including malformed ones.
    steps: u32,
    spawned: u32,
    /// Threat from the latest step, until it stops being live.
    waiting_on: Option<ActorHandle>,
    delay_remaining_secs: f64,
}

impl WaveScheduler {
    /// Begin the next wave with a fresh copy of the roster. Returns the wave
    /// number.
    pub fn start(&mut self, spawn: &SpawnConfig) -> u32 {
        self.wave += 1;
        self.phase = WavePhase::Spawning;
        self.roster = spawn.roster.clone();
        self.total = spawn.total;
        self.steps = 0;
        self.spawned = 0;
        self.waiting_on = None;
        self.delay_remaining_secs = 0.0;
        self.wave
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_spawning(&self) -> bool {
        self.phase == WavePhase::Spawning
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            wave: self.wave,
            phase: self.phase,
            spawned: self.spawned,
            total: self.total,
            roster_remaining: self.roster.len() as u32,
        }
    }

    fn finished_stepping(&self) -> bool {
        self.roster.is_empty() || self.steps >= self.total
    }

    fn complete(&mut self, ledger: &ScoreLedger, feedback: &mut Feedback) {
        self.phase = WavePhase::Complete;
        let score = ledger.intercepts();
        info!(wave = self.wave, score, spawned = self.spawned, "wave complete");
        feedback.wave.push(WaveEvent::WaveComplete {
            wave: self.wave,
            score,
        });
    }
}

/// Advance the scheduler by `dt` seconds.
pub fn run(
    scheduler: &mut WaveScheduler,
    world: &mut World,
    rng: &mut ChaCha8Rng,
    spawn: &SpawnConfig,
    dt: f64,
    ledger: &ScoreLedger,
    feedback: &mut Feedback,
) {
    if !scheduler.is_spawning() {
        return;
    }

    if let Some(handle) = scheduler.waiting_on {
        if handle.is_live(world) {
            return;
        }
        scheduler.waiting_on = None;
        if scheduler.finished_stepping() {
            scheduler.complete(ledger, feedback);
            return;
        }
        scheduler.delay_remaining_secs = spawn.inter_spawn_delay_secs;
    }

    if scheduler.delay_remaining_secs > 0.0 {
        scheduler.delay_remaining_secs -= dt;
        if scheduler.delay_remaining_secs > 0.0 {
            return;
        }
    }

    if scheduler.finished_stepping() {
        scheduler.complete(ledger, feedback);
        return;
    }

    scheduler.steps += 1;
    let index = rng.gen_range(0..scheduler.roster.len());
    let kind = scheduler.roster.remove(index);

    let position = match resolve_spawn_point(kind, spawn, rng) {
        Ok(position) => position,
        Err(e) => {
            // The entry is consumed; the next step runs without a delay.
            warn!(wave = scheduler.wave, ?kind, %e, "spawn step skipped");
            return;
        }
    };
    let cue = resolve_cue(kind, rng);

    let handle = world_setup::spawn_threat(world, kind, position, &world_setup::launch_targets(spawn));
    scheduler.spawned += 1;
    scheduler.waiting_on = Some(handle);
    debug!(
        wave = scheduler.wave,
        step = scheduler.steps,
        ?kind,
        ?position,
        entity = ?handle.entity,
        "threat spawned"
    );
    feedback.present(PresentationEvent::Spawned { kind, cue });
}

/// Dedicated point for kinds that have one, otherwise a uniformly random
/// generic point.
pub fn resolve_spawn_point(
    kind: ThreatKind,
    spawn: &SpawnConfig,
    rng: &mut ChaCha8Rng,
) -> Result<DVec3, ConfigError> {
    if SpawnConfig::has_dedicated_point(kind) {
        return spawn
            .dedicated_point(kind)
            .ok_or(ConfigError::MissingSpawnPoint(kind));
    }
    if spawn.generic_points.is_empty() {
        return Err(ConfigError::NoGenericSpawnPoints);
    }
    Ok(spawn.generic_points[rng.gen_range(0..spawn.generic_points.len())])
}

/// Gliders and swimmers have their own cue; everything else gets one of the
/// two sirens at random.
pub fn resolve_cue(kind: ThreatKind, rng: &mut ChaCha8Rng) -> SpawnCue {
    match kind {
        ThreatKind::Glider => SpawnCue::JetFlyby,
        ThreatKind::Swimmer => SpawnCue::SonarPing,
        _ => {
            if rng.gen_bool(0.5) {
                SpawnCue::SirenLow
            } else {
                SpawnCue::SirenHigh
            }
        }
    }
}
