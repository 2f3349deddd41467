//! Game loop thread — runs the simulation engine and streams snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots leave through a bounded
//! channel, so a slow driver holds the loop back instead of buffering the
//! whole match.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::config::{MatchConfig, RatingPolicy};
use bulwark_core::constants::TICK_RATE;
use bulwark_core::events::WaveEvent;
use bulwark_core::state::SimSnapshot;
use bulwark_sim::SimulationEngine;

use crate::state::{DeployOrder, GameLoopCommand, WaveReport};

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Snapshots the loop may run ahead of the driver.
const SNAPSHOT_BUFFER: usize = 64;

/// How the loop paces ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Tick as fast as the driver consumes snapshots.
    Unthrottled,
    /// Sleep to hold 30 ticks per wall-clock second at 1x time scale.
    Realtime,
}

/// Handle to a running game loop thread.
pub struct GameLoop {
    commands: mpsc::Sender<GameLoopCommand>,
    snapshots: mpsc::Receiver<SimSnapshot>,
    thread: JoinHandle<()>,
}

impl GameLoop {
    /// Spawns the game loop in a new thread.
    pub fn spawn(config: MatchConfig, pacing: Pacing) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
        let (snap_tx, snap_rx) = mpsc::sync_channel::<SimSnapshot>(SNAPSHOT_BUFFER);

        let thread = std::thread::Builder::new()
            .name("bulwark-game-loop".into())
            .spawn(move || run_game_loop(config, pacing, cmd_rx, snap_tx))?;

        Ok(Self {
            commands: cmd_tx,
            snapshots: snap_rx,
            thread,
        })
    }

    /// Forward a player command. `false` once the loop has stopped.
    pub fn send(&self, command: PlayerCommand) -> bool {
        self.commands
            .send(GameLoopCommand::PlayerCommand(command))
            .is_ok()
    }

    /// Next snapshot, or `None` once the loop has stopped.
    pub fn next_snapshot(&self) -> Option<SimSnapshot> {
        self.snapshots.recv().ok()
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(self) {
        let _ = self.commands.send(GameLoopCommand::Shutdown);
        // Unblocks a loop parked on a full snapshot buffer.
        drop(self.snapshots);
        if self.thread.join().is_err() {
            warn!("game loop thread panicked");
        }
    }
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop(
    config: MatchConfig,
    pacing: Pacing,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: mpsc::SyncSender<SimSnapshot>,
) {
    info!(seed = config.seed, ?pacing, "game loop started");
    let mut engine = SimulationEngine::new(config);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick (engine handles pause semantics internally)
        let snapshot = engine.tick();

        // 3. Hand the snapshot to the driver
        if snap_tx.send(snapshot).is_err() {
            debug!("snapshot receiver dropped");
            return;
        }

        if pacing == Pacing::Unthrottled {
            continue;
        }

        // 4. Sleep until next tick, adjusting for time_scale
        let time_scale = engine.time_scale();
        let effective_tick_duration = if time_scale > 0.001 {
            TICK_DURATION.div_f64(time_scale)
        } else {
            TICK_DURATION
        };

        next_tick_time += effective_tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > effective_tick_duration * 2 {
            // Too far behind — reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// What the driver asks of each wave.
#[derive(Debug, Clone)]
pub struct WavePlan {
    pub waves: u32,
    /// Sim seconds a wave may run before it is abandoned.
    pub max_secs: f64,
    /// Placements issued right after every wave start.
    pub deploys: Vec<DeployOrder>,
}

/// Drive `plan.waves` waves through a running loop and report each one.
///
/// A wave that overruns `max_secs` is reported as timed out and ends the
/// run, since the next wave cannot start while it is still spawning.
pub fn drive_waves(game_loop: &GameLoop, plan: &WavePlan, rating: &RatingPolicy) -> Vec<WaveReport> {
    let mut reports = Vec::new();

    for _ in 0..plan.waves {
        if !game_loop.send(PlayerCommand::StartWave) {
            break;
        }
        for order in &plan.deploys {
            game_loop.send(order.command());
        }

        let Some(report) = drive_one_wave(game_loop, plan.max_secs, rating) else {
            warn!("game loop ended mid-wave");
            break;
        };
        info!(
            wave = report.wave,
            score = report.verdict.score,
            failures = report.failures,
            stars = report.verdict.stars,
            success = report.verdict.success,
            timed_out = report.timed_out,
            "wave report"
        );
        let timed_out = report.timed_out;
        reports.push(report);
        if timed_out {
            break;
        }
    }

    reports
}

fn drive_one_wave(game_loop: &GameLoop, max_secs: f64, rating: &RatingPolicy) -> Option<WaveReport> {
    let mut started_at: Option<f64> = None;
    let mut deadline: Option<f64> = None;

    loop {
        let snap = game_loop.next_snapshot()?;
        let now = snap.time.elapsed_secs;
        let deadline = *deadline.get_or_insert(now + max_secs);

        for event in &snap.wave_events {
            match *event {
                WaveEvent::WaveStarted { .. } => started_at = Some(now),
                WaveEvent::WaveComplete { wave, score } if started_at.is_some() => {
                    return Some(WaveReport {
                        wave,
                        spawned: snap.wave.spawned,
                        failures: snap.score.failures,
                        duration_secs: now - started_at.unwrap_or(now),
                        timed_out: false,
                        verdict: rating.classify(score),
                    });
                }
                _ => {}
            }
        }

        if now >= deadline {
            return Some(WaveReport {
                wave: snap.wave.wave,
                spawned: snap.wave.spawned,
                failures: snap.score.failures,
                duration_secs: started_at.map_or(0.0, |t| now - t),
                timed_out: true,
                verdict: rating.classify(snap.score.intercepts),
            });
        }
    }
}
