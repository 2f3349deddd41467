//! Tests for the simulation engine, pools, timers and the per-tick systems.

use glam::DVec3;
use hecs::World;

use bulwark_core::commands::PlayerCommand;
use bulwark_core::components::*;
use bulwark_core::config::{DefenseEntry, MatchConfig};
use bulwark_core::constants::*;
use bulwark_core::enums::*;
use bulwark_core::error::{ConfigError, PoolError};
use bulwark_core::events::{PresentationEvent, WaveEvent};
use bulwark_core::types::Pose;

use crate::engagement::{self, Feedback, ScoreLedger};
use crate::engine::SimulationEngine;
use crate::handle::ActorHandle;
use crate::pool::{ActorPools, ObjectPool};
use crate::systems::overlap;
use crate::timers::{DeferredAction, TimerQueue};
use crate::world_setup::{self, DefenseTemplate};

fn mortar_template() -> DefenseTemplate {
    DefenseTemplate::from_entry(&DefenseEntry::new("mortar", DefenseKind::Mortar, MORTAR_RADIUS))
}

fn tick_n(engine: &mut SimulationEngine, n: usize) -> Vec<bulwark_core::state::SimSnapshot> {
    (0..n).map(|_| engine.tick()).collect()
}

// ---- Object pool ----

#[test]
fn test_generic_pool_duplicate_key_rejected() {
    let mut pool: ObjectPool<(), u32> = ObjectPool::new(PoolPolicy::Fixed);
    let mut next = 0;
    pool.create_pool("a", (), 2, |_| {
        next += 1;
        next
    })
    .unwrap();
    assert_eq!(
        pool.create_pool("a", (), 1, |_| 99),
        Err(ConfigError::DuplicatePool("a".into()))
    );
    assert_eq!(pool.idle_count("a"), Some(2));
}

#[test]
fn test_generic_pool_fixed_exhausts_cleanly() {
    let mut pool: ObjectPool<(), u32> = ObjectPool::new(PoolPolicy::Fixed);
    pool.create_pool("a", (), 1, |_| 7).unwrap();
    assert_eq!(pool.take("a", |_| 8), Ok(7));
    assert_eq!(pool.take("a", |_| 8), Err(PoolError::Exhausted("a".into())));
    assert_eq!(pool.take("b", |_| 8), Err(PoolError::UnknownKey("b".into())));
}

#[test]
fn test_generic_pool_grow_never_fails() {
    let mut pool: ObjectPool<(), u32> = ObjectPool::new(PoolPolicy::Grow);
    pool.create_pool("a", (), 0, |_| 0).unwrap();
    for i in 0..5 {
        assert_eq!(pool.take("a", |_| i), Ok(i));
    }
    assert_eq!(pool.size("a"), Some(5));
}

#[test]
fn test_generic_pool_double_release_is_noop() {
    let mut pool: ObjectPool<(), u32> = ObjectPool::new(PoolPolicy::Fixed);
    pool.create_pool("a", (), 1, |_| 3).unwrap();
    let instance = pool.take("a", |_| 0).unwrap();
    assert_eq!(pool.put_back("a", instance), Ok(true));
    assert_eq!(pool.put_back("a", instance), Ok(false));
    assert_eq!(pool.idle_count("a"), Some(1));
}

#[test]
fn test_actor_pool_acquire_resets_state_and_bumps_lifecycle() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    pools
        .create_pool(&mut world, "mortar", mortar_template(), 1)
        .unwrap();

    let first = pools
        .acquire(&mut world, "mortar", Pose::at(DVec3::new(5.0, 5.0, 30.0)))
        .unwrap();
    assert!(first.is_live(&world));
    assert_eq!(
        world.get::<&Pose>(first.entity).unwrap().position,
        DVec3::new(5.0, 5.0, 30.0)
    );

    // Dirty the one-shot guard, then cycle the instance.
    if let Ok(mut behavior) = world.get::<&mut DefenseBehavior>(first.entity) {
        if let DefenseBehavior::Mortar(shell) = &mut *behavior {
            shell.detonated = true;
        }
    }
    pools.release(&mut world, "mortar", first.entity);
    assert!(!first.is_live(&world));
    assert_eq!(pools.idle_count("mortar"), Some(1));

    let second = pools.acquire(&mut world, "mortar", Pose::default()).unwrap();
    assert_eq!(second.entity, first.entity);
    assert_eq!(second.lifecycle, first.lifecycle + 1);
    assert!(!first.is_live(&world), "old handle must stay stale");
    let detonated = match &*world.get::<&DefenseBehavior>(second.entity).unwrap() {
        DefenseBehavior::Mortar(shell) => shell.detonated,
        _ => panic!("wrong behavior"),
    };
    assert!(!detonated);
}

#[test]
fn test_actor_pool_exhaustion_and_unknown_key() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    pools
        .create_pool(&mut world, "mortar", mortar_template(), 1)
        .unwrap();

    assert!(pools.acquire(&mut world, "mortar", Pose::default()).is_ok());
    assert_eq!(
        pools.acquire(&mut world, "mortar", Pose::default()),
        Err(PoolError::Exhausted("mortar".into()))
    );
    assert_eq!(
        pools.acquire(&mut world, "railgun", Pose::default()),
        Err(PoolError::UnknownKey("railgun".into()))
    );
}

#[test]
fn test_actor_pool_release_unknown_key_despawns() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    let stray = world_setup::instantiate_defense(&mut world, "ghost", &mortar_template());
    assert!(world.contains(stray));

    pools.release(&mut world, "ghost", stray);
    assert!(!world.contains(stray));
}

#[test]
fn test_actor_pool_duplicate_create_keeps_first() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    pools
        .create_pool(&mut world, "mortar", mortar_template(), 2)
        .unwrap();
    assert_eq!(
        pools.create_pool(&mut world, "mortar", mortar_template(), 5),
        Err(ConfigError::DuplicatePool("mortar".into()))
    );
    assert_eq!(pools.size("mortar"), Some(2));
}

#[test]
fn test_actor_pool_broken_instance_is_discarded() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    pools
        .create_pool(&mut world, "mortar", mortar_template(), 1)
        .unwrap();
    let handle = pools.acquire(&mut world, "mortar", Pose::default()).unwrap();
    pools.release(&mut world, "mortar", handle.entity);
    world.remove_one::<DefenseBehavior>(handle.entity).unwrap();

    assert_eq!(
        pools.acquire(&mut world, "mortar", Pose::default()),
        Err(PoolError::BrokenInstance("mortar".into()))
    );
    assert!(!world.contains(handle.entity));
    assert_eq!(pools.size("mortar"), Some(0));
    assert_eq!(pools.idle_count("mortar"), Some(0));
    assert_eq!(
        pools.acquire(&mut world, "mortar", Pose::default()),
        Err(PoolError::Exhausted("mortar".into()))
    );
}

// ---- Timers ----

#[test]
fn test_timer_pops_in_deadline_order() {
    let mut world = World::new();
    let a = ActorHandle {
        entity: world.spawn((Actor {
            kind: ActorKind::Target,
            active: true,
            lifecycle: 1,
            pool_key: None,
        },)),
        lifecycle: 1,
    };
    let mut timers = TimerQueue::default();
    timers.schedule(2.0, a, DeferredAction::SentryFire);
    timers.schedule(1.0, a, DeferredAction::Expire);
    timers.schedule(5.0, a, DeferredAction::Expire);

    assert_eq!(timers.pop_due(0.5, &world), None);
    assert_eq!(timers.pop_due(3.0, &world), Some((a, DeferredAction::Expire)));
    assert_eq!(timers.pop_due(3.0, &world), Some((a, DeferredAction::SentryFire)));
    assert_eq!(timers.pop_due(3.0, &world), None);
    assert_eq!(timers.len(), 1);
}

#[test]
fn test_stale_timer_never_acts_on_reused_instance() {
    let mut world = World::new();
    let mut pools = ActorPools::new(PoolPolicy::Fixed);
    pools
        .create_pool(&mut world, "mortar", mortar_template(), 1)
        .unwrap();

    let old = pools.acquire(&mut world, "mortar", Pose::default()).unwrap();
    let mut timers = TimerQueue::default();
    timers.schedule(1.0, old, DeferredAction::Expire);

    pools.release(&mut world, "mortar", old.entity);
    let new = pools.acquire(&mut world, "mortar", Pose::default()).unwrap();
    assert_eq!(new.entity, old.entity);

    assert_eq!(timers.pop_due(10.0, &world), None);
    assert!(timers.is_empty());
    assert!(new.is_live(&world));
}

// ---- Termination ----

#[test]
fn test_terminate_is_exactly_once() {
    let mut world = World::new();
    let targets = world_setup::launch_targets(&MatchConfig::default().spawn);
    let threat = world_setup::spawn_threat(
        &mut world,
        ThreatKind::Drifter,
        DVec3::new(0.0, 50.0, 0.0),
        &targets,
    );
    let mut ledger = ScoreLedger::default();
    let mut feedback = Feedback::default();

    let outcome = Outcome::Intercepted(InterceptCause::AreaDamage);
    assert!(engagement::terminate(&mut world, threat.entity, outcome, &mut ledger, &mut feedback));
    assert!(!engagement::terminate(&mut world, threat.entity, outcome, &mut ledger, &mut feedback));
    assert!(!engagement::terminate(
        &mut world,
        threat.entity,
        Outcome::Impact,
        &mut ledger,
        &mut feedback
    ));

    assert_eq!(ledger.intercepts(), 1);
    assert_eq!(ledger.failures(), 0);
    assert_eq!(feedback.wave.len(), 1);
    assert_eq!(
        world.get::<&Terminated>(threat.entity).unwrap().outcome,
        outcome
    );
}

#[test]
fn test_impact_never_credits() {
    let mut world = World::new();
    let targets = world_setup::launch_targets(&MatchConfig::default().spawn);
    let threat = world_setup::spawn_threat(&mut world, ThreatKind::Drifter, DVec3::ZERO, &targets);
    let mut ledger = ScoreLedger::default();
    let mut feedback = Feedback::default();

    engagement::terminate(&mut world, threat.entity, Outcome::Impact, &mut ledger, &mut feedback);
    assert_eq!(ledger.intercepts(), 0);
    assert_eq!(ledger.failures(), 1);
    assert!(feedback.wave.is_empty());
    assert!(feedback.presentation.contains(&PresentationEvent::Flash {
        polarity: Flash::Negative
    }));
}

// ---- Overlap ----

#[test]
fn test_area_query_nearest_first_and_filtered() {
    let mut world = World::new();
    let targets = world_setup::launch_targets(&MatchConfig::default().spawn);
    let far = world_setup::spawn_threat(&mut world, ThreatKind::Walker, DVec3::new(4.0, 0.0, 0.0), &targets);
    let near = world_setup::spawn_threat(&mut world, ThreatKind::Walker, DVec3::new(1.0, 0.0, 0.0), &targets);
    world_setup::spawn_threat(&mut world, ThreatKind::Drifter, DVec3::new(0.5, 0.0, 0.0), &targets);
    world_setup::spawn_threat(&mut world, ThreatKind::Walker, DVec3::new(40.0, 0.0, 0.0), &targets);

    let effect = AreaEffect {
        radius: 6.0,
        targets: vec![ThreatKind::Walker],
    };
    let hits: Vec<_> = overlap::threats_in_area(&world, DVec3::ZERO, &effect)
        .into_iter()
        .map(|c| c.entity)
        .collect();
    assert_eq!(hits, vec![near.entity, far.entity]);
}

#[test]
fn test_area_query_skips_disabled_colliders() {
    let mut world = World::new();
    let targets = world_setup::launch_targets(&MatchConfig::default().spawn);
    let walker = world_setup::spawn_threat(&mut world, ThreatKind::Walker, DVec3::ZERO, &targets);
    world.get::<&mut Collider>(walker.entity).unwrap().enabled = false;

    let effect = AreaEffect {
        radius: 6.0,
        targets: vec![ThreatKind::Walker],
    };
    assert!(overlap::threats_in_area(&world, DVec3::ZERO, &effect).is_empty());
}

#[test]
fn test_footprint_reaches_overhead_threats() {
    let mut world = World::new();
    let targets = world_setup::launch_targets(&MatchConfig::default().spawn);
    // Gliders launch at cruise altitude whatever the spawn height.
    let overhead = world_setup::spawn_threat(
        &mut world,
        ThreatKind::Glider,
        DVec3::new(3.0, 0.0, 0.0),
        &targets,
    );
    world_setup::spawn_threat(
        &mut world,
        ThreatKind::Glider,
        DVec3::new(30.0, 0.0, 0.0),
        &targets,
    );

    let effect = AreaEffect {
        radius: EMP_RADIUS,
        targets: vec![ThreatKind::Glider],
    };
    assert!(overlap::threats_in_area(&world, DVec3::ZERO, &effect).is_empty());
    let hits: Vec<_> = overlap::threats_in_footprint(&world, DVec3::ZERO, &effect)
        .into_iter()
        .map(|c| c.entity)
        .collect();
    assert_eq!(hits, vec![overhead.entity]);
}

// ---- Engine basics ----

#[test]
fn test_tick_timing_30_ticks_one_second() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    tick_n(&mut engine, 30);

    assert_eq!(engine.time().tick, 30);
    assert!(
        (engine.time().elapsed_secs - 1.0).abs() < 1e-10,
        "30 ticks should equal 1.0 seconds, got {}",
        engine.time().elapsed_secs
    );
}

#[test]
fn test_advance_scales_with_time_scale() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.queue_command(PlayerCommand::SetTimeScale { scale: 2.0 });
    engine.advance(0.25);
    assert!((engine.time().elapsed_secs - 0.5).abs() < 1e-12);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 0.0 });
    engine.advance(0.25);
    assert!((engine.time().elapsed_secs - 0.5).abs() < 1e-12);

    engine.queue_command(PlayerCommand::SetTimeScale { scale: 100.0 });
    engine.tick();
    assert_eq!(engine.time_scale(), 4.0);
}

#[test]
fn test_pause_stops_simulation() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.queue_command(PlayerCommand::StartWave);
    tick_n(&mut engine, 10);
    assert_eq!(engine.time().tick, 10);
    assert_eq!(engine.phase(), MatchPhase::Active);

    engine.queue_command(PlayerCommand::Pause);
    tick_n(&mut engine, 10);
    assert_eq!(engine.time().tick, 10, "Time should not advance while paused");
    assert_eq!(engine.phase(), MatchPhase::Paused);

    engine.queue_command(PlayerCommand::Resume);
    tick_n(&mut engine, 10);
    assert_eq!(engine.time().tick, 20);
    assert_eq!(engine.phase(), MatchPhase::Active);
}

#[test]
fn test_start_wave_while_spawning_is_ignored() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.queue_command(PlayerCommand::StartWave);
    let first = engine.tick();
    assert!(first
        .wave_events
        .iter()
        .any(|e| matches!(e, WaveEvent::WaveStarted { wave: 1, .. })));

    engine.queue_command(PlayerCommand::StartWave);
    let second = engine.tick();
    assert!(second.wave_events.is_empty());
    assert_eq!(second.wave.wave, 1);
}

#[test]
fn test_snapshot_lists_target_and_defense_indicator() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.queue_command(PlayerCommand::Deploy {
        defense: "sam".into(),
        position: DVec3::new(10.0, 10.0, 0.0),
    });
    let snap = engine.tick();

    assert_eq!(snap.actors.len(), 2);
    assert!(snap.actors.iter().any(|a| a.kind == ActorKind::Target));
    let sam = snap
        .actors
        .iter()
        .find(|a| a.kind == ActorKind::Defense(DefenseKind::Sentry))
        .unwrap();
    assert_eq!(sam.indicator_radius, Some(SENTRY_DETECTION_RADIUS));
    assert!(sam.weapon.is_some());
}

// ---- Threat behaviors in the world ----

#[test]
fn test_ballistic_blocked_by_shield() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.deploy("shield", DVec3::new(30.0, 30.0, 0.0)).unwrap();
    let rocket = engine.spawn_threat(ThreatKind::Ballistic, DVec3::new(0.0, 60.0, 0.0));

    let snaps = tick_n(&mut engine, 120);
    assert!(!engine.is_live(rocket));
    assert_eq!(engine.ledger().intercepts(), 1);
    assert_eq!(engine.ledger().failures(), 0);
    assert!(snaps.iter().flat_map(|s| &s.wave_events).any(|e| matches!(
        e,
        WaveEvent::Intercepted {
            kind: ThreatKind::Ballistic,
            cause: InterceptCause::Shield
        }
    )));
}

#[test]
fn test_ballistic_without_shield_impacts() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let rocket = engine.spawn_threat(ThreatKind::Ballistic, DVec3::new(0.0, 60.0, 0.0));

    tick_n(&mut engine, 120);
    assert!(!engine.is_live(rocket));
    assert_eq!(engine.ledger().intercepts(), 0);
    assert_eq!(engine.ledger().failures(), 1);
    assert!(!engine.world().contains(rocket.entity), "threats are despawned");
}

#[test]
fn test_shield_lifetime_releases_instance() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let shield = engine.deploy("shield", DVec3::ZERO).unwrap();
    let idle_before = engine.pools().idle_count("shield").unwrap();

    tick_n(&mut engine, (SHIELD_LIFETIME_SECS * TICK_RATE as f64) as usize - 5);
    assert!(engine.is_live(shield));

    tick_n(&mut engine, 10);
    assert!(!engine.is_live(shield));
    assert_eq!(engine.pools().idle_count("shield"), Some(idle_before + 1));
    assert!(engine.world().contains(shield.entity), "pooled instances are kept");
}

#[test]
fn test_defense_lifetime_counts_from_tick_end() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let shield = engine.deploy("shield", DVec3::ZERO).unwrap();

    // The first tick ends at 1.0s, so the shield lasts until 9.0s.
    for _ in 0..8 {
        engine.advance(1.0);
    }
    assert!((engine.time().elapsed_secs - 8.0).abs() < 1e-12);
    assert!(engine.is_live(shield));

    engine.advance(1.0);
    assert!(!engine.is_live(shield));
}

#[test]
fn test_glider_drops_bomb_and_leaves_after_grace() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let glider = engine.spawn_threat(ThreatKind::Glider, DVec3::new(0.0, 100.0, 0.0));

    // (100 - 15) m at 25 m/s = 3.4 s.
    let snaps = tick_n(&mut engine, 110);
    let drops = snaps
        .iter()
        .flat_map(|s| &s.presentation_events)
        .filter(|e| matches!(e, PresentationEvent::PayloadDropped { .. }))
        .count();
    assert_eq!(drops, 1);
    assert!(engine.is_live(glider));
    assert!(!engine.world().get::<&Collider>(glider.entity).unwrap().enabled);

    tick_n(&mut engine, (GLIDER_POST_DROP_SECS * TICK_RATE as f64) as usize);
    assert!(!engine.is_live(glider));
    // The bomb reached the target.
    assert_eq!(engine.ledger().failures(), 1);
    assert_eq!(engine.ledger().intercepts(), 0);
}

#[test]
fn test_bomb_blocked_by_shield_is_credited() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    engine.deploy("shield", DVec3::ZERO).unwrap();
    engine.spawn_threat(ThreatKind::Glider, DVec3::new(0.0, 100.0, 0.0));

    let snaps = tick_n(&mut engine, 200);
    assert_eq!(engine.ledger().intercepts(), 1);
    assert_eq!(engine.ledger().failures(), 0);
    assert!(snaps.iter().flat_map(|s| &s.wave_events).any(|e| matches!(
        e,
        WaveEvent::Intercepted {
            kind: ThreatKind::Bomb,
            ..
        }
    )));
}

#[test]
fn test_walker_fires_once_then_removed() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let walker = engine.spawn_threat(ThreatKind::Walker, DVec3::new(0.0, -30.0, 0.0));

    // 8 m at 4 m/s, then 3 s aim.
    let snaps = tick_n(&mut engine, 30 * 6);
    let shots = snaps
        .iter()
        .flat_map(|s| &s.presentation_events)
        .filter(|e| matches!(e, PresentationEvent::WeaponFired { .. }))
        .count();
    assert_eq!(shots, 1);
    assert_eq!(engine.ledger().failures(), 1);
    assert!(engine.is_live(walker), "still inside its grace period");

    tick_n(&mut engine, 60);
    assert!(!engine.is_live(walker));
    assert_eq!(engine.ledger().failures(), 1);
}

#[test]
fn test_non_finite_pose_faults_without_credit() {
    let mut engine = SimulationEngine::new(MatchConfig::default());
    let drifter = engine.spawn_threat(ThreatKind::Drifter, DVec3::new(0.0, 50.0, 0.0));
    let bystander = engine.spawn_threat(ThreatKind::Drifter, DVec3::new(50.0, 0.0, 0.0));
    engine
        .world_mut()
        .get::<&mut Pose>(drifter.entity)
        .unwrap()
        .position = DVec3::new(f64::NAN, 0.0, 0.0);

    engine.tick();
    assert!(!engine.is_live(drifter));
    assert!(!engine.world().contains(drifter.entity));
    assert!(engine.is_live(bystander), "the rest of the tick continues");
    assert_eq!(engine.ledger().intercepts(), 0);
    assert_eq!(engine.ledger().failures(), 0);
}

// ---- Wave scheduler ----

#[test]
fn test_wave_spawns_each_roster_entry_once() {
    let mut config = MatchConfig::default();
    config.spawn.total = 10;
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartWave);

    let mut kinds = Vec::new();
    for _ in 0..30 * 120 {
        let snap = engine.tick();
        for event in &snap.presentation_events {
            if let PresentationEvent::Spawned { kind, .. } = event {
                kinds.push(*kind);
            }
        }
        if engine.wave_complete() {
            break;
        }
    }

    assert!(engine.wave_complete());
    assert_eq!(kinds.len(), ThreatKind::ROSTER_KINDS.len());
    let mut sorted = kinds.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), kinds.len(), "a roster entry spawned twice");
}

#[test]
fn test_wave_total_caps_spawns() {
    let mut config = MatchConfig::default();
    config.spawn.roster = vec![ThreatKind::Ballistic, ThreatKind::Drifter, ThreatKind::Ballistic];
    config.spawn.total = 2;
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartWave);

    let mut spawned = 0;
    while !engine.wave_complete() && engine.time().elapsed_secs < 120.0 {
        let snap = engine.tick();
        spawned += snap
            .presentation_events
            .iter()
            .filter(|e| matches!(e, PresentationEvent::Spawned { .. }))
            .count();
    }
    assert_eq!(spawned, 2);
    assert_eq!(engine.wave().roster_remaining, 1);
}

#[test]
fn test_malformed_step_is_skipped_without_delay() {
    let mut config = MatchConfig::default();
    config.spawn.roster = vec![ThreatKind::Glider];
    config.spawn.glider_point = None;
    config.spawn.total = 1;
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartWave);

    let mut completions = 0;
    for _ in 0..5 {
        let snap = engine.tick();
        assert!(!snap
            .presentation_events
            .iter()
            .any(|e| matches!(e, PresentationEvent::Spawned { .. })));
        completions += snap
            .wave_events
            .iter()
            .filter(|e| matches!(e, WaveEvent::WaveComplete { score: 0, .. }))
            .count();
    }
    assert_eq!(completions, 1);
    assert_eq!(engine.wave().spawned, 0);
    assert_eq!(engine.wave().phase, WavePhase::Complete);
}

#[test]
fn test_empty_roster_wave_completes_immediately() {
    let mut config = MatchConfig::default();
    config.spawn.roster.clear();
    let mut engine = SimulationEngine::new(config);
    engine.queue_command(PlayerCommand::StartWave);

    let events: Vec<WaveEvent> = tick_n(&mut engine, 30)
        .into_iter()
        .flat_map(|s| s.wave_events)
        .collect();
    assert_eq!(
        events,
        vec![
            WaveEvent::WaveStarted {
                wave: 1,
                total: DEFAULT_WAVE_TOTAL
            },
            WaveEvent::WaveComplete { wave: 1, score: 0 },
        ]
    );
    assert!(engine.wave_complete());
    assert_eq!(engine.wave().spawned, 0);
}

#[test]
fn test_spawn_cues_follow_kind() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    use crate::systems::wave_scheduler::resolve_cue;
    assert_eq!(resolve_cue(ThreatKind::Glider, &mut rng), SpawnCue::JetFlyby);
    assert_eq!(resolve_cue(ThreatKind::Swimmer, &mut rng), SpawnCue::SonarPing);
    for _ in 0..20 {
        assert!(matches!(
            resolve_cue(ThreatKind::Drifter, &mut rng),
            SpawnCue::SirenLow | SpawnCue::SirenHigh
        ));
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = MatchConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone());
    let mut engine_b = SimulationEngine::new(config);

    engine_a.queue_command(PlayerCommand::StartWave);
    engine_b.queue_command(PlayerCommand::StartWave);

    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}
