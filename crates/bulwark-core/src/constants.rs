//! Simulation constants and tuning parameters.
//!
//! Distances are meters, durations seconds, speeds m/s.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Altitude of the ground plane.
pub const GROUND_LEVEL: f64 = 0.0;

// --- Protected target ---

/// Collider radius of the protected target.
pub const TARGET_RADIUS: f64 = 3.0;

/// Collider radius shared by all threats.
pub const THREAT_COLLIDER_RADIUS: f64 = 1.0;

// --- Ballistic ---

pub const BALLISTIC_SPEED: f64 = 20.0;

/// Peak height of the arc above the straight start-target line.
pub const BALLISTIC_ARC_HEIGHT: f64 = 30.0;

// --- Glider ---

pub const GLIDER_SPEED: f64 = 25.0;

/// Fixed flight altitude for approach and departure.
pub const GLIDER_CRUISE_ALTITUDE: f64 = 40.0;

/// Horizontal distance to the target at which the payload is dropped.
pub const GLIDER_DROP_DISTANCE: f64 = 15.0;

/// Time between the drop and the glider's removal.
pub const GLIDER_POST_DROP_SECS: f64 = 4.0;

/// Maximum bank angle while turning toward the approach point (radians).
pub const GLIDER_MAX_BANK: f64 = 0.6;

/// Orientation turn rate while approaching (rad/s).
pub const GLIDER_TURN_RATE: f64 = 2.0;

/// Fall speed of the released bomb.
pub const BOMB_SPEED: f64 = 15.0;

// --- Walker ---

pub const WALKER_SPEED: f64 = 4.0;

/// Distance from the land anchor at which the walker halts.
pub const WALKER_STOP_DISTANCE: f64 = 2.0;

/// Time spent aiming before the single shot.
pub const WALKER_AIM_SECS: f64 = 3.0;

/// Weapon turret turn rate (rad/s).
pub const WALKER_WEAPON_TURN_RATE: f64 = 1.5;

/// Delay between firing and removal.
pub const WALKER_GRACE_SECS: f64 = 1.5;

// --- Swimmer ---

pub const SWIMMER_SPEED: f64 = 5.0;

/// Distance from the water anchor at which the swimmer fires.
pub const SWIMMER_FIRE_DISTANCE: f64 = 3.0;

/// Delay between firing and removal.
pub const SWIMMER_GRACE_SECS: f64 = 1.0;

// --- Drifter ---

pub const DRIFTER_SPEED: f64 = 8.0;

// --- Defenses ---

pub const SHIELD_RADIUS: f64 = 12.0;
pub const SHIELD_LIFETIME_SECS: f64 = 8.0;

/// Height above the deploy point at which mortar / EMP shells appear.
pub const DROP_HEIGHT: f64 = 30.0;

pub const MORTAR_RADIUS: f64 = 6.0;
pub const MORTAR_FALL_SPEED: f64 = 20.0;

pub const EMP_RADIUS: f64 = 15.0;
pub const EMP_FALL_SPEED: f64 = 20.0;

/// Collider radius of a falling shell.
pub const SHELL_RADIUS: f64 = 0.5;

/// Collider radius of a sentry emplacement.
pub const SENTRY_BODY_RADIUS: f64 = 1.5;

pub const SENTRY_DETECTION_RADIUS: f64 = 50.0;
pub const SENTRY_LIFETIME_SECS: f64 = 20.0;
pub const SENTRY_AIM_SECS: f64 = 1.5;
pub const SENTRY_WEAPON_TURN_RATE: f64 = 3.0;

/// Instances preallocated per catalog entry.
pub const DEFAULT_POOL_SIZE: usize = 4;

// --- Wave scheduling ---

/// Wait after a spawned threat terminates before the next spawn step.
pub const INTER_SPAWN_DELAY_SECS: f64 = 2.0;

/// Default number of spawns per wave.
pub const DEFAULT_WAVE_TOTAL: u32 = 5;

/// Distance of the generic spawn ring from the target.
pub const SPAWN_RING_RADIUS: f64 = 80.0;

// --- Rating policy ---

/// Interceptions needed for a wave to count as a success.
pub const SUCCESS_THRESHOLD: u32 = 3;

/// Camera-shake intensity on a failure.
pub const FAILURE_SHAKE: f64 = 1.0;

/// Camera-shake intensity on a detonation.
pub const DETONATION_SHAKE: f64 = 0.4;
