//! Fundamental geometric and simulation types.
//!
//! World frame: x = East, y = North, z = Up. An actor with identity
//! orientation faces +y.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Local forward axis of every actor and weapon sub-part.
pub const FORWARD: DVec3 = DVec3::Y;

/// World up axis.
pub const UP: DVec3 = DVec3::Z;

/// Position and orientation of an actor in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(DVec3::ZERO)
    }
}

impl Pose {
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with identity orientation.
    pub fn at(position: DVec3) -> Self {
        Self::new(position, DQuat::IDENTITY)
    }

    /// Direction the actor is facing.
    pub fn forward(&self) -> DVec3 {
        self.orientation * FORWARD
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one fixed tick.
    pub fn advance(&mut self) {
        self.advance_by(self.dt());
    }

    /// Advance by one variable-length frame.
    pub fn advance_by(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Rotation that turns `FORWARD` onto `direction`.
///
/// Returns `None` for a zero-length (or non-finite) direction, where the
/// rotation is undefined.
pub fn look_rotation(direction: DVec3) -> Option<DQuat> {
    let dir = direction.try_normalize()?;
    Some(DQuat::from_rotation_arc(FORWARD, dir))
}

/// Rotate `from` toward `to` by at most `max_angle` radians.
pub fn rotate_towards(from: DQuat, to: DQuat, max_angle: f64) -> DQuat {
    let angle = from.angle_between(to);
    if angle <= max_angle || angle <= f64::EPSILON {
        to
    } else {
        from.slerp(to, max_angle / angle)
    }
}

/// Distance in the ground plane, ignoring altitude.
pub fn horizontal_distance(a: DVec3, b: DVec3) -> f64 {
    a.truncate().distance(b.truncate())
}
