//! Kind-specific behavioral profiles.
//!
//! Consolidates per-kind parameters for the threat FSM.

use bulwark_core::enums::ThreatKind;

/// Behavioral profile for a threat kind.
pub struct ThreatProfile {
    /// Travel speed (m/s).
    pub speed: f64,
    /// Fixed flight altitude (m), for kinds that hold one.
    pub cruise_altitude: Option<f64>,
    /// Peak height of a parabolic arc (m). Zero for straight flyers.
    pub arc_height: f64,
    /// Distance at which the one-shot action triggers (drop / halt / fire).
    pub action_distance: f64,
    /// Time between reaching the action point and acting.
    pub action_delay_secs: f64,
    /// Time between acting and removal.
    pub grace_secs: f64,
    /// Body or weapon turn rate (rad/s).
    pub turn_rate: f64,
}

/// Get the behavioral profile for a given kind.
pub fn get_profile(kind: ThreatKind) -> ThreatProfile {
    use bulwark_core::constants::*;

    match kind {
        ThreatKind::Ballistic => ThreatProfile {
            speed: BALLISTIC_SPEED,
            cruise_altitude: None,
            arc_height: BALLISTIC_ARC_HEIGHT,
            action_distance: 0.0,
            action_delay_secs: 0.0,
            grace_secs: 0.0,
            turn_rate: 0.0,
        },
        ThreatKind::Glider => ThreatProfile {
            speed: GLIDER_SPEED,
            cruise_altitude: Some(GLIDER_CRUISE_ALTITUDE),
            arc_height: 0.0,
            action_distance: GLIDER_DROP_DISTANCE,
            action_delay_secs: 0.0,
            grace_secs: GLIDER_POST_DROP_SECS,
            turn_rate: GLIDER_TURN_RATE,
        },
        ThreatKind::Walker => ThreatProfile {
            speed: WALKER_SPEED,
            cruise_altitude: None,
            arc_height: 0.0,
            action_distance: WALKER_STOP_DISTANCE,
            action_delay_secs: WALKER_AIM_SECS,
            grace_secs: WALKER_GRACE_SECS,
            turn_rate: WALKER_WEAPON_TURN_RATE,
        },
        ThreatKind::Swimmer => ThreatProfile {
            speed: SWIMMER_SPEED,
            cruise_altitude: None,
            arc_height: 0.0,
            action_distance: SWIMMER_FIRE_DISTANCE,
            action_delay_secs: 0.0,
            grace_secs: SWIMMER_GRACE_SECS,
            turn_rate: 0.0,
        },
        ThreatKind::Drifter => ThreatProfile {
            speed: DRIFTER_SPEED,
            cruise_altitude: None,
            arc_height: 0.0,
            action_distance: 0.0,
            action_delay_secs: 0.0,
            grace_secs: 0.0,
            turn_rate: 0.0,
        },
        ThreatKind::Bomb => ThreatProfile {
            speed: BOMB_SPEED,
            cruise_altitude: None,
            arc_height: 0.0,
            action_distance: 0.0,
            action_delay_secs: 0.0,
            grace_secs: 0.0,
            turn_rate: 0.0,
        },
    }
}
