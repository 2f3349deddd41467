//! Types shared between the driver and the game loop thread.

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::Serialize;

use bulwark_core::commands::PlayerCommand;
use bulwark_core::config::WaveVerdict;

/// Commands sent from the driver to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// A defense placement issued at the start of every wave, parsed from
/// `key@x,y`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployOrder {
    pub key: String,
    pub position: DVec3,
}

impl DeployOrder {
    pub fn command(&self) -> PlayerCommand {
        PlayerCommand::Deploy {
            defense: self.key.clone(),
            position: self.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDeployError(String);

impl fmt::Display for ParseDeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected `key@x,y`, got `{}`", self.0)
    }
}

impl std::error::Error for ParseDeployError {}

impl FromStr for DeployOrder {
    type Err = ParseDeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDeployError(s.to_string());
        let (key, coords) = s.split_once('@').ok_or_else(err)?;
        let (x, y) = coords.split_once(',').ok_or_else(err)?;
        let x: f64 = x.trim().parse().map_err(|_| err())?;
        let y: f64 = y.trim().parse().map_err(|_| err())?;
        if key.is_empty() || !x.is_finite() || !y.is_finite() {
            return Err(err());
        }
        Ok(Self {
            key: key.to_string(),
            position: DVec3::new(x, y, 0.0),
        })
    }
}

/// Outcome of one driven wave.
#[derive(Debug, Clone, Serialize)]
pub struct WaveReport {
    pub wave: u32,
    pub spawned: u32,
    pub failures: u32,
    /// Sim seconds from wave start to completion or timeout.
    pub duration_secs: f64,
    /// The wave hit `--max-secs` before completing.
    pub timed_out: bool,
    #[serde(flatten)]
    pub verdict: WaveVerdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_order_parses() {
        let order: DeployOrder = "sam@0,60".parse().unwrap();
        assert_eq!(order.key, "sam");
        assert_eq!(order.position, DVec3::new(0.0, 60.0, 0.0));

        let order: DeployOrder = "mortar@-20.5, 3".parse().unwrap();
        assert_eq!(order.position, DVec3::new(-20.5, 3.0, 0.0));
    }

    #[test]
    fn test_deploy_order_rejects_malformed() {
        for bad in ["sam", "sam@1", "@1,2", "sam@x,2", "sam@inf,0"] {
            assert!(bad.parse::<DeployOrder>().is_err(), "{bad} parsed");
        }
    }

    #[test]
    fn test_report_flattens_verdict() {
        let report = WaveReport {
            wave: 2,
            spawned: 5,
            failures: 1,
            duration_secs: 40.0,
            timed_out: false,
            verdict: WaveVerdict {
                score: 4,
                success: true,
                stars: 2,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["score"], 4);
        assert_eq!(json["stars"], 2);
        assert_eq!(json["wave"], 2);
    }
}
