//! Match configuration: spawn layout, defense catalog, rating policy.
//!
//! Every field defaults from `constants`, so a JSON file only needs to name
//! what it changes.

use std::collections::HashSet;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::error::{ConfigError, ConfigLoadError};

/// Everything needed to run a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub pool_policy: PoolPolicy,
    pub spawn: SpawnConfig,
    pub catalog: Vec<DefenseEntry>,
    pub rating: RatingPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            pool_policy: PoolPolicy::default(),
            spawn: SpawnConfig::default(),
            catalog: default_catalog(),
            rating: RatingPolicy::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the parts that would otherwise only surface mid-wave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spawn.validate()?;
        let mut keys = HashSet::new();
        for entry in &self.catalog {
            if !keys.insert(entry.key.as_str()) {
                return Err(ConfigError::DuplicateCatalogKey(entry.key.clone()));
            }
            if entry.radius <= 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "catalog.radius",
                    value: entry.radius.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn defense(&self, key: &str) -> Option<&DefenseEntry> {
        self.catalog.iter().find(|e| e.key == key)
    }
}

/// Spawn layout consumed read-only by the wave scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Threat kinds available to a wave, drawn without replacement.
    pub roster: Vec<ThreatKind>,
    /// Spawns per wave (at least 1).
    pub total: u32,
    /// Points used by kinds without a dedicated point.
    pub generic_points: Vec<DVec3>,
    pub glider_point: Option<DVec3>,
    pub walker_point: Option<DVec3>,
    pub swimmer_point: Option<DVec3>,
    /// The protected target.
    pub target: DVec3,
    /// Where walkers halt to aim.
    pub land_anchor: DVec3,
    /// Where swimmers surface to fire.
    pub water_anchor: DVec3,
    pub inter_spawn_delay_secs: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        let generic_points = (0..8)
            .map(|i| {
                let bearing = i as f64 * std::f64::consts::TAU / 8.0;
                DVec3::new(
                    SPAWN_RING_RADIUS * bearing.sin(),
                    SPAWN_RING_RADIUS * bearing.cos(),
                    10.0,
                )
            })
            .collect();

        Self {
            roster: ThreatKind::ROSTER_KINDS.to_vec(),
            total: DEFAULT_WAVE_TOTAL,
            generic_points,
            glider_point: Some(DVec3::new(0.0, 100.0, GLIDER_CRUISE_ALTITUDE)),
            walker_point: Some(DVec3::new(0.0, -90.0, GROUND_LEVEL)),
            swimmer_point: Some(DVec3::new(90.0, 0.0, GROUND_LEVEL)),
            target: DVec3::ZERO,
            land_anchor: DVec3::new(0.0, -20.0, GROUND_LEVEL),
            water_anchor: DVec3::new(25.0, 0.0, GROUND_LEVEL),
            inter_spawn_delay_secs: INTER_SPAWN_DELAY_SECS,
        }
    }
}

impl SpawnConfig {
    /// Kinds that always spawn from their own point.
    pub fn has_dedicated_point(kind: ThreatKind) -> bool {
        matches!(
            kind,
            ThreatKind::Glider | ThreatKind::Walker | ThreatKind::Swimmer
        )
    }

    pub fn dedicated_point(&self, kind: ThreatKind) -> Option<DVec3> {
        match kind {
            ThreatKind::Glider => self.glider_point,
            ThreatKind::Walker => self.walker_point,
            ThreatKind::Swimmer => self.swimmer_point,
            _ => None,
        }
    }

    /// Hard errors only. An empty roster is allowed: its wave completes at
    /// once with no spawns.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total == 0 {
            return Err(ConfigError::ZeroTotal);
        }
        if self.inter_spawn_delay_secs < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "spawn.inter_spawn_delay_secs",
                value: self.inter_spawn_delay_secs.to_string(),
            });
        }
        Ok(())
    }
}

/// One deployable defense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenseEntry {
    /// Stable name, also the pool key.
    pub key: String,
    pub kind: DefenseKind,
    /// Effect radius (shield size, blast radius, detection radius).
    pub radius: f64,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default)]
    pub lifetime_secs: Option<f64>,
    #[serde(default)]
    pub targets: Option<Vec<ThreatKind>>,
    #[serde(default)]
    pub fall: Option<FallModel>,
    #[serde(default)]
    pub aim_secs: Option<f64>,
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

impl DefenseEntry {
    pub fn new(key: &str, kind: DefenseKind, radius: f64) -> Self {
        Self {
            key: key.to_string(),
            kind,
            radius,
            pool_size: DEFAULT_POOL_SIZE,
            lifetime_secs: None,
            targets: None,
            fall: None,
            aim_secs: None,
        }
    }

    /// Threat kinds this defense may destroy.
    pub fn effective_targets(&self) -> Vec<ThreatKind> {
        if let Some(targets) = &self.targets {
            return targets.clone();
        }
        match self.kind {
            DefenseKind::AreaDenial => vec![ThreatKind::Ballistic, ThreatKind::Bomb],
            DefenseKind::Mortar => vec![ThreatKind::Walker],
            DefenseKind::Emp => vec![
                ThreatKind::Ballistic,
                ThreatKind::Glider,
                ThreatKind::Drifter,
                ThreatKind::Bomb,
            ],
            DefenseKind::Sentry => vec![ThreatKind::Glider],
        }
    }

    /// Active lifespan; `None` for single-use drops.
    pub fn effective_lifetime(&self) -> Option<f64> {
        match self.kind {
            DefenseKind::AreaDenial => Some(self.lifetime_secs.unwrap_or(SHIELD_LIFETIME_SECS)),
            DefenseKind::Sentry => Some(self.lifetime_secs.unwrap_or(SENTRY_LIFETIME_SECS)),
            DefenseKind::Mortar | DefenseKind::Emp => self.lifetime_secs,
        }
    }

    pub fn effective_fall(&self) -> FallModel {
        self.fall.unwrap_or(match self.kind {
            DefenseKind::Emp => FallModel::ConstantSpeed(EMP_FALL_SPEED),
            _ => FallModel::ConstantSpeed(MORTAR_FALL_SPEED),
        })
    }

    pub fn effective_aim_secs(&self) -> f64 {
        self.aim_secs.unwrap_or(SENTRY_AIM_SECS)
    }
}

fn default_catalog() -> Vec<DefenseEntry> {
    vec![
        DefenseEntry::new("shield", DefenseKind::AreaDenial, SHIELD_RADIUS),
        DefenseEntry::new("mortar", DefenseKind::Mortar, MORTAR_RADIUS),
        DefenseEntry::new("emp", DefenseKind::Emp, EMP_RADIUS),
        DefenseEntry::new("sam", DefenseKind::Sentry, SENTRY_DETECTION_RADIUS),
    ]
}

/// External success / star-rating policy applied to a finished wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingPolicy {
    pub success_threshold: u32,
    /// Interceptions needed for one, two and three stars.
    pub star_thresholds: [u32; 3],
}

impl Default for RatingPolicy {
    fn default() -> Self {
        Self {
            success_threshold: SUCCESS_THRESHOLD,
            star_thresholds: [SUCCESS_THRESHOLD, 4, 5],
        }
    }
}

/// Classification of a finished wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveVerdict {
    pub score: u32,
    pub success: bool,
    pub stars: u8,
}

impl RatingPolicy {
    pub fn classify(&self, score: u32) -> WaveVerdict {
        let stars = self
            .star_thresholds
            .iter()
            .filter(|&&needed| score >= needed)
            .count() as u8;
        WaveVerdict {
            score,
            success: score >= self.success_threshold,
            stars,
        }
    }
}
