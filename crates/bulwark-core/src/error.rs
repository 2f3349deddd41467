//! Error taxonomy.
//!
//! None of these stop a running wave: the engine logs them and degrades the
//! offending step or actor.

use std::fmt;

use crate::enums::ThreatKind;

/// Malformed configuration or an unknown key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyRoster,
    ZeroTotal,
    NoGenericSpawnPoints,
    MissingSpawnPoint(ThreatKind),
    UnknownDefense(String),
    DuplicatePool(String),
    DuplicateCatalogKey(String),
    NonPositive { field: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoster => write!(f, "wave roster is empty"),
            Self::ZeroTotal => write!(f, "wave total must be at least 1"),
            Self::NoGenericSpawnPoints => write!(f, "no generic spawn points configured"),
            Self::MissingSpawnPoint(kind) => {
                write!(f, "no dedicated spawn point for {kind:?}")
            }
            Self::UnknownDefense(key) => write!(f, "unknown defense `{key}`"),
            Self::DuplicatePool(key) => write!(f, "pool `{key}` already exists"),
            Self::DuplicateCatalogKey(key) => {
                write!(f, "defense catalog key `{key}` is listed twice")
            }
            Self::NonPositive { field, value } => {
                write!(f, "`{field}` must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Object pool failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool exists but has no idle instance.
    Exhausted(String),
    UnknownKey(String),
    /// An idle instance had lost its components and was discarded.
    BrokenInstance(String),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted(key) => write!(f, "pool `{key}` has no idle instance"),
            Self::UnknownKey(key) => write!(f, "unknown pool key `{key}`"),
            Self::BrokenInstance(key) => {
                write!(f, "pool `{key}` handed out a broken instance, discarded")
            }
        }
    }
}

impl std::error::Error for PoolError {}

/// Failure to place a defense from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    Config(ConfigError),
    Pool(PoolError),
}

impl fmt::Display for DeployError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "deploy rejected: {e}"),
            Self::Pool(e) => write!(f, "deploy failed: {e}"),
        }
    }
}

impl std::error::Error for DeployError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pool(e) => Some(e),
        }
    }
}

impl From<ConfigError> for DeployError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<PoolError> for DeployError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

/// Per-actor breakage detected during an update.
#[derive(Debug, Clone, PartialEq)]
pub enum ActorFault {
    NonFinitePose,
}

impl fmt::Display for ActorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinitePose => write!(f, "actor pose is not finite"),
        }
    }
}

impl std::error::Error for ActorFault {}

/// Failure to read or parse a match configuration.
#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(ConfigError),
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(e: ConfigError) -> Self {
        Self::Invalid(e)
    }
}
