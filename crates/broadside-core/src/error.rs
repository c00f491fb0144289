//! Error types for commands and configuration.
//!
//! Nothing inside a tick is an error: scarcity and missing targets defer
//! effects silently. These types cover the command boundary and config input.

use hecs::Entity;

/// Why an assignment command was rejected. Rejection never mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignError {
    /// No living crew member with this id
    UnknownCrew(Entity),
    /// No station or live crisis with this id
    UnknownTarget(Entity),
    /// Station already at capacity
    TargetFull { station: Entity, capacity: usize },
    /// Battle already decided
    BattleOver,
}

impl std::fmt::Display for AssignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignError::UnknownCrew(e) => write!(f, "unknown crew member {:?}", e),
            AssignError::UnknownTarget(e) => write!(f, "unknown station or crisis {:?}", e),
            AssignError::TargetFull { station, capacity } => {
                write!(f, "station {:?} is full ({} crew)", station, capacity)
            }
            AssignError::BattleOver => write!(f, "battle is already over"),
        }
    }
}

impl std::error::Error for AssignError {}

/// Errors loading or validating a [`crate::config::BattleConfig`]
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config field `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}
