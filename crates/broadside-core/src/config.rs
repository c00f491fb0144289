//! Battle configuration.
//!
//! Defaults are the canonical game constants. Every field may be overridden
//! from JSON; missing fields fall back to the default.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// RNG seed. Same seed and same inputs replay the same battle.
    pub seed: u64,
    /// Crew spawned at battle start; there are no reinforcements
    pub starting_crew: u32,
    /// Economy evaluation starts once this much time has elapsed
    pub battle_start_delay_ms: f64,
    pub ship_max_health: f32,
    /// Crises hurt nearby crew
    pub crisis_damage: bool,
    pub crew: CrewConfig,
    pub enemy: EnemyConfig,
    pub powder: PowderConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            starting_crew: 25,
            battle_start_delay_ms: 1000.0,
            ship_max_health: 500.0,
            crisis_damage: true,
            crew: CrewConfig::default(),
            enemy: EnemyConfig::default(),
            powder: PowderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    pub base_health: f32,
    pub base_morale: f32,
    /// Pixels per second
    pub move_speed: f32,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self {
            base_health: 100.0,
            base_morale: 100.0,
            move_speed: 150.0,
        }
    }
}

/// Fixed-interval enemy broadside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub base_health: f32,
    pub fire_rate_ms: f64,
    pub damage: f32,
    /// Chance each enemy hit starts a crisis
    pub crisis_chance: f64,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_health: 500.0,
            fire_rate_ms: 6000.0,
            damage: 20.0,
            crisis_chance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowderConfig {
    pub initial: f32,
    pub max: f32,
    /// Powder consumed per cannon shot
    pub shot_cost: f32,
    /// Powder added per powder room action
    pub supply_amount: f32,
}

impl Default for PowderConfig {
    fn default() -> Self {
        Self {
            initial: 100.0,
            max: 100.0,
            shot_cost: 5.0,
            supply_amount: 5.0,
        }
    }
}

/// Nested config sections
const SECTIONS: [&str; 3] = ["crew", "enemy", "powder"];

impl BattleConfig {
    /// Parse and validate a JSON config
    ///
    /// The config and its sections must be JSON objects; serde would
    /// otherwise read an array positionally into the struct fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let Some(fields) = value.as_object() else {
            return Err(ConfigError::invalid("config", "expected a JSON object"));
        };
        for section in SECTIONS {
            if fields.get(section).map_or(false, |v| !v.is_object()) {
                return Err(ConfigError::invalid(section, "expected a JSON object"));
            }
        }

        let config: BattleConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.enemy.crisis_chance) {
            return Err(ConfigError::invalid(
                "enemy.crisis_chance",
                format!("{} is outside [0, 1]", self.enemy.crisis_chance),
            ));
        }
        positive("ship_max_health", self.ship_max_health)?;
        positive("enemy.base_health", self.enemy.base_health)?;
        positive("crew.base_health", self.crew.base_health)?;
        positive("powder.max", self.powder.max)?;
        positive("powder.shot_cost", self.powder.shot_cost)?;
        non_negative("powder.initial", self.powder.initial)?;
        non_negative("powder.supply_amount", self.powder.supply_amount)?;
        non_negative("enemy.damage", self.enemy.damage)?;
        non_negative("crew.move_speed", self.crew.move_speed)?;
        if self.powder.initial > self.powder.max {
            return Err(ConfigError::invalid(
                "powder.initial",
                format!("{} exceeds powder.max {}", self.powder.initial, self.powder.max),
            ));
        }
        timing("battle_start_delay_ms", self.battle_start_delay_ms)?;
        timing("enemy.fire_rate_ms", self.enemy.fire_rate_ms)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must be positive", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} must not be negative", value)))
    }
}

fn timing(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{} is not a valid duration", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = BattleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.enemy.fire_rate_ms, 6000.0);
        assert_eq!(config.powder.max, 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BattleConfig::from_json(r#"{ "seed": 7, "enemy": { "crisis_chance": 1.0 } }"#)
            .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.enemy.crisis_chance, 1.0);
        assert_eq!(config.enemy.damage, 20.0);
        assert_eq!(config.starting_crew, 25);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = BattleConfig::from_json(r#"{ "enemy": { "crisis_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "enemy.crisis_chance", .. }));

        let err = BattleConfig::from_json(r#"{ "powder": { "initial": 120.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "powder.initial", .. }));

        let err = BattleConfig::from_json(r#"{ "powder": { "shot_cost": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "powder.shot_cost", .. }));

        assert!(matches!(
            BattleConfig::from_json("{ seed: 1 }").unwrap_err(),
            ConfigError::Json(_)
        ));
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert!(matches!(
            BattleConfig::from_json("[1, 2]").unwrap_err(),
            ConfigError::Invalid { field: "config", .. }
        ));
        assert!(matches!(
            BattleConfig::from_json("42").unwrap_err(),
            ConfigError::Invalid { field: "config", .. }
        ));
        assert!(matches!(
            BattleConfig::from_json(r#"{ "enemy": [500.0, 6000.0, 20.0, 0.3] }"#).unwrap_err(),
            ConfigError::Invalid { field: "enemy", .. }
        ));
        assert!(BattleConfig::from_json("{}").is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = BattleConfig {
            seed: 99,
            crisis_damage: false,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(BattleConfig::from_json(&json).unwrap(), config);
    }
}
