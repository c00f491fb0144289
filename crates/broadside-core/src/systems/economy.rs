//! Ship economy - hull health on both sides and the powder magazine

use serde::{Deserialize, Serialize};

use crate::config::BattleConfig;

/// Battle-wide mutable state (one per battle, owned by the engine).
///
/// Health values may go negative; they are only compared against zero for
/// terminal checks and clamped for display. Powder always stays in
/// `[0, max_powder]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipEconomy {
    pub ship_health: f32,
    pub ship_max_health: f32,
    pub enemy_health: f32,
    pub enemy_max_health: f32,
    powder: f32,
    max_powder: f32,
}

impl ShipEconomy {
    pub fn new(config: &BattleConfig) -> Self {
        let max_powder = config.powder.max.max(0.0);
        Self {
            ship_health: config.ship_max_health,
            ship_max_health: config.ship_max_health,
            enemy_health: config.enemy.base_health,
            enemy_max_health: config.enemy.base_health,
            powder: config.powder.initial.clamp(0.0, max_powder),
            max_powder,
        }
    }

    pub fn powder(&self) -> f32 {
        self.powder
    }

    pub fn max_powder(&self) -> f32 {
        self.max_powder
    }

    /// Set powder directly, clamped to the magazine size
    pub fn set_powder(&mut self, amount: f32) {
        self.powder = amount.clamp(0.0, self.max_powder);
    }

    /// Take `cost` powder if the magazine holds that much. No partial spend.
    pub fn try_spend_powder(&mut self, cost: f32) -> bool {
        if self.powder >= cost {
            self.powder = (self.powder - cost).max(0.0);
            true
        } else {
            false
        }
    }

    pub fn add_powder(&mut self, amount: f32) {
        self.powder = (self.powder + amount).min(self.max_powder);
    }

    pub fn damage_enemy(&mut self, amount: f32) {
        self.enemy_health -= amount;
    }

    pub fn damage_ship(&mut self, amount: f32) {
        self.ship_health -= amount;
    }

    pub fn ship_destroyed(&self) -> bool {
        self.ship_health <= 0.0
    }

    pub fn enemy_destroyed(&self) -> bool {
        self.enemy_health <= 0.0
    }

    pub fn ship_health_percent(&self) -> f32 {
        percent(self.ship_health, self.ship_max_health)
    }

    pub fn enemy_health_percent(&self) -> f32 {
        percent(self.enemy_health, self.enemy_max_health)
    }

    pub fn powder_percent(&self) -> f32 {
        percent(self.powder, self.max_powder)
    }
}

/// 0..=100, clamped for display
fn percent(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        (value / max * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
