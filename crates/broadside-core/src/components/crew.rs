//! Crew member component and the assignment back-reference.

use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Fraction of base health below which a crew member counts as injured
pub const INJURED_THRESHOLD: f32 = 0.7;

/// Fraction of base health below which a crew member counts as critical
pub const CRITICAL_THRESHOLD: f32 = 0.3;

/// What a crew member is currently working: a station slot or a crisis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignTarget {
    Station(Entity),
    Crisis(Entity),
}

impl AssignTarget {
    pub fn entity(&self) -> Entity {
        match self {
            AssignTarget::Station(e) | AssignTarget::Crisis(e) => *e,
        }
    }
}

/// Crew member component - one mobile sailor
#[derive(Debug, Clone, PartialEq)]
pub struct CrewMember {
    /// 0 ..= base_health
    pub health: f32,
    pub base_health: f32,
    /// Advisory only, no rule consumes it yet
    pub morale: f32,
    /// At most one station or crisis at a time
    pub assignment: Option<AssignTarget>,
}

impl CrewMember {
    pub fn new(base_health: f32, morale: f32) -> Self {
        Self {
            health: base_health,
            base_health,
            morale,
            assignment: None,
        }
    }

    /// Apply damage, never going below zero. Returns true if this killed them.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_dead() {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.is_dead()
    }

    /// Heal up to base health
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.base_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_injured(&self) -> bool {
        self.health < self.base_health * INJURED_THRESHOLD
    }

    pub fn is_critical(&self) -> bool {
        self.health < self.base_health * CRITICAL_THRESHOLD
    }

    pub fn health_fraction(&self) -> f32 {
        if self.base_health > 0.0 {
            self.health / self.base_health
        } else {
            0.0
        }
    }
}

/// Serializable view of an assignment, entity handles flattened to bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentView {
    Station(u64),
    Crisis(u64),
}

impl From<AssignTarget> for AssignmentView {
    fn from(target: AssignTarget) -> Self {
        match target {
            AssignTarget::Station(e) => AssignmentView::Station(e.to_bits().get()),
            AssignTarget::Crisis(e) => AssignmentView::Crisis(e.to_bits().get()),
        }
    }
}
