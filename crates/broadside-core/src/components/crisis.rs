//! Crisis components: transient hazards (fire, flooding) fought by crew.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::Vec2;

/// Intensity a freshly spawned crisis starts at
pub const INITIAL_INTENSITY: f32 = 100.0;

/// Intensity ceiling
pub const MAX_INTENSITY: f32 = 150.0;

/// Above this a crisis is spreading
pub const SPREAD_THRESHOLD: f32 = 100.0;

/// Radius within which a dropped crew member joins a crisis, and within which
/// a contained crisis hurts crew
pub const CONTACT_RADIUS: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrisisKind {
    Fire,
    Flooding,
}

impl CrisisKind {
    pub const ALL: [CrisisKind; 2] = [CrisisKind::Fire, CrisisKind::Flooding];

    /// Crew needed before intensity starts to fall
    pub fn crew_needed(&self) -> usize {
        match self {
            CrisisKind::Fire => 2,
            CrisisKind::Flooding => 3,
        }
    }

    /// Damage per second to nearby crew at intensity 100
    pub fn base_damage_per_second(&self) -> f32 {
        match self {
            CrisisKind::Fire => 5.0,
            CrisisKind::Flooding => 2.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrisisKind::Fire => "Fire",
            CrisisKind::Flooding => "Flooding",
        }
    }
}

/// How well a crisis is being fought this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrisisRegime {
    /// assigned >= needed: intensity falls
    Contained,
    /// 0 < assigned < needed: intensity grows at half rate
    UnderFought,
    /// nobody assigned: intensity grows at full rate
    Unfought,
}

/// Crisis component
#[derive(Debug, Clone)]
pub struct Crisis {
    pub kind: CrisisKind,
    /// 0 = resolved, > 100 = spreading, clamped to [0, 150]
    pub intensity: f32,
    pub position: Vec2,
    pub crew: Vec<Entity>,
}

impl Crisis {
    pub fn new(kind: CrisisKind, position: Vec2) -> Self {
        Self::with_intensity(kind, position, INITIAL_INTENSITY)
    }

    pub fn with_intensity(kind: CrisisKind, position: Vec2, intensity: f32) -> Self {
        Self {
            kind,
            intensity: intensity.clamp(0.0, MAX_INTENSITY),
            position,
            crew: Vec::new(),
        }
    }

    pub fn crew_needed(&self) -> usize {
        self.kind.crew_needed()
    }

    pub fn assigned_count(&self) -> usize {
        self.crew.len()
    }

    /// Crises take any number of crew; adding someone already here is a no-op
    pub fn add_crew(&mut self, crew: Entity) {
        if !self.crew.contains(&crew) {
            self.crew.push(crew);
        }
    }

    pub fn remove_crew(&mut self, crew: Entity) -> bool {
        match self.crew.iter().position(|&c| c == crew) {
            Some(index) => {
                self.crew.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn regime(&self) -> CrisisRegime {
        let assigned = self.crew.len();
        if assigned >= self.crew_needed() {
            CrisisRegime::Contained
        } else if assigned > 0 {
            CrisisRegime::UnderFought
        } else {
            CrisisRegime::Unfought
        }
    }

    /// Advance intensity by `delta_ms`. Returns true once resolved.
    pub fn update(&mut self, delta_ms: f64) -> bool {
        let delta = delta_ms as f32;
        let change = match self.regime() {
            CrisisRegime::Contained => {
                let ratio = self.crew.len() as f32 / self.crew_needed() as f32;
                -ratio * (delta / 50.0)
            }
            CrisisRegime::UnderFought => 0.5 * (delta / 100.0),
            CrisisRegime::Unfought => delta / 100.0,
        };
        self.intensity = (self.intensity + change).clamp(0.0, MAX_INTENSITY);
        self.is_resolved()
    }

    pub fn is_resolved(&self) -> bool {
        self.intensity <= 0.0
    }

    pub fn is_spreading(&self) -> bool {
        self.intensity > SPREAD_THRESHOLD
    }

    /// Spread radius hook; only meaningful while spreading
    pub fn spread_radius(&self) -> f32 {
        100.0 + (self.intensity - SPREAD_THRESHOLD) * 2.0
    }

    /// Radius inside which crew take damage
    pub fn hazard_radius(&self) -> f32 {
        if self.is_spreading() {
            self.spread_radius()
        } else {
            CONTACT_RADIUS
        }
    }

    pub fn damage_per_second(&self) -> f32 {
        self.kind.base_damage_per_second() * (self.intensity / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_crew(n: u32) -> Vec<Entity> {
        let mut world = hecs::World::new();
        (0..n).map(|_| world.spawn(())).collect()
    }

    #[test]
    fn test_unfought_grows_ten_per_second() {
        let mut fire = Crisis::new(CrisisKind::Fire, Vec2::ZERO);
        assert!(!fire.is_spreading());
        fire.update(1000.0);
        assert_eq!(fire.intensity, 110.0);
        assert!(fire.is_spreading());
        assert_eq!(fire.spread_radius(), 120.0);
    }

    #[test]
    fn test_clamped_at_ceiling() {
        let mut flood = Crisis::new(CrisisKind::Flooding, Vec2::ZERO);
        for _ in 0..20 {
            flood.update(1000.0);
        }
        assert_eq!(flood.intensity, MAX_INTENSITY);
    }

    #[test]
    fn test_under_fought_grows_slower() {
        let mut fire = Crisis::new(CrisisKind::Fire, Vec2::ZERO);
        fire.add_crew(fake_crew(1)[0]);
        assert_eq!(fire.regime(), CrisisRegime::UnderFought);
        fire.update(1000.0);
        assert_eq!(fire.intensity, 105.0);
    }

    #[test]
    fn test_contained_shrinks_and_resolves() {
        let mut flood = Crisis::new(CrisisKind::Flooding, Vec2::ZERO);
        for c in fake_crew(3) {
            flood.add_crew(c);
        }
        assert_eq!(flood.regime(), CrisisRegime::Contained);
        assert!(!flood.update(1000.0));
        assert_eq!(flood.intensity, 80.0);

        let mut ticks = 0;
        while !flood.update(1000.0) {
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(flood.intensity, 0.0);
    }

    #[test]
    fn test_overstaffing_accelerates() {
        let mut fire = Crisis::new(CrisisKind::Fire, Vec2::ZERO);
        for c in fake_crew(4) {
            fire.add_crew(c);
        }
        fire.update(500.0);
        // (4 / 2) * (500 / 50) = 20
        assert_eq!(fire.intensity, 80.0);
    }

    #[test]
    fn test_add_is_idempotent() {
        let crew = fake_crew(1);
        let mut fire = Crisis::new(CrisisKind::Fire, Vec2::ZERO);
        fire.add_crew(crew[0]);
        fire.add_crew(crew[0]);
        assert_eq!(fire.assigned_count(), 1);
        assert!(fire.remove_crew(crew[0]));
        assert!(!fire.remove_crew(crew[0]));
    }

    #[test]
    fn test_damage_scales_with_intensity() {
        let fire = Crisis::with_intensity(CrisisKind::Fire, Vec2::ZERO, 50.0);
        assert_eq!(fire.damage_per_second(), 2.5);
        assert_eq!(fire.hazard_radius(), CONTACT_RADIUS);
        let flood = Crisis::with_intensity(CrisisKind::Flooding, Vec2::ZERO, 150.0);
        assert_eq!(flood.damage_per_second(), 3.0);
        assert_eq!(flood.hazard_radius(), 200.0);
    }
}
