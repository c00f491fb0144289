//! Station components: fixed crewable slots aboard the ship.
//!
//! A station aggregates assigned crew and turns its staffing level into an
//! effectiveness multiplier. The per-kind tables below are the ship's fixed
//! loadout and are not configurable.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::common::{Rect, Vec2};

/// Types of station aboard the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    UpperCannon,
    MiddleCannon,
    LowerCannon,
    PowderRoom,
    Surgery,
    Pumps,
    Marines,
}

impl StationKind {
    pub const ALL: [StationKind; 7] = [
        StationKind::UpperCannon,
        StationKind::MiddleCannon,
        StationKind::LowerCannon,
        StationKind::PowderRoom,
        StationKind::Surgery,
        StationKind::Pumps,
        StationKind::Marines,
    ];

    /// Staffing thresholds and effect parameters for this kind
    pub fn spec(&self) -> StationSpec {
        match self {
            StationKind::UpperCannon => StationSpec {
                name: "Upper Gun",
                crew_required: 2,
                crew_max: 4,
                effect: StationEffect::Cannon {
                    fire_rate_ms: 3000.0,
                    damage: 15.0,
                },
            },
            StationKind::MiddleCannon => StationSpec {
                name: "Middle Gun",
                crew_required: 3,
                crew_max: 5,
                effect: StationEffect::Cannon {
                    fire_rate_ms: 4000.0,
                    damage: 25.0,
                },
            },
            StationKind::LowerCannon => StationSpec {
                name: "Lower Gun",
                crew_required: 4,
                crew_max: 6,
                effect: StationEffect::Cannon {
                    fire_rate_ms: 5000.0,
                    damage: 40.0,
                },
            },
            StationKind::PowderRoom => StationSpec {
                name: "Powder Room",
                crew_required: 2,
                crew_max: 4,
                effect: StationEffect::PowderSupply {
                    supply_rate_ms: 1000.0,
                },
            },
            StationKind::Surgery => StationSpec {
                name: "Surgery",
                crew_required: 1,
                crew_max: 3,
                effect: StationEffect::Surgery {
                    heal_rate_ms: 5000.0,
                    heal_amount: 20.0,
                },
            },
            StationKind::Pumps => StationSpec {
                name: "Pumps",
                crew_required: 2,
                crew_max: 6,
                effect: StationEffect::Pumps {
                    pump_rate_ms: 2000.0,
                },
            },
            StationKind::Marines => StationSpec {
                name: "Marines",
                crew_required: 0,
                crew_max: 8,
                effect: StationEffect::Marines { defend_power: 10.0 },
            },
        }
    }

    pub fn is_cannon(&self) -> bool {
        matches!(
            self,
            StationKind::UpperCannon | StationKind::MiddleCannon | StationKind::LowerCannon
        )
    }
}

/// What a staffed station does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StationEffect {
    /// Fixed damage per shot, cadence scales with effectiveness
    Cannon { fire_rate_ms: f64, damage: f32 },
    /// Adds powder on a cadence scaled by effectiveness
    PowderSupply { supply_rate_ms: f64 },
    /// Fixed cadence, heal amount scales with effectiveness
    Surgery { heal_rate_ms: f64, heal_amount: f32 },
    /// Passive; rate exposed for collaborators only
    Pumps { pump_rate_ms: f64 },
    /// Passive defend value per marine
    Marines { defend_power: f32 },
}

/// Per-kind thresholds and effect parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationSpec {
    pub name: &'static str,
    pub crew_required: usize,
    pub crew_max: usize,
    pub effect: StationEffect,
}

/// Effectiveness for a given head count.
///
/// Zero below `required`, a linear ramp from 0.5 at `required` to 1.0 at
/// `max`. When `max == required` there is no ramp and the value is a flat 0.5.
pub fn effectiveness_for(assigned: usize, required: usize, max: usize) -> f64 {
    if assigned < required {
        return 0.0;
    }
    if max <= required {
        return 0.5;
    }
    let extra = (assigned.min(max) - required) as f64;
    let span = (max - required) as f64;
    0.5 + 0.5 * (extra / span)
}

/// Station component
#[derive(Debug, Clone)]
pub struct Station {
    pub kind: StationKind,
    pub spec: StationSpec,
    /// World footprint, used for crew layout and drop resolution
    pub footprint: Rect,
    /// Assignment order, used only for positioning and surgery patient order
    pub crew: Vec<Entity>,
    /// Simulation time (ms) of the last successful action
    pub last_action_ms: f64,
    /// assigned >= required, kept in step with `crew`
    pub active: bool,
}

impl Station {
    pub fn new(kind: StationKind, footprint: Rect) -> Self {
        Self::with_spec(kind, kind.spec(), footprint)
    }

    /// Build a station with explicit thresholds (scenario setups and tests)
    pub fn with_spec(kind: StationKind, spec: StationSpec, footprint: Rect) -> Self {
        let mut station = Self {
            kind,
            spec,
            footprint,
            crew: Vec::new(),
            last_action_ms: 0.0,
            active: false,
        };
        station.refresh_active();
        station
    }

    pub fn assigned_count(&self) -> usize {
        self.crew.len()
    }

    pub fn can_accept_crew(&self) -> bool {
        self.crew.len() < self.spec.crew_max
    }

    pub fn contains_crew(&self, crew: Entity) -> bool {
        self.crew.contains(&crew)
    }

    /// Add a crew member. Fails without mutation when the station is full.
    pub fn add_crew(&mut self, crew: Entity) -> bool {
        if self.contains_crew(crew) {
            return true;
        }
        if !self.can_accept_crew() {
            return false;
        }
        self.crew.push(crew);
        self.refresh_active();
        true
    }

    /// Remove a crew member. Removing someone not here is a no-op.
    pub fn remove_crew(&mut self, crew: Entity) -> bool {
        match self.crew.iter().position(|&c| c == crew) {
            Some(index) => {
                self.crew.remove(index);
                self.refresh_active();
                true
            }
            None => false,
        }
    }

    fn refresh_active(&mut self) {
        self.active = self.crew.len() >= self.spec.crew_required;
    }

    pub fn effectiveness(&self) -> f64 {
        effectiveness_for(self.crew.len(), self.spec.crew_required, self.spec.crew_max)
    }

    /// Time between actions at the current staffing, if this station acts at all.
    ///
    /// Surgery keeps its nominal cadence; everything timed divides by
    /// effectiveness so better staffing acts more often.
    pub fn effective_period_ms(&self) -> Option<f64> {
        let effectiveness = self.effectiveness();
        if effectiveness <= 0.0 {
            return None;
        }
        match self.spec.effect {
            StationEffect::Cannon { fire_rate_ms, .. } => Some(fire_rate_ms / effectiveness),
            StationEffect::PowderSupply { supply_rate_ms } => Some(supply_rate_ms / effectiveness),
            StationEffect::Surgery { heal_rate_ms, .. } => Some(heal_rate_ms),
            StationEffect::Pumps { .. } | StationEffect::Marines { .. } => None,
        }
    }

    /// Whether the action gate is open at `now_ms` (strictly past the period)
    pub fn is_due(&self, now_ms: f64) -> bool {
        if !self.active {
            return false;
        }
        match self.effective_period_ms() {
            Some(period) => now_ms - self.last_action_ms > period,
            None => false,
        }
    }

    /// Passive defend value contributed by marines; zero for other kinds
    pub fn defend_value(&self) -> f32 {
        match self.spec.effect {
            StationEffect::Marines { defend_power } => defend_power * self.crew.len() as f32,
            _ => 0.0,
        }
    }

    /// Standing spots for the current crew, in assignment order
    pub fn crew_slots(&self) -> Vec<Vec2> {
        let count = self.crew.len();
        let usable = self.footprint.width - 20.0;
        let spacing = 30.0_f32.min(usable / count.max(1) as f32);
        let start_x = self.footprint.center.x - (count.saturating_sub(1)) as f32 * spacing / 2.0;
        (0..count)
            .map(|i| Vec2::new(start_x + i as f32 * spacing, self.footprint.center.y))
            .collect()
    }
}
