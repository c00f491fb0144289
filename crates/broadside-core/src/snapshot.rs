//! Read-only battle views for UI collaborators.
//!
//! Entity handles are flattened to `u64` so a snapshot serializes cleanly.

use serde::Serialize;

use crate::components::{AssignmentView, CrisisKind, StationKind, Vec2};
use crate::systems::Outcome;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub elapsed_ms: f64,
    pub started: bool,
    pub outcome: Option<Outcome>,
    pub ship_health_percent: f32,
    pub enemy_health_percent: f32,
    pub powder_percent: f32,
    pub crew_count: usize,
    pub stations: Vec<StationView>,
    pub crises: Vec<CrisisView>,
    pub crew: Vec<CrewView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationView {
    pub id: u64,
    pub kind: StationKind,
    pub assigned: usize,
    pub required: usize,
    pub max: usize,
    pub active: bool,
    pub effectiveness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisView {
    pub id: u64,
    pub kind: CrisisKind,
    /// Raw intensity, 0 to 150
    pub intensity_percent: f32,
    pub spreading: bool,
    pub spread_radius: f32,
    pub assigned: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewView {
    pub id: u64,
    pub health: f32,
    pub position: Vec2,
    pub assignment: Option<AssignmentView>,
}

impl BattleSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Crew not assigned to anything
    pub fn idle_crew(&self) -> usize {
        self.crew.iter().filter(|c| c.assignment.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::DefeatReason;

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = BattleSnapshot {
            elapsed_ms: 1500.0,
            started: true,
            outcome: Some(Outcome::Defeat(DefeatReason::CrewDepleted)),
            ship_health_percent: 80.0,
            enemy_health_percent: 100.0,
            powder_percent: 95.0,
            crew_count: 0,
            stations: vec![StationView {
                id: 7,
                kind: StationKind::Surgery,
                assigned: 1,
                required: 1,
                max: 3,
                active: true,
                effectiveness: 0.5,
            }],
            crises: Vec::new(),
            crew: Vec::new(),
        };

        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(json["outcome"]["defeat"], "crew-depleted");
        assert_eq!(json["stations"][0]["kind"], "Surgery");
        assert_eq!(json["stations"][0]["effectiveness"], 0.5);
        assert_eq!(snapshot.idle_crew(), 0);
    }
}
