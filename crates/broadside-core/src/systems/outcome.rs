//! Terminal condition evaluation

use serde::{Deserialize, Serialize};

use super::economy::ShipEconomy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefeatReason {
    ShipDestroyed,
    CrewDepleted,
}

impl DefeatReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefeatReason::ShipDestroyed => "ship-destroyed",
            DefeatReason::CrewDepleted => "crew-depleted",
        }
    }
}

impl std::fmt::Display for DefeatReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Victory,
    Defeat(DefeatReason),
}

/// Decide whether the battle is over.
///
/// Victory wins ties: if the enemy goes down in the same tick as our ship or
/// our last crew member, it is still a victory. Between the two defeat
/// reasons an empty roster is reported first.
pub fn evaluate_outcome(economy: &ShipEconomy, crew_count: usize) -> Option<Outcome> {
    if economy.enemy_destroyed() {
        Some(Outcome::Victory)
    } else if crew_count == 0 {
        Some(Outcome::Defeat(DefeatReason::CrewDepleted))
    } else if economy.ship_destroyed() {
        Some(Outcome::Defeat(DefeatReason::ShipDestroyed))
    } else {
        None
    }
}
