//! Battle notifications for rendering, UI and audio collaborators.
//!
//! Every occurrence is queued once, in the order it happened within the tick.
//! Consumers drain the queue whenever they like; the tick never waits on them.

use hecs::Entity;

use crate::components::{CrisisKind, Vec2};
use super::outcome::DefeatReason;

#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    /// Start delay elapsed; economy evaluation begins
    BattleStarted,
    CrewDied { crew: Entity },
    CrisisSpawned {
        crisis: Entity,
        kind: CrisisKind,
        position: Vec2,
    },
    CrisisResolved { crisis: Entity },
    CannonFired { station: Entity, damage: f32 },
    EnemyFired { damage: f32 },
    Victory,
    Defeat { reason: DefeatReason },
}

/// FIFO of notifications not yet taken by collaborators
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: Vec<BattleEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(BattleEvent::BattleStarted);
        queue.push(BattleEvent::EnemyFired { damage: 20.0 });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained[0], BattleEvent::BattleStarted);
        assert_eq!(drained[1], BattleEvent::EnemyFired { damage: 20.0 });
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
