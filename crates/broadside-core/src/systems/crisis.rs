//! Crisis system - intensity growth/decay, resolution and spawning

use hecs::{Entity, World};

use crate::components::{CrewMember, Crisis, CrisisKind, Vec2};
use super::events::{BattleEvent, EventQueue};

/// Advance every live crisis by `delta_ms`.
///
/// A crisis that reaches zero intensity releases its crew, is despawned and
/// leaves `crises` in this same call. Returns the resolved crises.
pub fn crisis_system(
    world: &mut World,
    crises: &mut Vec<Entity>,
    delta_ms: f64,
    events: &mut EventQueue,
) -> Vec<Entity> {
    let mut resolved = Vec::new();

    for &entity in crises.iter() {
        if let Ok(crisis) = world.query_one_mut::<&mut Crisis>(entity) {
            if crisis.update(delta_ms) {
                resolved.push(entity);
            }
        }
    }

    for &entity in &resolved {
        resolve_crisis(world, entity);
        log::info!("Crisis {:?} resolved", entity);
        events.push(BattleEvent::CrisisResolved { crisis: entity });
    }
    crises.retain(|e| !resolved.contains(e));

    resolved
}

/// Release every crew member fighting `entity` and remove the crisis
fn resolve_crisis(world: &mut World, entity: Entity) {
    let crew = match world.get::<&mut Crisis>(entity) {
        Ok(mut crisis) => std::mem::take(&mut crisis.crew),
        Err(_) => return,
    };
    for member in crew {
        if let Ok(mut m) = world.get::<&mut CrewMember>(member) {
            m.assignment = None;
        }
    }
    let _ = world.despawn(entity);
}

/// Start a new crisis at full initial intensity
pub fn spawn_crisis(
    world: &mut World,
    crises: &mut Vec<Entity>,
    kind: CrisisKind,
    position: Vec2,
    events: &mut EventQueue,
) -> Entity {
    let entity = world.spawn((Crisis::new(kind, position),));
    crises.push(entity);
    log::info!(
        "{} broke out at ({:.0}, {:.0})",
        kind.name(),
        position.x,
        position.y
    );
    events.push(BattleEvent::CrisisSpawned {
        crisis: entity,
        kind,
        position,
    });
    entity
}
