//! Movement system - walks crew toward their assigned spot

use hecs::{Entity, World};

use crate::components::{Movement, Position, Vec2};

/// Within this distance a walker snaps onto its destination
pub const ARRIVAL_DISTANCE: f32 = 5.0;

/// Move every walking crew member toward its destination
pub fn movement_system(world: &mut World, delta_ms: f64) {
    let delta_seconds = (delta_ms / 1000.0) as f32;
    let mut arrived: Vec<Entity> = Vec::new();

    for (entity, (pos, movement)) in world.query_mut::<(&mut Position, &Movement)>() {
        let (next, done) = step_toward(pos.0, movement, delta_seconds);
        pos.0 = next;
        if done {
            arrived.push(entity);
        }
    }

    // Remove movement - arrived
    for entity in arrived {
        let _ = world.remove_one::<Movement>(entity);
    }
}

/// One step of walking. Returns the new position and whether we arrived.
fn step_toward(current: Vec2, movement: &Movement, delta_seconds: f32) -> (Vec2, bool) {
    let diff = movement.destination - current;
    let distance = diff.length();

    if distance <= ARRIVAL_DISTANCE {
        return (movement.destination, true);
    }

    let step = movement.speed * delta_seconds;
    let ratio = (step / distance).min(1.0);
    (current + diff * ratio, false)
}

/// Send a crew member walking to `destination`
pub fn walk_to(world: &mut World, crew: Entity, destination: Vec2, speed: f32) {
    let _ = world.insert_one(crew, Movement::new(destination, speed));
}

/// Stop a crew member where they stand
pub fn halt(world: &mut World, crew: Entity) {
    let _ = world.remove_one::<Movement>(crew);
}
