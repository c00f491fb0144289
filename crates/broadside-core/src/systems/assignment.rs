//! Crew assignment - the only code that mutates station/crisis membership.
//!
//! The crew member's back-reference and the container's crew list are always
//! changed together, so a crew member is in at most one container and every
//! container member points back at it.

use hecs::{Entity, World};

use crate::components::{AssignTarget, CrewMember, Crisis, Station};
use crate::error::AssignError;
use super::movement::{halt, walk_to};

/// Assign `crew` to `target`, releasing any previous assignment first.
///
/// Validation happens before any mutation: a rejected command leaves both
/// the old and the new container untouched.
pub fn assign_crew(
    world: &mut World,
    crew: Entity,
    target: AssignTarget,
    speed: f32,
) -> Result<(), AssignError> {
    let current = match world.get::<&CrewMember>(crew) {
        Ok(member) => member.assignment,
        Err(_) => return Err(AssignError::UnknownCrew(crew)),
    };

    if current == Some(target) {
        return Ok(());
    }

    match target {
        AssignTarget::Station(station) => {
            let station_ref = world
                .get::<&Station>(station)
                .map_err(|_| AssignError::UnknownTarget(station))?;
            if !station_ref.can_accept_crew() {
                return Err(AssignError::TargetFull {
                    station,
                    capacity: station_ref.spec.crew_max,
                });
            }
        }
        AssignTarget::Crisis(crisis) => {
            let crisis_ref = world
                .get::<&Crisis>(crisis)
                .map_err(|_| AssignError::UnknownTarget(crisis))?;
            if crisis_ref.is_resolved() {
                return Err(AssignError::UnknownTarget(crisis));
            }
        }
    }

    release_crew(world, crew, speed);

    match target {
        AssignTarget::Station(station) => {
            if let Ok(mut s) = world.get::<&mut Station>(station) {
                s.add_crew(crew);
            }
            set_assignment(world, crew, Some(target));
            layout_station(world, station, speed);
        }
        AssignTarget::Crisis(crisis) => {
            let position = match world.get::<&mut Crisis>(crisis) {
                Ok(mut c) => {
                    c.add_crew(crew);
                    c.position
                }
                Err(_) => return Err(AssignError::UnknownTarget(crisis)),
            };
            set_assignment(world, crew, Some(target));
            walk_to(world, crew, position, speed);
        }
    }

    Ok(())
}

/// Clear a crew member's assignment and drop them from its container.
///
/// Returns the assignment that was cleared; unassigned crew are a no-op.
pub fn release_crew(world: &mut World, crew: Entity, speed: f32) -> Option<AssignTarget> {
    let previous = match world.get::<&mut CrewMember>(crew) {
        Ok(mut member) => member.assignment.take(),
        Err(_) => None,
    }?;

    match previous {
        AssignTarget::Station(station) => {
            let removed = match world.get::<&mut Station>(station) {
                Ok(mut s) => s.remove_crew(crew),
                Err(_) => false,
            };
            if removed {
                layout_station(world, station, speed);
            }
        }
        AssignTarget::Crisis(crisis) => {
            if let Ok(mut c) = world.get::<&mut Crisis>(crisis) {
                c.remove_crew(crew);
            }
        }
    }

    Some(previous)
}

/// Unassign command: release and stop walking
pub fn unassign_crew(world: &mut World, crew: Entity, speed: f32) -> bool {
    let released = release_crew(world, crew, speed).is_some();
    if released {
        halt(world, crew);
    }
    released
}

/// Point every crew member of a station at its standing slot
pub fn layout_station(world: &mut World, station: Entity, speed: f32) {
    let placements: Vec<(Entity, crate::components::Vec2)> = match world.get::<&Station>(station) {
        Ok(s) => s.crew.iter().copied().zip(s.crew_slots()).collect(),
        Err(_) => return,
    };
    for (crew, slot) in placements {
        walk_to(world, crew, slot, speed);
    }
}

fn set_assignment(world: &mut World, crew: Entity, assignment: Option<AssignTarget>) {
    if let Ok(mut member) = world.get::<&mut CrewMember>(crew) {
        member.assignment = assignment;
    }
}
