//! Crew health - crisis hazard damage and death handling

use hecs::{Entity, World};

use crate::components::{CrewMember, Crisis, Position};
use super::assignment::release_crew;
use super::events::{BattleEvent, EventQueue};

/// Damage every crew member standing inside a crisis hazard radius.
///
/// Uses intensities from the previous tick. Returns the crew killed this
/// tick, in roster order.
pub fn crisis_hazard_system(
    world: &mut World,
    roster: &[Entity],
    crises: &[Entity],
    delta_ms: f64,
) -> Vec<Entity> {
    let delta_seconds = (delta_ms / 1000.0) as f32;

    let hazards: Vec<_> = crises
        .iter()
        .filter_map(|&e| world.get::<&Crisis>(e).ok().map(|c| {
            (c.position, c.hazard_radius(), c.damage_per_second())
        }))
        .filter(|(_, _, dps)| *dps > 0.0)
        .collect();

    let mut killed = Vec::new();
    if hazards.is_empty() {
        return killed;
    }

    for &crew in roster {
        let Ok((member, pos)) = world.query_one_mut::<(&mut CrewMember, &Position)>(crew) else {
            continue;
        };
        let damage: f32 = hazards
            .iter()
            .filter(|(center, radius, _)| pos.0.distance(center) <= *radius)
            .map(|(_, _, dps)| dps * delta_seconds)
            .sum();
        if damage > 0.0 && member.take_damage(damage) {
            killed.push(crew);
        }
    }

    killed
}

/// Remove dead crew: free their slot, despawn, drop from the roster, notify.
pub fn bury_crew(
    world: &mut World,
    roster: &mut Vec<Entity>,
    dead: &[Entity],
    speed: f32,
    events: &mut EventQueue,
) {
    for &crew in dead {
        release_crew(world, crew, speed);
        let _ = world.despawn(crew);
        roster.retain(|&c| c != crew);
        log::info!("Crew member {:?} died ({} remaining)", crew, roster.len());
        events.push(BattleEvent::CrewDied { crew });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AssignTarget, CrisisKind, Rect, Station, StationKind, Vec2};
    use crate::systems::assignment::assign_crew;

    fn spawn_crew(world: &mut World, at: Vec2) -> Entity {
        world.spawn((CrewMember::new(100.0, 100.0), Position(at)))
    }

    #[test]
    fn test_only_nearby_crew_are_hurt() {
        let mut world = World::new();
        let fire = world.spawn((Crisis::new(CrisisKind::Fire, Vec2::new(100.0, 100.0)),));
        let near = spawn_crew(&mut world, Vec2::new(120.0, 100.0));
        let far = spawn_crew(&mut world, Vec2::new(400.0, 100.0));

        let killed = crisis_hazard_system(&mut world, &[near, far], &[fire], 1000.0);

        assert!(killed.is_empty());
        assert_eq!(world.get::<&CrewMember>(near).unwrap().health, 95.0);
        assert_eq!(world.get::<&CrewMember>(far).unwrap().health, 100.0);
    }

    #[test]
    fn test_spreading_crisis_reaches_further() {
        let mut world = World::new();
        let flood = world.spawn((Crisis::with_intensity(
            CrisisKind::Flooding,
            Vec2::new(100.0, 100.0),
            150.0,
        ),));
        let crew = spawn_crew(&mut world, Vec2::new(250.0, 100.0));

        crisis_hazard_system(&mut world, &[crew], &[flood], 1000.0);
        assert_eq!(world.get::<&CrewMember>(crew).unwrap().health, 97.0);
    }

    #[test]
    fn test_death_frees_slot_and_notifies() {
        let mut world = World::new();
        let gun = world.spawn((Station::new(
            StationKind::UpperCannon,
            Rect::new(Vec2::new(100.0, 100.0), 100.0, 80.0),
        ),));
        let fire = world.spawn((Crisis::with_intensity(CrisisKind::Fire, Vec2::new(100.0, 100.0), 100.0),));
        let crew = spawn_crew(&mut world, Vec2::new(100.0, 100.0));
        assign_crew(&mut world, crew, AssignTarget::Station(gun), 150.0).unwrap();
        world.get::<&mut CrewMember>(crew).unwrap().health = 4.0;

        let mut roster = vec![crew];
        let mut events = EventQueue::new();
        let dead = crisis_hazard_system(&mut world, &roster, &[fire], 1000.0);
        assert_eq!(dead, vec![crew]);

        bury_crew(&mut world, &mut roster, &dead, 150.0, &mut events);

        assert!(roster.is_empty());
        assert!(!world.contains(crew));
        assert_eq!(world.get::<&Station>(gun).unwrap().assigned_count(), 0);
        assert_eq!(events.drain(), vec![BattleEvent::CrewDied { crew }]);
    }
}
