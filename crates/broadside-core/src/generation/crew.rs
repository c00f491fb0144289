//! Crew generation - the fixed starting complement

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{CrewMember, Position, Vec2};
use crate::config::CrewConfig;
use super::ship::{SHIP_ORIGIN, SHIP_WIDTH};

/// Spawn `count` unassigned crew at random spots inside the hull
pub fn generate_crew(
    world: &mut World,
    count: u32,
    config: &CrewConfig,
    rng: &mut impl Rng,
) -> Vec<Entity> {
    let mut crew_entities = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let position = Vec2::new(
            SHIP_ORIGIN.x + 100.0 + rng.gen::<f32>() * (SHIP_WIDTH - 200.0),
            SHIP_ORIGIN.y + 100.0 + rng.gen::<f32>() * 400.0,
        );
        crew_entities.push(spawn_crew_member(world, position, config));
    }

    crew_entities
}

/// Spawn one crew member at full health
pub fn spawn_crew_member(world: &mut World, position: Vec2, config: &CrewConfig) -> Entity {
    world.spawn((
        CrewMember::new(config.base_health, config.base_morale),
        Position(position),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_crew() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(42);
        let crew = generate_crew(&mut world, 25, &CrewConfig::default(), &mut rng);

        assert_eq!(crew.len(), 25);
        for &c in &crew {
            let member = world.get::<&CrewMember>(c).unwrap();
            assert_eq!(member.health, 100.0);
            assert_eq!(member.assignment, None);
            let pos = world.get::<&Position>(c).unwrap();
            assert!(pos.0.x >= 190.0 && pos.0.x < 1090.0);
            assert!(pos.0.y >= 160.0 && pos.0.y < 560.0);
        }
    }

    #[test]
    fn test_seeded_generation_is_repeatable() {
        let positions = |seed| {
            let mut world = World::new();
            let mut rng = StdRng::seed_from_u64(seed);
            generate_crew(&mut world, 5, &CrewConfig::default(), &mut rng)
                .into_iter()
                .map(|c| world.get::<&Position>(c).unwrap().0)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(9), positions(9));
    }
}
