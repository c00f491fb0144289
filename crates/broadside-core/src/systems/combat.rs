//! Enemy gunnery - fixed-interval broadsides against our hull

use rand::Rng;

use crate::components::{CrisisKind, Vec2};
use crate::config::EnemyConfig;
use crate::generation::random_crisis_site;
use super::economy::ShipEconomy;
use super::events::{BattleEvent, EventQueue};

/// Result of one enemy gunnery check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volley {
    /// Not reloaded yet
    Reloading,
    /// Hit us; maybe started a crisis (never more than one)
    Fired { crisis: Option<(CrisisKind, Vec2)> },
}

/// Fire if `fire_rate_ms` has elapsed since the last volley.
///
/// Damage always lands. Independently, one roll against `crisis_chance`
/// decides whether a single crisis of random kind starts at a random spot.
pub fn enemy_fire_system(
    economy: &mut ShipEconomy,
    enemy: &EnemyConfig,
    last_fire_ms: &mut f64,
    now_ms: f64,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) -> Volley {
    if now_ms - *last_fire_ms < enemy.fire_rate_ms {
        return Volley::Reloading;
    }
    *last_fire_ms = now_ms;

    economy.damage_ship(enemy.damage);
    events.push(BattleEvent::EnemyFired {
        damage: enemy.damage,
    });
    log::debug!(
        "Enemy broadside hit for {:.0}, hull at {:.0}",
        enemy.damage,
        economy.ship_health
    );

    let crisis = if rng.gen::<f64>() < enemy.crisis_chance {
        Some(random_crisis_site(rng))
    } else {
        None
    };

    Volley::Fired { crisis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BattleConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fires_on_interval() {
        let config = BattleConfig::default();
        let mut economy = ShipEconomy::new(&config);
        let mut events = EventQueue::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut last = 0.0;

        let volley = enemy_fire_system(&mut economy, &config.enemy, &mut last, 5999.0, &mut rng, &mut events);
        assert_eq!(volley, Volley::Reloading);
        assert_eq!(economy.ship_health, 500.0);

        let volley = enemy_fire_system(&mut economy, &config.enemy, &mut last, 6000.0, &mut rng, &mut events);
        assert!(matches!(volley, Volley::Fired { .. }));
        assert_eq!(economy.ship_health, 480.0);
        assert_eq!(last, 6000.0);
        assert_eq!(events.drain(), vec![BattleEvent::EnemyFired { damage: 20.0 }]);

        let volley = enemy_fire_system(&mut economy, &config.enemy, &mut last, 11_999.0, &mut rng, &mut events);
        assert_eq!(volley, Volley::Reloading);
    }

    #[test]
    fn test_crisis_chance_extremes() {
        let mut config = BattleConfig::default();
        let mut economy = ShipEconomy::new(&config);
        let mut events = EventQueue::new();
        let mut rng = StdRng::seed_from_u64(7);

        config.enemy.crisis_chance = 1.0;
        let mut last = 0.0;
        for i in 1..=20 {
            let volley = enemy_fire_system(&mut economy, &config.enemy, &mut last, i as f64 * 6000.0, &mut rng, &mut events);
            assert!(matches!(volley, Volley::Fired { crisis: Some(_) }));
        }

        config.enemy.crisis_chance = 0.0;
        for i in 21..=40 {
            let volley = enemy_fire_system(&mut economy, &config.enemy, &mut last, i as f64 * 6000.0, &mut rng, &mut events);
            assert_eq!(volley, Volley::Fired { crisis: None });
        }
    }

    #[test]
    fn test_same_seed_same_volleys() {
        let config = BattleConfig::default();
        let run = |seed| {
            let mut economy = ShipEconomy::new(&config);
            let mut events = EventQueue::new();
            let mut rng = StdRng::seed_from_u64(seed);
            let mut last = 0.0;
            (1..=30)
                .map(|i| enemy_fire_system(&mut economy, &config.enemy, &mut last, i as f64 * 6000.0, &mut rng, &mut events))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }
}
