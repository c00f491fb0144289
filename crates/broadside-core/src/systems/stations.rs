//! Station system - timed effects of staffed stations.
//!
//! Stations are resolved one at a time in creation order against the live
//! economy, so a cannon late in the order sees the powder an earlier cannon
//! already spent this tick.

use hecs::{Entity, World};

use crate::components::{CrewMember, Station, StationEffect};
use crate::config::PowderConfig;
use super::economy::ShipEconomy;
use super::events::{BattleEvent, EventQueue};

/// What a due station did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StationAction {
    Fired { damage: f32 },
    /// Cannon due but the magazine was short; timer left as is
    HeldForPowder,
    Supplied { amount: f32 },
    Healed { patient: Entity, amount: f32 },
    /// Surgery due but nobody assigned is injured; timer left as is
    NoPatient,
}

/// Resolve every due station once. Returns what each acting station did.
pub fn station_system(
    world: &mut World,
    stations: &[Entity],
    economy: &mut ShipEconomy,
    powder: &PowderConfig,
    now_ms: f64,
    events: &mut EventQueue,
) -> Vec<(Entity, StationAction)> {
    let mut actions = Vec::new();

    for &entity in stations {
        let (effect, effectiveness, crew) = match world.get::<&Station>(entity) {
            Ok(station) if station.is_due(now_ms) => {
                (station.spec.effect, station.effectiveness(), station.crew.clone())
            }
            _ => continue,
        };

        let action = match effect {
            StationEffect::Cannon { damage, .. } => {
                if economy.try_spend_powder(powder.shot_cost) {
                    let dealt = (damage as f64 * effectiveness) as f32;
                    economy.damage_enemy(dealt);
                    events.push(BattleEvent::CannonFired {
                        station: entity,
                        damage: dealt,
                    });
                    StationAction::Fired { damage: dealt }
                } else {
                    log::debug!(
                        "Station {:?} held fire: {:.1} powder, needs {:.1}",
                        entity,
                        economy.powder(),
                        powder.shot_cost
                    );
                    StationAction::HeldForPowder
                }
            }
            StationEffect::PowderSupply { .. } => {
                economy.add_powder(powder.supply_amount);
                StationAction::Supplied {
                    amount: powder.supply_amount,
                }
            }
            StationEffect::Surgery { heal_amount, .. } => {
                match first_injured(world, &crew) {
                    Some(patient) => {
                        let amount = (heal_amount as f64 * effectiveness) as f32;
                        if let Ok(mut member) = world.get::<&mut CrewMember>(patient) {
                            member.heal(amount);
                        }
                        StationAction::Healed { patient, amount }
                    }
                    None => StationAction::NoPatient,
                }
            }
            StationEffect::Pumps { .. } | StationEffect::Marines { .. } => continue,
        };

        let succeeded = !matches!(
            action,
            StationAction::HeldForPowder | StationAction::NoPatient
        );
        if succeeded {
            if let Ok(mut station) = world.get::<&mut Station>(entity) {
                station.last_action_ms = now_ms;
            }
        }
        actions.push((entity, action));
    }

    actions
}

/// First injured crew member in assignment order
fn first_injured(world: &World, crew: &[Entity]) -> Option<Entity> {
    crew.iter().copied().find(|&c| {
        world
            .get::<&CrewMember>(c)
            .map(|m| m.is_injured())
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, Rect, StationKind, Vec2};
    use crate::config::BattleConfig;

    struct Bench {
        world: World,
        economy: ShipEconomy,
        powder: PowderConfig,
        events: EventQueue,
    }

    impl Bench {
        fn new() -> Self {
            let config = BattleConfig::default();
            Self {
                world: World::new(),
                economy: ShipEconomy::new(&config),
                powder: config.powder.clone(),
                events: EventQueue::new(),
            }
        }

        fn station(&mut self, kind: StationKind, crew: usize) -> Entity {
            let mut station = Station::new(kind, Rect::new(Vec2::new(200.0, 200.0), 100.0, 80.0));
            for _ in 0..crew {
                let c = self
                    .world
                    .spawn((CrewMember::new(100.0, 100.0), Position(Vec2::ZERO)));
                station.add_crew(c);
            }
            self.world.spawn((station,))
        }

        fn run(&mut self, stations: &[Entity], now: f64) -> Vec<(Entity, StationAction)> {
            station_system(
                &mut self.world,
                stations,
                &mut self.economy,
                &self.powder,
                now,
                &mut self.events,
            )
        }

        fn last_action(&self, station: Entity) -> f64 {
            self.world.get::<&Station>(station).unwrap().last_action_ms
        }
    }

    #[test]
    fn test_cannon_fires_and_spends_powder() {
        let mut bench = Bench::new();
        let gun = bench.station(StationKind::MiddleCannon, 3);

        assert!(bench.run(&[gun], 8000.0).is_empty());
        let actions = bench.run(&[gun], 8001.0);
        assert_eq!(actions, vec![(gun, StationAction::Fired { damage: 12.5 })]);
        assert_eq!(bench.economy.enemy_health, 487.5);
        assert_eq!(bench.economy.powder(), 95.0);
        assert_eq!(bench.last_action(gun), 8001.0);
    }

    #[test]
    fn test_cannon_without_powder_keeps_timer() {
        let mut bench = Bench::new();
        let gun = bench.station(StationKind::UpperCannon, 4);
        bench.economy.set_powder(4.0);

        let actions = bench.run(&[gun], 5000.0);
        assert_eq!(actions, vec![(gun, StationAction::HeldForPowder)]);
        assert_eq!(bench.economy.enemy_health, 500.0);
        assert_eq!(bench.economy.powder(), 4.0);
        assert_eq!(bench.last_action(gun), 0.0);
        assert!(bench.events.is_empty());
    }

    #[test]
    fn test_shared_powder_goes_in_creation_order() {
        let mut bench = Bench::new();
        let first = bench.station(StationKind::UpperCannon, 4);
        let second = bench.station(StationKind::UpperCannon, 4);
        bench.economy.set_powder(5.0);

        let actions = bench.run(&[first, second], 4000.0);
        assert_eq!(
            actions,
            vec![
                (first, StationAction::Fired { damage: 15.0 }),
                (second, StationAction::HeldForPowder),
            ]
        );
        assert_eq!(bench.economy.powder(), 0.0);
    }

    #[test]
    fn test_powder_room_supplies_and_caps() {
        let mut bench = Bench::new();
        let room = bench.station(StationKind::PowderRoom, 2);
        bench.economy.set_powder(97.0);

        // Period 1000 / 0.5 = 2000
        assert!(bench.run(&[room], 2000.0).is_empty());
        bench.run(&[room], 2001.0);
        assert_eq!(bench.economy.powder(), 100.0);
        assert_eq!(bench.last_action(room), 2001.0);
    }

    #[test]
    fn test_surgery_heals_first_injured_only() {
        let mut bench = Bench::new();
        let surgery = bench.station(StationKind::Surgery, 3);
        let crew = bench.world.get::<&Station>(surgery).unwrap().crew.clone();
        bench.world.get::<&mut CrewMember>(crew[1]).unwrap().health = 50.0;
        bench.world.get::<&mut CrewMember>(crew[2]).unwrap().health = 40.0;

        let actions = bench.run(&[surgery], 5001.0);
        // Fully staffed: 20 * 1.0
        assert_eq!(
            actions,
            vec![(surgery, StationAction::Healed { patient: crew[1], amount: 20.0 })]
        );
        assert_eq!(bench.world.get::<&CrewMember>(crew[1]).unwrap().health, 70.0);
        assert_eq!(bench.world.get::<&CrewMember>(crew[2]).unwrap().health, 40.0);
    }

    #[test]
    fn test_surgery_without_patient_keeps_timer() {
        let mut bench = Bench::new();
        let surgery = bench.station(StationKind::Surgery, 1);

        let actions = bench.run(&[surgery], 6000.0);
        assert_eq!(actions, vec![(surgery, StationAction::NoPatient)]);
        assert_eq!(bench.last_action(surgery), 0.0);

        // A patient appears; next tick heals without waiting another period
        let crew = bench.world.get::<&Station>(surgery).unwrap().crew[0];
        bench.world.get::<&mut CrewMember>(crew).unwrap().health = 60.0;
        let actions = bench.run(&[surgery], 6016.0);
        assert_eq!(
            actions,
            vec![(surgery, StationAction::Healed { patient: crew, amount: 10.0 })]
        );
    }

    #[test]
    fn test_inactive_and_passive_stations_do_nothing() {
        let mut bench = Bench::new();
        let gun = bench.station(StationKind::LowerCannon, 3);
        let pumps = bench.station(StationKind::Pumps, 6);
        let marines = bench.station(StationKind::Marines, 8);
        assert!(bench.run(&[gun, pumps, marines], 1_000_000.0).is_empty());
        assert_eq!(bench.economy.powder(), 100.0);
    }
}
