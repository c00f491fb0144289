//! Ship generation - the fixed station layout of a ship of the line.
//!
//! World coordinates are pixels with y growing downward. The hull starts at
//! `SHIP_ORIGIN`; deck 0 is the weather deck, decks 1-3 are gun decks and
//! deck 4 is the hold.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{CrisisKind, Rect, Station, StationKind, Vec2};

pub const SHIP_ORIGIN: Vec2 = Vec2::new(90.0, 60.0);
pub const SHIP_WIDTH: f32 = 1100.0;
pub const SHIP_HEIGHT: f32 = 600.0;
pub const DECK_HEIGHT: f32 = 120.0;
pub const DECK_COUNT: u32 = 5;

/// Where each station sits and how big its footprint is, in creation order.
///
/// Creation order is also the order stations are resolved in every tick.
pub fn standard_station_plan() -> Vec<(StationKind, Rect)> {
    let mut plan = Vec::with_capacity(12);
    let x0 = SHIP_ORIGIN.x;
    let y0 = SHIP_ORIGIN.y;

    // Upper gun deck - 3 cannon stations
    for i in 0..3 {
        let center = Vec2::new(x0 + 150.0 + i as f32 * 280.0, y0 + DECK_HEIGHT + 60.0);
        plan.push((StationKind::UpperCannon, Rect::new(center, 100.0, 80.0)));
    }

    // Middle gun deck - 3 cannon stations
    for i in 0..3 {
        let center = Vec2::new(x0 + 150.0 + i as f32 * 280.0, y0 + 2.0 * DECK_HEIGHT + 60.0);
        plan.push((StationKind::MiddleCannon, Rect::new(center, 100.0, 80.0)));
    }

    // Lower gun deck - 2 heavy cannon stations
    for i in 0..2 {
        let center = Vec2::new(x0 + 250.0 + i as f32 * 400.0, y0 + 3.0 * DECK_HEIGHT + 60.0);
        plan.push((StationKind::LowerCannon, Rect::new(center, 120.0, 80.0)));
    }

    // Hold
    let hold_y = y0 + 4.0 * DECK_HEIGHT + 50.0;
    plan.push((
        StationKind::PowderRoom,
        Rect::new(Vec2::new(x0 + 200.0, hold_y), 100.0, 70.0),
    ));
    plan.push((
        StationKind::Surgery,
        Rect::new(Vec2::new(x0 + SHIP_WIDTH / 2.0, hold_y), 100.0, 70.0),
    ));
    plan.push((
        StationKind::Pumps,
        Rect::new(Vec2::new(x0 + SHIP_WIDTH - 200.0, hold_y), 100.0, 70.0),
    ));

    // Weather deck
    plan.push((
        StationKind::Marines,
        Rect::new(Vec2::new(x0 + SHIP_WIDTH / 2.0, y0 + 50.0), 150.0, 60.0),
    ));

    plan
}

/// Spawn the standard stations. Returned in creation order.
pub fn generate_stations(world: &mut World) -> Vec<Entity> {
    standard_station_plan()
        .into_iter()
        .map(|(kind, footprint)| world.spawn((Station::new(kind, footprint),)))
        .collect()
}

/// Pick a crisis kind and a spot on one of the lower four decks
pub fn random_crisis_site(rng: &mut impl Rng) -> (CrisisKind, Vec2) {
    let x = SHIP_ORIGIN.x + 100.0 + rng.gen::<f32>() * (SHIP_WIDTH - 200.0);
    let deck = rng.gen_range(1..DECK_COUNT);
    let y = SHIP_ORIGIN.y + deck as f32 * DECK_HEIGHT + 50.0;
    let kind = CrisisKind::ALL[rng.gen_range(0..CrisisKind::ALL.len())];
    (kind, Vec2::new(x, y))
}

/// Whether a point lies inside the hull interior crew can occupy
pub fn in_ship_interior(point: &Vec2) -> bool {
    point.x >= SHIP_ORIGIN.x
        && point.x <= SHIP_ORIGIN.x + SHIP_WIDTH
        && point.y >= SHIP_ORIGIN.y
        && point.y <= SHIP_ORIGIN.y + SHIP_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_plan_order_and_counts() {
        let plan = standard_station_plan();
        let kinds: Vec<StationKind> = plan.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds.len(), 12);
        assert_eq!(&kinds[..3], &[StationKind::UpperCannon; 3]);
        assert_eq!(&kinds[3..6], &[StationKind::MiddleCannon; 3]);
        assert_eq!(&kinds[6..8], &[StationKind::LowerCannon; 2]);
        assert_eq!(
            &kinds[8..],
            &[
                StationKind::PowderRoom,
                StationKind::Surgery,
                StationKind::Pumps,
                StationKind::Marines
            ]
        );
        assert_eq!(plan[0].1.center, Vec2::new(240.0, 240.0));
        assert_eq!(plan[9].1.center, Vec2::new(640.0, 590.0));
        assert!(plan.iter().all(|(_, r)| in_ship_interior(&r.center)));
    }

    #[test]
    fn test_generate_stations_spawns_plan() {
        let mut world = World::new();
        let stations = generate_stations(&mut world);
        assert_eq!(stations.len(), 12);
        let first = world.get::<&Station>(stations[0]).unwrap();
        assert_eq!(first.kind, StationKind::UpperCannon);
        assert!(!first.active);
    }

    #[test]
    fn test_crisis_sites_on_gun_decks_and_hold() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut kinds_seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let (kind, pos) = random_crisis_site(&mut rng);
            kinds_seen.insert(kind);
            assert!(pos.x >= 190.0 && pos.x < 1090.0);
            assert!([230.0, 350.0, 470.0, 590.0].contains(&pos.y));
            assert!(in_ship_interior(&pos));
        }
        assert_eq!(kinds_seen.len(), 2);
    }
}
