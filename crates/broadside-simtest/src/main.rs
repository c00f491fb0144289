//! Broadside Headless Battle Harness
//!
//! Drives the battle engine through scripted scenarios and seeded full
//! battles, checking the engine's guarantees along the way.
//! Runs entirely in-process - no rendering, no input.
//!
//! Usage:
//!   cargo run -p broadside-simtest
//!   cargo run -p broadside-simtest -- --verbose
//!   cargo run -p broadside-simtest -- --config battle.json --snapshot

use broadside_core::components::effectiveness_for;
use broadside_core::config::BattleConfig;
use broadside_core::prelude::*;

const FRAME_MS: f64 = 1000.0 / 60.0;
const SWEEP_SEEDS: u64 = 20;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    config_path: Option<String>,
    snapshot: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        config_path: None,
        snapshot: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--snapshot" => args.snapshot = true,
            "--config" => args.config_path = iter.next(),
            other => log::warn!("Ignoring unknown argument {}", other),
        }
    }
    args
}

fn main() {
    let args = parse_args();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    println!("=== Broadside Battle Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(args.config_path.as_deref(), &mut results) {
        Some(config) => config,
        None => BattleConfig::default(),
    };
    results.extend(validate_config());

    // 2. Station effectiveness
    results.extend(validate_effectiveness(args.verbose));

    // 3. Cannon cadence and powder
    results.extend(validate_cannons(&config));

    // 4. Crisis state machine
    results.extend(validate_crises(&config));

    // 5. Terminal precedence
    results.extend(validate_outcomes(&config));

    // 6. Seeded full battles
    results.extend(validate_battle_sweep(&config, args.verbose));

    if args.snapshot {
        let mut engine = BattleEngine::standard(config.clone());
        man_by_plan(&mut engine);
        run_to_outcome(&mut engine);
        match engine.snapshot().to_json() {
            Ok(json) => println!("\n{}", json),
            Err(e) => log::error!("Snapshot serialization failed: {}", e),
        }
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// A config with no start delay and no random crises
fn scripted(config: &BattleConfig) -> BattleConfig {
    let mut config = config.clone();
    config.battle_start_delay_ms = 0.0;
    config.enemy.crisis_chance = 0.0;
    config
}

fn footprint(x: f32, y: f32) -> Rect {
    Rect::new(Vec2::new(x, y), 100.0, 80.0)
}

fn man_station(engine: &mut BattleEngine, station: hecs::Entity, count: usize) -> bool {
    let center = match engine.world.get::<&Station>(station) {
        Ok(s) => s.footprint.center,
        Err(_) => return false,
    };
    (0..count).all(|_| {
        let crew = engine.spawn_crew(center);
        engine.assign_crew(crew, AssignTarget::Station(station))
    })
}

/// Fill every station up to its required crew, in station order
fn man_by_plan(engine: &mut BattleEngine) {
    let stations = engine.stations().to_vec();
    let mut crew = engine.crew().to_vec().into_iter();
    for station in stations {
        let wanted = engine
            .world
            .get::<&Station>(station)
            .map(|s| s.spec.crew_required)
            .unwrap_or(0);
        for member in crew.by_ref().take(wanted) {
            engine.assign_crew(member, AssignTarget::Station(station));
        }
    }
}

/// Send idle crew to any crisis that is short-handed
fn fight_crises(engine: &mut BattleEngine) {
    let crises = engine.crises().to_vec();
    for crisis in crises {
        let short = match engine.world.get::<&Crisis>(crisis) {
            Ok(c) => c.crew_needed().saturating_sub(c.assigned_count()),
            Err(_) => continue,
        };
        let idle: Vec<_> = engine
            .crew()
            .iter()
            .copied()
            .filter(|&c| {
                engine
                    .world
                    .get::<&CrewMember>(c)
                    .map(|m| m.assignment.is_none())
                    .unwrap_or(false)
            })
            .take(short)
            .collect();
        for member in idle {
            engine.assign_crew(member, AssignTarget::Crisis(crisis));
        }
    }
}

fn run_to_outcome(engine: &mut BattleEngine) {
    while !engine.is_over() && engine.now_ms() < 600_000.0 {
        fight_crises(engine);
        engine.update(FRAME_MS);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(path: Option<&str>, results: &mut Vec<TestResult>) -> Option<BattleConfig> {
    println!("--- Configuration ---");
    let path = path?;

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            results.push(TestResult {
                name: "config_read".into(),
                passed: false,
                detail: format!("{}: {}", path, e),
            });
            return None;
        }
    };

    match BattleConfig::from_json(&text) {
        Ok(config) => {
            results.push(TestResult {
                name: "config_load".into(),
                passed: true,
                detail: format!("{} (seed {})", path, config.seed),
            });
            Some(config)
        }
        Err(e) => {
            results.push(TestResult {
                name: "config_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            None
        }
    }
}

fn validate_config() -> Vec<TestResult> {
    let mut results = Vec::new();

    let defaults = BattleConfig::default();
    results.push(TestResult {
        name: "config_defaults_valid".into(),
        passed: defaults.validate().is_ok(),
        detail: format!(
            "{} crew, enemy {} hp every {} ms",
            defaults.starting_crew, defaults.enemy.base_health, defaults.enemy.fire_rate_ms
        ),
    });

    let partial = BattleConfig::from_json(r#"{ "seed": 9, "enemy": { "damage": 35.0 } }"#);
    results.push(TestResult {
        name: "config_partial_json".into(),
        passed: matches!(&partial, Ok(c) if c.seed == 9 && c.enemy.damage == 35.0 && c.enemy.fire_rate_ms == 6000.0),
        detail: "missing fields fall back to defaults".into(),
    });

    let bad = BattleConfig::from_json(r#"{ "enemy": { "crisis_chance": 1.5 } }"#);
    results.push(TestResult {
        name: "config_rejects_bad_chance".into(),
        passed: matches!(bad, Err(ConfigError::Invalid { .. })),
        detail: match bad {
            Err(e) => e.to_string(),
            Ok(_) => "accepted crisis_chance 1.5".into(),
        },
    });

    results
}

// ── 2. Station effectiveness ────────────────────────────────────────────

fn validate_effectiveness(verbose: bool) -> Vec<TestResult> {
    println!("--- Station Effectiveness ---");
    let mut results = Vec::new();

    for kind in StationKind::ALL {
        let spec = kind.spec();
        let below_zero = (0..spec.crew_required)
            .all(|n| effectiveness_for(n, spec.crew_required, spec.crew_max) == 0.0);
        let at_required = effectiveness_for(spec.crew_required, spec.crew_required, spec.crew_max);
        let at_max = effectiveness_for(spec.crew_max, spec.crew_required, spec.crew_max);

        if verbose {
            println!(
                "  {:<14} required {} max {}: {:.2} .. {:.2}",
                spec.name, spec.crew_required, spec.crew_max, at_required, at_max
            );
        }

        results.push(TestResult {
            name: format!("effectiveness_{:?}", kind),
            passed: below_zero && at_required == 0.5 && at_max == 1.0,
            detail: format!("required {:.2}, max {:.2}", at_required, at_max),
        });
    }

    let flat = effectiveness_for(2, 2, 2);
    results.push(TestResult {
        name: "effectiveness_no_ramp".into(),
        passed: flat == 0.5,
        detail: format!("max == required gives {}", flat),
    });

    results
}

// ── 3. Cannons ──────────────────────────────────────────────────────────

fn validate_cannons(base: &BattleConfig) -> Vec<TestResult> {
    println!("--- Cannons & Powder ---");
    let mut results = Vec::new();

    // Half-staffed middle cannon
    let mut engine = BattleEngine::new(scripted(base));
    let gun = engine.spawn_station(StationKind::MiddleCannon, footprint(400.0, 360.0));
    let manned = man_station(&mut engine, gun, 3);
    let mut shots = Vec::new();
    while engine.now_ms() < 30_000.0 {
        engine.update(10.0);
        for event in engine.drain_events() {
            if let BattleEvent::CannonFired { damage, .. } = event {
                shots.push((engine.now_ms(), damage));
            }
        }
    }
    let spacing_ok = shots
        .windows(2)
        .all(|w| w[1].0 - w[0].0 > 8000.0 && w[1].0 - w[0].0 <= 8010.0);
    results.push(TestResult {
        name: "cannon_half_staffed_cadence".into(),
        passed: manned && shots.len() == 3 && spacing_ok && shots.iter().all(|s| s.1 == 12.5),
        detail: format!("{} shots at {:?}", shots.len(), shots.iter().map(|s| s.0).collect::<Vec<_>>()),
    });

    let spent = base.powder.initial - engine.economy().powder();
    results.push(TestResult {
        name: "cannon_powder_cost".into(),
        passed: spent == 3.0 * base.powder.shot_cost,
        detail: format!("{:.1} powder spent", spent),
    });

    // Dry magazine
    let mut engine = BattleEngine::new(scripted(base));
    let gun = engine.spawn_station(StationKind::UpperCannon, footprint(240.0, 240.0));
    man_station(&mut engine, gun, 4);
    engine.economy_mut().set_powder(0.0);
    while engine.now_ms() < 5000.0 {
        engine.update(100.0);
    }
    let held = engine.economy().enemy_health == engine.economy().enemy_max_health
        && engine
            .world
            .get::<&Station>(gun)
            .map(|s| s.last_action_ms == 0.0)
            .unwrap_or(false);
    engine.economy_mut().set_powder(base.powder.shot_cost);
    engine.update(100.0);
    let fired = engine.economy().enemy_health < engine.economy().enemy_max_health;
    results.push(TestResult {
        name: "cannon_waits_for_powder".into(),
        passed: held && fired,
        detail: format!("held: {}, fired after resupply: {}", held, fired),
    });

    results
}

// ── 4. Crises ───────────────────────────────────────────────────────────

fn validate_crises(base: &BattleConfig) -> Vec<TestResult> {
    println!("--- Crises ---");
    let mut results = Vec::new();

    // Unfought fire
    let mut engine = BattleEngine::new(scripted(base));
    engine.spawn_crew(Vec2::new(1000.0, 500.0));
    let fire = engine.spawn_crisis(CrisisKind::Fire, Vec2::new(300.0, 230.0));
    let mut trace = Vec::new();
    for _ in 0..7 {
        engine.update(1000.0);
        if let Ok(c) = engine.world.get::<&Crisis>(fire) {
            trace.push(c.intensity);
        }
    }
    results.push(TestResult {
        name: "crisis_unfought_growth".into(),
        passed: trace == vec![110.0, 120.0, 130.0, 140.0, 150.0, 150.0, 150.0],
        detail: format!("{:?}", trace),
    });
    let spreading = engine.snapshot().crises.first().map(|c| c.spreading).unwrap_or(false);
    results.push(TestResult {
        name: "crisis_spreading_flag".into(),
        passed: spreading,
        detail: "spreading above 100".into(),
    });

    // Contained floods resolve and free their crew
    for crew_count in [3, 5] {
        let mut engine = BattleEngine::new(scripted(base));
        let flood = engine.spawn_crisis(CrisisKind::Flooding, Vec2::new(640.0, 590.0));
        let crew: Vec<_> = (0..crew_count)
            .map(|_| engine.spawn_crew(Vec2::new(640.0, 590.0)))
            .collect();
        for &c in &crew {
            engine.assign_crew(c, AssignTarget::Crisis(flood));
        }
        let mut ticks = 0;
        while engine.world.contains(flood) && ticks < 100 {
            engine.update(1000.0);
            ticks += 1;
        }
        let freed = crew.iter().all(|&c| {
            engine
                .world
                .get::<&CrewMember>(c)
                .map(|m| m.assignment.is_none())
                .unwrap_or(false)
        });
        results.push(TestResult {
            name: format!("crisis_flood_contained_by_{}", crew_count),
            passed: !engine.world.contains(flood) && freed,
            detail: format!("resolved after {} ticks", ticks),
        });
    }

    results
}

// ── 5. Outcomes ─────────────────────────────────────────────────────────

fn validate_outcomes(base: &BattleConfig) -> Vec<TestResult> {
    println!("--- Outcomes ---");
    let mut results = Vec::new();

    let mut engine = BattleEngine::new(scripted(base));
    engine.spawn_crew(Vec2::new(600.0, 300.0));
    engine.economy_mut().enemy_health = 0.0;
    engine.economy_mut().ship_health = 0.0;
    engine.update(FRAME_MS);
    results.push(TestResult {
        name: "outcome_victory_precedence".into(),
        passed: engine.outcome() == Some(Outcome::Victory),
        detail: format!("{:?}", engine.outcome()),
    });

    let mut engine = BattleEngine::new(scripted(base));
    engine.update(FRAME_MS);
    results.push(TestResult {
        name: "outcome_crew_depleted".into(),
        passed: engine.outcome() == Some(Outcome::Defeat(DefeatReason::CrewDepleted)),
        detail: format!("{:?}", engine.outcome()),
    });

    let mut engine = BattleEngine::new(scripted(base));
    engine.spawn_crew(Vec2::new(600.0, 300.0));
    while !engine.is_over() && engine.now_ms() < 600_000.0 {
        engine.update(1000.0);
    }
    let health_at_end = engine.economy().ship_health;
    engine.update(60_000.0);
    results.push(TestResult {
        name: "outcome_freezes_economy".into(),
        passed: engine.outcome() == Some(Outcome::Defeat(DefeatReason::ShipDestroyed))
            && engine.economy().ship_health == health_at_end,
        detail: format!("sunk at {:.0} ms", engine.now_ms() - 60_000.0),
    });

    results
}

// ── 6. Battle sweep ─────────────────────────────────────────────────────

fn validate_battle_sweep(base: &BattleConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Battle Sweep ({} seeds) ---", SWEEP_SEEDS);
    let mut results = Vec::new();
    let mut victories = 0;
    let mut powder_ok = true;
    let mut decided = true;
    let mut deterministic = true;

    for seed in 1..=SWEEP_SEEDS {
        let mut config = base.clone();
        config.seed = seed;

        let mut engine = BattleEngine::standard(config.clone());
        man_by_plan(&mut engine);
        while !engine.is_over() && engine.now_ms() < 600_000.0 {
            fight_crises(&mut engine);
            engine.update(FRAME_MS);
            let powder = engine.economy().powder();
            powder_ok &= powder >= 0.0 && powder <= engine.economy().max_powder();
        }
        decided &= engine.is_over();
        if engine.outcome() == Some(Outcome::Victory) {
            victories += 1;
        }

        let mut replay = BattleEngine::standard(config);
        man_by_plan(&mut replay);
        run_to_outcome(&mut replay);
        deterministic &= replay.outcome() == engine.outcome() && replay.now_ms() == engine.now_ms();

        if verbose {
            let snapshot = engine.snapshot();
            println!(
                "  seed {:>2}: {:?} at {:>6.0} ms, hull {:>5.1}%, enemy {:>5.1}%, {} crew",
                seed,
                engine.outcome(),
                snapshot.elapsed_ms,
                snapshot.ship_health_percent,
                snapshot.enemy_health_percent,
                snapshot.crew_count
            );
        }
    }

    results.push(TestResult {
        name: "sweep_all_decided".into(),
        passed: decided,
        detail: format!("{} victories of {}", victories, SWEEP_SEEDS),
    });
    results.push(TestResult {
        name: "sweep_powder_bounds".into(),
        passed: powder_ok,
        detail: "powder stayed within [0, max]".into(),
    });
    results.push(TestResult {
        name: "sweep_deterministic".into(),
        passed: deterministic,
        detail: "replays with the same seed match".into(),
    });

    results
}
