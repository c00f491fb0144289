//! Battle engine - the tick driver and command boundary for one battle

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::components::*;
use crate::config::BattleConfig;
use crate::error::AssignError;
use crate::generation::{generate_crew, generate_stations, spawn_crew_member};
use crate::snapshot::{BattleSnapshot, CrewView, CrisisView, StationView};
use crate::systems::*;

/// Main battle engine
pub struct BattleEngine {
    /// ECS world holding crew, stations and crises
    pub world: World,
    /// Simulated milliseconds since the battle was created
    now_ms: f64,
    config: BattleConfig,
    /// Stations in creation order, which is also resolution order
    stations: Vec<Entity>,
    /// Live crises in spawn order
    crises: Vec<Entity>,
    /// Living crew in spawn order
    roster: Vec<Entity>,
    economy: ShipEconomy,
    rng: StdRng,
    last_enemy_fire_ms: f64,
    started: bool,
    outcome: Option<Outcome>,
    events: EventQueue,
}

impl BattleEngine {
    /// Create an engine with no stations or crew
    pub fn new(config: BattleConfig) -> Self {
        Self {
            world: World::new(),
            now_ms: 0.0,
            rng: StdRng::seed_from_u64(config.seed),
            economy: ShipEconomy::new(&config),
            stations: Vec::new(),
            crises: Vec::new(),
            roster: Vec::new(),
            last_enemy_fire_ms: 0.0,
            started: false,
            outcome: None,
            events: EventQueue::new(),
            config,
        }
    }

    /// Create an engine and generate the standard ship and crew
    pub fn standard(config: BattleConfig) -> Self {
        let mut engine = Self::new(config);
        engine.generate();
        engine
    }

    /// Spawn the standard station layout and the starting crew
    pub fn generate(&mut self) {
        let stations = generate_stations(&mut self.world);
        self.stations.extend(stations);

        let crew = generate_crew(
            &mut self.world,
            self.config.starting_crew,
            &self.config.crew,
            &mut self.rng,
        );
        self.roster.extend(crew);

        log::info!(
            "Generated battle: {} stations, {} crew (seed {})",
            self.stations.len(),
            self.roster.len(),
            self.config.seed
        );
    }

    pub fn spawn_station(&mut self, kind: StationKind, footprint: Rect) -> Entity {
        self.spawn_station_with_spec(kind, kind.spec(), footprint)
    }

    /// Spawn a station with custom thresholds or rates
    pub fn spawn_station_with_spec(
        &mut self,
        kind: StationKind,
        spec: StationSpec,
        footprint: Rect,
    ) -> Entity {
        let entity = self
            .world
            .spawn((Station::with_spec(kind, spec, footprint),));
        self.stations.push(entity);
        entity
    }

    pub fn spawn_crew(&mut self, position: Vec2) -> Entity {
        let entity = spawn_crew_member(&mut self.world, position, &self.config.crew);
        self.roster.push(entity);
        entity
    }

    pub fn spawn_crisis(&mut self, kind: CrisisKind, position: Vec2) -> Entity {
        spawn_crisis(
            &mut self.world,
            &mut self.crises,
            kind,
            position,
            &mut self.events,
        )
    }

    /// Spawn a crisis and override its starting intensity.
    ///
    /// A crisis never starts resolved: intensities at or below zero (and NaN)
    /// are raised to the smallest live intensity.
    pub fn spawn_crisis_with_intensity(
        &mut self,
        kind: CrisisKind,
        position: Vec2,
        intensity: f32,
    ) -> Entity {
        let entity = self.spawn_crisis(kind, position);
        if let Ok(mut crisis) = self.world.get::<&mut Crisis>(entity) {
            crisis.intensity = intensity.max(MIN_SPAWN_INTENSITY).min(MAX_INTENSITY);
        }
        entity
    }

    /// Advance the battle by `delta_ms` of simulated time.
    ///
    /// Order within a tick: crew motion and hazard damage, crises, stations,
    /// enemy fire, terminal check. Once decided, only crew motion continues.
    pub fn update(&mut self, delta_ms: f64) {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            log::warn!("Ignoring invalid tick delta {}", delta_ms);
            return;
        }
        self.now_ms += delta_ms;

        // 1. Crew motion and health
        movement_system(&mut self.world, delta_ms);

        if self.outcome.is_some() {
            return;
        }

        if self.config.crisis_damage {
            let dead = crisis_hazard_system(&mut self.world, &self.roster, &self.crises, delta_ms);
            if !dead.is_empty() {
                bury_crew(
                    &mut self.world,
                    &mut self.roster,
                    &dead,
                    self.config.crew.move_speed,
                    &mut self.events,
                );
            }
        }

        // 2. Crises
        crisis_system(&mut self.world, &mut self.crises, delta_ms, &mut self.events);

        if !self.started {
            if self.now_ms < self.config.battle_start_delay_ms {
                return;
            }
            self.started = true;
            log::info!("Battle started at {:.0} ms", self.now_ms);
            self.events.push(BattleEvent::BattleStarted);
        }

        // 3. Stations
        station_system(
            &mut self.world,
            &self.stations,
            &mut self.economy,
            &self.config.powder,
            self.now_ms,
            &mut self.events,
        );

        // 4. Enemy fire
        let volley = enemy_fire_system(
            &mut self.economy,
            &self.config.enemy,
            &mut self.last_enemy_fire_ms,
            self.now_ms,
            &mut self.rng,
            &mut self.events,
        );
        if let Volley::Fired {
            crisis: Some((kind, position)),
        } = volley
        {
            self.spawn_crisis(kind, position);
        }

        // 5. Terminal check
        if let Some(outcome) = evaluate_outcome(&self.economy, self.roster.len()) {
            self.finish(outcome);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        match outcome {
            Outcome::Victory => {
                log::info!("Victory at {:.0} ms", self.now_ms);
                self.events.push(BattleEvent::Victory);
            }
            Outcome::Defeat(reason) => {
                log::info!("Defeat ({}) at {:.0} ms", reason, self.now_ms);
                self.events.push(BattleEvent::Defeat { reason });
            }
        }
    }

    /// Assign a crew member to a station or crisis
    pub fn try_assign_crew(&mut self, crew: Entity, target: AssignTarget) -> Result<(), AssignError> {
        if self.outcome.is_some() {
            return Err(AssignError::BattleOver);
        }
        assign_crew(&mut self.world, crew, target, self.config.crew.move_speed)
    }

    /// Boolean form of [`Self::try_assign_crew`]; rejections change nothing
    pub fn assign_crew(&mut self, crew: Entity, target: AssignTarget) -> bool {
        match self.try_assign_crew(crew, target) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Assignment of {:?} rejected: {}", crew, e);
                false
            }
        }
    }

    /// Release a crew member from whatever they are assigned to.
    /// Returns false if they were not assigned.
    pub fn unassign_crew(&mut self, crew: Entity) -> bool {
        unassign_crew(&mut self.world, crew, self.config.crew.move_speed)
    }

    /// Teleport a crew member and cancel any walk in progress
    pub fn place_crew(&mut self, crew: Entity, point: Vec2) -> bool {
        match self.world.get::<&mut Position>(crew) {
            Ok(mut position) => position.0 = point,
            Err(_) => return false,
        }
        halt(&mut self.world, crew);
        true
    }

    /// What a crew member dropped at `point` would be assigned to.
    ///
    /// Stations win over crises; a full station is skipped.
    pub fn drop_target_at(&self, point: Vec2) -> Option<AssignTarget> {
        self.drop_target_for(point, None)
    }

    /// Like [`Self::drop_target_at`], but a full station still takes back
    /// `crew` if they are already one of its crew.
    fn drop_target_for(&self, point: Vec2, crew: Option<Entity>) -> Option<AssignTarget> {
        let station = self.stations.iter().copied().find(|&e| {
            self.world
                .get::<&Station>(e)
                .map(|s| {
                    let returning = crew.map(|c| s.contains_crew(c)).unwrap_or(false);
                    s.footprint.contains(&point) && (returning || s.can_accept_crew())
                })
                .unwrap_or(false)
        });
        if let Some(station) = station {
            return Some(AssignTarget::Station(station));
        }

        self.crises
            .iter()
            .copied()
            .find(|&e| {
                self.world
                    .get::<&Crisis>(e)
                    .map(|c| c.position.distance(&point) <= CONTACT_RADIUS)
                    .unwrap_or(false)
            })
            .map(AssignTarget::Crisis)
    }

    /// Drop a crew member at `point` and assign them to whatever is there.
    ///
    /// A drop on open deck just unassigns. Dropping a crew member back on
    /// their own station keeps them there and walks them back to their slot.
    pub fn drop_crew(&mut self, crew: Entity, point: Vec2) -> bool {
        if !self.place_crew(crew, point) {
            return false;
        }
        match self.drop_target_for(point, Some(crew)) {
            Some(AssignTarget::Station(station)) if self.is_crew_of(crew, station) => {
                if self.outcome.is_some() {
                    return false;
                }
                layout_station(&mut self.world, station, self.config.crew.move_speed);
                true
            }
            Some(target) => self.assign_crew(crew, target),
            None => {
                self.unassign_crew(crew);
                false
            }
        }
    }

    fn is_crew_of(&self, crew: Entity, station: Entity) -> bool {
        self.world
            .get::<&Station>(station)
            .map(|s| s.contains_crew(crew))
            .unwrap_or(false)
    }

    /// Read-only view for UI collaborators
    pub fn snapshot(&self) -> BattleSnapshot {
        let stations = self
            .stations
            .iter()
            .filter_map(|&e| {
                self.world.get::<&Station>(e).ok().map(|s| StationView {
                    id: entity_id(e),
                    kind: s.kind,
                    assigned: s.assigned_count(),
                    required: s.spec.crew_required,
                    max: s.spec.crew_max,
                    active: s.active,
                    effectiveness: s.effectiveness(),
                })
            })
            .collect();

        let crises = self
            .crises
            .iter()
            .filter_map(|&e| {
                self.world.get::<&Crisis>(e).ok().map(|c| CrisisView {
                    id: entity_id(e),
                    kind: c.kind,
                    intensity_percent: c.intensity,
                    spreading: c.is_spreading(),
                    spread_radius: c.spread_radius(),
                    assigned: c.assigned_count(),
                })
            })
            .collect();

        let crew = self
            .roster
            .iter()
            .filter_map(|&e| {
                let member = self.world.get::<&CrewMember>(e).ok()?;
                let position = self.world.get::<&Position>(e).ok()?;
                Some(CrewView {
                    id: entity_id(e),
                    health: member.health,
                    position: position.0,
                    assignment: member.assignment.map(AssignmentView::from),
                })
            })
            .collect();

        BattleSnapshot {
            elapsed_ms: self.now_ms,
            started: self.started,
            outcome: self.outcome,
            ship_health_percent: self.economy.ship_health_percent(),
            enemy_health_percent: self.economy.enemy_health_percent(),
            powder_percent: self.economy.powder_percent(),
            crew_count: self.roster.len(),
            stations,
            crises,
            crew,
        }
    }

    /// Take every notification queued since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        self.events.drain()
    }

    pub fn economy(&self) -> &ShipEconomy {
        &self.economy
    }

    pub fn economy_mut(&mut self) -> &mut ShipEconomy {
        &mut self.economy
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn stations(&self) -> &[Entity] {
        &self.stations
    }

    pub fn crises(&self) -> &[Entity] {
        &self.crises
    }

    pub fn crew(&self) -> &[Entity] {
        &self.roster
    }

    pub fn crew_count(&self) -> usize {
        self.roster.len()
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }
}

impl Default for BattleEngine {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

/// Lowest intensity a crisis can be spawned with
const MIN_SPAWN_INTENSITY: f32 = 1.0;

/// Stable numeric id for an entity, as exposed to collaborators
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}
