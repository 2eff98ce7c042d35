//! Simulation World - main orchestrator
//!
//! Owns the registry, RNG and event log, and runs one generation per
//! `advance_generation` call: decay, deaths, matchmaking, new pools, births.

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::components::{OrganismId, Pair, PairId};
use crate::config::{ConfigError, SimConfig};
use crate::events::EventLog;
use crate::registry::{Counters, OrganismSnapshot, Registry};
use crate::rng::{create_rng, SimRng};
use crate::systems;

/// Where the scheduler is within a tick.
///
/// A tick holds `&mut SimulationWorld` from start to finish, so callers only
/// ever observe `Idle`. The other phases drive the step order and show up in
/// the `generation` span's debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Decaying,
    Pairing,
    Reproducing,
}

/// Summary of one generation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TickResult {
    pub generation: u32,
    pub deaths: u32,
    pub widowed: u32,
    pub pairs_formed: u32,
    pub exhausted_searches: u32,
    pub births: u32,
    /// Living organisms once the tick is done.
    pub active: u64,
}

pub struct SimulationWorld {
    registry: Registry,
    config: SimConfig,
    rng: SimRng,
    pub event_log: EventLog,
    generation: u32,
    phase: Phase,
}

impl SimulationWorld {
    /// Build a world and seed its founders.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = create_rng(config.seed);
        let mut event_log = EventLog::with_capacity(config.event_log_capacity);
        let mut registry = Registry::new();
        systems::seed_founders(&mut registry, &config, &mut rng, &mut event_log);

        info!(
            founders = config.founder_count,
            seed = config.seed,
            "simulation world created"
        );

        Ok(Self {
            registry,
            config,
            rng,
            event_log,
            generation: 0,
            phase: Phase::Idle,
        })
    }

    /// Build a world around an already populated registry.
    ///
    /// No founders are seeded. The generation counter resumes from the
    /// newest generation in the registry.
    pub fn with_registry(config: SimConfig, registry: Registry) -> Result<Self, ConfigError> {
        config.validate()?;
        let generation = registry.generations().max().unwrap_or(0);
        Ok(Self {
            rng: create_rng(config.seed),
            event_log: EventLog::with_capacity(config.event_log_capacity),
            registry,
            config,
            generation,
            phase: Phase::Idle,
        })
    }

    /// Run one full generation step.
    pub fn advance_generation(&mut self) -> TickResult {
        self.generation += 1;
        let generation = self.generation;
        let _span = info_span!("generation", generation).entered();

        self.enter_phase(Phase::Decaying);
        let spent = systems::decay_system(&mut self.registry);
        let deaths =
            systems::death_system(&mut self.registry, &spent, generation, &mut self.event_log);

        self.enter_phase(Phase::Pairing);
        let matches = systems::matchmaking_system(
            &mut self.registry,
            &mut self.rng,
            self.config.search_attempts_per_member,
            generation,
            &mut self.event_log,
        );

        self.enter_phase(Phase::Reproducing);
        self.registry.open_generation(generation);
        let births = systems::birth_system(
            &mut self.registry,
            &self.config,
            generation,
            &mut self.rng,
            &mut self.event_log,
        );

        self.enter_phase(Phase::Idle);
        let result = TickResult {
            generation,
            deaths: deaths.deaths,
            widowed: deaths.widowed,
            pairs_formed: matches.pairs_formed,
            exhausted_searches: matches.exhausted_searches,
            births,
            active: self.registry.counters().active,
        };
        info!(
            deaths = result.deaths,
            pairs = result.pairs_formed,
            births = result.births,
            active = result.active,
            "generation complete"
        );
        result
    }

    fn enter_phase(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    pub fn counters(&self) -> Counters {
        self.registry.counters()
    }

    pub fn current_generation(&self) -> u32 {
        self.generation
    }

    /// Always `Idle` outside `advance_generation`.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn organism(&self, id: OrganismId) -> Option<OrganismSnapshot> {
        self.registry
            .entity_of(id)
            .and_then(|e| self.registry.snapshot(e))
    }

    pub fn organisms(&self) -> Vec<OrganismSnapshot> {
        self.registry.snapshots()
    }

    /// Current pairs as organism ids, ordered by pair id.
    pub fn pairs(&self) -> Vec<(PairId, OrganismId, OrganismId)> {
        self.registry
            .pairs()
            .filter_map(|(id, Pair { first, second })| {
                Some((id, self.registry.id_of(first)?, self.registry.id_of(second)?))
            })
            .collect()
    }

    pub fn active_in(&self, generation: u32) -> Vec<OrganismId> {
        self.ids(self.registry.active_in(generation))
    }

    pub fn available_in(&self, generation: u32) -> Vec<OrganismId> {
        self.ids(self.registry.available_in(generation))
    }

    fn ids(&self, entities: &[hecs::Entity]) -> Vec<OrganismId> {
        entities
            .iter()
            .filter_map(|e| self.registry.id_of(*e))
            .collect()
    }
}

impl Default for SimulationWorld {
    fn default() -> Self {
        let config = SimConfig::default();
        Self {
            rng: create_rng(config.seed),
            event_log: EventLog::with_capacity(config.event_log_capacity),
            registry: Registry::new(),
            config,
            generation: 0,
            phase: Phase::Idle,
        }
    }
}
