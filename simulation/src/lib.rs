//! Broodline Simulation Engine
//!
//! Generational breeding simulation: organisms lose vitality each
//! generation, pair with unrelated partners of their own generation, and
//! produce offspring whose kind follows a fixed cross table.

pub mod components;
pub mod config;
pub mod events;
pub mod generation_runner;
pub mod inheritance;
pub mod registry;
pub mod rng;
pub mod systems;
pub mod world;

pub use components::*;
pub use config::{ConfigError, HealthPolicy, KindPolicy, SimConfig};
pub use events::{Event, EventLog, EventType};
pub use generation_runner::{GenerationRunner, RunnerError};
pub use inheritance::inherit_kind;
pub use registry::{Counters, KindCounts, OrganismSnapshot, Registry};
pub use world::{Phase, SimulationWorld, TickResult};
