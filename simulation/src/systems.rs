//! Tick systems - each runs once per generation, in the order
//! decay, death, matchmaking, birth.

pub mod birth;
pub mod death;
pub mod decay;
pub mod matchmaking;

pub use birth::{birth_system, seed_founders};
pub use death::{death_system, process_death};
pub use decay::decay_system;
pub use matchmaking::matchmaking_system;
