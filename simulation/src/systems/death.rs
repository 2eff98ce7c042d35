//! Death System
//!
//! Removes spent organisms and frees their partners.

use hecs::Entity;
use tracing::debug;

use crate::events::{EventLog, EventType};
use crate::registry::Registry;

/// Outcome of the death system for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeathReport {
    pub deaths: u32,
    /// Partners left unpaired by a death.
    pub widowed: u32,
}

/// Kill one organism.
///
/// A surviving partner is unpaired and returned to its generation's
/// available pool before the organism itself leaves the active pool.
/// Returns the widowed partner, if any.
pub fn process_death(
    registry: &mut Registry,
    entity: Entity,
    generation: u32,
    log: &mut EventLog,
) -> Option<Entity> {
    let id = registry.id_of(entity)?;

    let widowed = registry.release_partner(entity);
    match widowed.and_then(|p| registry.id_of(p)) {
        Some(partner_id) => {
            debug!(organism = id.0, partner = partner_id.0, "died, leaving partner unpaired");
            log.record(EventType::Widowed, generation, id, Some(partner_id));
        }
        None => {
            debug!(organism = id.0, "died alone");
            log.record(EventType::Death, generation, id, None);
        }
    }

    registry.remove_from_active(entity, generation);
    widowed
}

/// Process deaths for every spent organism, one at a time in order.
pub fn death_system(
    registry: &mut Registry,
    spent: &[Entity],
    generation: u32,
    log: &mut EventLog,
) -> DeathReport {
    let mut report = DeathReport::default();

    for &entity in spent {
        if !registry.is_alive(entity) {
            continue;
        }
        if process_death(registry, entity, generation, log).is_some() {
            report.widowed += 1;
        }
        report.deaths += 1;
    }

    report
}
