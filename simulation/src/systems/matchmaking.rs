//! Matchmaking System
//!
//! Pairs unpaired organisms with unrelated partners from their own generation.

use hecs::Entity;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::events::{EventLog, EventType};
use crate::registry::Registry;

/// Outcome of one matchmaking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchmakingReport {
    pub pairs_formed: u32,
    /// Seekers that hit the attempt cap without finding a partner.
    pub exhausted_searches: u32,
    /// Candidates drawn across all seekers, including rejected ones.
    pub draws: u32,
}

/// Greedy randomized pairing over every generation.
///
/// Generations are visited in order and seekers in active pool order. Each
/// seeker draws candidates uniformly from its generation's available pool,
/// giving up after `attempts_per_member` draws per member of the generation's
/// active pool.
/// Pairs form immediately, so later seekers see the shrunken pool.
pub fn matchmaking_system<R: Rng + ?Sized>(
    registry: &mut Registry,
    rng: &mut R,
    attempts_per_member: usize,
    current_generation: u32,
    log: &mut EventLog,
) -> MatchmakingReport {
    let mut report = MatchmakingReport::default();
    let generations: Vec<u32> = registry.generations().collect();

    for generation in generations {
        let seekers = registry.active_in(generation).to_vec();
        let max_attempts = seekers.len() * attempts_per_member;

        for seeker in seekers {
            if registry.partner(seeker).is_some() {
                continue;
            }
            if registry.available_in(generation).len() < 2 {
                break;
            }

            let (found, draws) = find_partner(
                registry,
                rng,
                seeker,
                generation,
                max_attempts,
                current_generation,
                log,
            );
            report.draws += draws;
            match found {
                Some(partner) => {
                    let pair = registry.form_pair(seeker, partner);
                    report.pairs_formed += 1;
                    if let (Some(a), Some(b)) = (registry.id_of(seeker), registry.id_of(partner)) {
                        debug!(first = a.0, second = b.0, pair = pair.0, "partnered");
                        log.record(EventType::Pairing, current_generation, a, Some(b));
                    }
                }
                None => {
                    report.exhausted_searches += 1;
                    if let Some(id) = registry.id_of(seeker) {
                        warn!(organism = id.0, generation, "no partner found after {max_attempts} draws");
                        log.record(EventType::SearchExhausted, current_generation, id, None);
                    }
                }
            }
        }
    }

    report
}

/// Draw candidates until one is acceptable or the attempts run out.
///
/// Returns the partner, if any, and how many candidates were drawn.
fn find_partner<R: Rng + ?Sized>(
    registry: &Registry,
    rng: &mut R,
    seeker: Entity,
    generation: u32,
    max_attempts: usize,
    current_generation: u32,
    log: &mut EventLog,
) -> (Option<Entity>, u32) {
    let mut draws = 0;
    for _ in 0..max_attempts {
        let Some(&candidate) = registry.available_in(generation).choose(rng) else {
            break;
        };
        draws += 1;

        if candidate == seeker || registry.partner(candidate).is_some() {
            continue;
        }
        if let Some(ancestor) = registry.common_ancestor(seeker, candidate) {
            if let (Some(a), Some(b)) = (registry.id_of(seeker), registry.id_of(candidate)) {
                debug!(seeker = a.0, candidate = b.0, ancestor = ancestor.0, "family history match");
                log.record(EventType::RelatedRejected, current_generation, a, Some(b));
            }
            continue;
        }
        return (Some(candidate), draws);
    }
    (None, draws)
}
