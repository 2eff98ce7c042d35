//! Birth System
//!
//! Creates founders at startup and offspring for every recorded pair each tick.

use hecs::Entity;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use tracing::debug;

use crate::components::{Kind, Parents};
use crate::config::{HealthPolicy, KindPolicy, SimConfig};
use crate::events::{EventLog, EventType};
use crate::registry::Registry;

/// Starting vitality for a new organism.
pub fn starting_vitality<R: Rng + ?Sized>(policy: HealthPolicy, rng: &mut R) -> i32 {
    match policy {
        HealthPolicy::Fixed { value } => value,
        HealthPolicy::Random { min, max } => Uniform::new(min, max).sample(rng),
    }
}

/// Kind of the founder at `index` out of `founder_count`.
pub fn founder_kind<R: Rng + ?Sized>(
    policy: KindPolicy,
    index: usize,
    founder_count: usize,
    rng: &mut R,
) -> Kind {
    match policy {
        KindPolicy::FixedSplit => {
            if index < founder_count / 2 {
                Kind::B
            } else {
                Kind::A
            }
        }
        KindPolicy::Random => {
            if rng.gen::<bool>() {
                Kind::A
            } else {
                Kind::B
            }
        }
    }
}

/// Populate generation 0.
pub fn seed_founders<R: Rng + ?Sized>(
    registry: &mut Registry,
    config: &SimConfig,
    rng: &mut R,
    log: &mut EventLog,
) -> Vec<Entity> {
    (0..config.founder_count)
        .map(|index| {
            let vitality = starting_vitality(config.health_policy, rng);
            let kind = founder_kind(config.kind_policy, index, config.founder_count, rng);
            let entity = registry.create_founder(kind, vitality);
            if let Some(id) = registry.id_of(entity) {
                log.record(EventType::Founded, 0, id, None);
            }
            entity
        })
        .collect()
}

/// Produce `offspring_per_pair` children for every recorded pair.
///
/// Pairs are left in place. Returns the number of births.
pub fn birth_system<R: Rng + ?Sized>(
    registry: &mut Registry,
    config: &SimConfig,
    generation: u32,
    rng: &mut R,
    log: &mut EventLog,
) -> u32 {
    let pairs: Vec<_> = registry.pairs().map(|(_, pair)| pair).collect();
    let mut births = 0;

    for pair in pairs {
        for _ in 0..config.offspring_per_pair {
            let vitality = starting_vitality(config.health_policy, rng);
            let child = registry.create_offspring(pair.first, pair.second, generation, vitality);
            let Some(child) = child else {
                continue;
            };
            births += 1;

            if let (Some(id), Some(first), Some(second)) = (
                registry.id_of(child),
                registry.id_of(pair.first),
                registry.id_of(pair.second),
            ) {
                debug!(child = id.0, first = first.0, second = second.0, "offspring born");
                log.record_birth(generation, id, Parents { first, second });
            }
        }
    }

    births
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn test_fixed_split_kinds() {
        let mut rng = create_rng(0);
        let kinds: Vec<Kind> = (0..5)
            .map(|i| founder_kind(KindPolicy::FixedSplit, i, 5, &mut rng))
            .collect();
        assert_eq!(kinds, vec![Kind::B, Kind::B, Kind::A, Kind::A, Kind::A]);
    }

    #[test]
    fn test_random_kinds_are_primary() {
        let mut rng = create_rng(5);
        let kinds: Vec<Kind> = (0..200)
            .map(|i| founder_kind(KindPolicy::Random, i, 200, &mut rng))
            .collect();
        assert!(kinds.iter().all(|k| matches!(k, Kind::A | Kind::B)));
        assert!(kinds.contains(&Kind::A));
        assert!(kinds.contains(&Kind::B));
    }

    #[test]
    fn test_random_vitality_in_range() {
        let mut rng = create_rng(6);
        let policy = HealthPolicy::Random { min: 2, max: 5 };
        for _ in 0..500 {
            let v = starting_vitality(policy, &mut rng);
            assert!((2..5).contains(&v));
        }
        assert_eq!(starting_vitality(HealthPolicy::Fixed { value: 7 }, &mut rng), 7);
    }

    #[test]
    fn test_each_pair_reproduces() {
        let config = SimConfig {
            offspring_per_pair: 2,
            ..SimConfig::default()
        };
        let mut registry = Registry::new();
        let mut log = EventLog::with_capacity(16);
        let mut rng = create_rng(7);
        let a = registry.create_founder(Kind::A, 3);
        let b = registry.create_founder(Kind::B, 3);
        let c = registry.create_founder(Kind::C, 3);
        let d = registry.create_founder(Kind::B, 3);
        registry.form_pair(a, b);
        registry.form_pair(c, d);
        registry.open_generation(1);

        let births = birth_system(&mut registry, &config, 1, &mut rng, &mut log);

        assert_eq!(births, 4);
        assert_eq!(registry.pair_count(), 2);
        let kinds: Vec<Kind> = registry
            .active_in(1)
            .iter()
            .filter_map(|e| registry.kind(*e))
            .collect();
        assert_eq!(kinds, vec![Kind::C, Kind::C, Kind::B, Kind::B]);
        assert_eq!(log.count_of(EventType::Birth), 4);

        let ids = |x, y| Parents {
            first: registry.id_of(x).unwrap(),
            second: registry.id_of(y).unwrap(),
        };
        let recorded: Vec<Option<Parents>> = log.iter().map(|e| e.parents).collect();
        assert_eq!(
            recorded,
            vec![Some(ids(a, b)), Some(ids(a, b)), Some(ids(c, d)), Some(ids(c, d))]
        );
    }

    #[test]
    fn test_seed_founders() {
        let config = SimConfig {
            founder_count: 6,
            ..SimConfig::default()
        };
        let mut registry = Registry::new();
        let mut log = EventLog::with_capacity(16);
        let founders = seed_founders(&mut registry, &config, &mut create_rng(8), &mut log);

        assert_eq!(founders.len(), 6);
        let counters = registry.counters();
        assert_eq!(counters.created, 6);
        assert_eq!(counters.by_kind.a, 3);
        assert_eq!(counters.by_kind.b, 3);
        assert_eq!(log.count_of(EventType::Founded), 6);
    }
}
