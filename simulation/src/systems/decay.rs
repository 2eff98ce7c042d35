//! Decay System - every living organism loses one point of vitality per tick

use hecs::Entity;
use crate::components::Vitality;
use crate::registry::Registry;

/// Decrement vitality across every generation's active pool.
///
/// Returns the organisms now at or below zero, in generation then pool
/// order. Nobody is removed here; that is the death system's job.
pub fn decay_system(registry: &mut Registry) -> Vec<Entity> {
    let Registry { world, pools, .. } = registry;
    let mut spent = Vec::new();

    for generation in pools.values() {
        for &entity in &generation.active {
            if let Ok(mut vitality) = world.get::<&mut Vitality>(entity) {
                if vitality.decay() {
                    spent.push(entity);
                }
            }
        }
    }

    spent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Kind;

    #[test]
    fn test_decay_marks_spent_without_removing() {
        let mut registry = Registry::new();
        let weak = registry.create_founder(Kind::A, 1);
        let strong = registry.create_founder(Kind::B, 3);

        let spent = decay_system(&mut registry);
        assert_eq!(spent, vec![weak]);
        assert_eq!(registry.vitality(weak), Some(0));
        assert_eq!(registry.vitality(strong), Some(2));
        assert_eq!(registry.active_in(0).len(), 2);
        assert_eq!(registry.counters().active, 2);
    }

    #[test]
    fn test_decay_covers_every_generation() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 2);
        let b = registry.create_founder(Kind::B, 2);
        registry.open_generation(1);
        let child = registry.create_offspring(a, b, 1, 1).unwrap();

        let spent = decay_system(&mut registry);
        assert_eq!(spent, vec![child]);
        assert_eq!(registry.vitality(a), Some(1));
    }
}
