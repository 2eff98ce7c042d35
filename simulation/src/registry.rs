//! Organism Registry
//!
//! Owns every organism ever created, the per-generation active and available
//! pools, the pair table and the population counters. All mutation of those
//! goes through here so the counters always match the pools.

use hecs::{Entity, World};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::error;

use crate::components::*;
use crate::inheritance::inherit_kind;

/// Pools for the organisms created in one generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationPools {
    /// Alive, paired or not.
    pub active: Vec<Entity>,
    /// Alive and unpaired.
    pub available: Vec<Entity>,
}

/// Active organisms per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub unassigned: u64,
}

impl KindCounts {
    pub fn get(&self, kind: Kind) -> u64 {
        match kind {
            Kind::A => self.a,
            Kind::B => self.b,
            Kind::C => self.c,
            Kind::Unassigned => self.unassigned,
        }
    }

    fn slot_mut(&mut self, kind: Kind) -> &mut u64 {
        match kind {
            Kind::A => &mut self.a,
            Kind::B => &mut self.b,
            Kind::C => &mut self.c,
            Kind::Unassigned => &mut self.unassigned,
        }
    }

    pub fn total(&self) -> u64 {
        self.a + self.b + self.c + self.unassigned
    }
}

/// Population counters read by the host for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    pub created: u64,
    pub active: u64,
    pub dead: u64,
    pub by_kind: KindCounts,
}

/// Read-only copy of one organism's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganismSnapshot {
    pub id: OrganismId,
    pub name: String,
    pub generation: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<Parents>,
    pub kind: Kind,
    pub vitality: i32,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub died_in: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<OrganismId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairId>,
    pub lineage: Vec<OrganismId>,
}

fn decrement(counter: &mut u64, name: &'static str) {
    debug_assert!(*counter > 0, "{name} counter would go negative");
    match counter.checked_sub(1) {
        Some(value) => *counter = value,
        None => error!(counter = name, "population counter underflow"),
    }
}

fn remove_entity(pool: &mut Vec<Entity>, entity: Entity) -> bool {
    match pool.iter().position(|e| *e == entity) {
        Some(pos) => {
            pool.remove(pos);
            true
        }
        None => false,
    }
}

pub struct Registry {
    pub(crate) world: World,
    pub(crate) pools: BTreeMap<u32, GenerationPools>,
    pairs: BTreeMap<PairId, Pair>,
    counters: Counters,
    by_id: HashMap<OrganismId, Entity>,
    next_organism_id: u64,
    next_pair_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(0, GenerationPools::default());
        Self {
            world: World::new(),
            pools,
            pairs: BTreeMap::new(),
            counters: Counters::default(),
            by_id: HashMap::new(),
            next_organism_id: 1,
            next_pair_id: 1,
        }
    }

    // ------------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------------

    /// Create a generation 0 organism with no parents.
    pub fn create_founder(&mut self, kind: Kind, vitality: i32) -> Entity {
        self.spawn(0, kind, vitality, Lineage::founder)
    }

    /// Create a child of two organisms in `generation`.
    ///
    /// Returns `None` if either parent is not in the registry.
    pub fn create_offspring(
        &mut self,
        first: Entity,
        second: Entity,
        generation: u32,
        vitality: i32,
    ) -> Option<Entity> {
        let (first_kind, first_lineage) = self.heritage(first)?;
        let (second_kind, second_lineage) = self.heritage(second)?;
        let parents = Parents {
            first: self.id_of(first)?,
            second: self.id_of(second)?,
        };
        let kind = inherit_kind(first_kind, second_kind);
        let child = self.spawn(generation, kind, vitality, |id| {
            Lineage::descend(&first_lineage, &second_lineage, id)
        });
        let _ = self.world.insert_one(child, parents);
        Some(child)
    }

    fn heritage(&self, entity: Entity) -> Option<(Kind, Lineage)> {
        let kind = *self.world.get::<&Kind>(entity).ok()?;
        let lineage = (*self.world.get::<&Lineage>(entity).ok()?).clone();
        Some((kind, lineage))
    }

    fn spawn(
        &mut self,
        generation: u32,
        kind: Kind,
        vitality: i32,
        lineage: impl FnOnce(OrganismId) -> Lineage,
    ) -> Entity {
        let id = OrganismId(self.next_organism_id);
        self.next_organism_id += 1;

        let entity = self.world.spawn((
            Organism {
                id,
                name: format!("Organism_{}", id.0),
                generation,
            },
            kind,
            Vitality(vitality),
            lineage(id),
            Alive,
        ));
        self.by_id.insert(id, entity);

        let pools = self.pools.entry(generation).or_default();
        pools.active.push(entity);
        pools.available.push(entity);

        self.counters.created += 1;
        self.counters.active += 1;
        *self.counters.by_kind.slot_mut(kind) += 1;

        entity
    }

    // ------------------------------------------------------------------------
    // Death and generations
    // ------------------------------------------------------------------------

    /// Take an organism out of its generation's pools and mark it dead.
    ///
    /// Does nothing for an organism that is already dead. Partner state is
    /// not touched here; see [`Registry::release_partner`].
    pub fn remove_from_active(&mut self, entity: Entity, generation_of_death: u32) {
        if !self.is_alive(entity) {
            return;
        }
        let Some((generation, kind)) = self.generation_of(entity).zip(self.kind(entity)) else {
            return;
        };

        if let Some(pools) = self.pools.get_mut(&generation) {
            remove_entity(&mut pools.active, entity);
            remove_entity(&mut pools.available, entity);
        }
        let _ = self.world.remove_one::<Alive>(entity);
        let _ = self.world.insert_one(entity, Dead { generation_of_death });

        decrement(&mut self.counters.active, "active");
        self.counters.dead += 1;
        decrement(self.counters.by_kind.slot_mut(kind), "kind");
    }

    /// Dissolve the pair `entity` belongs to.
    ///
    /// The partner goes back into its generation's available pool and the
    /// pair record is removed. Returns the released partner.
    pub fn release_partner(&mut self, entity: Entity) -> Option<Entity> {
        let partner = self.partner(entity)?;
        let _ = self.world.remove_one::<Partner>(entity);
        let _ = self.world.remove_one::<Partner>(partner.entity);
        self.pairs.remove(&partner.pair);

        if self.is_alive(partner.entity) {
            if let Some(generation) = self.generation_of(partner.entity) {
                let pools = self.pools.entry(generation).or_default();
                if !pools.available.contains(&partner.entity) {
                    pools.available.push(partner.entity);
                }
            }
        }
        Some(partner.entity)
    }

    /// Open empty pools for a new generation. Earlier generations are kept.
    pub fn open_generation(&mut self, generation: u32) {
        self.pools.entry(generation).or_default();
    }

    // ------------------------------------------------------------------------
    // Pairing
    // ------------------------------------------------------------------------

    /// Make two organisms partners and take both out of the available pool.
    pub fn form_pair(&mut self, first: Entity, second: Entity) -> PairId {
        let pair = PairId(self.next_pair_id);
        self.next_pair_id += 1;

        let _ = self.world.insert_one(first, Partner { entity: second, pair });
        let _ = self.world.insert_one(second, Partner { entity: first, pair });
        self.pairs.insert(pair, Pair { first, second });

        for entity in [first, second] {
            if let Some(generation) = self.generation_of(entity) {
                if let Some(pools) = self.pools.get_mut(&generation) {
                    remove_entity(&mut pools.available, entity);
                }
            }
        }
        pair
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn generations(&self) -> impl Iterator<Item = u32> + '_ {
        self.pools.keys().copied()
    }

    pub fn active_in(&self, generation: u32) -> &[Entity] {
        self.pools
            .get(&generation)
            .map(|p| p.active.as_slice())
            .unwrap_or(&[])
    }

    pub fn available_in(&self, generation: u32) -> &[Entity] {
        self.pools
            .get(&generation)
            .map(|p| p.available.as_slice())
            .unwrap_or(&[])
    }

    pub fn pairs(&self) -> impl Iterator<Item = (PairId, Pair)> + '_ {
        self.pairs.iter().map(|(id, pair)| (*id, *pair))
    }

    pub fn pair(&self, id: PairId) -> Option<Pair> {
        self.pairs.get(&id).copied()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn entity_of(&self, id: OrganismId) -> Option<Entity> {
        self.by_id.get(&id).copied()
    }

    pub fn id_of(&self, entity: Entity) -> Option<OrganismId> {
        self.world.get::<&Organism>(entity).ok().map(|o| o.id)
    }

    pub fn generation_of(&self, entity: Entity) -> Option<u32> {
        self.world.get::<&Organism>(entity).ok().map(|o| o.generation)
    }

    pub fn kind(&self, entity: Entity) -> Option<Kind> {
        self.world.get::<&Kind>(entity).ok().map(|k| *k)
    }

    pub fn vitality(&self, entity: Entity) -> Option<i32> {
        self.world.get::<&Vitality>(entity).ok().map(|v| v.0)
    }

    /// Overwrite an organism's vitality. Death is only applied on the next tick.
    pub fn set_vitality(&mut self, entity: Entity, value: i32) {
        if let Ok(mut vitality) = self.world.get::<&mut Vitality>(entity) {
            vitality.0 = value;
        }
    }

    pub fn partner(&self, entity: Entity) -> Option<Partner> {
        self.world.get::<&Partner>(entity).ok().map(|p| *p)
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.get::<&Alive>(entity).is_ok()
    }

    /// Some ancestor both organisms share; `None` means they may pair.
    pub fn common_ancestor(&self, first: Entity, second: Entity) -> Option<OrganismId> {
        let a = self.world.get::<&Lineage>(first).ok()?;
        let b = self.world.get::<&Lineage>(second).ok()?;
        a.common_ancestor(&b)
    }

    pub fn lineage(&self, entity: Entity) -> Option<Lineage> {
        self.world.get::<&Lineage>(entity).ok().map(|l| (*l).clone())
    }

    pub fn snapshot(&self, entity: Entity) -> Option<OrganismSnapshot> {
        let organism = self.world.get::<&Organism>(entity).ok()?;
        let partner = self.partner(entity);
        Some(OrganismSnapshot {
            id: organism.id,
            name: organism.name.clone(),
            generation: organism.generation,
            parents: self.world.get::<&Parents>(entity).ok().map(|p| *p),
            kind: self.kind(entity)?,
            vitality: self.vitality(entity)?,
            alive: self.is_alive(entity),
            died_in: self
                .world
                .get::<&Dead>(entity)
                .ok()
                .map(|d| d.generation_of_death),
            partner: partner.and_then(|p| self.id_of(p.entity)),
            pair: partner.map(|p| p.pair),
            lineage: self.lineage(entity)?.iter().collect(),
        })
    }

    /// Every organism ever created, in creation order.
    pub fn snapshots(&self) -> Vec<OrganismSnapshot> {
        let mut all: Vec<OrganismSnapshot> = self
            .by_id
            .values()
            .filter_map(|e| self.snapshot(*e))
            .collect();
        all.sort_by_key(|s| s.id);
        all
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_founder_bookkeeping() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 3);
        let b = registry.create_founder(Kind::B, 3);

        assert_eq!(registry.active_in(0), &[a, b]);
        assert_eq!(registry.available_in(0), &[a, b]);
        let counters = registry.counters();
        assert_eq!(counters.created, 2);
        assert_eq!(counters.active, 2);
        assert_eq!(counters.by_kind.a, 1);
        assert_eq!(counters.by_kind.b, 1);
        assert_eq!(registry.snapshot(a).unwrap().name, "Organism_1");
        assert_eq!(registry.snapshot(b).unwrap().lineage, vec![OrganismId(2)]);
        assert!(registry.snapshot(a).unwrap().parents.is_none());
    }

    #[test]
    fn test_offspring_inherits() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 3);
        let b = registry.create_founder(Kind::B, 3);
        registry.open_generation(1);
        let child = registry.create_offspring(a, b, 1, 3).unwrap();

        let snapshot = registry.snapshot(child).unwrap();
        assert_eq!(snapshot.kind, Kind::C);
        assert_eq!(snapshot.generation, 1);
        assert_eq!(
            snapshot.parents,
            Some(Parents {
                first: OrganismId(1),
                second: OrganismId(2)
            })
        );
        assert_eq!(
            snapshot.lineage,
            vec![OrganismId(1), OrganismId(2), OrganismId(3)]
        );
        assert_eq!(registry.active_in(1), &[child]);
        assert_eq!(registry.counters().by_kind.c, 1);
    }

    #[test]
    fn test_pair_and_release() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 3);
        let b = registry.create_founder(Kind::B, 3);
        let pair = registry.form_pair(a, b);

        assert!(registry.available_in(0).is_empty());
        assert_eq!(registry.partner(a).unwrap().entity, b);
        assert_eq!(registry.partner(b).unwrap().entity, a);
        assert_eq!(registry.pair(pair), Some(Pair { first: a, second: b }));

        assert_eq!(registry.release_partner(a), Some(b));
        assert!(registry.partner(a).is_none());
        assert!(registry.partner(b).is_none());
        assert!(registry.pair(pair).is_none());
        assert_eq!(registry.available_in(0), &[b]);
    }

    #[test]
    fn test_remove_from_active_once() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 1);
        registry.remove_from_active(a, 1);
        registry.remove_from_active(a, 1);

        let counters = registry.counters();
        assert_eq!(counters.active, 0);
        assert_eq!(counters.dead, 1);
        assert_eq!(counters.by_kind.a, 0);
        assert!(registry.active_in(0).is_empty());
        assert!(registry.available_in(0).is_empty());
        let snapshot = registry.snapshot(a).unwrap();
        assert!(!snapshot.alive);
        assert_eq!(snapshot.died_in, Some(1));
    }

    #[test]
    fn test_open_generation_keeps_prior_pools() {
        let mut registry = Registry::new();
        let a = registry.create_founder(Kind::A, 3);
        registry.open_generation(1);
        assert_eq!(registry.active_in(0), &[a]);
        assert!(registry.active_in(1).is_empty());
        assert_eq!(registry.generations().collect::<Vec<_>>(), vec![0, 1]);
    }
}
