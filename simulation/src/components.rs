//! ECS Components for organisms
//!
//! Every organism is a `hecs` entity carrying these components.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ============================================================================
// Identity Components
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    pub name: String,
    /// Generation the organism was created in. Never changes.
    pub generation: u32,
}

// ============================================================================
// Organism Components
// ============================================================================

/// Categorical trait label.
///
/// `Unassigned` is what inheritance yields for an input it does not recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    A,
    B,
    C,
    Unassigned,
}

impl Kind {
    pub const ALL: [Kind; 4] = [Kind::A, Kind::B, Kind::C, Kind::Unassigned];
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Kind::A => "A",
            Kind::B => "B",
            Kind::C => "C",
            Kind::Unassigned => "none",
        };
        f.write_str(label)
    }
}

/// Remaining health. The organism dies once this reaches zero or below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitality(pub i32);

impl Vitality {
    /// Lose one point of health. Returns true if the organism is now spent.
    pub fn decay(&mut self) -> bool {
        self.0 = self.0.saturating_sub(1);
        self.is_spent()
    }

    pub fn is_spent(&self) -> bool {
        self.0 <= 0
    }
}

/// Ancestors of an organism, including the organism itself.
///
/// Fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Lineage(BTreeSet<OrganismId>);

impl Lineage {
    pub fn founder(id: OrganismId) -> Self {
        Self(BTreeSet::from([id]))
    }

    /// Union of both parents' lineages plus the child.
    pub fn descend(first: &Lineage, second: &Lineage, child: OrganismId) -> Self {
        let mut ancestors: BTreeSet<OrganismId> = first.0.union(&second.0).copied().collect();
        ancestors.insert(child);
        Self(ancestors)
    }

    /// Two organisms are related when they share any ancestor.
    pub fn is_related(&self, other: &Lineage) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// First ancestor both lineages share, if any.
    pub fn common_ancestor(&self, other: &Lineage) -> Option<OrganismId> {
        self.0.intersection(&other.0).next().copied()
    }

    pub fn is_superset(&self, other: &Lineage) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OrganismId> + '_ {
        self.0.iter().copied()
    }
}

/// The two organisms an offspring descends from. Founders have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parents {
    pub first: OrganismId,
    pub second: OrganismId,
}

/// Current partner. Always present on both members of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partner {
    pub entity: hecs::Entity,
    pub pair: PairId,
}

/// Marker: organism is alive
#[derive(Debug, Clone, Copy, Default)]
pub struct Alive;

/// Organism has died; kept in the world for lineage history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dead {
    pub generation_of_death: u32,
}

// ============================================================================
// Pairs
// ============================================================================

/// Two unrelated organisms of the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub first: hecs::Entity,
    pub second: hecs::Entity,
}
