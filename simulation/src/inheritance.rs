//! Kind inheritance
//!
//! Fixed cross-breeding table. Mixing with `C` reverts to the other parent's
//! primary kind instead of producing `C` again.

use crate::components::Kind;

/// Rows and columns are `A`, `B`, `C`.
const CROSS_TABLE: [[Kind; 3]; 3] = [
    //          A        B        C
    /* A */ [Kind::A, Kind::C, Kind::A],
    /* B */ [Kind::C, Kind::B, Kind::B],
    /* C */ [Kind::A, Kind::B, Kind::C],
];

fn row(kind: Kind) -> Option<usize> {
    match kind {
        Kind::A => Some(0),
        Kind::B => Some(1),
        Kind::C => Some(2),
        Kind::Unassigned => None,
    }
}

/// Kind of an offspring of `first` and `second`.
pub fn inherit_kind(first: Kind, second: Kind) -> Kind {
    match (row(first), row(second)) {
        (Some(i), Some(j)) => CROSS_TABLE[i][j],
        _ => Kind::Unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cross_table() {
        let expected = [
            (Kind::A, Kind::A, Kind::A),
            (Kind::A, Kind::B, Kind::C),
            (Kind::A, Kind::C, Kind::A),
            (Kind::B, Kind::A, Kind::C),
            (Kind::B, Kind::B, Kind::B),
            (Kind::B, Kind::C, Kind::B),
            (Kind::C, Kind::A, Kind::A),
            (Kind::C, Kind::B, Kind::B),
            (Kind::C, Kind::C, Kind::C),
        ];
        for (first, second, child) in expected {
            assert_eq!(inherit_kind(first, second), child, "{first} x {second}");
        }
    }

    #[test]
    fn test_unassigned_propagates() {
        for kind in Kind::ALL {
            assert_eq!(inherit_kind(Kind::Unassigned, kind), Kind::Unassigned);
            assert_eq!(inherit_kind(kind, Kind::Unassigned), Kind::Unassigned);
        }
    }

    #[test]
    fn test_table_is_symmetric() {
        for first in Kind::ALL {
            for second in Kind::ALL {
                assert_eq!(inherit_kind(first, second), inherit_kind(second, first));
            }
        }
    }
}
