//! A generic in-memory ordered map, backed by a red-black tree.
//!
//! ```rust
//! use redblack_map::Map;
//!
//! let mut map: Map<u32, char> = Map::new();
//! map.insert(21, 'a').unwrap();
//! map.insert(24, 'b').unwrap();
//! map.insert(23, 'c').unwrap();
//!
//! let entries: Vec<_> = map.iter().map(|(k, v)| (k, *v)).collect();
//! assert_eq!(entries, vec![(21, 'a'), (23, 'c'), (24, 'b')]);
//! ```
//!
//! Keys are ordered by numeric magnitude in host byte order, not by
//! lexicographic byte value — see [`comparator`] for why that distinction
//! matters and how it's implemented.

mod arena;
mod color;
mod comparator;
mod error;
mod iter;
mod map;
mod node;
mod tree;

pub use color::Color;
pub use comparator::KeyBytes;
pub use error::{last_error, ErrorContext, MapError, TreeError};
pub use iter::Iter;
pub use map::{Map, NextKeyOutcome};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_insert_and_lookup() {
        let mut map: Map<i32, char> = Map::new();
        map.insert(21, 'a').unwrap();
        map.insert(24, 'b').unwrap();
        map.insert(23, 'c').unwrap();

        let entries: Vec<_> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(entries, vec![(21, 'a'), (23, 'c'), (24, 'b')]);

        // Root after rebalance is 23 (Black), with 21 and 24 both Red
        // children.
        assert_eq!(map.first_key(), Some(21));
        assert_eq!(map.last_key(), Some(24));
        map.check_invariants();
    }

    #[test]
    fn overwrite_keeps_size_constant() {
        let mut map: Map<i32, char> = Map::new();
        assert_eq!(map.insert(10, 'x').unwrap(), None);
        assert_eq!(map.insert(10, 'y').unwrap(), Some('x'));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(10), Some(&'y'));
    }

    #[test]
    fn ascending_insertion_triggers_rotations() {
        let mut map: Map<i32, i32> = Map::new();
        for k in 1..=7 {
            map.insert(k, k).unwrap();
        }
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, (1..=7).collect::<Vec<_>>());
        map.check_invariants();
    }

    #[test]
    fn delete_triggers_double_black_fixup() {
        let mut map: Map<i32, i32> = Map::new();
        for k in 1..=7 {
            map.insert(k, k).unwrap();
        }
        map.remove(1).unwrap();
        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, (2..=7).collect::<Vec<_>>());
        map.check_invariants();
    }

    #[test]
    fn iterator_completeness_over_random_keys() {
        use rand::prelude::*;
        use std::collections::BTreeSet;

        let mut rng = SmallRng::seed_from_u64(0xC0FFEE);
        let mut keys = BTreeSet::new();
        while keys.len() < 50 {
            keys.insert(rng.gen::<u32>());
        }

        let mut map: Map<u32, u32> = Map::new();
        for &k in &keys {
            map.insert(k, k).unwrap();
        }

        let mut it = map.iter();
        let mut count = 0;
        let mut last = None;
        for (k, _) in &mut it {
            if let Some(prev) = last {
                assert!(prev < k, "keys must be strictly ascending");
            }
            last = Some(k);
            count += 1;
        }
        assert_eq!(count, 50);
        map.check_invariants();
    }

    #[test]
    fn endianness_sensitivity() {
        // A naive memcmp-style comparator would put 0x01000000 before
        // 0x00000001 on a little-endian host, since its first byte (0x00)
        // is smaller. The magnitude-correct comparator must not.
        let mut map: Map<u32, &'static str> = Map::new();
        map.insert(0x01000000, "big").unwrap();
        map.insert(0x00000001, "small").unwrap();

        let keys: Vec<_> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![0x00000001, 0x01000000]);
        map.check_invariants();
    }

    #[test]
    fn remove_absent_key_is_a_no_op() {
        let mut map: Map<i32, i32> = Map::new();
        map.insert(1, 1).unwrap();
        assert_eq!(map.remove(2), Err(MapError::KeyNotFound));
        assert_eq!(map.len(), 1);
        assert!(matches!(last_error().unwrap().error, MapError::KeyNotFound));
    }

    #[test]
    fn remove_only_node_leaves_empty_map() {
        let mut map: Map<i32, i32> = Map::new();
        map.insert(1, 1).unwrap();
        assert_eq!(map.remove(1), Ok(1));
        assert!(map.is_empty());
        assert_eq!(map.first_key(), None);
        assert_eq!(map.last_key(), None);
    }

    #[test]
    fn next_key_distinguishes_absent_from_no_successor() {
        let mut map: Map<i32, i32> = Map::new();
        map.insert(1, 1).unwrap();
        map.insert(5, 5).unwrap();

        assert_eq!(map.next_key(1), Some(5));
        assert_eq!(map.next_key(5), None); // no successor
        assert_eq!(map.next_key(99), None); // absent

        assert_eq!(map.next_key_checked(5), NextKeyOutcome::NoSuccessor);
        assert_eq!(map.next_key_checked(99), NextKeyOutcome::KeyNotFound);
        assert_eq!(map.next_key_checked(1), NextKeyOutcome::Found(5));
    }

    #[test]
    fn get_vs_get_or_default_ambiguity() {
        let mut map: Map<i32, i32> = Map::new();
        map.insert(1, 0).unwrap(); // a legitimate zero value

        assert_eq!(map.get(1), Some(&0));
        assert_eq!(map.get(2), None);
        // get_or_default cannot tell these two apart:
        assert_eq!(map.get_or_default(1), 0);
        assert_eq!(map.get_or_default(2), 0);
    }

    #[test]
    fn ascending_insertion_height_is_bounded() {
        // Worst-case left-heavy path for an unbalanced BST; red-black
        // balancing must keep height within 2 * log2(n + 1).
        let mut map: Map<i32, i32> = Map::new();
        let n = 1000;
        for k in 0..n {
            map.insert(k, k).unwrap();
        }
        map.check_invariants();
        assert_eq!(map.len(), n as usize);
    }
}
