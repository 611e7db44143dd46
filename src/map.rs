use crate::comparator::KeyBytes;
use crate::error::{record_here, MapError};
use crate::iter::Iter;
use crate::node::NodeId;
use crate::tree::RbTree;

/// The outcome of [`Map::next_key_checked`], distinguishing two cases that
/// [`Map::next_key`]'s single zero-valued return conflates: "the key you
/// asked about isn't in the map" versus "the key is in the map but is
/// already the maximum."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextKeyOutcome<K> {
    /// The smallest key strictly greater than the one asked about.
    Found(K),
    /// The key asked about is present, but is already the maximum key.
    NoSuccessor,
    /// The key asked about is not in the map.
    KeyNotFound,
}

impl<K> NextKeyOutcome<K> {
    /// Collapse `NoSuccessor` and `KeyNotFound` into `None`, the convenient
    /// but ambiguous shape `next_key` exposes. Prefer `next_key_checked`
    /// directly when the distinction matters.
    pub fn into_option(self) -> Option<K> {
        match self {
            NextKeyOutcome::Found(k) => Some(k),
            NextKeyOutcome::NoSuccessor | NextKeyOutcome::KeyNotFound => None,
        }
    }
}

/// A generic in-memory ordered map, backed by a red-black tree.
///
/// Keys are ordered by the numeric magnitude of their fixed-width byte
/// representation in host byte order (see [`crate::comparator`]), not by a
/// user-supplied comparator or `K`'s own `Ord` impl.
pub struct Map<K, V> {
    tree: RbTree<K, V>,
}

impl<K, V> Default for Map<K, V>
where
    K: KeyBytes + Default,
    V: Default + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Map<K, V>
where
    K: KeyBytes + Default,
    V: Default + Copy,
{
    /// Creates a new, empty map. Infallible — the arena starts out empty
    /// and the sentinel is created lazily on the first insertion.
    pub fn new() -> Self {
        Map { tree: RbTree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert `value` under `key`. If `key` was already present, its value
    /// is overwritten in place and the old value is returned; no rebalance
    /// or allocation happens in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, MapError> {
        self.tree.insert(key, value).map_err(|e| record_here!(e.into()))
    }

    /// Remove `key` and return its value, or `Err(MapError::KeyNotFound)` if
    /// absent. A no-op on failure — the map is left unchanged.
    pub fn remove(&mut self, key: K) -> Result<V, MapError> {
        self.tree.delete(key).map_err(|e| record_here!(e.into()))
    }

    /// Idiomatic, presence-preserving lookup: `None` means "absent",
    /// unambiguously. Prefer this over [`Map::get_or_default`].
    pub fn get(&self, key: K) -> Option<&V> {
        self.tree.lookup(key)
    }

    /// A zero-value-on-miss lookup shape: returns `V::default()` both when
    /// `key` is absent and when `key` maps to a legitimately default-valued
    /// entry. Ambiguous for that reason — prefer [`Map::get`] unless a
    /// caller specifically wants this conflated shape.
    pub fn get_or_default(&self, key: K) -> V {
        self.tree.lookup(key).copied().unwrap_or_default()
    }

    pub fn contains(&self, key: K) -> bool {
        self.tree.contains(key)
    }

    pub fn first_key(&self) -> Option<K> {
        let id = self.tree.minimum_of_root();
        (!id.is_none()).then(|| self.tree.key_at(id))
    }

    pub fn last_key(&self) -> Option<K> {
        let id = self.tree.maximum_of_root();
        (!id.is_none()).then(|| self.tree.key_at(id))
    }

    /// The smallest key strictly greater than `key`, or `None` if `key` is
    /// absent *or* has no successor. See [`Map::next_key_checked`] to tell
    /// those two cases apart.
    pub fn next_key(&self, key: K) -> Option<K> {
        self.next_key_checked(key).into_option()
    }

    pub fn next_key_checked(&self, key: K) -> NextKeyOutcome<K> {
        let id = self.tree.find_id(key);
        if id.is_none() {
            return NextKeyOutcome::KeyNotFound;
        }
        let succ = self.tree.successor_of(id);
        if succ.is_none() {
            NextKeyOutcome::NoSuccessor
        } else {
            NextKeyOutcome::Found(self.tree.key_at(succ))
        }
    }

    /// In-order traversal, visiting every `(key, value)` pair ascending.
    pub fn traverse_in_order(&self, visitor: impl FnMut(K, &V)) {
        self.tree.traverse_in_order(visitor);
    }

    /// An ascending-order iterator over `(key, &value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    pub(crate) fn minimum_id(&self) -> NodeId {
        self.tree.minimum_of_root()
    }

    pub(crate) fn maximum_id(&self) -> NodeId {
        self.tree.maximum_of_root()
    }

    pub(crate) fn successor_id(&self, id: NodeId) -> NodeId {
        self.tree.successor_of(id)
    }

    pub(crate) fn key_at(&self, id: NodeId) -> K {
        self.tree.key_at(id)
    }

    pub(crate) fn value_at(&self, id: NodeId) -> &V {
        self.tree.value_at(id)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.tree.check_invariants();
    }
}
