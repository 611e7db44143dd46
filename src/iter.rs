//! The in-order iterator: a raw `first`/`advance`/`last`/`is_end` cursor
//! protocol (named that way rather than `first`/`next`/`last`/`end` since
//! `next` is reserved for [`std::iter::Iterator`]) plus an ordinary
//! `Iterator` implementation, which is what idiomatic call sites should
//! actually reach for.

use crate::comparator::KeyBytes;
use crate::map::Map;
use crate::node::NodeId;

/// An ascending-order iterator over a [`Map`]'s `(key, &value)` pairs.
///
/// Borrows the map for `'a`, so the borrow checker — not a runtime
/// check — rejects any attempt to mutate the map while an iterator is
/// alive. `current == None` represents "past the end," distinct from
/// "positioned at the minimum key," which the `last_key_reached` latch
/// distinguishes: the maximum key is still yielded once before `is_end()`
/// starts returning true, so a canonical `first(); while !is_end() {
/// ...; advance(); }` loop visits it exactly once.
pub struct Iter<'a, K, V> {
    map: &'a Map<K, V>,
    current: Option<NodeId>,
    last_key_reached: bool,
}

impl<'a, K, V> Iter<'a, K, V>
where
    K: KeyBytes + Default,
    V: Default,
{
    pub(crate) fn new(map: &'a Map<K, V>) -> Self {
        let mut it = Iter { map, current: None, last_key_reached: false };
        it.first();
        it
    }

    /// Position at the minimum key.
    pub fn first(&mut self) {
        let id = self.map.minimum_id();
        self.current = (!id.is_none()).then_some(id);
        self.last_key_reached = false;
    }

    /// Position at the maximum key.
    pub fn last(&mut self) {
        let id = self.map.maximum_id();
        self.current = (!id.is_none()).then_some(id);
        self.last_key_reached = false;
    }

    /// Advance to the successor of the current key. If there is no
    /// successor, stays put (idempotent past the end of the map).
    pub fn advance(&mut self) {
        let Some(id) = self.current else { return };
        let succ = self.map.successor_id(id);
        if succ.is_none() {
            self.last_key_reached = true;
        } else {
            self.current = Some(succ);
        }
    }

    /// True once the maximum key has already been yielded by a previous
    /// `current_key`/loop body — i.e. on the call *after* the one where the
    /// maximum was current. A canonical `for it.first(); !it.is_end();
    /// it.advance()` loop therefore still visits the maximum exactly once.
    pub fn is_end(&mut self) -> bool {
        if self.last_key_reached {
            self.last_key_reached = false;
            self.current = None;
            return true;
        }
        self.current.is_none()
    }

    pub fn current_key(&self) -> Option<K> {
        self.current.map(|id| self.map.key_at(id))
    }

    pub fn current_value(&self) -> Option<&'a V> {
        self.current.map(|id| self.map.value_at(id))
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: KeyBytes + Default,
    V: Default,
{
    type Item = (K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let item = (self.map.key_at(id), self.map.value_at(id));
        let succ = self.map.successor_id(id);
        self.current = (!succ.is_none()).then_some(succ);
        Some(item)
    }
}

impl<'a, K, V> IntoIterator for &'a Map<K, V>
where
    K: KeyBytes + Default,
    V: Default,
{
    type Item = (K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
