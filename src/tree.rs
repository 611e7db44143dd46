//! The red-black tree engine: BST ordering plus balance maintenance on
//! insertion and deletion, expressed over the arena of `crate::arena`.
//!
//! The case structure of `insert_fixup` and `delete_fixup` follows the
//! classic CLRS algorithm. Two easy mistakes are worth calling out because
//! they're tempting shortcuts that don't hold up: treating "uncle is absent"
//! as its own branch (the sentinel model means the uncle always exists as a
//! node, so the correct predicate is uncle *colour*, not uncle existence),
//! and comparing a child id directly against a colour constant instead of
//! reading `.color` off of it in delete-fixup's case 2.

use crate::arena::Arena;
use crate::color::Color;
use crate::comparator::{compare_keys, KeyBytes};
use crate::error::TreeError;
use crate::node::{Node, NodeId};
use std::cmp::Ordering;

pub(crate) struct RbTree<K, V> {
    arena: Arena<K, V>,
    root: NodeId,
    len: usize,
}

impl<K, V> RbTree<K, V>
where
    K: KeyBytes + Default,
    V: Default + Copy,
{
    pub(crate) fn new() -> Self {
        RbTree { arena: Arena::new(), root: NodeId::NONE, len: 0 }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ---- node-level structural queries ----

    fn is_sentinel(&self, id: NodeId) -> bool {
        self.arena.is_sentinel(id)
    }

    fn color_of(&self, id: NodeId) -> Color {
        self.arena.node(id).color
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.arena.node(id).parent
    }

    fn left_of(&self, id: NodeId) -> NodeId {
        self.arena.node(id).left
    }

    fn right_of(&self, id: NodeId) -> NodeId {
        self.arena.node(id).right
    }

    fn is_left_child(&self, id: NodeId) -> bool {
        let p = self.parent_of(id);
        !p.is_none() && self.left_of(p) == id
    }

    /// The other child of `n`'s parent, or the sentinel if `n` has no
    /// parent. Returns `NodeId::NONE` only when the tree has no sentinel
    /// yet (i.e. is empty), which callers never hit in practice since
    /// `sibling` is only ever called on a node that exists.
    fn sibling(&self, n: NodeId) -> NodeId {
        let p = self.parent_of(n);
        if p.is_none() {
            return self.arena.sentinel().unwrap_or(NodeId::NONE);
        }
        if self.left_of(p) == n {
            self.right_of(p)
        } else {
            self.left_of(p)
        }
    }

    fn uncle(&self, n: NodeId) -> NodeId {
        let p = self.parent_of(n);
        if p.is_none() {
            return self.arena.sentinel().unwrap_or(NodeId::NONE);
        }
        self.sibling(p)
    }

    fn grandparent(&self, n: NodeId) -> NodeId {
        let p = self.parent_of(n);
        if p.is_none() {
            NodeId::NONE
        } else {
            self.parent_of(p)
        }
    }

    fn minimum(&self, mut n: NodeId) -> NodeId {
        while !self.is_sentinel(self.left_of(n)) {
            n = self.left_of(n);
        }
        n
    }

    fn maximum(&self, mut n: NodeId) -> NodeId {
        while !self.is_sentinel(self.right_of(n)) {
            n = self.right_of(n);
        }
        n
    }

    fn successor(&self, n: NodeId) -> NodeId {
        if !self.is_sentinel(self.right_of(n)) {
            return self.minimum(self.right_of(n));
        }
        let mut cur = n;
        let mut p = self.parent_of(cur);
        while !p.is_none() && cur == self.right_of(p) {
            cur = p;
            p = self.parent_of(cur);
        }
        p
    }

    fn predecessor(&self, n: NodeId) -> NodeId {
        if !self.is_sentinel(self.left_of(n)) {
            return self.maximum(self.left_of(n));
        }
        let mut cur = n;
        let mut p = self.parent_of(cur);
        while !p.is_none() && cur == self.left_of(p) {
            cur = p;
            p = self.parent_of(cur);
        }
        p
    }

    // ---- rotations ----

    /// Pivot's right child becomes the new subtree root; pivot becomes its
    /// left child. Only legitimately called when the pivot's right child is
    /// not the sentinel.
    fn rotate_left(&mut self, pivot: NodeId) {
        let r = self.right_of(pivot);
        debug_assert!(!self.is_sentinel(r), "rotate_left on a pivot with no right child");

        let r_left = self.left_of(r);
        self.arena.node_mut(pivot).right = r_left;
        if !self.is_sentinel(r_left) {
            self.arena.node_mut(r_left).parent = pivot;
        }

        let p = self.parent_of(pivot);
        self.arena.node_mut(r).parent = p;
        if p.is_none() {
            self.root = r;
        } else if self.is_left_child(pivot) {
            self.arena.node_mut(p).left = r;
        } else {
            self.arena.node_mut(p).right = r;
        }

        self.arena.node_mut(r).left = pivot;
        self.arena.node_mut(pivot).parent = r;
    }

    /// Mirror image of `rotate_left`.
    fn rotate_right(&mut self, pivot: NodeId) {
        let l = self.left_of(pivot);
        debug_assert!(!self.is_sentinel(l), "rotate_right on a pivot with no left child");

        let l_right = self.right_of(l);
        self.arena.node_mut(pivot).left = l_right;
        if !self.is_sentinel(l_right) {
            self.arena.node_mut(l_right).parent = pivot;
        }

        let p = self.parent_of(pivot);
        self.arena.node_mut(l).parent = p;
        if p.is_none() {
            self.root = l;
        } else if self.is_left_child(pivot) {
            self.arena.node_mut(p).left = l;
        } else {
            self.arena.node_mut(p).right = l;
        }

        self.arena.node_mut(l).right = pivot;
        self.arena.node_mut(pivot).parent = l;
    }

    /// Replace the subtree rooted at `u` with the subtree rooted at `v` at
    /// `u`'s point of attachment to its parent. `v` may be the sentinel;
    /// setting the sentinel's `parent` field is why it must be writable.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let p = self.parent_of(u);
        if p.is_none() {
            // `u` was the root. If `v` is the sentinel, `u` had no real
            // children and the tree is now empty — `root` must become
            // `NodeId::NONE`, not the sentinel's id, or every structural
            // query (`is_empty`, iteration, `find`) would start treating the
            // sentinel as a live root.
            self.root = if self.is_sentinel(v) { NodeId::NONE } else { v };
        } else if self.is_left_child(u) {
            self.arena.node_mut(p).left = v;
        } else {
            self.arena.node_mut(p).right = v;
        }
        self.arena.node_mut(v).parent = p;
    }

    // ---- search ----

    fn find(&self, key: K) -> NodeId {
        let mut cur = self.root;
        while !cur.is_none() && !self.is_sentinel(cur) {
            match compare_keys(key, self.arena.node(cur).key) {
                Ordering::Equal => return cur,
                Ordering::Less => cur = self.left_of(cur),
                Ordering::Greater => cur = self.right_of(cur),
            }
        }
        NodeId::NONE
    }

    pub(crate) fn lookup(&self, key: K) -> Option<&V> {
        let id = self.find(key);
        if id.is_none() {
            None
        } else {
            Some(&self.arena.node(id).value)
        }
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        !self.find(key).is_none()
    }

    // ---- insertion ----

    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TreeError> {
        if self.root.is_none() {
            let sentinel = self.arena.ensure_sentinel()?;
            let id = self.arena.alloc(Node {
                color: Color::Red,
                key,
                value,
                parent: NodeId::NONE,
                left: sentinel,
                right: sentinel,
            })?;
            self.root = id;
            self.len += 1;
            self.insert_fixup(id);
            return Ok(None);
        }

        let mut cur = self.root;
        loop {
            match compare_keys(key, self.arena.node(cur).key) {
                Ordering::Equal => {
                    let old = std::mem::replace(&mut self.arena.node_mut(cur).value, value);
                    return Ok(Some(old));
                }
                Ordering::Less => {
                    let next = self.left_of(cur);
                    if self.is_sentinel(next) {
                        self.splice_child(cur, key, value, true)?;
                        return Ok(None);
                    }
                    cur = next;
                }
                Ordering::Greater => {
                    let next = self.right_of(cur);
                    if self.is_sentinel(next) {
                        self.splice_child(cur, key, value, false)?;
                        return Ok(None);
                    }
                    cur = next;
                }
            }
        }
    }

    fn splice_child(&mut self, parent: NodeId, key: K, value: V, as_left: bool) -> Result<(), TreeError> {
        let sentinel = self.arena.sentinel().expect("sentinel exists once root is present");
        let id = self.arena.alloc(Node {
            color: Color::Red,
            key,
            value,
            parent,
            left: sentinel,
            right: sentinel,
        })?;
        if as_left {
            self.arena.node_mut(parent).left = id;
        } else {
            self.arena.node_mut(parent).right = id;
        }
        self.len += 1;
        self.insert_fixup(id);
        Ok(())
    }

    fn insert_fixup(&mut self, mut n: NodeId) {
        loop {
            let p = self.parent_of(n);
            if p.is_none() {
                self.arena.node_mut(n).color = Color::Black;
                return;
            }
            if self.color_of(p).is_black() {
                return;
            }

            // p is Red, therefore non-root (root is always Black), so a
            // grandparent exists.
            let g = self.grandparent(n);
            let u = self.uncle(n);

            if self.color_of(u).is_red() {
                self.arena.node_mut(p).color = Color::Black;
                self.arena.node_mut(u).color = Color::Black;
                self.arena.node_mut(g).color = Color::Red;
                n = g;
                continue;
            }

            // Uncle is Black (possibly the sentinel itself).
            let mut p = p;
            let mut n = n;
            if !self.is_left_child(n) && self.is_left_child(p) {
                self.rotate_left(p);
                n = p;
                p = self.parent_of(n);
            } else if self.is_left_child(n) && !self.is_left_child(p) {
                self.rotate_right(p);
                n = p;
                p = self.parent_of(n);
            }

            let g = self.parent_of(p);
            if self.is_left_child(n) {
                self.rotate_right(g);
            } else {
                self.rotate_left(g);
            }
            self.arena.node_mut(p).color = Color::Black;
            self.arena.node_mut(g).color = Color::Red;
            return;
        }
    }

    // ---- deletion ----

    pub(crate) fn delete(&mut self, key: K) -> Result<V, TreeError> {
        let victim = self.find(key);
        if victim.is_none() {
            return Err(TreeError::KeyNotFound);
        }

        let original_color = self.color_of(victim);
        let replacement;

        if self.is_sentinel(self.left_of(victim)) {
            replacement = self.right_of(victim);
            self.transplant(victim, replacement);
        } else if self.is_sentinel(self.right_of(victim)) {
            replacement = self.left_of(victim);
            self.transplant(victim, replacement);
        } else {
            // Two children: splice in the in-order successor. Always using
            // the successor (rather than alternating with the predecessor
            // for balance) keeps this path free of any hidden cross-call
            // state — the canonical choice, and one fewer thing to reason
            // about when auditing the fix-up logic.
            let mover = self.minimum(self.right_of(victim));
            let mover_original_color = self.color_of(mover);
            replacement = self.right_of(mover);

            if self.parent_of(mover) == victim {
                self.arena.node_mut(replacement).parent = mover;
            } else {
                self.transplant(mover, replacement);
                let victim_right = self.right_of(victim);
                self.arena.node_mut(mover).right = victim_right;
                self.arena.node_mut(victim_right).parent = mover;
            }

            self.transplant(victim, mover);
            let victim_left = self.left_of(victim);
            self.arena.node_mut(mover).left = victim_left;
            self.arena.node_mut(victim_left).parent = mover;
            self.arena.node_mut(mover).color = self.color_of(victim);

            if mover_original_color.is_black() {
                self.delete_fixup(replacement);
            }

            let removed = self.arena.node(victim).value;
            if let Some(sentinel) = self.arena.sentinel() {
                self.arena.node_mut(sentinel).parent = NodeId::NONE;
            }
            self.arena.free(victim);
            self.len -= 1;
            return Ok(removed);
        }

        if original_color.is_black() {
            self.delete_fixup(replacement);
        }

        let removed = self.arena.node(victim).value;
        if let Some(sentinel) = self.arena.sentinel() {
            self.arena.node_mut(sentinel).parent = NodeId::NONE;
        }
        self.arena.free(victim);
        self.len -= 1;
        Ok(removed)
    }

    fn delete_fixup(&mut self, mut n: NodeId) {
        while !self.parent_of(n).is_none() && self.color_of(n).is_black() {
            let parent = self.parent_of(n);
            let mut sibling = self.sibling(n);

            // Case 1: red sibling. Rotate it out of the way so the
            // remaining cases can assume a Black sibling.
            if self.color_of(sibling).is_red() {
                self.arena.node_mut(sibling).color = Color::Black;
                self.arena.node_mut(parent).color = Color::Red;
                if self.is_left_child(n) {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                sibling = self.sibling(n);
            }

            let sib_left = self.left_of(sibling);
            let sib_right = self.right_of(sibling);

            // Case 2: Black sibling with two Black children. Push the
            // double-black up to the parent.
            if self.color_of(sib_left).is_black() && self.color_of(sib_right).is_black() {
                self.arena.node_mut(sibling).color = Color::Red;
                n = parent;
                continue;
            }

            // Case 3: Black sibling, near (inner) child Red, far (outer)
            // child Black. Rotate so the Red child becomes the new
            // sibling's far child, setting up case 4.
            if self.is_left_child(n) {
                if self.color_of(sib_right).is_black() {
                    self.arena.node_mut(sib_left).color = Color::Black;
                    self.arena.node_mut(sibling).color = Color::Red;
                    self.rotate_right(sibling);
                    sibling = self.sibling(n);
                }
            } else if self.color_of(sib_left).is_black() {
                self.arena.node_mut(sib_right).color = Color::Black;
                self.arena.node_mut(sibling).color = Color::Red;
                self.rotate_left(sibling);
                sibling = self.sibling(n);
            }

            // Case 4: Black sibling, far child Red. One rotation at the
            // parent finishes the fix-up.
            self.arena.node_mut(sibling).color = self.color_of(parent);
            self.arena.node_mut(parent).color = Color::Black;
            if self.is_left_child(n) {
                let sib_right = self.right_of(sibling);
                self.arena.node_mut(sib_right).color = Color::Black;
                self.rotate_left(parent);
            } else {
                let sib_left = self.left_of(sibling);
                self.arena.node_mut(sib_left).color = Color::Black;
                self.rotate_right(parent);
            }
            n = self.root;
            break;
        }
        self.arena.node_mut(n).color = Color::Black;
    }

    // ---- traversal ----

    /// Iterative in-order traversal (no recursion, so tree depth can't blow
    /// the call stack even in a hypothetically unbalanced tree).
    pub(crate) fn traverse_in_order(&self, mut visitor: impl FnMut(K, &V)) {
        let mut stack = Vec::new();
        let mut cur = self.root;
        while !cur.is_none() && !self.is_sentinel(cur) || !stack.is_empty() {
            while !cur.is_none() && !self.is_sentinel(cur) {
                stack.push(cur);
                cur = self.left_of(cur);
            }
            cur = stack.pop().unwrap();
            let node = self.arena.node(cur);
            visitor(node.key, &node.value);
            cur = self.right_of(cur);
        }
    }

    // ---- structural accessors used by Map/Iter ----

    pub(crate) fn key_at(&self, id: NodeId) -> K {
        self.arena.node(id).key
    }

    pub(crate) fn value_at(&self, id: NodeId) -> &V {
        &self.arena.node(id).value
    }

    pub(crate) fn minimum_of_root(&self) -> NodeId {
        if self.root.is_none() {
            NodeId::NONE
        } else {
            self.minimum(self.root)
        }
    }

    pub(crate) fn maximum_of_root(&self) -> NodeId {
        if self.root.is_none() {
            NodeId::NONE
        } else {
            self.maximum(self.root)
        }
    }

    pub(crate) fn successor_of(&self, id: NodeId) -> NodeId {
        self.successor(id)
    }

    pub(crate) fn find_id(&self, key: K) -> NodeId {
        self.find(key)
    }

    // ---- invariant checking, used by tests ----

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        assert!(
            self.root.is_none() || self.color_of(self.root).is_black(),
            "root must be Black"
        );
        if let Some(sentinel) = self.arena.sentinel() {
            assert!(self.color_of(sentinel).is_black(), "sentinel must be Black");
            assert!(self.parent_of(sentinel).is_none(), "sentinel parent must be reset after each op");
        }

        if self.root.is_none() {
            return;
        }

        let mut seen = HashSet::new();
        let black_height = self.check_node(self.root, &mut seen);
        assert!(black_height.is_some(), "black-height mismatch somewhere in the tree");
        assert_eq!(seen.len(), self.len, "live node count must match len()");
    }

    /// Recursively checks BST ordering, no-red-red, parent linkage, and
    /// black-height; returns the subtree's black-height (sentinel-inclusive,
    /// root-exclusive) or `None` on a black-height mismatch.
    #[cfg(test)]
    fn check_node(&self, id: NodeId, seen: &mut std::collections::HashSet<usize>) -> Option<usize> {
        if self.is_sentinel(id) {
            return Some(1);
        }
        seen.insert(id.0);

        let node = self.arena.node(id);
        let left = node.left;
        let right = node.right;

        if !self.is_sentinel(left) {
            assert!(self.parent_of(left) == id, "left child's parent must point back");
            assert!(
                compare_keys(self.key_at(left), node.key) == Ordering::Less,
                "BST ordering violated on the left"
            );
        }
        if !self.is_sentinel(right) {
            assert!(self.parent_of(right) == id, "right child's parent must point back");
            assert!(
                compare_keys(self.key_at(right), node.key) == Ordering::Greater,
                "BST ordering violated on the right"
            );
        }

        if node.color.is_red() {
            assert!(self.color_of(left).is_black(), "red node has a red left child");
            assert!(self.color_of(right).is_black(), "red node has a red right child");
        }

        let left_bh = self.check_node(left, seen)?;
        let right_bh = self.check_node(right, seen)?;
        if left_bh != right_bh {
            return None;
        }
        Some(left_bh + if node.color.is_black() { 1 } else { 0 })
    }
}

#[cfg(test)]
mod property_tests {
    //! Random insert/delete sequences checked against every red-black
    //! invariant after every single step. This lives here rather than in
    //! `tests/` because it needs `check_invariants`, which reaches into node
    //! colour and parent-linkage details that are not (and should not be)
    //! part of the public API — `tests/fuzz.rs` covers the same sequences
    //! from outside, checking only externally observable behaviour.

    use super::*;
    use rand::prelude::*;

    fn run_sequence(seed: u64, steps: usize) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut tree: RbTree<u32, u32> = RbTree::new();
        let mut inserted: Vec<u32> = Vec::new();

        for _ in 0..steps {
            if !inserted.is_empty() && rng.gen_bool(0.3) {
                let idx = rng.gen_range(0..inserted.len());
                let key = inserted.swap_remove(idx);
                tree.delete(key).expect("key was tracked as present");
            } else {
                let key = rng.gen_range(0..(steps as u32 * 2 + 1));
                if tree.insert(key, key).unwrap().is_none() {
                    inserted.push(key);
                }
            }
            tree.check_invariants();
        }
    }

    #[test]
    fn random_sequences_of_varying_length() {
        for seed in 0..100u64 {
            let steps = 1 + (seed as usize * 37) % 1000;
            run_sequence(seed, steps);
        }
    }
}
