//! Arena slot and node representation.
//!
//! Rather than a cyclic `parent`/`left`/`right` pointer graph, nodes are
//! addressed by `NodeId`, an index into the tree's arena
//! (`crate::arena::Arena`). This sidesteps the aliasing and lifetime
//! problems a raw pointer graph would create in Rust, at the cost of a
//! bounds-checked indirection on every traversal step.

use crate::color::Color;

/// A handle to a node living in some `Arena<K, V>`. Indices are only
/// meaningful relative to the arena that produced them; mixing handles
/// across two different trees is a logic error (not memory-unsafe, since
/// the arena is bounds-checked, but it will silently read garbage nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Placeholder used for "no parent" (the root's parent). Distinct from
    /// the sentinel, which stands for "no child" — the root legitimately has
    /// no parent, but every present node has two children, even if both are
    /// the sentinel.
    pub(crate) const NONE: NodeId = NodeId(usize::MAX);

    #[inline]
    pub(crate) fn is_none(self) -> bool {
        self == NodeId::NONE
    }
}

/// A live red-black tree node.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) color: Color,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

/// One slot in the arena: either a live node, or a link in the free list of
/// reclaimed slots (so that repeated insert/delete cycles don't grow the
/// backing `Vec` without bound).
#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    Occupied(Node<K, V>),
    Free { next_free: NodeId },
}
