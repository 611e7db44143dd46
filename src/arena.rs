//! Flat node storage backing a single tree, with free-slot recycling and a
//! lazily-created shared sentinel.

use crate::color::Color;
use crate::error::TreeError;
use crate::node::{Node, NodeId, Slot};

pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: NodeId,
    /// Created on the first real insertion into an empty tree. `None`
    /// before that point — an empty tree has nothing that could point at a
    /// sentinel yet.
    sentinel: Option<NodeId>,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn new() -> Self {
        Arena { slots: Vec::new(), free_head: NodeId::NONE, sentinel: None }
    }

    pub(crate) fn sentinel(&self) -> Option<NodeId> {
        self.sentinel
    }

    #[inline]
    pub(crate) fn is_sentinel(&self, id: NodeId) -> bool {
        self.sentinel == Some(id)
    }

    /// Create the tree's sentinel, if it doesn't already exist. Idempotent.
    ///
    /// The sentinel is a Black node whose own left/right/parent all point
    /// at itself; this lets every structural query (`sibling`, `uncle`, ...)
    /// run uniformly without special-casing "the sentinel has no parent"
    /// anywhere else.
    pub(crate) fn ensure_sentinel(&mut self) -> Result<NodeId, TreeError>
    where
        K: Default,
        V: Default,
    {
        if let Some(id) = self.sentinel {
            return Ok(id);
        }
        let id = self.alloc(Node {
            color: Color::Black,
            key: K::default(),
            value: V::default(),
            parent: NodeId::NONE,
            left: NodeId::NONE,
            right: NodeId::NONE,
        })?;
        // Self-reference once the id is known.
        {
            let slot = self.occupied_mut(id);
            slot.left = id;
            slot.right = id;
        }
        self.sentinel = Some(id);
        Ok(id)
    }

    /// Allocate a new node, reusing a freed slot if one is available,
    /// otherwise fallibly growing the backing `Vec`.
    pub(crate) fn alloc(&mut self, node: Node<K, V>) -> Result<NodeId, TreeError> {
        if !self.free_head.is_none() {
            let id = self.free_head;
            let next_free = match &self.slots[id.0] {
                Slot::Free { next_free } => *next_free,
                Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
            };
            self.free_head = next_free;
            self.slots[id.0] = Slot::Occupied(node);
            return Ok(id);
        }

        self.slots
            .try_reserve(1)
            .map_err(|_| TreeError::AllocFailed)?;
        self.slots.push(Slot::Occupied(node));
        Ok(NodeId(self.slots.len() - 1))
    }

    /// Release a node's slot back onto the free list. Must not be called on
    /// the sentinel.
    pub(crate) fn free(&mut self, id: NodeId) {
        debug_assert!(!self.is_sentinel(id), "attempted to free the sentinel");
        self.slots[id.0] = Slot::Free { next_free: self.free_head };
        self.free_head = id;
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match &self.slots[id.0] {
            Slot::Occupied(n) => n,
            Slot::Free { .. } => panic!("dangling NodeId {} points at a freed slot", id.0),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        self.occupied_mut(id)
    }

    #[inline]
    fn occupied_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match &mut self.slots[id.0] {
            Slot::Occupied(n) => n,
            Slot::Free { .. } => panic!("dangling NodeId {} points at a freed slot", id.0),
        }
    }
}
