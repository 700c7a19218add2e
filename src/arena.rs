//! Slot arena owning every trie node of one map.
//!
//! Nodes refer to each other through 32-bit [`NodeId`] handles instead of
//! boxes, so the tree-of-trees has a single owner and no reference cycles.
//! Slots released by wildcard removal go onto a free list and are reused by
//! later insertions.

use std::ops::{Index, IndexMut};

use crate::level::Level;
use crate::node::TrieNode;

/// Handle to a node slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub(crate) const NULL: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_null());
        self.0 as usize
    }
}

#[derive(Clone)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<TrieNode<K, V>>>,
    /// Vacant slots, reused LIFO.
    free: Vec<NodeId>,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    pub(crate) fn with_capacity(nodes: usize) -> Self {
        Self {
            slots: Vec::with_capacity(nodes),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Option<TrieNode<K, V>>>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Vacant slots at the tail can be dropped outright.
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.free.retain(|id| id.index() < len);
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    pub(crate) fn alloc(&mut self, node: TrieNode<K, V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.index()].is_none());
            self.slots[id.index()] = Some(node);
            return id;
        }
        assert!(
            self.slots.len() < NodeId::NULL.0 as usize,
            "node arena exhausted"
        );
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    /// Release every node reachable from `level`: the siblings of its search
    /// tree and, transitively, all of their child levels. Returns the number
    /// of slots reclaimed.
    pub(crate) fn free_level(&mut self, level: Level) -> usize {
        let mut reclaimed = 0;
        let mut stack = vec![level.root()];
        while let Some(id) = stack.pop() {
            if id.is_null() {
                continue;
            }
            let Some(node) = self.slots[id.index()].take() else {
                debug_assert!(false, "double free of node slot {}", id.0);
                continue;
            };
            stack.push(node.left);
            stack.push(node.right);
            stack.push(node.children.root());
            self.free.push(id);
            reclaimed += 1;
        }
        reclaimed
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = TrieNode<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        self.slots[id.index()]
            .as_ref()
            .expect("node handle refers to a vacant slot")
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.slots[id.index()]
            .as_mut()
            .expect("node handle refers to a vacant slot")
    }
}
