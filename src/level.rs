//! Per-depth index over sibling nodes.
//!
//! A level is an unbalanced binary search tree ordered by partial key. Nodes
//! are attached as leaves in insertion order and never rotated, so a level
//! fed strictly increasing keys degenerates into a list. Lookups stay correct
//! regardless; only their cost grows.

use std::cmp::Ordering;

use crate::arena::{NodeArena, NodeId};
use crate::node::TrieNode;

/// Root handle of one level's search tree.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Level {
    root: NodeId,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            root: NodeId::NULL,
        }
    }
}

impl Level {
    #[inline]
    pub(crate) fn root(self) -> NodeId {
        self.root
    }

    #[inline]
    pub(crate) fn is_empty(self) -> bool {
        self.root.is_null()
    }

    /// Exact-match lookup of a sibling by partial key.
    pub(crate) fn get<K: Ord, V>(self, arena: &NodeArena<K, V>, key: &K) -> Option<NodeId> {
        let mut cur = self.root;
        while !cur.is_null() {
            let node = &arena[cur];
            cur = match key.cmp(&node.partial_key) {
                Ordering::Equal => return Some(cur),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Return the sibling holding `key`, attaching a fresh valueless node as a
    /// new search-tree leaf if there is none. The flag reports whether the
    /// node was created.
    pub(crate) fn insert_or_get<K: Ord + Clone, V>(
        &mut self,
        arena: &mut NodeArena<K, V>,
        key: &K,
    ) -> (NodeId, bool) {
        if self.root.is_null() {
            let id = arena.alloc(TrieNode::new(key.clone()));
            self.root = id;
            return (id, true);
        }

        let mut cur = self.root;
        loop {
            let node = &arena[cur];
            let ord = key.cmp(&node.partial_key);
            let next = match ord {
                Ordering::Equal => return (cur, false),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
            if next.is_null() {
                let id = arena.alloc(TrieNode::new(key.clone()));
                let parent = &mut arena[cur];
                if ord == Ordering::Less {
                    parent.left = id;
                } else {
                    parent.right = id;
                }
                return (id, true);
            }
            cur = next;
        }
    }

    /// Siblings in ascending partial-key order.
    pub(crate) fn iter<K, V>(self, arena: &NodeArena<K, V>) -> LevelIter<'_, K, V> {
        LevelIter {
            arena,
            stack: Vec::new(),
            cursor: self.root,
        }
    }
}

/// Inorder walk of one level, driven by its own explicit stack.
///
/// Each iterator owns its traversal state, so any number of them may run
/// over the same level, nested or interleaved.
pub(crate) struct LevelIter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    stack: Vec<NodeId>,
    /// Next subtree whose leftmost spine has not been pushed yet.
    cursor: NodeId,
}

impl<'a, K, V> Iterator for LevelIter<'a, K, V> {
    type Item = &'a TrieNode<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.cursor.is_null() {
            self.stack.push(self.cursor);
            self.cursor = self.arena[self.cursor].left;
        }
        let id = self.stack.pop()?;
        let node = &self.arena[id];
        self.cursor = node.right;
        Some(node)
    }
}
