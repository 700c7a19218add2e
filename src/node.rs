use crate::arena::NodeId;
use crate::level::Level;

/// One element of a key sequence, stored at one trie depth.
///
/// A node plays two roles at once: it is an entry of its parent's [`Level`]
/// (linked to its siblings through `left`/`right`), and it owns the level
/// holding the next element of every key that runs through it.
#[derive(Clone, Debug)]
pub(crate) struct TrieNode<K, V> {
    pub(crate) partial_key: K,
    /// `None` when no key ends here.
    pub(crate) value: Option<V>,
    /// Sibling subtree with smaller partial keys.
    pub(crate) left: NodeId,
    /// Sibling subtree with larger partial keys.
    pub(crate) right: NodeId,
    pub(crate) children: Level,
}

impl<K, V> TrieNode<K, V> {
    pub(crate) fn new(partial_key: K) -> Self {
        Self {
            partial_key,
            value: None,
            left: NodeId::NULL,
            right: NodeId::NULL,
            children: Level::default(),
        }
    }

    /// Clear the value and detach the whole child level.
    ///
    /// The node keeps its place among its siblings; the detached level is
    /// handed back so its slots can be reclaimed.
    pub(crate) fn remove(&mut self) -> (Option<V>, Level) {
        (self.value.take(), std::mem::take(&mut self.children))
    }
}
