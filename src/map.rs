//! The trie engine.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use crate::arena::{NodeArena, NodeId};
use crate::error::{key_slice, Result};
use crate::level::{Level, LevelIter};

/// Position of a node on the path being written, handed to merge callbacks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Step {
    /// Zero for the first element of the path.
    pub(crate) depth: usize,
    /// The node holds the last element of the path.
    pub(crate) is_tail: bool,
    /// The node did not exist before this walk.
    pub(crate) created: bool,
}

/// A map keyed by sequences of ordered elements.
///
/// Every prefix of a stored key is a node of the trie and may carry a value
/// of its own. Each depth indexes its nodes with an insertion-ordered binary
/// search tree over the possible next elements.
///
/// Keys are borrowed from caller arrays; the `*_range` forms address a
/// sub-range of the array so the same backing storage can be reused for
/// several keys without copying.
///
/// # Example
///
/// ```rust
/// use seqtrie::TrieMap;
///
/// let mut map: TrieMap<u32, &str> = TrieMap::new();
/// map.add(&[1, 2, 3], "abc")?;
/// map.add_prefixes(&[7, 8], "p")?;
///
/// assert_eq!(map.get(&[1, 2, 3])?, Some(&"abc"));
/// assert_eq!(map.get(&[1, 2])?, None);
/// assert!(map.contains(&[1, 2])?);
/// assert_eq!(map.get(&[7])?, Some(&"p"));
///
/// // Range form: key is `buf[1..3]`.
/// let buf = [9, 1, 2, 9];
/// assert!(map.contains_range(&buf, 1..3)?);
/// # Ok::<(), seqtrie::TrieError>(())
/// ```
#[derive(Clone)]
pub struct TrieMap<K, V> {
    arena: NodeArena<K, V>,
    root: Level,
    /// Absent -> present value transitions minus one per successful removal.
    size: usize,
}

impl<K, V> TrieMap<K, V> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `nodes` trie nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(nodes),
            root: Level::default(),
            size: 0,
        }
    }

    /// Number of stored values, as tracked by insertions and removals.
    ///
    /// Every removal that finds its path subtracts exactly one, whether or
    /// not that node held a value, and never accounts for the keys discarded
    /// below it. The count saturates at zero. Use [`iter`](Self::iter) for
    /// an exact count of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of trie nodes currently allocated, with or without values.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    pub fn memory_usage(&self) -> usize {
        self.arena.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    /// All entries in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arena: &self.arena,
            levels: vec![self.root.iter(&self.arena)],
            path: Vec::new(),
        }
    }

    #[inline]
    fn level_of(&self, parent: Option<NodeId>) -> Level {
        match parent {
            None => self.root,
            Some(id) => self.arena[id].children,
        }
    }

    #[inline]
    fn set_level(&mut self, parent: Option<NodeId>, level: Level) {
        match parent {
            None => self.root = level,
            Some(id) => self.arena[id].children = level,
        }
    }
}

impl<K: Ord + Clone, V> TrieMap<K, V> {
    /// Walk `head` (if any) followed by `key` from the root, creating missing
    /// nodes, and let `merge` update the value slot of every node on the way.
    ///
    /// `size` follows each slot going from absent to present or back. The
    /// path must be non-empty.
    pub(crate) fn upsert_path<F>(&mut self, head: Option<&K>, key: &[K], mut merge: F)
    where
        F: FnMut(&mut Option<V>, Step),
    {
        let len = key.len() + usize::from(head.is_some());
        debug_assert!(len > 0);

        let mut parent = None;
        for (depth, element) in head.into_iter().chain(key).enumerate() {
            let mut level = self.level_of(parent);
            let (id, created) = level.insert_or_get(&mut self.arena, element);
            if created {
                self.set_level(parent, level);
            }

            let slot = &mut self.arena[id].value;
            let was_present = slot.is_some();
            merge(
                &mut *slot,
                Step {
                    depth,
                    is_tail: depth + 1 == len,
                    created,
                },
            );
            match (was_present, slot.is_some()) {
                (false, true) => self.size += 1,
                (true, false) => self.size = self.size.saturating_sub(1),
                _ => {}
            }
            parent = Some(id);
        }
    }

    /// Node at the end of `head` + `key`, if the whole path exists.
    pub(crate) fn find_path(&self, head: Option<&K>, key: &[K]) -> Option<NodeId> {
        let mut level = self.root;
        let mut found = None;
        for element in head.into_iter().chain(key) {
            let id = level.get(&self.arena, element)?;
            level = self.arena[id].children;
            found = Some(id);
        }
        found
    }

    /// Store `value` against the whole key, replacing any previous value.
    pub fn add(&mut self, key: &[K], value: V) -> Result<()> {
        self.add_range(key, 0..key.len(), value)
    }

    /// Store `value` against `key[range]`, replacing any previous value.
    pub fn add_range(&mut self, key: &[K], range: Range<usize>, value: V) -> Result<()> {
        let key = key_slice(key, range)?;
        self.store_tail(None, key, value);
        Ok(())
    }

    /// Store `value` against `prefix` followed by `key[range]`.
    pub fn add_with_prefix(
        &mut self,
        prefix: &K,
        key: &[K],
        range: Range<usize>,
        value: V,
    ) -> Result<()> {
        let key = key_slice(key, range)?;
        self.store_tail(Some(prefix), key, value);
        Ok(())
    }

    fn store_tail(&mut self, head: Option<&K>, key: &[K], value: V) {
        let mut value = Some(value);
        self.upsert_path(head, key, |slot, step| {
            if step.is_tail {
                *slot = value.take();
            }
        });
    }

    /// Store `value` against the whole key unless a value is already there.
    /// Returns whether the value was stored.
    pub fn add_if_absent(&mut self, key: &[K], value: V) -> Result<bool> {
        self.add_if_absent_range(key, 0..key.len(), value)
    }

    pub fn add_if_absent_range(
        &mut self,
        key: &[K],
        range: Range<usize>,
        value: V,
    ) -> Result<bool> {
        let key = key_slice(key, range)?;
        let mut value = Some(value);
        let mut stored = false;
        self.upsert_path(None, key, |slot, step| {
            if step.is_tail && slot.is_none() {
                *slot = value.take();
                stored = true;
            }
        });
        Ok(stored)
    }

    /// Whether a node exists for every element of the key. Value presence
    /// does not matter.
    pub fn contains(&self, key: &[K]) -> Result<bool> {
        self.contains_range(key, 0..key.len())
    }

    pub fn contains_range(&self, key: &[K], range: Range<usize>) -> Result<bool> {
        let key = key_slice(key, range)?;
        Ok(self.find_path(None, key).is_some())
    }

    pub fn get(&self, key: &[K]) -> Result<Option<&V>> {
        self.get_range(key, 0..key.len())
    }

    pub fn get_range(&self, key: &[K], range: Range<usize>) -> Result<Option<&V>> {
        let key = key_slice(key, range)?;
        Ok(self
            .find_path(None, key)
            .and_then(|id| self.arena[id].value.as_ref()))
    }

    pub fn get_mut(&mut self, key: &[K]) -> Result<Option<&mut V>> {
        self.get_mut_range(key, 0..key.len())
    }

    pub fn get_mut_range(&mut self, key: &[K], range: Range<usize>) -> Result<Option<&mut V>> {
        let key = key_slice(key, range)?;
        Ok(match self.find_path(None, key) {
            Some(id) => self.arena[id].value.as_mut(),
            None => None,
        })
    }

    /// Wildcard removal: clears the key's value and discards every key that
    /// has it as a prefix. Returns `false` if the path does not exist.
    ///
    /// ```rust
    /// use seqtrie::TrieMap;
    ///
    /// let mut map = TrieMap::new();
    /// map.add(&[1, 2, 3], "A")?;
    /// map.add(&[1, 2, 3, 4], "B")?;
    /// assert!(map.remove(&[1, 2, 3])?);
    /// assert_eq!(map.get(&[1, 2, 3, 4])?, None);
    /// # Ok::<(), seqtrie::TrieError>(())
    /// ```
    pub fn remove(&mut self, key: &[K]) -> Result<bool> {
        self.remove_range(key, 0..key.len())
    }

    pub fn remove_range(&mut self, key: &[K], range: Range<usize>) -> Result<bool> {
        let key = key_slice(key, range)?;
        let Some(id) = self.find_path(None, key) else {
            return Ok(false);
        };

        let (_, detached) = self.arena[id].remove();
        let reclaimed = self.arena.free_level(detached);
        self.size = self.size.saturating_sub(1);
        tracing::trace!(depth = key.len(), reclaimed, "removed key subtree");
        Ok(true)
    }
}

impl<K: Ord + Clone, V: Clone> TrieMap<K, V> {
    /// Store `value` against every prefix of the key, the key included.
    pub fn add_prefixes(&mut self, key: &[K], value: V) -> Result<()> {
        self.add_prefixes_range(key, 0..key.len(), value)
    }

    pub fn add_prefixes_range(&mut self, key: &[K], range: Range<usize>, value: V) -> Result<()> {
        let key = key_slice(key, range)?;
        self.store_prefixes(key, &value);
        Ok(())
    }

    fn store_prefixes(&mut self, key: &[K], value: &V) {
        self.upsert_path(None, key, |slot, _| *slot = Some(value.clone()));
    }

    /// Store `value` against every contiguous sub-range of the key. Costs
    /// O(m²) for a key of m elements.
    pub fn add_all(&mut self, key: &[K], value: V) -> Result<()> {
        self.add_all_range(key, 0..key.len(), value)
    }

    pub fn add_all_range(&mut self, key: &[K], range: Range<usize>, value: V) -> Result<()> {
        let key = key_slice(key, range)?;
        for i in 0..key.len() {
            self.store_prefixes(&key[i..], &value);
        }
        Ok(())
    }

    /// Like [`add_all_range`](Self::add_all_range), and additionally store
    /// `value` against every prefix of `prefix` followed by `key[range]`.
    ///
    /// The `prefix` node itself only receives `value` when this call creates
    /// it; an existing prefix node keeps its value.
    pub fn add_all_with_prefix(
        &mut self,
        prefix: &K,
        key: &[K],
        range: Range<usize>,
        value: V,
    ) -> Result<()> {
        let key = key_slice(key, range)?;
        self.upsert_path(Some(prefix), &[], |slot, step| {
            if step.created {
                *slot = Some(value.clone());
            }
        });
        for i in 0..key.len() {
            self.store_prefixes(&key[i..], &value);
        }
        self.upsert_path(Some(prefix), key, |slot, step| {
            if step.depth > 0 {
                *slot = Some(value.clone());
            }
        });
        Ok(())
    }

    /// Snapshot of every entry, keyed by the full element sequence.
    pub fn collect_entries(&self) -> BTreeMap<Vec<K>, V> {
        self.iter().map(|(k, v)| (k, v.clone())).collect()
    }
}

impl<K, V> Default for TrieMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for TrieMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: Clone, V> IntoIterator for &'a TrieMap<K, V> {
    type Item = (Vec<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Depth-first walk over a [`TrieMap`], yielding `(key, value)` for every node
/// that carries a value.
///
/// Within a level siblings come in ascending order, and a node is yielded
/// before the keys that extend it, so keys arrive in lexicographic order.
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    /// One inorder cursor per depth currently being walked.
    levels: Vec<LevelIter<'a, K, V>>,
    /// Partial keys from the root down to the last node entered.
    path: Vec<&'a K>,
}

impl<'a, K: Clone, V> Iterator for Iter<'a, K, V> {
    type Item = (Vec<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.levels.len().checked_sub(1)?;
            match self.levels[depth].next() {
                Some(node) => {
                    // Drop whatever the previous sibling left below this depth.
                    self.path.truncate(depth);
                    self.path.push(&node.partial_key);
                    self.levels.push(node.children.iter(self.arena));
                    if let Some(value) = &node.value {
                        let key = self.path.iter().map(|&k| k.clone()).collect();
                        return Some((key, value));
                    }
                }
                None => {
                    self.levels.pop();
                }
            }
        }
    }
}
