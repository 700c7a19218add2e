//! Counting tries: the same engine with addition as the merge operator.
//!
//! Where [`TrieMap`] replaces a node's value, a [`CountTrieMap`] adds the
//! increment to it (starting from zero), which turns the insertion policies
//! into occurrence counters for sequences, their prefixes and their
//! substrings.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{AddAssign, Range};

use crate::error::{key_slice, Result};
use crate::map::{Iter, Step, TrieMap};

/// Counting trie over integer sequences.
pub type IntTrieMap = CountTrieMap<i32>;

/// Counting trie over byte strings.
pub type ByteTrieMap = CountTrieMap<u8>;

/// A trie of running counts keyed by sequences.
///
/// Counts are summed with `N`'s own `+=`, so overflow behaves as it does for
/// `N`: integer types panic in debug builds and wrap in release builds. Pick a
/// count type wide enough for the expected totals; the default `i64` is.
///
/// ```rust
/// use seqtrie::IntTrieMap;
///
/// let mut counts = IntTrieMap::new();
/// counts.inc_all(&[0, 1], 1)?;
/// counts.inc_all(&[0, 2, 3], 1)?;
///
/// assert_eq!(counts.get(&[0])?, Some(2));
/// assert_eq!(counts.get(&[2, 3])?, Some(1));
/// assert_eq!(counts.get(&[1, 2])?, None);
/// # Ok::<(), seqtrie::TrieError>(())
/// ```
#[derive(Clone)]
pub struct CountTrieMap<K, N = i64> {
    trie: TrieMap<K, N>,
}

/// Add `by` to the slot, starting from `N::default()`. Overflow follows `N`.
#[inline]
fn accumulate<N: Copy + Default + AddAssign>(slot: &mut Option<N>, by: N) {
    *slot.get_or_insert_with(N::default) += by;
}

impl<K, N> CountTrieMap<K, N> {
    pub fn new() -> Self {
        Self {
            trie: TrieMap::new(),
        }
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            trie: TrieMap::with_capacity(nodes),
        }
    }

    /// See [`TrieMap::len`]; the same wildcard-removal caveat applies.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Counts in lexicographic key order.
    pub fn iter(&self) -> Iter<'_, K, N> {
        self.trie.iter()
    }

    /// The underlying trie, for read access beyond the counting surface.
    pub fn as_trie(&self) -> &TrieMap<K, N> {
        &self.trie
    }
}

impl<K, N> CountTrieMap<K, N>
where
    K: Ord + Clone,
    N: Copy + Default + AddAssign,
{
    /// Add `by` to the count of the whole key.
    pub fn inc(&mut self, key: &[K], by: N) -> Result<()> {
        self.inc_range(key, 0..key.len(), by)
    }

    pub fn inc_range(&mut self, key: &[K], range: Range<usize>, by: N) -> Result<()> {
        let key = key_slice(key, range)?;
        self.inc_tail(None, key, by);
        Ok(())
    }

    /// Add `by` to the count of `prefix` followed by `key[range]`.
    pub fn inc_with_prefix(
        &mut self,
        prefix: &K,
        key: &[K],
        range: Range<usize>,
        by: N,
    ) -> Result<()> {
        let key = key_slice(key, range)?;
        self.inc_tail(Some(prefix), key, by);
        Ok(())
    }

    fn inc_tail(&mut self, head: Option<&K>, key: &[K], by: N) {
        self.trie.upsert_path(head, key, |slot, step| {
            if step.is_tail {
                accumulate(slot, by);
            }
        });
    }

    /// Add `by` to the count of every prefix of the key.
    pub fn inc_prefixes(&mut self, key: &[K], by: N) -> Result<()> {
        self.inc_prefixes_range(key, 0..key.len(), by)
    }

    pub fn inc_prefixes_range(&mut self, key: &[K], range: Range<usize>, by: N) -> Result<()> {
        let key = key_slice(key, range)?;
        self.inc_path(key, by);
        Ok(())
    }

    fn inc_path(&mut self, key: &[K], by: N) {
        self.trie
            .upsert_path(None, key, |slot, _: Step| accumulate(slot, by));
    }

    /// Add `by` to the count of every contiguous sub-range of the key. Costs
    /// O(m²) for a key of m elements.
    pub fn inc_all(&mut self, key: &[K], by: N) -> Result<()> {
        self.inc_all_range(key, 0..key.len(), by)
    }

    pub fn inc_all_range(&mut self, key: &[K], range: Range<usize>, by: N) -> Result<()> {
        let key = key_slice(key, range)?;
        for i in 0..key.len() {
            self.inc_path(&key[i..], by);
        }
        Ok(())
    }

    /// Count every sub-range of `key[range]`, and every prefix of `prefix`
    /// followed by `key[range]`.
    ///
    /// The `prefix` node's own count is only set when this call creates it,
    /// so it records the first increment rather than the number of calls.
    pub fn inc_all_with_prefix(
        &mut self,
        prefix: &K,
        key: &[K],
        range: Range<usize>,
        by: N,
    ) -> Result<()> {
        let key = key_slice(key, range)?;
        self.trie.upsert_path(Some(prefix), &[], |slot, step| {
            if step.created {
                accumulate(slot, by);
            }
        });
        for i in 0..key.len() {
            self.inc_path(&key[i..], by);
        }
        self.trie.upsert_path(Some(prefix), key, |slot, step| {
            if step.depth > 0 {
                accumulate(slot, by);
            }
        });
        Ok(())
    }

    pub fn get(&self, key: &[K]) -> Result<Option<N>> {
        self.get_range(key, 0..key.len())
    }

    pub fn get_range(&self, key: &[K], range: Range<usize>) -> Result<Option<N>> {
        Ok(self.trie.get_range(key, range)?.copied())
    }

    pub fn contains(&self, key: &[K]) -> Result<bool> {
        self.trie.contains(key)
    }

    pub fn contains_range(&self, key: &[K], range: Range<usize>) -> Result<bool> {
        self.trie.contains_range(key, range)
    }

    /// Wildcard removal, as [`TrieMap::remove`].
    pub fn remove(&mut self, key: &[K]) -> Result<bool> {
        self.trie.remove(key)
    }

    pub fn remove_range(&mut self, key: &[K], range: Range<usize>) -> Result<bool> {
        self.trie.remove_range(key, range)
    }

    pub fn collect_entries(&self) -> BTreeMap<Vec<K>, N> {
        self.trie.collect_entries()
    }
}

impl<K, N> Default for CountTrieMap<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + fmt::Debug, N: fmt::Debug> fmt::Debug for CountTrieMap<K, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.trie, f)
    }
}
