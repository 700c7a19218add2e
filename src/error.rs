//! Error types for trie operations.

use std::ops::Range;

use thiserror::Error;

/// Result type for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Contract violations detected before a trie is touched.
///
/// A key that is simply not present is never an error; lookups report that
/// with `None` or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrieError {
    /// The key range selects no elements (`end <= start`).
    #[error("empty key range {start}..{end}")]
    EmptyRange {
        /// First index of the range.
        start: usize,
        /// One past the last index of the range.
        end: usize,
    },

    /// The key range reaches past the end of the backing array.
    #[error("key range {start}..{end} out of bounds for key of length {len}")]
    OutOfBounds {
        /// First index of the range.
        start: usize,
        /// One past the last index of the range.
        end: usize,
        /// Length of the backing array.
        len: usize,
    },
}

/// Borrow `key[range]`, rejecting empty and out-of-bounds ranges.
pub(crate) fn key_slice<K>(key: &[K], range: Range<usize>) -> Result<&[K]> {
    let Range { start, end } = range;
    if end <= start {
        tracing::debug!(start, end, "rejecting empty key range");
        return Err(TrieError::EmptyRange { start, end });
    }
    if end > key.len() {
        tracing::debug!(start, end, len = key.len(), "rejecting out-of-bounds key range");
        return Err(TrieError::OutOfBounds {
            start,
            end,
            len: key.len(),
        });
    }
    Ok(&key[start..end])
}
