//! # seqtrie
//!
//! An in-memory map keyed by sequences of ordered elements, where every
//! prefix of a key is itself addressable and may carry a value.
//!
//! Each trie depth indexes its nodes with an insertion-ordered binary search
//! tree over the possible next elements, so elements only need [`Ord`]. Keys
//! are read from caller arrays, either whole or as a `start..end` sub-range,
//! so one backing buffer can serve many lookups without copying.
//!
//! Insertion policies:
//! - tail only ([`TrieMap::add`], [`TrieMap::add_if_absent`]), O(m)
//! - every prefix ([`TrieMap::add_prefixes`]), O(m)
//! - every contiguous sub-range ([`TrieMap::add_all`]), O(m²)
//!
//! [`CountTrieMap`] runs the same policies with addition instead of
//! replacement, for counting sequences and their prefixes or substrings.
//!
//! Removal is a wildcard: removing a key discards every key it prefixes.
//!
//! ## Example
//!
//! ```rust
//! use seqtrie::{ByteTrieMap, TrieMap};
//!
//! let mut map: TrieMap<u8, &str> = TrieMap::new();
//! map.add(&[1, 2, 3], "A")?;
//! map.add(&[1, 2, 3, 4], "B")?;
//! map.add_all(&[7, 8], "C")?;
//!
//! assert_eq!(map.get(&[1, 2, 3, 4])?, Some(&"B"));
//! assert_eq!(map.get(&[8])?, Some(&"C"));
//!
//! map.remove(&[1, 2, 3])?;
//! assert_eq!(map.get(&[1, 2, 3, 4])?, None);
//!
//! let mut counts = ByteTrieMap::new();
//! counts.inc_all(b"abab", 1)?;
//! assert_eq!(counts.get(b"ab")?, Some(2));
//! # Ok::<(), seqtrie::TrieError>(())
//! ```

#![forbid(unsafe_code)]

mod arena;
mod count;
mod error;
mod level;
mod map;
mod node;

pub use count::{ByteTrieMap, CountTrieMap, IntTrieMap};
pub use error::{Result, TrieError};
pub use map::{Iter, TrieMap};

#[cfg(test)]
mod proptests;
