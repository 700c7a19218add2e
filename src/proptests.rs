use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::{BTreeMap, BTreeSet};

/// Reference model: a flat map of stored values plus the set of paths that
/// exist in the trie, with or without a value.
#[derive(Default)]
struct Model {
    values: BTreeMap<Vec<u8>, u32>,
    paths: BTreeSet<Vec<u8>>,
    size: usize,
}

impl Model {
    fn touch(&mut self, key: &[u8]) {
        for end in 1..=key.len() {
            self.paths.insert(key[..end].to_vec());
        }
    }

    fn set(&mut self, key: &[u8], value: u32) {
        if self.values.insert(key.to_vec(), value).is_none() {
            self.size += 1;
        }
    }

    fn add(&mut self, key: &[u8], value: u32) {
        self.touch(key);
        self.set(key, value);
    }

    fn add_if_absent(&mut self, key: &[u8], value: u32) -> bool {
        self.touch(key);
        if self.values.contains_key(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    fn add_prefixes(&mut self, key: &[u8], value: u32) {
        self.touch(key);
        for end in 1..=key.len() {
            self.set(&key[..end], value);
        }
    }

    fn add_all(&mut self, key: &[u8], value: u32) {
        for start in 0..key.len() {
            self.add_prefixes(&key[start..], value);
        }
    }

    fn remove(&mut self, key: &[u8]) -> bool {
        if !self.paths.contains(key) {
            return false;
        }
        self.values.remove(key);
        self.size = self.size.saturating_sub(1);
        let below = |k: &Vec<u8>| k.len() > key.len() && k.starts_with(key);
        self.values.retain(|k, _| !below(k));
        self.paths.retain(|k| !below(k));
        true
    }
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // Small alphabet and short keys so paths collide often.
    prop::collection::vec(0u8..4, 1..=5)
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Add(#[proptest(strategy = "key_strategy()")] Vec<u8>, u32),
    AddIfAbsent(#[proptest(strategy = "key_strategy()")] Vec<u8>, u32),
    AddPrefixes(#[proptest(strategy = "key_strategy()")] Vec<u8>, u32),
    AddAll(#[proptest(strategy = "key_strategy()")] Vec<u8>, u32),
    Remove(#[proptest(strategy = "key_strategy()")] Vec<u8>),
    Get(#[proptest(strategy = "key_strategy()")] Vec<u8>),
}

fn check_against_model(t: &TrieMap<u8, u32>, m: &Model) -> std::result::Result<(), TestCaseError> {
    prop_assert_eq!(t.len(), m.size);
    prop_assert_eq!(t.node_count(), m.paths.len());
    prop_assert_eq!(&t.collect_entries(), &m.values);
    for path in &m.paths {
        prop_assert!(t.contains(path).unwrap());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let mut t: TrieMap<u8, u32> = TrieMap::new();
        let mut m = Model::default();

        for op in ops {
            match op {
                Op::Add(key, value) => {
                    t.add(&key, value).unwrap();
                    m.add(&key, value);
                }
                Op::AddIfAbsent(key, value) => {
                    prop_assert_eq!(t.add_if_absent(&key, value).unwrap(), m.add_if_absent(&key, value));
                }
                Op::AddPrefixes(key, value) => {
                    t.add_prefixes(&key, value).unwrap();
                    m.add_prefixes(&key, value);
                }
                Op::AddAll(key, value) => {
                    t.add_all(&key, value).unwrap();
                    m.add_all(&key, value);
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key).unwrap(), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key).unwrap(), m.values.get(&key));
                    prop_assert_eq!(t.contains(&key).unwrap(), m.paths.contains(&key));
                }
            }
        }

        check_against_model(&t, &m)?;
    }

    #[test]
    fn prop_range_matches_slice(
        buf in prop::collection::vec(0u8..4, 1..=12),
        bounds in (0usize..12, 1usize..=12),
        value in any::<u32>(),
    ) {
        let (start, end) = bounds;
        let mut by_range: TrieMap<u8, u32> = TrieMap::new();
        let mut by_slice: TrieMap<u8, u32> = TrieMap::new();

        let result = by_range.add_all_range(&buf, start..end, value);
        if start < end && end <= buf.len() {
            prop_assert!(result.is_ok());
            by_slice.add_all(&buf[start..end], value).unwrap();
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(by_range.node_count(), 0);
        }
        prop_assert_eq!(by_range.collect_entries(), by_slice.collect_entries());
        prop_assert_eq!(by_range.len(), by_slice.len());
    }

    #[test]
    fn prop_inc_all_counts_substrings(keys in prop::collection::vec(key_strategy(), 1..20)) {
        let mut t = ByteTrieMap::new();
        let mut expected: BTreeMap<Vec<u8>, i64> = BTreeMap::new();
        for key in &keys {
            t.inc_all(key, 1).unwrap();
            for i in 0..key.len() {
                for j in i + 1..=key.len() {
                    *expected.entry(key[i..j].to_vec()).or_default() += 1;
                }
            }
        }
        prop_assert_eq!(t.collect_entries(), expected);
    }

    #[test]
    fn prop_iter_sorted(keys in prop::collection::vec(prop::collection::vec(any::<u16>(), 1..6), 0..100)) {
        let mut t: TrieMap<u16, usize> = TrieMap::new();
        for (i, key) in keys.iter().enumerate() {
            t.add(key, i).unwrap();
        }
        let got: Vec<Vec<u16>> = t.iter().map(|(k, _)| k).collect();
        let mut sorted = got.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(got, sorted);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<Vec<u8>> = vec![
        vec![1],
        vec![2],
        vec![3],
        vec![1, 1],
        vec![1, 2],
        vec![2, 1, 3],
    ];
    let expected: BTreeMap<Vec<u8>, u32> = keys
        .iter()
        .map(|k| (k.clone(), k.iter().map(|&b| u32::from(b)).sum()))
        .collect();

    for_each_permutation(&keys, |perm| {
        let mut t: TrieMap<u8, u32> = TrieMap::new();
        for k in &perm {
            t.add(k, k.iter().map(|&b| u32::from(b)).sum()).unwrap();
        }
        assert_eq!(t.len(), keys.len());
        assert_eq!(t.collect_entries(), expected);
    });
}

#[test]
fn exhaustive_inc_order_small_set() {
    let keys: Vec<Vec<i32>> = vec![vec![0, 1], vec![0, 2, 3], vec![2, 3], vec![3, 0]];

    let mut baseline = IntTrieMap::new();
    for k in &keys {
        baseline.inc_all(k, 1).unwrap();
    }
    let expected = baseline.collect_entries();

    for_each_permutation(&keys, |perm| {
        let mut t = IntTrieMap::new();
        for k in &perm {
            t.inc_all(k, 1).unwrap();
        }
        assert_eq!(t.collect_entries(), expected);
        assert_eq!(t.len(), baseline.len());
    });
}

#[test]
fn randomized_add_remove_get() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(3);
    let mut t: TrieMap<u8, u32> = TrieMap::new();
    let mut m = Model::default();

    for _ in 0..20_000 {
        let len = rng.gen_range(1..=6);
        let key: Vec<u8> = (0..len).map(|_| rng.gen_range(0..5)).collect();
        match rng.gen_range(0..100) {
            0..=39 => {
                let v: u32 = rng.gen();
                t.add(&key, v).unwrap();
                m.add(&key, v);
            }
            40..=49 => {
                let v: u32 = rng.gen();
                t.add_prefixes(&key, v).unwrap();
                m.add_prefixes(&key, v);
            }
            50..=59 => {
                assert_eq!(t.remove(&key).unwrap(), m.remove(&key));
            }
            _ => {
                assert_eq!(t.get(&key).unwrap(), m.values.get(&key));
            }
        }
    }

    assert_eq!(t.len(), m.size);
    assert_eq!(t.node_count(), m.paths.len());
    assert_eq!(t.collect_entries(), m.values);
}
