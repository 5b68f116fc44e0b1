#![cfg(test)]

// Property tests for the table cores, kept inside the crate so they can
// check slot and chain invariants directly.

use crate::chained::ChainedTable;
use crate::fixed::StaticTable;
use crate::hash::{FixedState, Fnv1aState, ModuloState};
use crate::open::OpenTable;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys and op lists
// shrink in length.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    InsertWith(usize, i32),
    Upsert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Rehash(usize),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::InsertWith(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Upsert(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => "[a-z]{0,4}".prop_map(Op::Contains),
            1 => (1usize..24).prop_map(Op::Rehash),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Shared driver: `T` is any table core wrapped in this small adapter so the
// same model comparison runs over every kind.
trait Table {
    fn insert(&mut self, k: Key, v: i32) -> bool;
    fn insert_with(&mut self, k: Key, v: i32, calls: &mut u32) -> bool;
    fn upsert(&mut self, k: Key, v: i32);
    fn remove(&mut self, k: &str) -> Option<(Key, i32)>;
    fn get(&self, k: &str) -> Option<i32>;
    fn contains(&self, k: &str) -> bool;
    /// Returns false when the table refuses the new size.
    fn rehash(&mut self, n: usize) -> bool;
    fn pairs(&self) -> Vec<(Key, i32)>;
    fn pairs_rev(&self) -> Vec<(Key, i32)>;
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn check(&self) -> Result<(), TestCaseError>;
}

impl<S: std::hash::BuildHasher> Table for OpenTable<Key, i32, S> {
    fn insert(&mut self, k: Key, v: i32) -> bool {
        OpenTable::insert(self, k, v)
    }
    fn insert_with(&mut self, k: Key, v: i32, calls: &mut u32) -> bool {
        OpenTable::insert_with(self, k, || {
            *calls += 1;
            v
        })
    }
    fn upsert(&mut self, k: Key, v: i32) {
        *self.get_or_insert_with(k, || 0) = v;
    }
    fn remove(&mut self, k: &str) -> Option<(Key, i32)> {
        self.remove_entry(k)
    }
    fn get(&self, k: &str) -> Option<i32> {
        self.get_key_value(k).map(|(_, v)| *v)
    }
    fn contains(&self, k: &str) -> bool {
        self.contains_key(k)
    }
    fn rehash(&mut self, n: usize) -> bool {
        self.try_rehash(n).is_ok()
    }
    fn pairs(&self) -> Vec<(Key, i32)> {
        self.iter().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn pairs_rev(&self) -> Vec<(Key, i32)> {
        self.iter().rev().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn clear(&mut self) {
        OpenTable::clear(self)
    }
    fn len(&self) -> usize {
        OpenTable::len(self)
    }
    fn check(&self) -> Result<(), TestCaseError> {
        prop_assert!(self.len() <= self.capacity());
        prop_assert!(self.len() + self.tombstones() <= self.capacity());
        prop_assert_eq!(self.load_factor(), self.len() as f32 / self.capacity() as f32);
        for e in self.iter() {
            prop_assert_eq!(e.hash(), self.hash(e.key()));
        }
        Ok(())
    }
}

impl<S: std::hash::BuildHasher> Table for ChainedTable<Key, i32, S> {
    fn insert(&mut self, k: Key, v: i32) -> bool {
        ChainedTable::insert(self, k, v)
    }
    fn insert_with(&mut self, k: Key, v: i32, calls: &mut u32) -> bool {
        ChainedTable::insert_with(self, k, || {
            *calls += 1;
            v
        })
    }
    fn upsert(&mut self, k: Key, v: i32) {
        *self.get_or_insert_with(k, || 0) = v;
    }
    fn remove(&mut self, k: &str) -> Option<(Key, i32)> {
        self.remove_entry(k)
    }
    fn get(&self, k: &str) -> Option<i32> {
        self.get_key_value(k).map(|(_, v)| *v)
    }
    fn contains(&self, k: &str) -> bool {
        self.contains_key(k)
    }
    fn rehash(&mut self, n: usize) -> bool {
        self.try_rehash(n).is_ok()
    }
    fn pairs(&self) -> Vec<(Key, i32)> {
        self.iter().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn pairs_rev(&self) -> Vec<(Key, i32)> {
        self.iter().rev().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn clear(&mut self) {
        ChainedTable::clear(self)
    }
    fn len(&self) -> usize {
        ChainedTable::len(self)
    }
    fn check(&self) -> Result<(), TestCaseError> {
        prop_assert_eq!(
            self.load_factor(),
            self.len() as f32 / self.bucket_amount() as f32
        );
        // Chain lengths add up to len and iteration is bucket-ascending.
        let mut per_bucket: BTreeMap<usize, usize> = BTreeMap::new();
        let mut last = 0;
        for e in self.iter() {
            let b = self.bucket(e.key());
            prop_assert!(b >= last, "traversal went back from bucket {} to {}", last, b);
            last = b;
            *per_bucket.entry(b).or_default() += 1;
        }
        for e in self.iter() {
            let b = self.bucket(e.key());
            prop_assert_eq!(self.bucket_size(e.key()), per_bucket[&b]);
        }
        prop_assert_eq!(per_bucket.values().sum::<usize>(), self.len());
        Ok(())
    }
}

// Static tables are sized to the pool so they never overflow; rehash is
// reported as refused.
impl<S: std::hash::BuildHasher> Table for StaticTable<Key, i32, 16, S> {
    fn insert(&mut self, k: Key, v: i32) -> bool {
        StaticTable::insert(self, k, v)
    }
    fn insert_with(&mut self, k: Key, v: i32, calls: &mut u32) -> bool {
        StaticTable::insert_with(self, k, || {
            *calls += 1;
            v
        })
    }
    fn upsert(&mut self, k: Key, v: i32) {
        *self.get_or_insert_with(k, || 0) = v;
    }
    fn remove(&mut self, k: &str) -> Option<(Key, i32)> {
        self.remove_entry(k)
    }
    fn get(&self, k: &str) -> Option<i32> {
        self.get_key_value(k).map(|(_, v)| *v)
    }
    fn contains(&self, k: &str) -> bool {
        self.contains_key(k)
    }
    fn rehash(&mut self, _n: usize) -> bool {
        false
    }
    fn pairs(&self) -> Vec<(Key, i32)> {
        self.iter().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn pairs_rev(&self) -> Vec<(Key, i32)> {
        self.iter().rev().map(|e| (e.key().clone(), *e.value())).collect()
    }
    fn clear(&mut self) {
        StaticTable::clear(self)
    }
    fn len(&self) -> usize {
        StaticTable::len(self)
    }
    fn check(&self) -> Result<(), TestCaseError> {
        prop_assert!(self.len() <= self.capacity());
        Ok(())
    }
}

// Property: state-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate inserts are rejected and never replace the stored value.
// - `insert_with` runs its closure exactly once per successful insert.
// - Removal returns the stored pair and leaves every other key reachable.
// - Rehash to at least `len` keeps every mapping; below `len` is refused.
// - Forward and reverse iteration yield the model's pairs exactly once.
// - `len` matches the model after each op.
fn run<T: Table>(sut: &mut T, pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError> {
    let key = |i: usize| Key(pool[i].clone());
    let mut model: HashMap<Key, i32> = HashMap::new();
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = key(i);
                let fresh = !model.contains_key(&k);
                prop_assert_eq!(sut.insert(k.clone(), v), fresh);
                model.entry(k).or_insert(v);
            }
            Op::InsertWith(i, v) => {
                let k = key(i);
                let fresh = !model.contains_key(&k);
                let mut calls = 0;
                prop_assert_eq!(sut.insert_with(k.clone(), v, &mut calls), fresh);
                prop_assert_eq!(calls, u32::from(fresh));
                model.entry(k).or_insert(v);
            }
            Op::Upsert(i, v) => {
                let k = key(i);
                sut.upsert(k.clone(), v);
                model.insert(k, v);
            }
            Op::Remove(i) => {
                let k = key(i);
                let expected = model.remove(&k).map(|v| (k.clone(), v));
                prop_assert_eq!(sut.remove(&k.0), expected);
                prop_assert!(!sut.contains(&k.0));
            }
            Op::Get(i) => {
                let k = key(i);
                prop_assert_eq!(sut.get(&k.0), model.get(&k).copied());
            }
            Op::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(&s), has_model);
            }
            Op::Rehash(n) => {
                let before = sut.pairs().into_iter().collect::<BTreeMap<_, _>>();
                if sut.rehash(n) {
                    let after = sut.pairs().into_iter().collect::<BTreeMap<_, _>>();
                    prop_assert_eq!(before, after);
                }
            }
            Op::Iterate => {
                let fwd = sut.pairs();
                let mut rev = sut.pairs_rev();
                rev.reverse();
                prop_assert_eq!(&fwd, &rev);
                let s_keys: BTreeSet<_> = fwd.iter().map(|(k, _)| k.clone()).collect();
                prop_assert_eq!(s_keys.len(), fwd.len(), "no key yielded twice");
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        sut.check()?;
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(&k.0), Some(*v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_open_table((pool, ops) in arb_scenario()) {
        let mut sut: OpenTable<Key, i32> = OpenTable::with_capacity_and_hasher(4, Fnv1aState);
        run(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_open_table_constant_hash((pool, ops) in arb_scenario()) {
        let mut sut: OpenTable<Key, i32, FixedState> =
            OpenTable::with_capacity_and_hasher(2, FixedState);
        run(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_chained_table((pool, ops) in arb_scenario()) {
        let mut sut: ChainedTable<Key, i32> = ChainedTable::with_buckets_and_hasher(3, Fnv1aState);
        run(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_chained_table_constant_hash((pool, ops) in arb_scenario()) {
        let mut sut: ChainedTable<Key, i32, FixedState> =
            ChainedTable::with_buckets_and_hasher(5, FixedState);
        run(&mut sut, &pool, ops)?;
    }

    #[test]
    fn prop_static_table((pool, ops) in arb_scenario()) {
        let mut sut: StaticTable<Key, i32, 16, ModuloState<4>> = StaticTable::new();
        run(&mut sut, &pool, ops)?;
    }
}
