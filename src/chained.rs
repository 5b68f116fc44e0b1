//! ChainedTable: separate-chaining core shared by `ChainedHashMap` and
//! `ChainedHashSet`.
//!
//! Entries live in a slotmap arena and are doubly linked into per-bucket
//! chains. New entries go to the tail of their chain, so a chain keeps
//! insertion order. Rehashing relinks arena entries into a new bucket array
//! and never moves an element, so it is allowed under every relocation
//! policy.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use slotmap::{SecondaryMap, SlotMap};

use crate::error::{fatal, or_fatal, TableError};
use crate::guard::ProbeGuard;
use crate::hash::Fnv1aState;
use crate::iter::{ChainCursor, EntryMut, Iter, IterMut};
use crate::node::Node;
use crate::relocation::{Duplicate, Movable, Relocation};

slotmap::new_key_type! {
    /// Arena handle of a chained entry.
    pub(crate) struct EntryKey;
}

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) node: Node<K, V>,
    pub(crate) hash: u64,
    pub(crate) prev: Option<EntryKey>,
    pub(crate) next: Option<EntryKey>,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Bucket {
    pub(crate) head: Option<EntryKey>,
    pub(crate) tail: Option<EntryKey>,
    pub(crate) len: usize,
}

fn empty_buckets(amount: usize) -> Box<[Bucket]> {
    vec![Bucket::default(); amount].into_boxed_slice()
}

/// Appends `key` to the tail of `bucket`.
fn link_tail<K, V>(
    buckets: &mut [Bucket],
    entries: &mut SlotMap<EntryKey, Entry<K, V>>,
    bucket: usize,
    key: EntryKey,
) {
    let old_tail = buckets[bucket].tail;
    if let Some(entry) = entries.get_mut(key) {
        entry.prev = old_tail;
        entry.next = None;
    }
    match old_tail.and_then(|t| entries.get_mut(t)) {
        Some(tail) => tail.next = Some(key),
        None => buckets[bucket].head = Some(key),
    }
    buckets[bucket].tail = Some(key);
    buckets[bucket].len += 1;
}

pub struct ChainedTable<K, V, S = Fnv1aState, P = Movable> {
    buckets: Box<[Bucket]>,
    entries: SlotMap<EntryKey, Entry<K, V>>,
    hasher: S,
    guard: ProbeGuard,
    _policy: PhantomData<P>,
}

impl<K, V, S, P> ChainedTable<K, V, S, P> {
    pub fn try_with_buckets_and_hasher(bucket_amount: usize, hasher: S) -> Result<Self, TableError> {
        if bucket_amount == 0 {
            return Err(TableError::ZeroCapacity);
        }
        Ok(Self {
            buckets: empty_buckets(bucket_amount),
            entries: SlotMap::with_key(),
            hasher,
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        })
    }

    /// Creates a table with `bucket_amount` buckets. Zero is fatal.
    #[track_caller]
    pub fn with_buckets_and_hasher(bucket_amount: usize, hasher: S) -> Self {
        or_fatal(Self::try_with_buckets_and_hasher(bucket_amount, hasher))
    }

    #[inline]
    pub fn bucket_amount(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `len / bucket_amount`; zero for a table left empty by `take_all`.
    pub fn load_factor(&self) -> f32 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.entries.len() as f32 / self.buckets.len() as f32
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Destroys every element; the bucket amount is kept.
    pub fn clear(&mut self) {
        let _busy = self.guard.enter();
        self.entries.clear();
        for bucket in self.buckets.iter_mut() {
            *bucket = Bucket::default();
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::chain(
            ChainCursor::new(&self.buckets, &self.entries),
            self.entries.len(),
        )
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        // Rank every entry by traversal position, then hand out the arena's
        // mutable references in that order.
        let mut rank: SecondaryMap<EntryKey, usize> = SecondaryMap::with_capacity(self.entries.len());
        let mut position = 0;
        for bucket in self.buckets.iter() {
            let mut cursor = bucket.head;
            while let Some(key) = cursor {
                rank.insert(key, position);
                position += 1;
                cursor = self.entries.get(key).and_then(|e| e.next);
            }
        }

        let mut ordered: Vec<Option<EntryMut<'_, K, V>>> =
            (0..self.entries.len()).map(|_| None).collect();
        for (key, entry) in self.entries.iter_mut() {
            if let Some(&at) = rank.get(key) {
                let Entry {
                    node: Node { key, value },
                    hash,
                    ..
                } = entry;
                ordered[at] = Some(EntryMut::new(key, value, *hash));
            }
        }
        IterMut::ordered(ordered.into_iter().flatten().collect())
    }

    /// Moves every element into the returned table and leaves `self` valid,
    /// empty and with zero buckets.
    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            buckets: core::mem::take(&mut self.buckets),
            entries: core::mem::replace(&mut self.entries, SlotMap::with_key()),
            hasher: self.hasher.clone(),
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }

    /// Relinks every entry into `bucket_amount` new buckets.
    ///
    /// Entries are visited in traversal order, so entries that share a new
    /// bucket keep their relative order.
    pub fn try_rehash(&mut self, bucket_amount: usize) -> Result<(), TableError> {
        if bucket_amount == 0 {
            return Err(TableError::ZeroCapacity);
        }
        let _busy = self.guard.enter();
        let mut fresh = empty_buckets(bucket_amount);
        for bucket in self.buckets.iter() {
            let mut cursor = bucket.head;
            while let Some(key) = cursor {
                let Some(entry) = self.entries.get(key) else {
                    break;
                };
                cursor = entry.next;
                let index = (entry.hash % bucket_amount as u64) as usize;
                link_tail(&mut fresh, &mut self.entries, index, key);
            }
        }
        log::debug!(
            "rehashed chained table from {} to {bucket_amount} buckets ({} elements)",
            self.buckets.len(),
            self.entries.len()
        );
        self.buckets = fresh;
        Ok(())
    }

    /// Relinks every entry into `bucket_amount` new buckets. Zero is fatal.
    #[track_caller]
    pub fn rehash(&mut self, bucket_amount: usize) {
        or_fatal(self.try_rehash(bucket_amount))
    }
}

impl<K, V, S, P> ChainedTable<K, V, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, V>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Index of the bucket `q` hashes into. Fatal on a table with no buckets.
    #[track_caller]
    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        if self.buckets.is_empty() {
            fatal(TableError::ZeroCapacity);
        }
        (self.hash(q) % self.buckets.len() as u64) as usize
    }

    /// Length of the chain `q` hashes into, whether or not `q` is stored.
    pub fn bucket_size<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        if self.buckets.is_empty() {
            return 0;
        }
        self.buckets[self.bucket(q)].len
    }

    fn find_key<Q>(&self, q: &Q) -> Option<EntryKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.entries.is_empty() {
            return None;
        }
        let _busy = self.guard.enter();
        let hash = self.hasher.hash_one(q);
        let index = (hash % self.buckets.len() as u64) as usize;
        let mut cursor = self.buckets[index].head;
        while let Some(key) = cursor {
            let entry = self.entries.get(key)?;
            if entry.hash == hash && entry.node.key.borrow() == q {
                return Some(key);
            }
            cursor = entry.next;
        }
        None
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_key(q).is_some()
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = self.find_key(q)?;
        self.entries
            .get(key)
            .map(|e| (&e.node.key, &e.node.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = self.find_key(q)?;
        self.entries.get_mut(key).map(|e| &mut e.node.value)
    }

    /// Appends `key` with the value from `make` unless the key is present.
    #[track_caller]
    fn claim<F>(&mut self, key: K, make: F) -> (EntryKey, bool)
    where
        F: FnOnce() -> V,
    {
        if let Some(existing) = self.find_key(&key) {
            return (existing, false);
        }
        if self.buckets.is_empty() {
            fatal(TableError::ZeroCapacity);
        }
        let hash = self.hasher.hash_one(&key);
        let index = (hash % self.buckets.len() as u64) as usize;
        let entry_key = self.entries.insert(Entry {
            node: Node::new(key, make()),
            hash,
            prev: None,
            next: None,
        });
        link_tail(&mut self.buckets, &mut self.entries, index, entry_key);
        (entry_key, true)
    }

    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.claim(key, || value).1
    }

    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.claim(key, make).1
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let (entry_key, _) = self.claim(key, make);
        match self.entries.get_mut(entry_key) {
            Some(entry) => &mut entry.node.value,
            None => unreachable!("claimed entry is live"),
        }
    }

    /// Unlinks and destroys the entry for `q`, keeping the rest of its chain
    /// in order.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let key = self.find_key(q)?;
        let entry = self.entries.remove(key)?;
        let index = (entry.hash % self.buckets.len() as u64) as usize;
        let bucket = &mut self.buckets[index];
        match entry.prev.and_then(|p| self.entries.get_mut(p)) {
            Some(prev) => prev.next = entry.next,
            None => bucket.head = entry.next,
        }
        match entry.next.and_then(|n| self.entries.get_mut(n)) {
            Some(next) => next.prev = entry.prev,
            None => bucket.tail = entry.prev,
        }
        bucket.len -= 1;
        Some((entry.node.key, entry.node.value))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }
}

impl<K, V, S, P> ChainedTable<K, V, S, P>
where
    P: Duplicate<Node<K, V>>,
{
    /// Appends a duplicate of every chain to `buckets` and `entries`, which
    /// must have the same bucket amount. Traversal order is kept.
    fn duplicate_into(&self, buckets: &mut [Bucket], entries: &mut SlotMap<EntryKey, Entry<K, V>>) {
        for (index, bucket) in self.buckets.iter().enumerate() {
            let mut cursor = bucket.head;
            while let Some(key) = cursor {
                let Some(src) = self.entries.get(key) else {
                    break;
                };
                cursor = src.next;
                let copy = entries.insert(Entry {
                    node: P::duplicate(&src.node),
                    hash: src.hash,
                    prev: None,
                    next: None,
                });
                link_tail(buckets, entries, index, copy);
            }
        }
    }
}

impl<K, V, S, P> Clone for ChainedTable<K, V, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
{
    fn clone(&self) -> Self {
        let mut buckets = empty_buckets(self.buckets.len());
        let mut entries = SlotMap::with_capacity_and_key(self.entries.len());
        self.duplicate_into(&mut buckets, &mut entries);
        Self {
            buckets,
            entries,
            hasher: self.hasher.clone(),
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }

    /// Reuses the bucket array and the arena's storage when the bucket
    /// amounts match.
    fn clone_from(&mut self, source: &Self) {
        if self.buckets.len() != source.buckets.len() {
            *self = source.clone();
            return;
        }
        self.clear();
        source.duplicate_into(&mut self.buckets, &mut self.entries);
        self.hasher = source.hasher.clone();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S, P> fmt::Debug for ChainedTable<K, V, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{FixedState, IdentityState, ModuloState};
    use crate::relocation::Neither;

    fn fixed(buckets: usize) -> ChainedTable<u32, u32, FixedState> {
        ChainedTable::with_buckets_and_hasher(buckets, FixedState)
    }

    fn keys<V, S, P>(t: &ChainedTable<u32, V, S, P>) -> Vec<u32> {
        t.iter().map(|e| *e.key()).collect()
    }

    /// Invariant: the sum of chain lengths equals `len()`.
    fn chain_total<K, V, S, P>(t: &ChainedTable<K, V, S, P>) -> usize {
        t.buckets.iter().map(|b| b.len).sum()
    }

    #[test]
    fn chain_keeps_insertion_order() {
        let mut t = fixed(4);
        for k in [3, 1, 2, 0] {
            assert!(t.insert(k, k));
        }
        assert_eq!(keys(&t), vec![3, 1, 2, 0]);
        assert_eq!(t.bucket_size(&99), 4);
        assert_eq!(chain_total(&t), 4);
    }

    #[test]
    fn remove_middle_head_and_tail() {
        let mut t = fixed(2);
        for k in 0..5 {
            t.insert(k, k);
        }
        assert!(t.remove(&2));
        assert_eq!(keys(&t), vec![0, 1, 3, 4]);
        assert!(t.remove(&0));
        assert_eq!(keys(&t), vec![1, 3, 4]);
        assert!(t.remove(&4));
        assert_eq!(keys(&t), vec![1, 3]);
        assert_eq!(t.iter().rev().map(|e| *e.key()).collect::<Vec<_>>(), vec![3, 1]);
        assert!(!t.remove(&4));
        assert_eq!(chain_total(&t), t.len());
        assert!(t.insert(4, 40));
        assert_eq!(keys(&t), vec![1, 3, 4]);
    }

    #[test]
    fn traversal_is_bucket_then_insertion_order() {
        let mut t: ChainedTable<u32, (), ModuloState<4>> =
            ChainedTable::with_buckets_and_hasher(4, ModuloState);
        for k in [5, 2, 1, 6, 4, 9] {
            t.insert(k, ());
        }
        assert_eq!(keys(&t), vec![4, 5, 1, 9, 2, 6]);
        assert_eq!(
            t.iter().rev().map(|e| *e.key()).collect::<Vec<_>>(),
            vec![6, 2, 9, 1, 5, 4]
        );
    }

    #[test]
    fn rehash_relinks_and_keeps_values() {
        let mut t: ChainedTable<u32, u32, IdentityState> =
            ChainedTable::with_buckets_and_hasher(2, IdentityState);
        for k in 0..8 {
            t.insert(k, k + 100);
        }
        assert_eq!(t.bucket_size(&0), 4);
        t.rehash(8);
        assert_eq!(t.bucket_amount(), 8);
        assert_eq!(t.len(), 8);
        for k in 0..8 {
            assert_eq!(t.bucket(&k), k as usize);
            assert_eq!(t.bucket_size(&k), 1);
            assert_eq!(t.get_key_value(&k), Some((&k, &(k + 100))));
        }
        assert_eq!(chain_total(&t), 8);
        t.rehash(1);
        assert_eq!(t.bucket_size(&0), 8);
        assert_eq!(keys(&t), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn neither_policy_may_rehash_chains() {
        let mut t: ChainedTable<u32, u32, FixedState, Neither> =
            ChainedTable::with_buckets_and_hasher(2, FixedState);
        t.insert(1, 1);
        t.insert(2, 2);
        t.rehash(16);
        assert_eq!(t.len(), 2);
        assert!(t.contains_key(&2));
    }

    #[test]
    fn iter_mut_follows_traversal_order() {
        let mut t: ChainedTable<u32, u32, ModuloState<3>> =
            ChainedTable::with_buckets_and_hasher(3, ModuloState);
        for k in [4, 3, 1, 2] {
            t.insert(k, 0);
        }
        let order: Vec<u32> = t
            .iter_mut()
            .map(|mut e| {
                *e.value_mut() = e.key() * 10;
                *e.key()
            })
            .collect();
        assert_eq!(order, keys(&t));
        assert_eq!(t.get_key_value(&4), Some((&4, &40)));
    }

    #[test]
    fn clone_is_deep_and_ordered() {
        let mut t = fixed(4);
        for k in [7, 3, 5] {
            t.insert(k, k);
        }
        let mut c = t.clone();
        c.remove(&3);
        *c.get_mut(&7).unwrap() = 70;
        assert_eq!(keys(&t), vec![7, 3, 5]);
        assert_eq!(keys(&c), vec![7, 5]);
        assert_eq!(t.get_key_value(&7), Some((&7, &7)));
    }

    #[test]
    fn clone_from_keeps_order_and_links() {
        let mut src = fixed(4);
        for k in [7, 3, 5] {
            src.insert(k, k * 10);
        }
        let mut dst = fixed(4);
        for k in [1, 2] {
            dst.insert(k, k);
        }
        dst.clone_from(&src);
        assert_eq!(dst.bucket_amount(), 4);
        assert_eq!(keys(&dst), vec![7, 3, 5]);
        assert_eq!(chain_total(&dst), 3);
        assert!(!dst.contains_key(&1));
        assert!(dst.remove(&3));
        assert!(dst.insert(9, 90));
        assert_eq!(keys(&dst), vec![7, 5, 9]);
        assert_eq!(keys(&src), vec![7, 3, 5]);

        let mut other = fixed(2);
        other.clone_from(&src);
        assert_eq!(other.bucket_amount(), 4);
        assert_eq!(keys(&other), vec![7, 3, 5]);
    }

    #[test]
    fn take_all_leaves_no_buckets() {
        let mut t = fixed(4);
        t.insert(1, 1);
        let moved = t.take_all();
        assert_eq!(moved.len(), 1);
        assert_eq!(t.bucket_amount(), 0);
        assert_eq!(t.bucket_size(&1), 0);
        assert_eq!(t.load_factor(), 0.0);
        assert!(!t.contains_key(&1));
        assert_eq!(t.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "zero is not a valid capacity")]
    fn insert_after_take_all_is_fatal() {
        let mut t = fixed(4);
        let _moved = t.take_all();
        t.insert(1, 1);
    }

    #[test]
    fn clear_keeps_bucket_amount() {
        let mut t = fixed(4);
        t.insert(1, 1);
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.bucket_amount(), 4);
        assert_eq!(t.bucket_size(&1), 0);
        assert!(t.insert(1, 2));
    }
}
