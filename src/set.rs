//! Set façades: the same table cores with `V = ()`.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::chained::ChainedTable;
use crate::error::TableError;
use crate::fixed::StaticTable;
use crate::hash::Fnv1aState;
use crate::iter::{Iter, Keys};
use crate::node::Node;
use crate::open::OpenTable;
use crate::relocation::{Duplicate, Movable, Relocation};

/// Growable open-addressing set.
pub struct HashSet<K, S = Fnv1aState, P = Movable> {
    table: OpenTable<K, (), S, P>,
}

impl<K, S: Default, P> HashSet<K, S, P> {
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, S, P> HashSet<K, S, P> {
    #[track_caller]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            table: OpenTable::with_capacity_and_hasher(capacity, hasher),
        }
    }

    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        OpenTable::try_with_capacity_and_hasher(capacity, hasher).map(|table| Self { table })
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Keys<'_, K, ()> {
        Keys::new(self.table.iter())
    }

    /// Like `iter`, but each item also carries its cached hash.
    pub fn entries(&self) -> Iter<'_, K, ()> {
        self.table.iter()
    }

    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            table: self.table.take_all(),
        }
    }
}

impl<K, S, P> HashSet<K, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, ()>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.table.hash(q)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    /// The stored key equal to `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(k, _)| k)
    }

    /// Adds `key` if absent. Returns `false`, dropping `key`, if an equal key
    /// is already stored.
    pub fn insert(&mut self, key: K) -> bool {
        self.table.insert(key, ())
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(k, ())| k)
    }

    #[track_caller]
    pub fn rehash(&mut self, capacity: usize) {
        self.table.rehash(capacity)
    }

    pub fn try_rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        self.table.try_rehash(capacity)
    }
}

impl<K, S, P> Clone for HashSet<K, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, ()>>,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.table.clone_from(&source.table)
    }
}

impl<K: fmt::Debug, S, P> fmt::Debug for HashSet<K, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, S, P> IntoIterator for &'a HashSet<K, S, P> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Open-addressing set with `N` inline slots.
pub struct StaticHashSet<K, const N: usize, S = Fnv1aState, P = Movable> {
    table: StaticTable<K, (), N, S, P>,
}

impl<K, const N: usize, S: Default, P> StaticHashSet<K, N, S, P> {
    pub fn new() -> Self {
        Self {
            table: StaticTable::new(),
        }
    }
}

impl<K, const N: usize, S: Default, P> Default for StaticHashSet<K, N, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, const N: usize, S, P> StaticHashSet<K, N, S, P> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: StaticTable::with_hasher(hasher),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Keys<'_, K, ()> {
        Keys::new(self.table.iter())
    }

    pub fn entries(&self) -> Iter<'_, K, ()> {
        self.table.iter()
    }
}

impl<K, const N: usize, S, P> StaticHashSet<K, N, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, ()>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.table.hash(q)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(k, _)| k)
    }

    /// Adds `key` if absent. Fatal when all `N` slots are occupied.
    #[track_caller]
    pub fn insert(&mut self, key: K) -> bool {
        self.table.insert(key, ())
    }

    pub fn try_insert(&mut self, key: K) -> Result<bool, TableError> {
        self.table.try_insert(key, ())
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(k, ())| k)
    }
}

impl<K, const N: usize, S, P> Clone for StaticHashSet<K, N, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, ()>>,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.table.clone_from(&source.table)
    }
}

impl<K: fmt::Debug, const N: usize, S, P> fmt::Debug for StaticHashSet<K, N, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, const N: usize, S, P> IntoIterator for &'a StaticHashSet<K, N, S, P> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Separate-chaining set with bucket introspection.
pub struct ChainedHashSet<K, S = Fnv1aState, P = Movable> {
    table: ChainedTable<K, (), S, P>,
}

impl<K, S: Default, P> ChainedHashSet<K, S, P> {
    #[track_caller]
    pub fn with_buckets(bucket_amount: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_amount, S::default())
    }

    pub fn try_with_buckets(bucket_amount: usize) -> Result<Self, TableError> {
        Self::try_with_buckets_and_hasher(bucket_amount, S::default())
    }
}

impl<K, S, P> ChainedHashSet<K, S, P> {
    #[track_caller]
    pub fn with_buckets_and_hasher(bucket_amount: usize, hasher: S) -> Self {
        Self {
            table: ChainedTable::with_buckets_and_hasher(bucket_amount, hasher),
        }
    }

    pub fn try_with_buckets_and_hasher(bucket_amount: usize, hasher: S) -> Result<Self, TableError> {
        ChainedTable::try_with_buckets_and_hasher(bucket_amount, hasher).map(|table| Self { table })
    }

    pub fn bucket_amount(&self) -> usize {
        self.table.bucket_amount()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn clear(&mut self) {
        self.table.clear()
    }

    pub fn iter(&self) -> Keys<'_, K, ()> {
        Keys::new(self.table.iter())
    }

    pub fn entries(&self) -> Iter<'_, K, ()> {
        self.table.iter()
    }

    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            table: self.table.take_all(),
        }
    }

    #[track_caller]
    pub fn rehash(&mut self, bucket_amount: usize) {
        self.table.rehash(bucket_amount)
    }

    pub fn try_rehash(&mut self, bucket_amount: usize) -> Result<(), TableError> {
        self.table.try_rehash(bucket_amount)
    }
}

impl<K, S, P> ChainedHashSet<K, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, ()>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.table.hash(q)
    }

    #[track_caller]
    pub fn bucket<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.table.bucket(q)
    }

    pub fn bucket_size<Q>(&self, q: &Q) -> usize
    where
        Q: ?Sized + Hash,
    {
        self.table.bucket_size(q)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(k, _)| k)
    }

    pub fn insert(&mut self, key: K) -> bool {
        self.table.insert(key, ())
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(k, ())| k)
    }
}

impl<K, S, P> Clone for ChainedHashSet<K, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, ()>>,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.table.clone_from(&source.table)
    }
}

impl<K: fmt::Debug, S, P> fmt::Debug for ChainedHashSet<K, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, K, S, P> IntoIterator for &'a ChainedHashSet<K, S, P> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{FixedState, IdentityState};

    #[test]
    fn set_basics() {
        let mut s: HashSet<String> = HashSet::with_capacity(4);
        assert!(s.insert("x".to_string()));
        assert!(!s.insert("x".to_string()));
        assert!(s.contains("x"));
        assert_eq!(s.get("x").map(String::as_str), Some("x"));
        assert_eq!(s.take("x").as_deref(), Some("x"));
        assert!(s.is_empty());
    }

    #[test]
    fn entries_expose_hashes() {
        let mut s: HashSet<u32, IdentityState> = HashSet::with_capacity(8);
        s.insert(3);
        s.insert(6);
        let hashes: Vec<u64> = s.entries().map(|e| e.hash()).collect();
        assert_eq!(hashes, vec![3, 6]);
        assert_eq!(format!("{s:?}"), "{3, 6}");
    }

    #[test]
    fn chained_set_buckets() {
        let mut s: ChainedHashSet<u32, FixedState> = ChainedHashSet::with_buckets(8);
        for k in [9, 4, 1] {
            s.insert(k);
        }
        assert_eq!(s.bucket(&4), 0);
        assert_eq!(s.bucket_size(&123), 3);
        assert_eq!((&s).into_iter().copied().collect::<Vec<_>>(), vec![9, 4, 1]);
        assert!(s.remove(&4));
        assert_eq!(s.iter().copied().collect::<Vec<_>>(), vec![9, 1]);
    }

    #[test]
    fn static_set_overflow_is_reported() {
        let mut s: StaticHashSet<u32, 2> = StaticHashSet::new();
        assert_eq!(s.try_insert(1), Ok(true));
        assert_eq!(s.try_insert(2), Ok(true));
        assert_eq!(s.try_insert(1), Ok(false));
        assert_eq!(s.try_insert(3), Err(TableError::Full { capacity: 2 }));
        assert!(s.remove(&1));
        assert!(s.insert(3));
    }
}
