//! Map façades.
//!
//! Each map owns one table core and forwards to it. Lookups accept any
//! borrowed form of the key (`Q` where `K: Borrow<Q>`), like `std`.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use crate::chained::ChainedTable;
use crate::error::TableError;
use crate::fixed::StaticTable;
use crate::hash::Fnv1aState;
use crate::iter::{EntryRef, EntryMut, Iter, IterMut, Keys, Values};
use crate::node::Node;
use crate::open::OpenTable;
use crate::relocation::{Duplicate, Movable, Relocation};

/// Growable open-addressing map.
pub struct HashMap<K, V, S = Fnv1aState, P = Movable> {
    table: OpenTable<K, V, S, P>,
}

impl<K, V, S: Default, P> HashMap<K, V, S, P> {
    /// Creates a map with `capacity` slots. Zero is fatal.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(capacity, S::default())
    }
}

impl<K, V, S, P> HashMap<K, V, S, P> {
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

    /// Entries in slot order; `.rev()` walks them backwards.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.table.iter())
    }

    /// Moves every entry into a new map, leaving this one empty with zero
    /// capacity. `rehash` gives it storage again.
    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            table: self.table.take_all(),
        }
    }
}

impl<K, V, S, P> HashMap<K, V, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, V>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.table.hash(q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_mut(q)
    }

    /// Inserts `key -> value` if `key` is absent and returns whether it did.
    /// An existing value is left untouched; use `get_mut` or
    /// `get_or_insert_default` to overwrite it.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.table.insert(key, value)
    }

    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.table.insert_with(key, make)
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.table.get_or_insert_with(key, make)
    }

    /// The value for `key`, default-constructed first if absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.table.get_or_insert_with(key, V::default)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    /// Removes `q` and returns its value.
    pub fn take<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q)
    }

    /// Rebuilds with `capacity` slots. Zero, a capacity below `len()` and
    /// live entries under `Neither` are fatal.
    #[track_caller]
    pub fn rehash(&mut self, capacity: usize) {
        self.table.rehash(capacity)
    }

    pub fn try_rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        self.table.try_rehash(capacity)
    }
}

impl<K, V, S, P> Clone for HashMap<K, V, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
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

impl<K: fmt::Debug, V: fmt::Debug, S, P> fmt::Debug for HashMap<K, V, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<'a, K, V, S, P> IntoIterator for &'a HashMap<K, V, S, P> {
    type Item = EntryRef<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, P> IntoIterator for &'a mut HashMap<K, V, S, P> {
    type Item = EntryMut<'a, K, V>;
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Open-addressing map with `N` inline slots.
///
/// Never grows: inserting into a full map is fatal, and `try_insert` reports
/// it instead. `N == 0` fails to compile on first use.
pub struct StaticHashMap<K, V, const N: usize, S = Fnv1aState, P = Movable> {
    table: StaticTable<K, V, N, S, P>,
}

impl<K, V, const N: usize, S: Default, P> StaticHashMap<K, V, N, S, P> {
    pub fn new() -> Self {
        Self {
            table: StaticTable::new(),
        }
    }
}

impl<K, V, const N: usize, S: Default, P> Default for StaticHashMap<K, V, N, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const N: usize, S, P> StaticHashMap<K, V, N, S, P> {
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

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.table.iter())
    }
}

impl<K, V, const N: usize, S, P> StaticHashMap<K, V, N, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, V>>,
{
    pub fn hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.table.hash(q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_mut(q)
    }

    #[track_caller]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.table.insert(key, value)
    }

    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, TableError> {
        self.table.try_insert(key, value)
    }

    #[track_caller]
    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.table.insert_with(key, make)
    }

    #[track_caller]
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.table.get_or_insert_with(key, make)
    }

    #[track_caller]
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.table.get_or_insert_with(key, V::default)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q)
    }
}

impl<K, V, const N: usize, S, P> Clone for StaticHashMap<K, V, N, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
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

impl<K: fmt::Debug, V: fmt::Debug, const N: usize, S, P> fmt::Debug for StaticHashMap<K, V, N, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<'a, K, V, const N: usize, S, P> IntoIterator for &'a StaticHashMap<K, V, N, S, P> {
    type Item = EntryRef<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Separate-chaining map with bucket introspection.
///
/// Entries iterate bucket by bucket, each bucket in insertion order.
pub struct ChainedHashMap<K, V, S = Fnv1aState, P = Movable> {
    table: ChainedTable<K, V, S, P>,
}

impl<K, V, S: Default, P> ChainedHashMap<K, V, S, P> {
    /// Creates a map with `bucket_amount` buckets. Zero is fatal.
    #[track_caller]
    pub fn with_buckets(bucket_amount: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_amount, S::default())
    }

    pub fn try_with_buckets(bucket_amount: usize) -> Result<Self, TableError> {
        Self::try_with_buckets_and_hasher(bucket_amount, S::default())
    }
}

impl<K, V, S, P> ChainedHashMap<K, V, S, P> {
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

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.table.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.table.iter())
    }

    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            table: self.table.take_all(),
        }
    }

    /// Relinks every entry into `bucket_amount` buckets. Any positive amount
    /// is accepted regardless of `len()`; zero is fatal.
    #[track_caller]
    pub fn rehash(&mut self, bucket_amount: usize) {
        self.table.rehash(bucket_amount)
    }

    pub fn try_rehash(&mut self, bucket_amount: usize) -> Result<(), TableError> {
        self.table.try_rehash(bucket_amount)
    }
}

impl<K, V, S, P> ChainedHashMap<K, V, S, P>
where
    K: Eq + Hash,
    S: BuildHasher,
    P: Relocation<Node<K, V>>,
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

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_key_value(q)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get_mut(q)
    }

    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.table.insert(key, value)
    }

    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.table.insert_with(key, make)
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        self.table.get_or_insert_with(key, make)
    }

    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.table.get_or_insert_with(key, V::default)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove_entry(q)
    }
}

impl<K, V, S, P> Clone for ChainedHashMap<K, V, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
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

impl<K: fmt::Debug, V: fmt::Debug, S, P> fmt::Debug for ChainedHashMap<K, V, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.table, f)
    }
}

impl<'a, K, V, S, P> IntoIterator for &'a ChainedHashMap<K, V, S, P> {
    type Item = EntryRef<'a, K, V>;
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S, P> IntoIterator for &'a mut ChainedHashMap<K, V, S, P> {
    type Item = EntryMut<'a, K, V>;
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
