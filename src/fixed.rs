//! StaticTable: open addressing over an inline array of `N` slots.
//!
//! Same probe rules as `OpenTable`, but the capacity is part of the type and
//! never changes. There is no rehash; an insert that finds no reusable slot
//! is fatal, and `try_insert` reports it instead.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use crate::error::{fatal, TableError};
use crate::guard::ProbeGuard;
use crate::hash::Fnv1aState;
use crate::iter::{Iter, IterMut};
use crate::node::Node;
use crate::relocation::{Duplicate, Movable, Relocation};
use crate::slot::{self, Placement, Slot, SlotState};

pub struct StaticTable<K, V, const N: usize, S = Fnv1aState, P = Movable> {
    slots: [Slot<Node<K, V>>; N],
    len: usize,
    hasher: S,
    guard: ProbeGuard,
    _policy: PhantomData<P>,
}

impl<K, V, const N: usize, S, P> StaticTable<K, V, N, S, P> {
    const NONZERO: () = assert!(N > 0, "a static table needs at least one slot");

    pub fn with_hasher(hasher: S) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NONZERO;
        Self {
            slots: core::array::from_fn(|_| Slot::empty()),
            len: 0,
            hasher,
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }

    pub fn new() -> Self
    where
        S: Default,
    {
        Self::with_hasher(S::default())
    }

    /// Always `N`.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn load_factor(&self) -> f32 {
        self.len as f32 / N as f32
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn clear(&mut self) {
        let _busy = self.guard.enter();
        for slot in self.slots.iter_mut() {
            *slot = Slot::empty();
        }
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::slots(&self.slots, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::slots(&mut self.slots, self.len)
    }
}

impl<K, V, const N: usize, S: Default, P> Default for StaticTable<K, V, N, S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, const N: usize, S, P> StaticTable<K, V, N, S, P>
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

    fn find_index<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.len == 0 {
            return None;
        }
        let _busy = self.guard.enter();
        slot::find(&self.slots, self.hasher.hash_one(q), q)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_index(q).is_some()
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find_index(q)?;
        self.slots[index]
            .node
            .as_ref()
            .map(|node| (&node.key, &node.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find_index(q)?;
        self.slots[index].node.as_mut().map(|node| &mut node.value)
    }

    fn try_claim<F>(&mut self, key: K, make: F) -> Result<(usize, bool), TableError>
    where
        F: FnOnce() -> V,
    {
        let hash = self.hasher.hash_one(&key);
        let placement = {
            let _busy = self.guard.enter();
            slot::place(&self.slots, hash, &key)
        };
        match placement {
            Placement::Present(index) => Ok((index, false)),
            Placement::Vacant(index) => {
                let slot = &mut self.slots[index];
                if slot.state == SlotState::Tombstone {
                    log::trace!("reusing tombstone at slot {index}");
                }
                slot.occupy(hash, Node::new(key, make()));
                self.len += 1;
                Ok((index, true))
            }
            Placement::Full => Err(TableError::Full { capacity: N }),
        }
    }

    #[track_caller]
    fn claim<F>(&mut self, key: K, make: F) -> (usize, bool)
    where
        F: FnOnce() -> V,
    {
        match self.try_claim(key, make) {
            Ok(claimed) => claimed,
            Err(e) => fatal(e),
        }
    }

    /// Inserts unless the key is present. Reports a full table as an error;
    /// the rejected key and value are dropped.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, TableError> {
        self.try_claim(key, || value).map(|(_, inserted)| inserted)
    }

    /// Inserts unless the key is present. Fatal when the table is full.
    #[track_caller]
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.claim(key, || value).1
    }

    #[track_caller]
    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.claim(key, make).1
    }

    #[track_caller]
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let (index, _) = self.claim(key, make);
        match self.slots[index].node.as_mut() {
            Some(node) => &mut node.value,
            None => unreachable!("claimed slot {index} is occupied"),
        }
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find_index(q)?;
        let node = self.slots[index].vacate()?;
        self.len -= 1;
        Some((node.key, node.value))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }
}

impl<K, V, const N: usize, S, P> Clone for StaticTable<K, V, N, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
{
    fn clone(&self) -> Self {
        Self {
            slots: core::array::from_fn(|i| Slot {
                state: self.slots[i].state,
                node: self.slots[i].node.as_ref().map(P::duplicate),
            }),
            len: self.len,
            hasher: self.hasher.clone(),
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }

    /// Overwrites the slots in place.
    fn clone_from(&mut self, source: &Self) {
        for (dst, src) in self.slots.iter_mut().zip(source.slots.iter()) {
            match (dst.node.as_mut(), src.node.as_ref()) {
                (Some(d), Some(s)) => *d = P::duplicate(s),
                (_, s) => dst.node = s.map(P::duplicate),
            }
            dst.state = src.state;
        }
        self.len = source.len;
        self.hasher = source.hasher.clone();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const N: usize, S, P> fmt::Debug for StaticTable<K, V, N, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}
