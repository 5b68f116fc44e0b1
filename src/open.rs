//! OpenTable: growable open-addressing core shared by `HashMap` and `HashSet`.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;

use crate::error::{fatal, or_fatal, TableError};
use crate::guard::ProbeGuard;
use crate::hash::Fnv1aState;
use crate::iter::{Iter, IterMut};
use crate::node::Node;
use crate::relocation::{check_relocatable, relocate, Duplicate, Movable, Relocation};
use crate::slot::{self, empty_slots, Placement, Slot, SlotState};

/// Open-addressing table whose capacity changes through `rehash`, or by
/// doubling when an insert finds every slot occupied.
///
/// Tombstones are counted. Once live elements plus tombstones pass 7/8 of the
/// slots, the next insert into an Empty slot rebuilds the table first: at the
/// same capacity while `len + 1` fits in half of it, doubled otherwise. The
/// rebuild is skipped when the policy cannot relocate the live elements.
pub struct OpenTable<K, V, S = Fnv1aState, P = Movable> {
    slots: Box<[Slot<Node<K, V>>]>,
    len: usize,
    tombstones: usize,
    hasher: S,
    guard: ProbeGuard,
    _policy: PhantomData<P>,
}

impl<K, V, S, P> OpenTable<K, V, S, P> {
    pub fn try_with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        Ok(Self {
            slots: empty_slots(capacity),
            len: 0,
            tombstones: 0,
            hasher,
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        })
    }

    /// Creates a table with `capacity` slots. Zero is fatal.
    #[track_caller]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        or_fatal(Self::try_with_capacity_and_hasher(capacity, hasher))
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `len / capacity`; zero for a table left empty by `take_all`.
    pub fn load_factor(&self) -> f32 {
        if self.slots.is_empty() {
            return 0.0;
        }
        self.len as f32 / self.slots.len() as f32
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Slots left behind by removals and not yet reused or rebuilt away.
    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// True once live elements plus tombstones fill more than 7/8 of the slots.
    fn crowded(&self) -> bool {
        (self.len + self.tombstones + 1).saturating_mul(8) > self.slots.len().saturating_mul(7)
    }

    /// Destroys every element. Capacity is kept and tombstones are discarded.
    pub fn clear(&mut self) {
        let _busy = self.guard.enter();
        for slot in self.slots.iter_mut() {
            *slot = Slot::empty();
        }
        self.len = 0;
        self.tombstones = 0;
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::slots(&self.slots, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::slots(&mut self.slots, self.len)
    }

    /// Moves every element into the returned table and leaves `self` valid,
    /// empty and with zero capacity.
    pub fn take_all(&mut self) -> Self
    where
        S: Clone,
    {
        Self {
            slots: core::mem::take(&mut self.slots),
            len: core::mem::replace(&mut self.len, 0),
            tombstones: core::mem::replace(&mut self.tombstones, 0),
            hasher: self.hasher.clone(),
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }
}

impl<K, V, S, P> OpenTable<K, V, S, P>
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
        let hash = self.hasher.hash_one(q);
        slot::find(&self.slots, hash, q)
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

    /// Inserts `key` with the value from `make` unless the key is present.
    ///
    /// Returns the slot index and whether an insert happened. `make` only
    /// runs on insert.
    fn claim<F>(&mut self, key: K, make: F) -> (usize, bool)
    where
        F: FnOnce() -> V,
    {
        let hash = self.hasher.hash_one(&key);
        let mut placement = self.placement(hash, &key);
        if self.needs_room(placement) {
            self.make_room();
            placement = self.placement(hash, &key);
        }
        match placement {
            Placement::Present(index) => (index, false),
            Placement::Vacant(index) => {
                if self.slots[index].state == SlotState::Tombstone {
                    log::trace!("reusing tombstone at slot {index}");
                    self.tombstones -= 1;
                }
                self.slots[index].occupy(hash, Node::new(key, make()));
                self.len += 1;
                (index, true)
            }
            Placement::Full => fatal(TableError::Full {
                capacity: self.capacity(),
            }),
        }
    }

    fn placement(&self, hash: u64, key: &K) -> Placement {
        let _busy = self.guard.enter();
        slot::place(&self.slots, hash, key)
    }

    /// Whether the insert about to land at `placement` must rebuild first.
    fn needs_room(&self, placement: Placement) -> bool {
        match placement {
            Placement::Present(_) => false,
            Placement::Full => true,
            Placement::Vacant(index) => {
                self.tombstones > 0
                    && self.slots[index].state == SlotState::Empty
                    && self.crowded()
                    && check_relocatable::<Node<K, V>, P>(self.len).is_ok()
            }
        }
    }

    #[track_caller]
    fn make_room(&mut self) {
        let capacity = self.capacity();
        if capacity == 0 {
            fatal(TableError::ZeroCapacity);
        }
        let target = if self.tombstones > 0 && (self.len + 1).saturating_mul(2) <= capacity {
            log::debug!(
                "open table purging {} tombstones at {capacity} slots",
                self.tombstones
            );
            capacity
        } else {
            log::debug!("open table crowded at {capacity} slots, doubling");
            capacity.saturating_mul(2)
        };
        or_fatal(self.try_rehash(target));
    }

    /// Inserts unless the key is present; an existing value is never replaced.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.claim(key, || value).1
    }

    /// Like `insert`, building the value only when the key is absent.
    pub fn insert_with<F>(&mut self, key: K, make: F) -> bool
    where
        F: FnOnce() -> V,
    {
        self.claim(key, make).1
    }

    /// Returns the value for `key`, inserting `make()` first if absent.
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

    /// Removes `q`, leaving a tombstone. Returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let index = self.find_index(q)?;
        let node = self.slots[index].vacate()?;
        self.len -= 1;
        self.tombstones += 1;
        Some((node.key, node.value))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).is_some()
    }

    /// Rebuilds the table with `capacity` slots, keeping every element and
    /// dropping all tombstones.
    ///
    /// Elements are placed by their cached hashes. The new slot array is
    /// fully populated before the old one is released.
    pub fn try_rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        if capacity == 0 {
            return Err(TableError::ZeroCapacity);
        }
        if capacity < self.len {
            return Err(TableError::CapacityBelowSize {
                capacity,
                size: self.len,
            });
        }
        check_relocatable::<Node<K, V>, P>(self.len)?;

        let _busy = self.guard.enter();
        let mut fresh = empty_slots(capacity);
        for slot in self.slots.iter_mut() {
            if let SlotState::Occupied(hash) = slot.state {
                if let Some(node) = relocate::<_, P>(&mut slot.node)? {
                    slot::place_relocated(&mut fresh, hash, node);
                }
            }
        }
        log::debug!(
            "rehashed open table from {} to {capacity} slots ({} elements)",
            self.slots.len(),
            self.len
        );
        self.slots = fresh;
        self.tombstones = 0;
        Ok(())
    }

    /// Rebuilds the table with `capacity` slots. A capacity below `len()`,
    /// zero, or live elements under the `Neither` policy are fatal.
    #[track_caller]
    pub fn rehash(&mut self, capacity: usize) {
        or_fatal(self.try_rehash(capacity))
    }
}

impl<K, V, S, P> Clone for OpenTable<K, V, S, P>
where
    S: Clone,
    P: Duplicate<Node<K, V>>,
{
    fn clone(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|slot| Slot {
                state: slot.state,
                node: slot.node.as_ref().map(P::duplicate),
            })
            .collect();
        Self {
            slots,
            len: self.len,
            tombstones: self.tombstones,
            hasher: self.hasher.clone(),
            guard: ProbeGuard::new(),
            _policy: PhantomData,
        }
    }

    /// Reuses the existing slot array when it has the same capacity.
    fn clone_from(&mut self, source: &Self) {
        if self.slots.len() != source.slots.len() {
            *self = source.clone();
            return;
        }
        for (dst, src) in self.slots.iter_mut().zip(source.slots.iter()) {
            match (dst.node.as_mut(), src.node.as_ref()) {
                (Some(d), Some(s)) => *d = P::duplicate(s),
                (_, s) => dst.node = s.map(P::duplicate),
            }
            dst.state = src.state;
        }
        self.len = source.len;
        self.tombstones = source.tombstones;
        self.hasher = source.hasher.clone();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S, P> fmt::Debug for OpenTable<K, V, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}
