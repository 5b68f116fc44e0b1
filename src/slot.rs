//! Slots and linear probing shared by both open-addressing tables.
//!
//! Each slot is Empty, Tombstone or Occupied; an occupied slot caches the
//! key's hash so rehashing never calls the hasher again.
//!
//! Probe rules, starting at `hash % capacity` and stepping by one with
//! wrap-around, examining at most `capacity` slots:
//! - lookups skip tombstones and stop at the first Empty slot or matching key;
//! - inserts skip tombstones too, but remember the first one. Reaching an
//!   Empty slot proves the key is absent, and the element goes into that
//!   remembered tombstone or, failing that, the Empty slot itself.
//!
//! The scan bound is what keeps probes finite when every slot is occupied or
//! tombstoned, which is the usual state under a constant hasher.

use core::borrow::Borrow;

use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotState {
    Empty,
    Tombstone,
    Occupied(u64),
}

/// One open-addressing slot. `node` is `Some` exactly when `state` is Occupied.
#[derive(Debug)]
pub(crate) struct Slot<N> {
    pub(crate) state: SlotState,
    pub(crate) node: Option<N>,
}

impl<N> Slot<N> {
    pub(crate) const fn empty() -> Self {
        Self {
            state: SlotState::Empty,
            node: None,
        }
    }

    #[inline]
    pub(crate) fn occupy(&mut self, hash: u64, node: N) {
        debug_assert!(!matches!(self.state, SlotState::Occupied(_)));
        self.state = SlotState::Occupied(hash);
        self.node = Some(node);
    }

    /// Takes the element out and leaves a tombstone.
    #[inline]
    pub(crate) fn vacate(&mut self) -> Option<N> {
        self.state = SlotState::Tombstone;
        self.node.take()
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self.state, SlotState::Occupied(_))
    }

    /// The cached hash and element of an occupied slot.
    #[inline]
    pub(crate) fn live(&self) -> Option<(u64, &N)> {
        match (self.state, self.node.as_ref()) {
            (SlotState::Occupied(hash), Some(node)) => Some((hash, node)),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn live_mut(&mut self) -> Option<(u64, &mut N)> {
        match (self.state, self.node.as_mut()) {
            (SlotState::Occupied(hash), Some(node)) => Some((hash, node)),
            _ => None,
        }
    }
}

pub(crate) fn empty_slots<N>(capacity: usize) -> Box<[Slot<N>]> {
    (0..capacity).map(|_| Slot::empty()).collect()
}

/// Where an insert should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// The key is already stored at this index.
    Present(usize),
    /// The key is absent; this Empty or Tombstone slot can take it.
    Vacant(usize),
    /// The key is absent and every slot is occupied.
    Full,
}

#[inline]
fn home(hash: u64, capacity: usize) -> usize {
    (hash % capacity as u64) as usize
}

#[inline]
fn matches<K, V, Q>(slot: &Slot<Node<K, V>>, hash: u64, q: &Q) -> bool
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    match slot.live() {
        Some((h, node)) => h == hash && node.key.borrow() == q,
        None => false,
    }
}

/// Index of the slot holding `q`, if any.
pub(crate) fn find<K, V, Q>(slots: &[Slot<Node<K, V>>], hash: u64, q: &Q) -> Option<usize>
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let capacity = slots.len();
    if capacity == 0 {
        return None;
    }
    let mut index = home(hash, capacity);
    for _ in 0..capacity {
        let slot = &slots[index];
        match slot.state {
            SlotState::Empty => return None,
            SlotState::Occupied(_) if matches(slot, hash, q) => return Some(index),
            _ => {}
        }
        index += 1;
        if index == capacity {
            index = 0;
        }
    }
    None
}

/// Finds `q` or the slot it should be placed in.
pub(crate) fn place<K, V, Q>(slots: &[Slot<Node<K, V>>], hash: u64, q: &Q) -> Placement
where
    K: Borrow<Q>,
    Q: ?Sized + Eq,
{
    let capacity = slots.len();
    if capacity == 0 {
        return Placement::Full;
    }
    let mut reusable = None;
    let mut index = home(hash, capacity);
    for _ in 0..capacity {
        let slot = &slots[index];
        match slot.state {
            SlotState::Empty => return Placement::Vacant(reusable.unwrap_or(index)),
            SlotState::Tombstone => {
                reusable.get_or_insert(index);
            }
            SlotState::Occupied(_) if matches(slot, hash, q) => return Placement::Present(index),
            SlotState::Occupied(_) => {}
        }
        index += 1;
        if index == capacity {
            index = 0;
        }
    }
    match reusable {
        Some(index) => Placement::Vacant(index),
        None => Placement::Full,
    }
}

/// Places a relocated element into a table known not to contain its key.
///
/// Used while filling a fresh slot array during rehash, where there are no
/// tombstones and at least one Empty slot remains.
pub(crate) fn place_relocated<N>(slots: &mut [Slot<N>], hash: u64, node: N) {
    let capacity = slots.len();
    let mut index = home(hash, capacity);
    while slots[index].is_occupied() {
        index += 1;
        if index == capacity {
            index = 0;
        }
    }
    slots[index].occupy(hash, node);
}
