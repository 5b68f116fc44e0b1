//! Iterators shared by every table kind.
//!
//! Open-addressing tables are walked in slot order, skipping Empty and
//! Tombstone slots. Chained tables are walked bucket by bucket in ascending
//! index, each chain in insertion order. Both directions are supported; use
//! `.rev()` for the reverse traversal.

use core::fmt;
use core::iter::FusedIterator;

use slotmap::SlotMap;

use crate::chained::{Bucket, Entry, EntryKey};
use crate::node::Node;
use crate::slot::Slot;

/// Read-only view of one stored element.
pub struct EntryRef<'a, K, V> {
    key: &'a K,
    value: &'a V,
    hash: u64,
}

impl<'a, K, V> EntryRef<'a, K, V> {
    #[inline]
    pub(crate) fn new(key: &'a K, value: &'a V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &'a V {
        self.value
    }

    /// The hash cached when the element was inserted.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn into_pair(self) -> (&'a K, &'a V) {
        (self.key, self.value)
    }
}

impl<K, V> Clone for EntryRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for EntryRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for EntryRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryRef")
            .field("key", self.key)
            .field("value", self.value)
            .field("hash", &self.hash)
            .finish()
    }
}

/// View of one stored element with a mutable value.
pub struct EntryMut<'a, K, V> {
    key: &'a K,
    value: &'a mut V,
    hash: u64,
}

impl<'a, K, V> EntryMut<'a, K, V> {
    #[inline]
    pub(crate) fn new(key: &'a K, value: &'a mut V, hash: u64) -> Self {
        Self { key, value, hash }
    }

    #[inline]
    pub fn key(&self) -> &'a K {
        self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &*self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut V {
        &mut *self.value
    }

    #[inline]
    pub fn into_value_mut(self) -> &'a mut V {
        self.value
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }
}

/// Double-ended walk over the chains of a chained table.
pub(crate) struct ChainCursor<'a, K, V> {
    buckets: &'a [Bucket],
    entries: &'a SlotMap<EntryKey, Entry<K, V>>,
    front: Option<(usize, EntryKey)>,
    back: Option<(usize, EntryKey)>,
}

impl<'a, K, V> ChainCursor<'a, K, V> {
    pub(crate) fn new(buckets: &'a [Bucket], entries: &'a SlotMap<EntryKey, Entry<K, V>>) -> Self {
        Self {
            buckets,
            entries,
            front: first_head(buckets, 0),
            back: last_tail(buckets, buckets.len()),
        }
    }

    fn next_front(&mut self) -> Option<&'a Entry<K, V>> {
        let entries = self.entries;
        let (bucket, key) = self.front?;
        let entry = entries.get(key)?;
        self.front = match entry.next {
            Some(next) => Some((bucket, next)),
            None => first_head(self.buckets, bucket + 1),
        };
        Some(entry)
    }

    fn next_back(&mut self) -> Option<&'a Entry<K, V>> {
        let entries = self.entries;
        let (bucket, key) = self.back?;
        let entry = entries.get(key)?;
        self.back = match entry.prev {
            Some(prev) => Some((bucket, prev)),
            None => last_tail(self.buckets, bucket),
        };
        Some(entry)
    }
}

/// Head of the first non-empty bucket at or after `from`.
fn first_head(buckets: &[Bucket], from: usize) -> Option<(usize, EntryKey)> {
    buckets
        .iter()
        .enumerate()
        .skip(from)
        .find_map(|(i, b)| b.head.map(|k| (i, k)))
}

/// Tail of the last non-empty bucket before `until`.
fn last_tail(buckets: &[Bucket], until: usize) -> Option<(usize, EntryKey)> {
    buckets[..until]
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, b)| b.tail.map(|k| (i, k)))
}

enum Source<'a, K, V> {
    Slots(core::slice::Iter<'a, Slot<Node<K, V>>>),
    Chain(ChainCursor<'a, K, V>),
}

/// Iterator over the live elements of a table.
pub struct Iter<'a, K, V> {
    source: Source<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn slots(slots: &'a [Slot<Node<K, V>>], len: usize) -> Self {
        Self {
            source: Source::Slots(slots.iter()),
            remaining: len,
        }
    }

    pub(crate) fn chain(cursor: ChainCursor<'a, K, V>, len: usize) -> Self {
        Self {
            source: Source::Chain(cursor),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = EntryRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = match &mut self.source {
            Source::Slots(it) => it.find_map(|slot| slot.live()).map(|(hash, node)| {
                EntryRef::new(&node.key, &node.value, hash)
            }),
            Source::Chain(cursor) => cursor
                .next_front()
                .map(|e| EntryRef::new(&e.node.key, &e.node.value, e.hash)),
        };
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let item = match &mut self.source {
            Source::Slots(it) => it.rev().find_map(|slot| slot.live()).map(|(hash, node)| {
                EntryRef::new(&node.key, &node.value, hash)
            }),
            Source::Chain(cursor) => cursor
                .next_back()
                .map(|e| EntryRef::new(&e.node.key, &e.node.value, e.hash)),
        };
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

enum SourceMut<'a, K, V> {
    Slots(core::slice::IterMut<'a, Slot<Node<K, V>>>),
    Ordered(std::vec::IntoIter<EntryMut<'a, K, V>>),
}

/// Iterator over the live elements of a table with mutable values.
pub struct IterMut<'a, K, V> {
    source: SourceMut<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn slots(slots: &'a mut [Slot<Node<K, V>>], len: usize) -> Self {
        Self {
            source: SourceMut::Slots(slots.iter_mut()),
            remaining: len,
        }
    }

    /// Entries already arranged in traversal order.
    pub(crate) fn ordered(entries: Vec<EntryMut<'a, K, V>>) -> Self {
        let remaining = entries.len();
        Self {
            source: SourceMut::Ordered(entries.into_iter()),
            remaining,
        }
    }
}

fn slot_entry_mut<K, V>(slot: &mut Slot<Node<K, V>>) -> Option<EntryMut<'_, K, V>> {
    let (hash, node) = slot.live_mut()?;
    let Node { key, value } = node;
    Some(EntryMut::new(key, value, hash))
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = EntryMut<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.source {
            SourceMut::Slots(it) => it.find_map(slot_entry_mut),
            SourceMut::Ordered(it) => it.next(),
        };
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = match &mut self.source {
            SourceMut::Slots(it) => it.rev().find_map(slot_entry_mut),
            SourceMut::Ordered(it) => it.next_back(),
        };
        if item.is_some() {
            self.remaining -= 1;
        }
        item
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Keys of a table, in traversal order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| e.key())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| e.key())
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Values of a map, in traversal order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(inner: Iter<'a, K, V>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| e.value())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|e| e.value())
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}
