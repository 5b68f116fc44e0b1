//! hashkit: open-addressing and separate-chaining hash tables with map and
//! set façades, pluggable hashers and per-type relocation policies.
//!
//! Internal Design:
//!
//! Summary
//! - Three table cores, each generic over key `K`, value `V` (`()` for
//!   sets), hasher `S: BuildHasher` and relocation policy `P`:
//!   - OpenTable<K, V, S, P>: flat slot array with linear probing and
//!     tombstones; grows by doubling when no slot is reusable.
//!   - StaticTable<K, V, N, S, P>: the same probing over `N` inline slots;
//!     never grows, so overflow is fatal (or an error from `try_insert`).
//!   - ChainedTable<K, V, S, P>: bucket array of doubly linked chains over
//!     a slotmap arena; insertion order is kept within each bucket.
//! - Façades: `HashMap`, `StaticHashMap`, `ChainedHashMap` and the
//!   matching sets delegate every operation to a core.
//!
//! Probing
//! - Probes start at `hash % capacity` and examine at most `capacity`
//!   slots, so they terminate even when every key hashes alike.
//! - Lookups skip tombstones and stop at the first Empty slot. Inserts
//!   remember the first tombstone and use it once an Empty slot (or a
//!   full scan) proves the key absent.
//! - OpenTable counts tombstones. An insert into an Empty slot that would
//!   push live elements plus tombstones past 7/8 of the slots rebuilds the
//!   table first, at the same capacity while the live elements fit in half
//!   of it and doubled otherwise. Under `Neither` the rebuild is skipped.
//!
//! Hasher and rehashing invariants
//! - Each element stores its `u64` hash at insert time; rehashing places
//!   elements by the stored hash and never calls `K: Hash` again.
//! - Open-addressing rehash fills the new slot array completely before
//!   the old one is dropped. Chained rehash relinks arena entries and
//!   moves no element.
//!
//! Relocation policies
//! - `Movable`, `MoveOnly`, `Copyable`, `Trivial` and `Neither` decide how
//!   an element travels during open-addressing rehash and whether a table
//!   can be cloned. Rehashing live `Neither` elements is fatal.
//!
//! Failure model
//! - Invariant violations (zero capacity, shrinking below `len`, static
//!   overflow, relocating `Neither` elements) are fatal: logged at `error`
//!   and raised as a panic, which is an abort under `panic = "abort"`.
//!   `try_*` variants return `TableError` instead.
//! - Duplicate inserts and missing keys are ordinary outcomes reported
//!   through `bool` and `Option`.
//!
//! Reentrancy
//! - Probes call into `K: Eq` and the hasher. In debug builds a per-table
//!   guard panics if that user code re-enters the same table.
//!
//! Notes and non-goals
//! - Single-threaded: no internal locking; share across threads only
//!   behind external synchronization.
//! - No serialization and no string-specific fast paths.

mod chained;
mod error;
mod fixed;
mod guard;
pub mod hash;
pub mod iter;
mod map;
mod node;
mod open;
pub mod relocation;
mod set;
mod slot;
mod table_proptest;

// Public surface
pub use chained::ChainedTable;
pub use error::TableError;
pub use fixed::StaticTable;
pub use hash::Fnv1aState;
pub use iter::{EntryMut, EntryRef, Iter, IterMut, Keys, Values};
pub use map::{ChainedHashMap, HashMap, StaticHashMap};
pub use node::Node;
pub use open::OpenTable;
pub use relocation::{Copyable, MoveOnly, Movable, Neither, RelocationKind, Trivial};
pub use set::{ChainedHashSet, HashSet, StaticHashSet};
