// Element lifetime accounting with a counting test double.
//
// Each `Tracked` value shares a tally with the test that created it:
// `live` counts values currently alive and `clones` counts duplications.
// The tally is per test, so tests can run in parallel.
//
// Invariants exercised:
// - Cloning a table duplicates every element exactly once.
// - Dropping, clearing or removing releases exactly the affected elements.
// - Moving policies relocate without duplicating; `Copyable` duplicates
//   during rehash and releases the originals afterwards.
use hashkit::hash::FixedState;
use hashkit::{ChainedHashMap, Copyable, HashMap, StaticHashMap};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Default)]
struct Tally {
    live: Cell<usize>,
    clones: Cell<usize>,
}

struct Tracked {
    id: u32,
    tally: Rc<Tally>,
}

impl Tracked {
    fn new(id: u32, tally: &Rc<Tally>) -> Self {
        tally.live.set(tally.live.get() + 1);
        Tracked {
            id,
            tally: tally.clone(),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.tally.clones.set(self.tally.clones.get() + 1);
        Tracked::new(self.id, &self.tally)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.tally.live.set(self.tally.live.get() - 1);
    }
}

// Test: deep copy of a growable map.
// Verifies: clone doubles live elements; dropping either copy releases
// exactly its own.
#[test]
fn clone_doubles_then_drop_releases() {
    let tally = Rc::new(Tally::default());
    let mut m: HashMap<u32, Tracked> = HashMap::with_capacity(16);
    for k in 0..10 {
        m.insert(k, Tracked::new(k, &tally));
    }
    assert_eq!(tally.live.get(), 10);

    let copy = m.clone();
    assert_eq!(tally.live.get(), 20);
    assert_eq!(tally.clones.get(), 10);
    assert!(copy.iter().all(|e| e.value().id == *e.key()));

    drop(copy);
    assert_eq!(tally.live.get(), 10);
    drop(m);
    assert_eq!(tally.live.get(), 0);
}

// Test: duplicate insert drops the rejected value.
#[test]
fn rejected_insert_drops_value() {
    let tally = Rc::new(Tally::default());
    let mut m: HashMap<u32, Tracked> = HashMap::with_capacity(4);
    assert!(m.insert(1, Tracked::new(1, &tally)));
    assert!(!m.insert(1, Tracked::new(2, &tally)));
    assert_eq!(tally.live.get(), 1);
    assert_eq!(m.get(&1).map(|t| t.id), Some(1));
}

// Test: removal paths.
#[test]
fn remove_take_and_clear_release() {
    let tally = Rc::new(Tally::default());
    let mut m: HashMap<u32, Tracked> = HashMap::with_capacity(8);
    for k in 0..6 {
        m.insert(k, Tracked::new(k, &tally));
    }
    assert!(m.remove(&0));
    assert_eq!(tally.live.get(), 5);
    let taken = m.take(&1);
    assert_eq!(tally.live.get(), 5);
    drop(taken);
    assert_eq!(tally.live.get(), 4);
    m.clear();
    assert_eq!(tally.live.get(), 0);
    assert_eq!(m.capacity(), 8);
}

// Test: moving rehash.
// Verifies: no element is duplicated or dropped.
#[test]
fn movable_rehash_moves_only() {
    let tally = Rc::new(Tally::default());
    let mut m: HashMap<u32, Tracked> = HashMap::with_capacity(4);
    for k in 0..12 {
        m.insert(k, Tracked::new(k, &tally));
    }
    m.rehash(64);
    assert_eq!(tally.live.get(), 12);
    assert_eq!(tally.clones.get(), 0);
}

// Test: copying rehash.
// Verifies: each element is cloned once and its original released.
#[test]
fn copyable_rehash_clones_then_releases() {
    let tally = Rc::new(Tally::default());
    let mut m: HashMap<u32, Tracked, hashkit::Fnv1aState, Copyable> = HashMap::with_capacity(16);
    for k in 0..8 {
        m.insert(k, Tracked::new(k, &tally));
    }
    m.rehash(32);
    assert_eq!(tally.live.get(), 8);
    assert_eq!(tally.clones.get(), 8);
    for k in 0..8 {
        assert_eq!(m.get(&k).map(|t| t.id), Some(k));
    }
}

// Test: take_all moves storage without touching elements.
#[test]
fn take_all_does_not_duplicate() {
    let tally = Rc::new(Tally::default());
    let mut a: HashMap<u32, Tracked> = HashMap::with_capacity(8);
    for k in 0..4 {
        a.insert(k, Tracked::new(k, &tally));
    }
    let b = a.take_all();
    assert_eq!(tally.live.get(), 4);
    assert_eq!(tally.clones.get(), 0);
    drop(a);
    assert_eq!(tally.live.get(), 4);
    drop(b);
    assert_eq!(tally.live.get(), 0);
}

// Test: chained tables relink on rehash and deep-copy on clone.
#[test]
fn chained_rehash_and_clone() {
    let tally = Rc::new(Tally::default());
    let mut m: ChainedHashMap<u32, Tracked, FixedState> = ChainedHashMap::with_buckets(4);
    for k in 0..5 {
        m.insert(k, Tracked::new(k, &tally));
    }
    m.rehash(16);
    assert_eq!(tally.clones.get(), 0);
    let copy = m.clone();
    assert_eq!(tally.live.get(), 10);
    assert_eq!(
        copy.values().map(|t| t.id).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );
    drop(m);
    drop(copy);
    assert_eq!(tally.live.get(), 0);
}

// Test: static map clone and clear.
#[test]
fn static_clone_and_clear() {
    let tally = Rc::new(Tally::default());
    let mut m: StaticHashMap<u32, Tracked, 8> = StaticHashMap::new();
    for k in 0..3 {
        m.insert(k, Tracked::new(k, &tally));
    }
    let mut copy = m.clone();
    assert_eq!(tally.live.get(), 6);
    copy.clear();
    assert_eq!(tally.live.get(), 3);
    drop(m);
    assert_eq!(tally.live.get(), 0);
}
