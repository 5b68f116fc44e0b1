// Fixed-capacity map and set.
//
// Invariants exercised:
// - Capacity is the const parameter and never changes.
// - Overflow is fatal through `insert` and an error through `try_insert`,
//   and leaves the table unchanged either way.
use hashkit::hash::FixedState;
use hashkit::{StaticHashMap, StaticHashSet, TableError};

#[test]
fn fills_exactly_to_capacity() {
    let mut m: StaticHashMap<u32, u32, 8> = StaticHashMap::new();
    for k in 0..8 {
        assert!(m.insert(k, k * 2));
    }
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.load_factor(), 1.0);
    assert!(!m.insert(3, 0));
    assert_eq!(m.try_insert(100, 0), Err(TableError::Full { capacity: 8 }));
    assert_eq!(m.len(), 8);
    for k in 0..8 {
        assert_eq!(m.get(&k), Some(&(k * 2)));
    }
}

#[test]
#[should_panic(expected = "table is full")]
fn overflow_is_fatal() {
    let mut s: StaticHashSet<u32, 4> = StaticHashSet::new();
    for k in 0..5 {
        s.insert(k);
    }
}

// Test: churn under a constant hasher.
// Verifies: tombstones are reused, so the table never reports full while
// fewer than N keys are live.
#[test]
fn constant_hash_churn_reuses_tombstones() {
    let mut s: StaticHashSet<u32, 16, FixedState> = StaticHashSet::new();
    for round in 0..10u32 {
        for k in 0..16 {
            assert_eq!(s.try_insert(round * 100 + k), Ok(true));
        }
        for k in 0..16 {
            assert!(s.remove(&(round * 100 + k)));
        }
        assert!(s.is_empty());
    }
}

#[test]
fn get_or_insert_default_counts() {
    let mut m: StaticHashMap<char, u32, 32> = StaticHashMap::default();
    for c in "hello world".chars() {
        *m.get_or_insert_default(c) += 1;
    }
    assert_eq!(m.get(&'l'), Some(&3));
    assert_eq!(m.get(&'o'), Some(&2));
    assert_eq!(m.len(), 8);
    assert_eq!(m.values().sum::<u32>(), 11);
}
