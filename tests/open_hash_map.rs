// Growable open-addressing map: observable properties.
//
// Invariants exercised:
// - Membership: `contains_key` is true exactly for inserted, not yet
//   removed keys, and `len` counts them.
// - Tombstones: removing keys never hides keys further along a probe
//   sequence, in either removal order.
// - Rehash: any capacity >= len keeps every mapping; below len is fatal.
// - Collisions: a constant hasher degrades speed only.
use hashkit::hash::{FixedState, IdentityState};
use hashkit::{HashMap, HashSet, Neither, TableError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn churn<S: std::hash::BuildHasher + Default>(keys: u32, capacity: usize, ascending: bool) {
    let mut m: HashMap<u32, u32, S> = HashMap::with_capacity(capacity);
    for k in 0..keys {
        assert!(m.insert(k, k + 1));
    }
    let order: Vec<u32> = if ascending {
        (0..keys).collect()
    } else {
        (0..keys).rev().collect()
    };
    for (n, &i) in order.iter().enumerate() {
        assert!(m.remove(&i));
        assert_eq!(m.len(), (keys as usize) - n - 1);
        let (removed, remaining) = order.split_at(n + 1);
        for j in removed {
            assert!(!m.contains_key(j), "removed key {j} still visible");
        }
        for j in remaining {
            assert_eq!(m.get(j), Some(&(j + 1)), "key {j} lost after removing {i}");
        }
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), capacity);
}

// Test: deletion churn over half-full storage.
// Verifies: after removing key i, every other key keeps its value and every
// removed key is gone.
#[test]
fn deletion_churn_ascending() {
    churn::<hashkit::Fnv1aState>(256, 512, true);
}

#[test]
fn deletion_churn_descending() {
    churn::<hashkit::Fnv1aState>(256, 512, false);
}

// Test: the same churn when every key shares one probe sequence.
#[test]
fn deletion_churn_constant_hash() {
    churn::<FixedState>(64, 128, true);
    churn::<FixedState>(64, 128, false);
}

// Test: shrink to exactly len.
// Verifies: capacity follows, load factor reaches 1.0 and mappings survive.
#[test]
fn rehash_shrinks_to_len() {
    init_logging();
    let mut m: HashMap<u32, String> = HashMap::with_capacity(16);
    for k in 0..8 {
        m.insert(k, format!("v{k}"));
    }
    assert_eq!(m.load_factor(), 0.5);
    m.rehash(8);
    assert_eq!(m.capacity(), 8);
    assert_eq!(m.len(), 8);
    assert_eq!(m.load_factor(), 1.0);
    for k in 0..8 {
        assert_eq!(m.get(&k).map(String::as_str), Some(format!("v{k}").as_str()));
    }
    assert_eq!(
        m.try_rehash(4),
        Err(TableError::CapacityBelowSize {
            capacity: 4,
            size: 8
        })
    );
}

#[test]
#[should_panic(expected = "capacity 4 cannot hold the current 8 elements")]
fn rehash_below_len_is_fatal() {
    let mut m: HashMap<u32, u32> = HashMap::with_capacity(16);
    for k in 0..8 {
        m.insert(k, k);
    }
    m.rehash(8);
    m.rehash(4);
}

#[test]
#[should_panic(expected = "zero is not a valid capacity")]
fn zero_capacity_is_fatal() {
    let _m: HashMap<u32, u32> = HashMap::with_capacity(0);
}

#[test]
#[should_panic(expected = "zero is not a valid capacity")]
fn rehash_to_zero_is_fatal() {
    let mut s: HashSet<u32> = HashSet::with_capacity(4);
    s.rehash(0);
}

// Test: growth when every slot is occupied.
// Verifies: capacity doubles and nothing is lost.
#[test]
fn full_table_grows() {
    init_logging();
    let mut m: HashMap<u32, u32, IdentityState> = HashMap::with_capacity(4);
    for k in 0..20 {
        assert!(m.insert(k, k));
        assert!(m.len() <= m.capacity());
    }
    assert_eq!(m.capacity(), 32);
    assert!((0..20).all(|k| m.get(&k) == Some(&k)));
}

#[test]
#[should_panic(expected = "cannot be relocated")]
fn growth_under_neither_is_fatal() {
    let mut m: HashMap<u32, u32, IdentityState, Neither> = HashMap::with_capacity(2);
    m.insert(0, 0);
    m.insert(1, 1);
    m.insert(2, 2);
}

// Test: constant hasher.
// Verifies: N distinct keys are all stored and retrievable; duplicates
// are still rejected.
#[test]
fn constant_hash_keeps_every_key() {
    let mut s: HashSet<String, FixedState> = HashSet::with_capacity(64);
    for k in 0..50 {
        assert!(s.insert(k.to_string()));
    }
    for k in 0..50 {
        assert!(!s.insert(k.to_string()));
        assert!(s.contains(k.to_string().as_str()));
    }
    assert_eq!(s.len(), 50);
    assert!(s.entries().all(|e| e.hash() == 0));
}

// Test: load factor identity after each mutation.
#[test]
fn load_factor_tracks_len() {
    let mut m: HashMap<u64, ()> = HashMap::with_capacity(10);
    for k in 0..10u64 {
        m.insert(k, ());
        assert_eq!(m.load_factor(), m.len() as f32 / m.capacity() as f32);
    }
    for k in 0..10u64 {
        m.remove(&k);
        assert_eq!(m.load_factor(), m.len() as f32 / m.capacity() as f32);
    }
}

// Test: take_all transfers storage.
// Verifies: the source is empty with zero capacity and usable after rehash.
#[test]
fn take_all_transfers_storage() {
    let mut a: HashMap<&str, u32> = HashMap::with_capacity(8);
    a.insert("x", 1);
    a.insert("y", 2);
    let b = a.take_all();
    assert_eq!(b.len(), 2);
    assert_eq!(b.get("y"), Some(&2));
    assert_eq!(a.capacity(), 0);
    assert_eq!(a.len(), 0);
    assert_eq!(a.load_factor(), 0.0);
    assert_eq!(a.get("x"), None);
    a.rehash(4);
    assert!(a.insert("z", 3));
}

#[test]
#[should_panic(expected = "zero is not a valid capacity")]
fn insert_into_taken_table_is_fatal() {
    let mut a: HashMap<u32, u32> = HashMap::with_capacity(8);
    let _b = a.take_all();
    a.insert(1, 1);
}

// Test: reverse traversal.
// Verifies: `.rev()` yields exactly the forward sequence backwards.
#[test]
fn reverse_iteration_mirrors_forward() {
    let mut m: HashMap<u32, u32> = HashMap::with_capacity(32);
    for k in 0..20 {
        m.insert(k * 7, k);
    }
    for k in 0..10 {
        m.remove(&(k * 14));
    }
    let fwd: Vec<u32> = m.keys().copied().collect();
    let mut back: Vec<u32> = m.keys().rev().copied().collect();
    back.reverse();
    assert_eq!(fwd, back);
    assert_eq!(fwd.len(), m.len());
}
