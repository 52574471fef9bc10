// RobinHoodTable integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round trip: a stored key resolves to its latest value until removed.
// - Upsert: re-inserting a key returns the previous value, len unchanged.
// - Growth: capacity doubles, probe bound grows, membership is preserved.
// - Load bound: len never exceeds the occupancy threshold after insert.
// - Removal: the removed key is gone, every other key stays reachable.
// - Configuration: bad parameters are rejected before allocation.
use robin_table::{RemovalPolicy, RobinHoodTable, TableConfig, TableError};

const POLICIES: [RemovalPolicy; 2] = [RemovalPolicy::BackwardShift, RemovalPolicy::Tombstone];

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("sym{:04}", i)).collect()
}

// Test: insert, search, remove on a small table.
// Assumes: capacity 8 with threshold 6 holds two keys without growth.
// Verifies: removed key is absent, the other key keeps its value.
#[test]
fn scenario_insert_search_remove() {
    for policy in POLICIES {
        let mut t = TableConfig::new(8, 6)
            .removal_policy(policy)
            .build()
            .expect("valid config");
        assert_eq!(t.insert("a", 1).unwrap(), None);
        assert_eq!(t.insert("b", 2).unwrap(), None);
        assert_eq!(t.search("a"), Some(&1));
        assert_eq!(t.remove("a"), Some(1));
        assert_eq!(t.search("a"), None);
        assert_eq!(t.search("b"), Some(&2));
        assert_eq!(t.len(), 1);
    }
}

// Test: the fifth insert into a table with threshold 4 grows it.
// Assumes: growth doubles the capacity at least once.
// Verifies: capacity >= 8 and all five keys keep their values.
#[test]
fn scenario_fifth_insert_grows() {
    let mut t = RobinHoodTable::new(4, 4).unwrap();
    let ks = ["k1", "k2", "k3", "k4", "k5"];
    for (i, k) in ks.iter().enumerate() {
        assert_eq!(t.insert(*k, i).unwrap(), None);
        assert!(t.len() <= t.max_occupancy());
    }
    assert!(t.capacity() >= 8);
    assert_eq!(t.len(), 5);
    for (i, k) in ks.iter().enumerate() {
        assert_eq!(t.search(*k), Some(&i), "key {k} lost across growth");
    }
}

// Test: upsert of an existing key.
// Assumes: the key was inserted once before.
// Verifies: prior value returned, new value visible, len unchanged.
#[test]
fn scenario_upsert_returns_prior_value() {
    let mut t = RobinHoodTable::new(8, 6).unwrap();
    assert_eq!(t.insert("x", 1).unwrap(), None);
    let len = t.len();
    assert_eq!(t.insert("x", 2).unwrap(), Some(1));
    assert_eq!(t.search("x"), Some(&2));
    assert_eq!(t.len(), len);
}

// Test: many keys through repeated growth.
// Assumes: a tiny initial table.
// Verifies: probe bound tracks ⌊log2 capacity⌋, every key resolves, load bound holds.
#[test]
fn growth_preserves_membership() {
    let ks = keys(2000);
    let mut t = RobinHoodTable::new(2, 1).unwrap();
    for (i, k) in ks.iter().enumerate() {
        let cap = t.capacity();
        t.insert(k.as_str(), i).unwrap();
        assert!(t.len() <= t.max_occupancy());
        assert!(t.capacity() >= cap);
        assert_eq!(t.probe_bound(), t.capacity().ilog2() as usize);
    }
    assert_eq!(t.len(), ks.len());
    for (i, k) in ks.iter().enumerate() {
        assert_eq!(t.search(k.as_str()), Some(&i));
    }
}

// Test: removing half the keys.
// Assumes: keys were inserted into a table that grew several times.
// Verifies: removed keys are absent, survivors are reachable, no shrinking.
#[test]
fn removal_keeps_other_keys_reachable() {
    let ks = keys(500);
    for policy in POLICIES {
        let mut t = TableConfig::new(16, 12)
            .removal_policy(policy)
            .seed(17)
            .build()
            .unwrap();
        for (i, k) in ks.iter().enumerate() {
            t.insert(k.as_str(), i).unwrap();
        }
        let cap = t.capacity();
        for (i, k) in ks.iter().enumerate().filter(|(i, _)| i % 2 == 0) {
            assert_eq!(t.remove(k.as_str()), Some(i));
        }
        assert_eq!(t.capacity(), cap, "removal must not shrink");
        for (i, k) in ks.iter().enumerate() {
            let expected = (i % 2 == 1).then_some(i);
            assert_eq!(t.search(k.as_str()).copied(), expected);
        }
        assert_eq!(t.len(), ks.len() / 2);
        if policy == RemovalPolicy::BackwardShift {
            assert_eq!(t.tombstones(), 0);
        } else {
            assert_eq!(t.tombstones(), ks.len() / 2);
        }
    }
}

// Test: removing an absent key.
// Assumes: the table holds unrelated keys.
// Verifies: None is returned and nothing changes.
#[test]
fn remove_absent_is_noop() {
    let mut t = RobinHoodTable::new(8, 6).unwrap();
    t.insert("present", 1).unwrap();
    assert_eq!(t.remove("missing"), None);
    assert_eq!(t.remove("missing"), None);
    assert_eq!(t.len(), 1);
    assert_eq!(t.search("present"), Some(&1));
}

// Test: remove then reinsert the same key.
// Assumes: a removed slot is reclaimable.
// Verifies: the key comes back as a fresh insert with the new value.
#[test]
fn reinsert_after_remove() {
    for policy in POLICIES {
        let mut t = TableConfig::new(8, 6).removal_policy(policy).build().unwrap();
        t.insert("k", 1).unwrap();
        assert_eq!(t.remove("k"), Some(1));
        assert_eq!(t.insert("k", 2).unwrap(), None);
        assert_eq!(t.search("k"), Some(&2));
        assert_eq!(t.len(), 1);
        assert_eq!(t.tombstones(), 0);
    }
}

// Test: construction parameters.
// Assumes: capacity must be at least 2, occupancy in 1..=capacity.
// Verifies: InvalidConfiguration for each bad combination.
#[test]
fn invalid_configuration_is_rejected() {
    for (cap, max) in [(0, 1), (1, 1), (8, 0), (8, 9)] {
        match RobinHoodTable::<u8>::new(cap, max) {
            Err(TableError::InvalidConfiguration(_)) => {}
            other => panic!("({cap}, {max}) should be rejected, got {:?}", other.map(|t| t.len())),
        }
    }
    assert!(RobinHoodTable::<u8>::new(2, 2).is_ok());
}

// Test: error messages.
// Verifies: Display output names the failure.
#[test]
fn errors_render_messages() {
    let err = RobinHoodTable::<u8>::new(1, 1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid table configuration: initial capacity must be at least 2"
    );
    assert_eq!(
        TableError::Allocation { slots: 12 }.to_string(),
        "failed to allocate a slot array of 12 slots"
    );
    assert_eq!(TableError::CapacityOverflow.to_string(), "table capacity overflow");
}

// Test: reserve past the addressable range.
// Assumes: len + additional overflows usize.
// Verifies: CapacityOverflow, and the table is untouched.
#[test]
fn reserve_overflow_leaves_table_unchanged() {
    let mut t = RobinHoodTable::new(4, 3).unwrap();
    t.insert("a", 1).unwrap();
    let (cap, max) = (t.capacity(), t.max_occupancy());

    assert_eq!(t.reserve(usize::MAX), Err(TableError::CapacityOverflow));
    assert_eq!(t.len(), 1);
    assert_eq!(t.capacity(), cap);
    assert_eq!(t.max_occupancy(), max);
    assert_eq!(t.search("a"), Some(&1));
}

// Test: reserve a size whose slot array cannot be allocated.
// Assumes: the target capacity fits usize but its byte size exceeds isize::MAX.
// Verifies: Allocation is returned, entries and layout are unchanged, and
// the table keeps working afterwards.
#[test]
fn reserve_allocation_failure_leaves_table_unchanged() {
    let ks = keys(20);
    let mut t = RobinHoodTable::new(4, 3).unwrap();
    for (i, k) in ks.iter().enumerate() {
        t.insert(k.as_str(), i).unwrap();
    }
    let (len, cap, max) = (t.len(), t.capacity(), t.max_occupancy());

    match t.reserve(usize::MAX / 64) {
        Err(TableError::Allocation { slots }) => assert!(slots > cap),
        other => panic!("expected allocation failure, got {:?}", other),
    }
    assert_eq!(t.len(), len);
    assert_eq!(t.capacity(), cap);
    assert_eq!(t.max_occupancy(), max);
    for (i, k) in ks.iter().enumerate() {
        assert_eq!(t.search(k.as_str()), Some(&i));
    }

    assert_eq!(t.insert("late", 99).unwrap(), None);
    assert_eq!(t.search("late"), Some(&99));
}

// Test: byte-string keys of different shapes.
// Assumes: keys are compared byte for byte.
// Verifies: &str, &[u8] and String keys interoperate; empty key and
// embedded NUL bytes are distinct keys.
#[test]
fn byte_string_keys() {
    let owned = String::from("owned");
    let mut t = RobinHoodTable::new(16, 12).unwrap();
    t.insert("", 0).unwrap();
    t.insert(b"a\0b", 1).unwrap();
    t.insert(b"a", 2).unwrap();
    t.insert(&owned, 3).unwrap();

    assert_eq!(t.search(""), Some(&0));
    assert_eq!(t.search(b"a\0b"), Some(&1));
    assert_eq!(t.search("a"), Some(&2));
    assert_eq!(t.search("owned"), Some(&3));
    assert_eq!(t.search(b"owned".as_slice()), Some(&3));
    assert_eq!(t.search("a\0"), None);
}

// Test: values kept outside the table.
// Assumes: V = &T stores references without taking ownership.
// Verifies: lookups return the caller's referents.
#[test]
fn borrowed_values() {
    let names = [String::from("alpha"), String::from("beta")];
    let payloads = [vec![1u8, 2], vec![3u8]];
    let mut t: RobinHoodTable<'_, &Vec<u8>> = RobinHoodTable::new(4, 3).unwrap();
    for (n, p) in names.iter().zip(&payloads) {
        t.insert(n, p).unwrap();
    }
    assert!(std::ptr::eq(*t.search("alpha").unwrap(), &payloads[0]));
    assert_eq!(t.search("beta").map(|v| v.len()), Some(1));
    t.destroy();
    // Referents outlive the table.
    assert_eq!(payloads[0], vec![1, 2]);
}

// Test: pre-sizing.
// Assumes: reserve grows ahead of time.
// Verifies: no further capacity change while inserting the reserved count.
#[test]
fn reserve_avoids_growth_on_insert() {
    let ks = keys(100);
    let mut t = RobinHoodTable::new(4, 3).unwrap();
    t.reserve(ks.len()).unwrap();
    assert!(t.max_occupancy() >= ks.len());
    let cap = t.capacity();
    let max = t.max_occupancy();
    for k in &ks {
        t.insert(k.as_str(), ()).unwrap();
    }
    // Only a probe-bound overflow could still grow the table.
    if t.capacity() == cap {
        assert_eq!(t.max_occupancy(), max);
    }
    assert_eq!(t.len(), ks.len());
}

// Test: iteration.
// Verifies: iter visits each live entry once; `&table` is iterable.
#[test]
fn iteration_visits_live_entries() {
    let ks = keys(50);
    let mut t = RobinHoodTable::new(8, 6).unwrap();
    for (i, k) in ks.iter().enumerate() {
        t.insert(k.as_str(), i).unwrap();
    }
    t.remove(ks[0].as_str());
    let mut seen: Vec<(Vec<u8>, usize)> = (&t).into_iter().map(|(k, v)| (k.to_vec(), *v)).collect();
    seen.sort();
    let mut expected: Vec<(Vec<u8>, usize)> = ks
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, k)| (k.as_bytes().to_vec(), i))
        .collect();
    expected.sort();
    assert_eq!(seen, expected);
}
