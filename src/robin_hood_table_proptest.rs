#![cfg(test)]

// Property tests for RobinHoodTable kept inside the crate so they can check
// the slot layout after every operation.

use crate::config::{RemovalPolicy, TableConfig};
use crate::robin_hood_table::RobinHoodTable;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Search(usize),
    Contains(String),
    Mutate(usize, i32),
    Reserve(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-c]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Search),
            1 => "[a-c]{0,4}".prop_map(OpI::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => (0usize..16).prop_map(OpI::Reserve),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn arb_config() -> impl Strategy<Value = TableConfig> {
    (2usize..=9, any::<u64>(), any::<bool>()).prop_flat_map(|(cap, seed, tomb)| {
        (1usize..=cap).prop_map(move |max| {
            let policy = if tomb {
                RemovalPolicy::Tombstone
            } else {
                RemovalPolicy::BackwardShift
            };
            TableConfig::new(cap, max).seed(seed).removal_policy(policy)
        })
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Upsert returns the previous value and leaves `len` unchanged.
// - `search`/`contains_key` parity with the model, before and after growth.
// - `remove` returns the model's value and leaves every other key reachable.
// - `iter` yields each live key exactly once.
// - Slot layout: exact distances, no duplicate keys, no gaps, load bound.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), config in arb_config()) {
        let mut sut: RobinHoodTable<'_, i32> = config.build().unwrap();
        let mut model: HashMap<&str, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].as_str();
                    let before = sut.len();
                    let prev = sut.insert(k, v).unwrap();
                    prop_assert_eq!(prev, model.insert(k, v));
                    if prev.is_some() {
                        prop_assert_eq!(sut.len(), before, "upsert must not consume a slot");
                    }
                }
                OpI::Remove(i) => {
                    let k = pool[i].as_str();
                    prop_assert_eq!(sut.remove(k), model.remove(k));
                    prop_assert!(!sut.contains_key(k));
                }
                OpI::Search(i) => {
                    let k = pool[i].as_str();
                    prop_assert_eq!(sut.search(k), model.get(k));
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(s.as_str()), model.contains_key(s.as_str()));
                }
                OpI::Mutate(i, d) => {
                    let k = pool[i].as_str();
                    match (sut.search_mut(k), model.get_mut(k)) {
                        (Some(v), Some(mv)) => {
                            *v = v.saturating_add(d);
                            *mv = mv.saturating_add(d);
                        }
                        (None, None) => {}
                        (s, m) => {
                            prop_assert!(false, "presence mismatch: {:?} vs {:?}", s, m);
                        }
                    }
                }
                OpI::Reserve(n) => {
                    let len = sut.len();
                    sut.reserve(n).unwrap();
                    prop_assert!(sut.max_occupancy() >= len + n);
                    prop_assert_eq!(sut.len(), len, "growth must not change len");
                }
                OpI::Iterate => {
                    let s_keys: Vec<&[u8]> = sut.iter().map(|(k, _)| k).collect();
                    let unique: BTreeSet<&[u8]> = s_keys.iter().copied().collect();
                    prop_assert_eq!(unique.len(), s_keys.len(), "iter yielded a key twice");
                    let m_keys: BTreeSet<&[u8]> = model.keys().map(|k| k.as_bytes()).collect();
                    prop_assert_eq!(unique, m_keys);
                }
            }

            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        // Every key in the pool resolves exactly as in the model.
        for k in &pool {
            prop_assert_eq!(sut.search(k.as_str()), model.get(k.as_str()));
        }
    }
}

// Property: both removal policies agree on every observable result for the
// same operation sequence.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_removal_policies_agree((pool, ops) in arb_scenario(), seed in any::<u64>()) {
        let mut shift: RobinHoodTable<'_, i32> = TableConfig::new(4, 3).seed(seed).build().unwrap();
        let mut tomb: RobinHoodTable<'_, i32> = TableConfig::new(4, 3)
            .seed(seed)
            .removal_policy(RemovalPolicy::Tombstone)
            .build()
            .unwrap();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = pool[i].as_str();
                    prop_assert_eq!(shift.insert(k, v).unwrap(), tomb.insert(k, v).unwrap());
                }
                OpI::Remove(i) => {
                    let k = pool[i].as_str();
                    prop_assert_eq!(shift.remove(k), tomb.remove(k));
                }
                OpI::Search(i) => {
                    let k = pool[i].as_str();
                    prop_assert_eq!(shift.search(k), tomb.search(k));
                }
                _ => {}
            }
            prop_assert_eq!(shift.len(), tomb.len());
        }
        shift.assert_invariants();
        tomb.assert_invariants();
    }
}
