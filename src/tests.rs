use std::ops::Range;

use proptest::prelude::*;

use crate::model::{self, ModelSet};

fn insert_find_all(keys: &[u32]) {
    let mut set = ModelSet::new();

    for &key in keys {
        assert!(set.insert(key));
        set.assert_invariants();
    }

    for &key in keys {
        let node = set.find(key).expect("item not found");
        assert_eq!(set.arena()[node], key);
    }

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    assert_eq!(set.keys(), sorted);
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

// Calls `f` with every permutation of `0..n`.
fn for_each_permutation(n: u32, mut f: impl FnMut(&[u32])) {
    fn go(prefix: &mut Vec<u32>, rest: &mut Vec<u32>, f: &mut dyn FnMut(&[u32])) {
        if rest.is_empty() {
            f(prefix);
            return;
        }

        for i in 0..rest.len() {
            let key = rest.remove(i);
            prefix.push(key);
            go(prefix, rest, f);
            prefix.pop();
            rest.insert(i, key);
        }
    }

    go(&mut Vec::new(), &mut (0..n).collect(), &mut f);
}

#[test]
fn five_elems_find() {
    for_each_permutation(5, insert_find_all);
}

fn insert_remove_all(keys: &[u32]) {
    let mut set = ModelSet::new();

    for &key in keys {
        set.insert(key);
        set.assert_invariants();
    }

    for (i, &key) in keys.iter().enumerate() {
        assert!(set.remove(key));
        set.assert_invariants();
        assert!(!set.contains(key));
        assert_eq!(set.keys().len(), keys.len() - i - 1);
    }

    assert!(set.is_empty());
    assert_eq!(set.root(), None);

    for &key in keys {
        set.insert(key);
        set.assert_invariants();
    }

    for &key in keys.iter().rev() {
        assert!(set.remove(key));
        set.assert_invariants();
        assert!(!set.contains(key));
    }

    assert!(set.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_six() {
    for_each_permutation(6, insert_remove_all);
}

// Removing each key from a tree grown in every insertion order of `0..n` reaches every removal case
// from both sides.
#[test]
fn remove_each_from_every_shape() {
    for_each_permutation(6, |keys| {
        for &victim in keys {
            let mut set = ModelSet::new();
            for &key in keys {
                set.insert(key);
            }

            assert!(set.remove(victim));
            set.assert_invariants();

            let expected: Vec<u32> = (0..6).filter(|&k| k != victim).collect();
            assert_eq!(set.keys(), expected);
        }
    });
}

#[test]
fn ascending_and_descending_runs() {
    let mut set = ModelSet::new();

    for key in 0..512 {
        set.insert(key);
        set.assert_invariants();
    }

    for key in (512..1024).rev() {
        set.insert(key);
        set.assert_invariants();
    }

    assert_eq!(set.keys(), (0..1024).collect::<Vec<_>>());

    for key in (0..1024).step_by(2) {
        assert!(set.remove(key));
        set.assert_invariants();
    }

    assert_eq!(set.keys(), (1..1024).step_by(2).collect::<Vec<_>>());
}

#[test]
fn interleaved_stress() {
    // xorshift32, so the sequence is the same on every run.
    let mut state = 0x2545_f491_u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    let mut set = ModelSet::new();
    let mut live = std::collections::BTreeSet::new();

    for _ in 0..1000 {
        let key = next() % 256;

        if next() % 3 == 0 {
            assert_eq!(set.remove(key), live.remove(&key));
        } else {
            assert_eq!(set.insert(key), live.insert(key));
        }

        set.assert_invariants();
        assert_eq!(set.keys().len(), live.len());
        assert_eq!(set.len(), live.len());
    }
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }
}
