//! A minimal ordered set on top of the rebalancing core, and a harness that checks it against
//! [`BTreeSet`].
//!
//! The set does the parts the core leaves to its caller: node storage (an [`Arena`]), key
//! comparison, finding the insertion point and in-order traversal.

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};
use tracing::debug;

use crate::{balance_after_insert, check_invariants, tree_remove, Arena, Linkage, NodeId, Side};

/// An ordered set of `u32` keys.
#[derive(Clone, Debug, Default)]
pub struct ModelSet {
    arena: Arena<u32>,
    root: Option<NodeId>,
}

impl ModelSet {
    pub const fn new() -> ModelSet {
        ModelSet {
            arena: Arena::new(),
            root: None,
        }
    }

    pub const fn len(&self) -> usize {
        self.arena.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn arena(&self) -> &Arena<u32> {
        &self.arena
    }

    /// Returns the node holding `key`.
    pub fn find(&self, key: u32) -> Option<NodeId> {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            opt_cur = match key.cmp(&self.arena[cur]) {
                core::cmp::Ordering::Less => self.arena.left(cur),
                core::cmp::Ordering::Equal => return Some(cur),
                core::cmp::Ordering::Greater => self.arena.right(cur),
            };
        }

        None
    }

    pub fn contains(&self, key: u32) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `key`, returning `false` if it was already present.
    pub fn insert(&mut self, key: u32) -> bool {
        let mut parent = None;
        let mut side = Side::Left;
        let mut opt_cur = self.root;

        // Descend the tree, looking for a suitable leaf.
        while let Some(cur) = opt_cur {
            side = match key.cmp(&self.arena[cur]) {
                core::cmp::Ordering::Less => Side::Left,
                core::cmp::Ordering::Equal => return false,
                core::cmp::Ordering::Greater => Side::Right,
            };
            parent = Some(cur);
            opt_cur = self.arena.child(cur, side);
        }

        let node = self.arena.alloc(key);
        self.arena.set_parent(node, parent);
        match parent {
            Some(parent) => self.arena.set_child(parent, side, Some(node)),
            None => self.root = Some(node),
        }

        balance_after_insert(&mut self.arena, &mut self.root, node);
        true
    }

    /// Removes `key`, returning `false` if it was not present.
    pub fn remove(&mut self, key: u32) -> bool {
        let Some(node) = self.find(key) else {
            return false;
        };

        tree_remove(&mut self.arena, &mut self.root, node);
        self.arena.free(node);
        true
    }

    pub fn first(&self) -> Option<u32> {
        let mut cur = self.root?;
        while let Some(left) = self.arena.left(cur) {
            cur = left;
        }
        Some(self.arena[cur])
    }

    pub fn last(&self) -> Option<u32> {
        let mut cur = self.root?;
        while let Some(right) = self.arena.right(cur) {
            cur = right;
        }
        Some(self.arena[cur])
    }

    pub fn pop_first(&mut self) -> Option<u32> {
        let first = self.first()?;
        self.remove(first);
        Some(first)
    }

    pub fn pop_last(&mut self) -> Option<u32> {
        let last = self.last()?;
        self.remove(last);
        Some(last)
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> Vec<u32> {
        let mut keys = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut opt_cur = self.root;

        loop {
            while let Some(cur) = opt_cur {
                stack.push(cur);
                opt_cur = self.arena.left(cur);
            }

            let Some(cur) = stack.pop() else {
                break;
            };

            keys.push(self.arena[cur]);
            opt_cur = self.arena.right(cur);
        }

        keys
    }

    /// Panics if the tree violates any red-black or linkage invariant.
    #[track_caller]
    pub fn assert_invariants(&self) {
        if let Err(violation) = check_invariants(&self.arena, self.root) {
            panic!("{violation}");
        }
    }
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Contains(ItemValue),
    Remove(ItemValue),
    First,
    PopFirst,
    Last,
    PopLast,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        // `Index` picks an existing key, so removals and lookups hit live nodes often.
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::PopFirst => FinalOp::PopFirst,
            Op::Last => FinalOp::Last,
            Op::PopLast => FinalOp::PopLast,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Contains(u32),
    Remove(u32),
    First,
    PopFirst,
    Last,
    PopLast,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Contains),
        value_strategy().prop_map(Op::Remove),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

/// Applies `ops` to both a [`ModelSet`] and a [`BTreeSet`], checking after every operation that
/// they agree, that the tree is a valid red-black tree and that an in-order traversal reaches
/// exactly the live nodes.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree = BTreeSet::new();
    let mut model = ModelSet::new();
    let mut sorted_values = Vec::with_capacity(ops.len());

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);
        debug!(op_id, ?final_op, "applying op");

        match final_op {
            FinalOp::Insert(value) => {
                assert_eq!(
                    btree.insert(value),
                    model.insert(value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Contains(value) => {
                assert_eq!(
                    btree.contains(&value),
                    model.contains(value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Remove(value) => {
                assert_eq!(
                    btree.remove(&value),
                    model.remove(value),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::First => {
                assert_eq!(
                    btree.first().copied(),
                    model.first(),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::PopFirst => {
                assert_eq!(
                    btree.pop_first(),
                    model.pop_first(),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::Last => {
                assert_eq!(
                    btree.last().copied(),
                    model.last(),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }

            FinalOp::PopLast => {
                assert_eq!(
                    btree.pop_last(),
                    model.pop_last(),
                    "FinalOp #{op_id}: {final_op:?}"
                );
            }
        }

        model.assert_invariants();
        assert_eq!(btree.len(), model.len());

        sorted_values = model.keys();
        assert_eq!(sorted_values.len(), model.len());
        assert!(btree.iter().copied().eq(sorted_values.iter().copied()));
    }
}
