//! The rebalancing core of an intrusive red-black tree.
//!
//! This crate does not own nodes, compare keys or search. A container performs an ordinary binary
//! search tree insertion, links the new node in as a red leaf and calls [`balance_after_insert`];
//! to erase, it locates the node and calls [`tree_remove`]. Everything the core needs from a node
//! is expressed by the [`Linkage`] trait, so the same algorithms back set-like and map-like
//! containers, index-addressed arenas ([`Arena`]) and pointer-linked intrusive nodes
//! ([`Intrusive`]) alike.

// Conventions used in comments follow Cormen, Leiserson, Rivest and Stein:
// - `z` is the node being inserted or removed.
// - `p`, `g` and `u` are the parent, grandparent and uncle of `z` during insertion.
// - `x` is the node that inherits a black deficit during removal, and `w` is its sibling.
// - A missing child is a black leaf.
//
// The invariants of a red-black tree are:
// 1. The root is black.
// 2. A red node has no red child.
// 3. Every path from a node to a missing child passes through the same number of black nodes.
//
// and, for the linked representation:
// 4. The root has no parent, and every other node is a child of its parent.
//
// Corollary: the longest root-to-leaf path is at most twice as long as the shortest, so the height
// of a tree of `n` nodes is at most `2 log2(n + 1)`.

use core::ops::Not;

mod arena;
pub mod debug;
mod insert;
mod intrusive;
mod invariant;
mod linkage;
mod remove;
mod rotate;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use arena::{Arena, NodeId};
pub use insert::balance_after_insert;
pub use intrusive::{Intrusive, Links};
pub use invariant::{check_invariants, tree_invariant, InvariantViolation};
pub use linkage::Linkage;
pub use remove::tree_remove;
pub use rotate::{rotate, rotate_left, rotate_right};

/// Which child slot of a node a link occupies.
///
/// Every rebalancing case has a mirror image; the algorithms are written once in terms of a `Side`
/// and its opposite `!side`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Self::Output {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
