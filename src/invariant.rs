use core::fmt;

use tracing::debug;

use crate::{Linkage, Side};

/// A red-black or linkage invariant found broken by [`check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation<H: fmt::Debug> {
    #[error("root {root:?} has parent {parent:?}")]
    RootHasParent { root: H, parent: H },

    #[error("root {root:?} is red")]
    RedRoot { root: H },

    #[error("{node:?} is the {side:?} child of {parent:?}, but its parent link is {found:?}")]
    ParentMismatch {
        node: H,
        parent: H,
        side: Side,
        found: Option<H>,
    },

    #[error("{node:?} has the same node {child:?} as both children")]
    DuplicateChild { node: H, child: H },

    #[error("red node {parent:?} has red child {child:?}")]
    RedRedEdge { parent: H, child: H },

    #[error("{node:?} has black height {left} on the left and {right} on the right")]
    BlackHeightMismatch { node: H, left: usize, right: usize },
}

/// Returns `true` if the tree rooted at `root` satisfies every red-black and linkage invariant.
///
/// See [`check_invariants`] for the list. This only reads the tree.
pub fn tree_invariant<L: Linkage>(links: &L, root: Option<L::Handle>) -> bool {
    check_invariants(links, root).is_ok()
}

/// Verifies the tree rooted at `root`, returning its black height on success.
///
/// The black height counts missing children as one black node, so an empty tree has black height
/// 1. The following are checked:
/// - The root has no parent and is black.
/// - Every child's parent link points back at the node it hangs from.
/// - No node has the same child on both sides.
/// - No red node has a red child.
/// - Every path from a node to a missing child passes through the same number of black nodes.
///
/// The first violation found is returned.
pub fn check_invariants<L: Linkage>(
    links: &L,
    root: Option<L::Handle>,
) -> Result<usize, InvariantViolation<L::Handle>> {
    let result = check_root(links, root);

    if let Err(violation) = &result {
        debug!(%violation, "red-black invariant violated");
    }

    result
}

fn check_root<L: Linkage>(
    links: &L,
    root: Option<L::Handle>,
) -> Result<usize, InvariantViolation<L::Handle>> {
    let Some(root) = root else {
        return Ok(1);
    };

    if let Some(parent) = links.parent(root) {
        return Err(InvariantViolation::RootHasParent { root, parent });
    }

    if !links.is_black(root) {
        return Err(InvariantViolation::RedRoot { root });
    }

    check_subtree(links, root)
}

fn check_subtree<L: Linkage>(
    links: &L,
    node: L::Handle,
) -> Result<usize, InvariantViolation<L::Handle>> {
    let left = links.left(node);
    let right = links.right(node);

    if let (Some(l), Some(r)) = (left, right) {
        if l == r {
            return Err(InvariantViolation::DuplicateChild { node, child: l });
        }
    }

    let node_red = !links.is_black(node);

    let mut heights = [1; 2];

    for (side, child) in [(Side::Left, left), (Side::Right, right)] {
        let Some(child) = child else {
            continue;
        };

        let found = links.parent(child);
        if found != Some(node) {
            return Err(InvariantViolation::ParentMismatch {
                node: child,
                parent: node,
                side,
                found,
            });
        }

        if node_red && !links.is_black(child) {
            return Err(InvariantViolation::RedRedEdge {
                parent: node,
                child,
            });
        }

        heights[side as usize] = check_subtree(links, child)?;
    }

    let [left, right] = heights;
    if left != right {
        return Err(InvariantViolation::BlackHeightMismatch { node, left, right });
    }

    Ok(left + usize::from(links.is_black(node)))
}
