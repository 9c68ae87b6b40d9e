use core::fmt;

use crate::Side;

/// The structural capability the rebalancing algorithms require of a node.
///
/// An implementor stores, for every node it hands out a [`Handle`](Linkage::Handle) for, a parent
/// link, two child links and one color bit. The algorithms never create or destroy nodes and never
/// look at anything else a node may carry.
///
/// The root of a tree is the node whose parent is `None`. Callers keep the current root in an
/// `Option<Handle>` slot of their own and pass it by `&mut` to every operation that may rotate.
pub trait Linkage {
    /// A copyable reference to a node, such as an arena index or a pointer.
    type Handle: Copy + Eq + fmt::Debug;

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    fn set_parent(&mut self, node: Self::Handle, parent: Option<Self::Handle>);

    fn child(&self, node: Self::Handle, side: Side) -> Option<Self::Handle>;

    fn set_child(&mut self, node: Self::Handle, side: Side, child: Option<Self::Handle>);

    fn is_black(&self, node: Self::Handle) -> bool;

    fn set_black(&mut self, node: Self::Handle, black: bool);

    #[inline]
    fn left(&self, node: Self::Handle) -> Option<Self::Handle> {
        self.child(node, Side::Left)
    }

    #[inline]
    fn right(&self, node: Self::Handle) -> Option<Self::Handle> {
        self.child(node, Side::Right)
    }

    #[inline]
    fn set_left(&mut self, node: Self::Handle, left: Option<Self::Handle>) {
        self.set_child(node, Side::Left, left)
    }

    #[inline]
    fn set_right(&mut self, node: Self::Handle, right: Option<Self::Handle>) {
        self.set_child(node, Side::Right, right)
    }
}

// Missing children count as black.
#[inline]
pub(crate) fn is_red<L: Linkage>(links: &L, node: Option<L::Handle>) -> bool {
    node.is_some_and(|n| !links.is_black(n))
}

// Returns the side of `parent` that `child` hangs from.
//
// `child` must be a child of `parent`.
#[inline]
pub(crate) fn side_of<L: Linkage>(links: &L, parent: L::Handle, child: L::Handle) -> Side {
    if links.left(parent) == Some(child) {
        Side::Left
    } else {
        debug_assert_eq!(
            links.right(parent),
            Some(child),
            "`child` must be a child of `parent`"
        );
        Side::Right
    }
}

#[inline]
pub(crate) fn maybe_set_parent<L: Linkage>(
    links: &mut L,
    node: Option<L::Handle>,
    parent: Option<L::Handle>,
) {
    if let Some(node) = node {
        links.set_parent(node, parent);
    }
}

// Points whatever referred to `old_child` (a child link of `parent`, or the root slot if `parent`
// is `None`) at `new_child` instead.
//
// `new_child`'s parent link is not updated.
#[inline]
pub(crate) fn replace_child_or_set_root<L: Linkage>(
    links: &mut L,
    root: &mut Option<L::Handle>,
    parent: Option<L::Handle>,
    old_child: L::Handle,
    new_child: Option<L::Handle>,
) {
    match parent {
        Some(parent) => {
            let side = side_of(links, parent, old_child);
            links.set_child(parent, side, new_child);
        }
        None => {
            debug_assert_eq!(*root, Some(old_child), "a parentless node must be the root");
            *root = new_child;
        }
    }
}

// Returns the minimum node in the subtree rooted at `node`.
#[inline]
pub(crate) fn min_in_subtree<L: Linkage>(links: &L, node: L::Handle) -> L::Handle {
    let mut cur = node;

    while let Some(left) = links.left(cur) {
        cur = left;
    }

    cur
}
