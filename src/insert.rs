use tracing::trace;

use crate::{
    linkage::{is_red, side_of},
    rotate, Linkage,
};

/// Restores the red-black invariants after `node` has been linked into the tree.
///
/// The caller must already have attached `node` as a leaf at its search position (both children
/// `None`, parent link set, or `*root == Some(node)` with no parent if the tree was empty). `node`
/// is colored red here, so the caller need not do so. On return the tree is a valid red-black tree
/// and `root` names its (possibly new) root.
///
/// This walks at most two levels up per iteration and performs at most two rotations, completing
/// in _O(log(n))_ time.
pub fn balance_after_insert<L: Linkage>(
    links: &mut L,
    root: &mut Option<L::Handle>,
    node: L::Handle,
) {
    debug_assert!(links.left(node).is_none() && links.right(node).is_none());

    links.set_black(node, false);

    let mut z = node;

    // While `z` is not the root and its parent is red, `z` and its parent form a red-red edge.
    while let Some(p) = links.parent(z).filter(|&p| !links.is_black(p)) {
        // The root is black, so a red parent always has a parent of its own.
        let g = links.parent(p).expect("a red node must not be the tree root");
        let p_side = side_of(links, g, p);
        let u = links.child(g, !p_side);

        if is_red(links, u) {
            // Case A: the uncle is red. Push the grandparent's blackness down a level and continue
            // from the grandparent, which may now form a red-red edge with its own parent.
            trace!(?z, ?p, ?g, "insert: red uncle, recoloring");

            links.set_black(p, true);
            if let Some(u) = u {
                links.set_black(u, true);
            }
            links.set_black(g, false);

            z = g;
            continue;
        }

        let mut p = p;

        if side_of(links, p, z) != p_side {
            // Case B: `z` is an inner grandchild. Rotate it above its parent so that the old parent
            // becomes an outer grandchild, then handle that as case C.
            trace!(?z, ?p, ?g, "insert: inner grandchild, rotating at parent");

            rotate(links, root, p, p_side);
            p = z;
        }

        // Case C: `z` is an outer grandchild. Lift the parent above the grandparent and swap their
        // colors. The subtree root is now black, so the walk ends.
        trace!(?p, ?g, "insert: outer grandchild, rotating at grandparent");

        links.set_black(p, true);
        links.set_black(g, false);
        rotate(links, root, g, !p_side);
        break;
    }

    let root = root.expect("tree must not be empty after an insertion");
    links.set_black(root, true);
}
