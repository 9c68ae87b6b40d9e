use tracing::trace;

use crate::{
    linkage::{is_red, maybe_set_parent, min_in_subtree, replace_child_or_set_root, side_of},
    rotate, Linkage, Side,
};

/// Detaches `node` from the tree and restores the red-black invariants.
///
/// On return `node` is fully unlinked (no parent, no children) and `root` names the tree's
/// (possibly new) root, or `None` if `node` was the only node. The node itself is not freed; its
/// storage is the caller's concern.
///
/// This completes in _O(log(n))_ time and performs at most three rotations.
///
/// # Panics
///
/// May panic if `node` is not an element of the tree rooted at `*root`, or if that tree does not
/// satisfy the red-black invariants.
pub fn tree_remove<L: Linkage>(links: &mut L, root: &mut Option<L::Handle>, node: L::Handle) {
    // There are two possible cases:
    //
    // 1. `node` has at most one child.
    //
    //    `node` is spliced out and its child (which may be missing) takes its place.
    //
    // 2. `node` has two children.
    //
    //    `node`'s successor[^1] is spliced out of its own position instead and then takes `node`'s
    //    place and color. The successor has no left child by definition, so this splice is
    //    always case 1.
    //
    // Either way the node physically excised from its position (`node` or its successor) has at
    // most one child, which moves up a level. If the excised node was red, no black height
    // changed. If it was black, every path through the moved-up child `x` is one black node short,
    // and `x` carries a "double black" deficit that must be repaired.
    //
    // [^1]: The successor of a node `a` is the least node in `a`'s right subtree.

    let z = node;

    let y = match (links.left(z), links.right(z)) {
        (Some(_), Some(right)) => min_in_subtree(links, right),
        _ => z,
    };

    let x = links.left(y).or(links.right(y));
    let mut x_parent = links.parent(y);
    let x_side = x_parent.map(|p| side_of(links, p, y));
    let removed_black = links.is_black(y);

    // Splice `y` out of its position.
    maybe_set_parent(links, x, x_parent);
    replace_child_or_set_root(links, root, x_parent, y, x);

    if y != z {
        // Move `y` into `z`'s position, children and color.
        if x_parent == Some(z) {
            x_parent = Some(y);
        }

        let z_parent = links.parent(z);
        replace_child_or_set_root(links, root, z_parent, z, Some(y));
        links.set_parent(y, z_parent);

        for side in [Side::Left, Side::Right] {
            let child = links.child(z, side);
            links.set_child(y, side, child);
            maybe_set_parent(links, child, Some(y));
        }

        let z_black = links.is_black(z);
        links.set_black(y, z_black);
    }

    links.set_parent(z, None);
    links.set_left(z, None);
    links.set_right(z, None);

    if removed_black {
        let at = x_parent.zip(x_side);
        rebalance_removed(links, root, x, at);
    }
}

// Repairs a black deficit carried by `x`, which hangs from `at = (parent, side)`, or is the root if
// `at` is `None`. `x` may be missing, in which case the empty `side` slot of `parent` carries it.
fn rebalance_removed<L: Linkage>(
    links: &mut L,
    root: &mut Option<L::Handle>,
    mut x: Option<L::Handle>,
    mut at: Option<(L::Handle, Side)>,
) {
    // A red `x` absorbs the deficit by turning black, and at the root it vanishes.
    while let Some((p, side)) = at {
        if is_red(links, x) {
            break;
        }

        // `x` is one black node short, so its sibling's subtree has black height at least one.
        let mut w = links
            .child(p, !side)
            .expect("a node carrying a black deficit must have a sibling");

        if !links.is_black(w) {
            // Case 1: the sibling is red, so the parent is black. Rotate the sibling above the
            // parent and swap their colors; `x`'s new sibling is one of the old sibling's black
            // children, reducing this to case 2, 3 or 4.
            trace!(?x, ?p, ?w, "remove: red sibling, rotating at parent");

            links.set_black(w, true);
            links.set_black(p, false);
            rotate(links, root, p, side);
            w = links
                .child(p, !side)
                .expect("a red sibling must have two black children");
        }

        let near = links.child(w, side);
        let far = links.child(w, !side);

        if !is_red(links, near) && !is_red(links, far) {
            // Case 2: the sibling and both its children are black. Take one black node off the
            // sibling's side too and move the deficit up to the parent.
            trace!(?x, ?p, ?w, "remove: black sibling with black children, recoloring");

            links.set_black(w, false);
            x = Some(p);
            at = links.parent(p).map(|pp| (pp, side_of(links, pp, p)));
            continue;
        }

        if !is_red(links, far) {
            // Case 3: the sibling's near child is red and its far child black. Rotate the near
            // child above the sibling so that the new sibling's far child is red, reducing this
            // to case 4.
            trace!(?x, ?p, ?w, "remove: red near nephew, rotating at sibling");

            let near = near.expect("near child must be red here");
            links.set_black(near, true);
            links.set_black(w, false);
            rotate(links, root, w, !side);
            w = near;
        }

        // Case 4: the sibling's far child is red. Rotate the sibling above the parent; the parent
        // becomes black and the far child black, adding a black node on `x`'s side while keeping
        // the other side's black height. The deficit is gone.
        trace!(?x, ?p, ?w, "remove: red far nephew, rotating at parent");

        let p_black = links.is_black(p);
        links.set_black(w, p_black);
        links.set_black(p, true);
        if let Some(far) = links.child(w, !side) {
            links.set_black(far, true);
        }
        rotate(links, root, p, side);

        x = *root;
        break;
    }

    if let Some(x) = x {
        links.set_black(x, true);
    }
}
