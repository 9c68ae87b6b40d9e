use crate::{
    linkage::{maybe_set_parent, replace_child_or_set_root},
    Linkage, Side,
};

/// Rotates `node` down to the left, lifting its right child into its place.
///
/// The right child's former left subtree becomes `node`'s right subtree. Colors are not touched
/// and the in-order sequence of the subtree is unchanged. If `node` was the root, `root` is
/// updated to the lifted child.
///
/// # Panics
///
/// Panics if `node` has no right child.
#[inline]
pub fn rotate_left<L: Linkage>(links: &mut L, root: &mut Option<L::Handle>, node: L::Handle) {
    rotate(links, root, node, Side::Left)
}

/// Rotates `node` down to the right, lifting its left child into its place.
///
/// The mirror image of [`rotate_left`].
///
/// # Panics
///
/// Panics if `node` has no left child.
#[inline]
pub fn rotate_right<L: Linkage>(links: &mut L, root: &mut Option<L::Handle>, node: L::Handle) {
    rotate(links, root, node, Side::Right)
}

/// Rotates `down` towards `side`, lifting its `!side` child into its place.
///
/// `rotate(links, root, x, Side::Left)` is [`rotate_left`] and `Side::Right` is [`rotate_right`].
///
/// # Panics
///
/// Panics if `down` has no `!side` child.
pub fn rotate<L: Linkage>(
    links: &mut L,
    root: &mut Option<L::Handle>,
    down: L::Handle,
    side: Side,
) {
    // - `up` goes from the `!side` child of `down` to `down`'s position.
    // - `down` becomes the `side` child of `up`.
    // - `across` goes from the `side` child of `up` to the `!side` child of `down`.
    let up = links
        .child(down, !side)
        .expect("rotation requires a child on the opposite side");

    let across = links.child(up, side);
    links.set_child(down, !side, across);
    maybe_set_parent(links, across, Some(down));

    let parent = links.parent(down);
    replace_child_or_set_root(links, root, parent, down, Some(up));
    links.set_parent(up, parent);

    links.set_child(up, side, Some(down));
    links.set_parent(down, Some(up));
}
