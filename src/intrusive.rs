use core::{
    cell::UnsafeCell,
    fmt,
    marker::{PhantomData, PhantomPinned},
    ptr::NonNull,
};

use cordyceps::Linked;

use crate::{Linkage, Side};

/// The links of a node in an intrusive red-black tree.
///
/// Embed a `Links<T>` in a node type `T` and implement [`Linked<Links<T>>`](Linked) for it to make
/// `T` usable through [`Intrusive<T>`].
pub struct Links<T: ?Sized> {
    inner: UnsafeCell<LinksInner<T>>,
}

#[repr(C)]
struct LinksInner<T: ?Sized> {
    parent: Link<T>,
    children: [Link<T>; 2],
    black: bool,
    _unpin: PhantomPinned,
}

type Link<T> = Option<NonNull<T>>;

impl<T: ?Sized> Links<T> {
    /// Returns unlinked red links.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                black: false,
                _unpin: PhantomPinned,
            }),
        }
    }

    /// Returns `true` if these links point at a parent or a child.
    pub fn is_linked(&self) -> bool {
        self.parent().is_some()
            || self.child(Side::Left).is_some()
            || self.child(Side::Right).is_some()
    }

    #[inline]
    fn parent(&self) -> Link<T> {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    fn child(&self, side: Side) -> Link<T> {
        unsafe { (*self.inner.get()).children[side as usize] }
    }

    #[inline]
    fn is_black(&self) -> bool {
        unsafe { (*self.inner.get()).black }
    }

    #[inline]
    fn set_parent(&mut self, parent: Link<T>) {
        self.inner.get_mut().parent = parent;
    }

    #[inline]
    fn set_child(&mut self, side: Side, child: Link<T>) {
        self.inner.get_mut().children[side as usize] = child;
    }

    #[inline]
    fn set_black(&mut self, black: bool) {
        self.inner.get_mut().black = black;
    }
}

impl<T: ?Sized> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("parent", &self.parent())
            .field("left", &self.child(Side::Left))
            .field("right", &self.child(Side::Right))
            .field("black", &self.is_black())
            .finish()
    }
}

/// [`Linkage`] for caller-allocated nodes that embed their [`Links`].
///
/// Handles are `NonNull<T>`. Node lifetime stays entirely with the caller, typically through
/// [`Linked::into_ptr`] and [`Linked::from_ptr`].
pub struct Intrusive<T: ?Sized> {
    _nodes: PhantomData<fn(NonNull<T>)>,
}

impl<T: ?Sized> Intrusive<T> {
    /// Returns a linkage that dereferences node pointers directly.
    ///
    /// # Safety
    ///
    /// For as long as the returned value is used, every handle passed to it, and every handle
    /// reachable through the links of such a node, must point to a live `T` whose links are not
    /// accessed through any other path.
    pub const unsafe fn new() -> Self {
        Intrusive {
            _nodes: PhantomData,
        }
    }
}

impl<T> Intrusive<T>
where
    T: Linked<Links<T>> + ?Sized,
{
    #[inline]
    fn links(&self, node: NonNull<T>) -> &Links<T> {
        // SAFETY: `node` is live and its links are unaliased, by the contract of `new`.
        unsafe { T::links(node).as_ref() }
    }

    #[inline]
    fn links_mut(&mut self, node: NonNull<T>) -> &mut Links<T> {
        // SAFETY: `node` is live and its links are unaliased, by the contract of `new`.
        unsafe { T::links(node).as_mut() }
    }
}

impl<T> Linkage for Intrusive<T>
where
    T: Linked<Links<T>> + ?Sized,
{
    type Handle = NonNull<T>;

    #[inline]
    fn parent(&self, node: NonNull<T>) -> Link<T> {
        self.links(node).parent()
    }

    #[inline]
    fn set_parent(&mut self, node: NonNull<T>, parent: Link<T>) {
        self.links_mut(node).set_parent(parent);
    }

    #[inline]
    fn child(&self, node: NonNull<T>, side: Side) -> Link<T> {
        self.links(node).child(side)
    }

    #[inline]
    fn set_child(&mut self, node: NonNull<T>, side: Side, child: Link<T>) {
        self.links_mut(node).set_child(side, child);
    }

    #[inline]
    fn is_black(&self, node: NonNull<T>) -> bool {
        self.links(node).is_black()
    }

    #[inline]
    fn set_black(&mut self, node: NonNull<T>, black: bool) {
        self.links_mut(node).set_black(black);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{balance_after_insert, check_invariants, tree_remove};

    #[derive(Debug)]
    #[repr(C)]
    struct TestNode {
        links: Links<TestNode>,
        key: u32,
    }

    unsafe impl Linked<Links<TestNode>> for TestNode {
        type Handle = Box<TestNode>;

        fn into_ptr(r: Self::Handle) -> NonNull<Self> {
            NonNull::new(Box::into_raw(r)).unwrap()
        }

        unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
            unsafe { Box::from_raw(ptr.as_ptr()) }
        }

        unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links<TestNode>> {
            // SAFETY: Self is #[repr(C)] and `links` is first field
            ptr.cast()
        }
    }

    fn key(node: NonNull<TestNode>) -> u32 {
        unsafe { node.as_ref().key }
    }

    // A bare-bones search tree insertion over intrusive nodes.
    fn insert(
        links: &mut Intrusive<TestNode>,
        root: &mut Link<TestNode>,
        node: NonNull<TestNode>,
    ) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut cur = *root;

        while let Some(c) = cur {
            parent = Some(c);
            side = if key(node) < key(c) {
                Side::Left
            } else {
                Side::Right
            };
            cur = links.child(c, side);
        }

        links.set_parent(node, parent);
        match parent {
            Some(p) => links.set_child(p, side, Some(node)),
            None => *root = Some(node),
        }

        balance_after_insert(links, root, node);
    }

    fn in_order(links: &Intrusive<TestNode>, node: Link<TestNode>, out: &mut Vec<u32>) {
        if let Some(n) = node {
            in_order(links, links.left(n), out);
            out.push(key(n));
            in_order(links, links.right(n), out);
        }
    }

    #[test]
    fn boxed_nodes() {
        let keys = [5u32, 2, 8, 1, 9, 3, 7, 4, 6, 0];

        let nodes: Vec<NonNull<TestNode>> = keys
            .iter()
            .map(|&key| {
                TestNode::into_ptr(Box::new(TestNode {
                    links: Links::new(),
                    key,
                }))
            })
            .collect();

        // SAFETY: every node stays live until it is turned back into a `Box` below, and links are
        // only accessed through `links`.
        let mut links = unsafe { Intrusive::<TestNode>::new() };
        let mut root = None;

        for &node in &nodes {
            insert(&mut links, &mut root, node);
            assert!(check_invariants(&links, root).is_ok());
        }

        let mut keys_in_order = Vec::new();
        in_order(&links, root, &mut keys_in_order);
        assert_eq!(keys_in_order, (0..10).collect::<Vec<_>>());

        for (i, &node) in nodes.iter().enumerate() {
            tree_remove(&mut links, &mut root, node);
            assert!(!unsafe { TestNode::links(node).as_ref() }.is_linked());
            assert!(check_invariants(&links, root).is_ok());

            let mut remaining = Vec::new();
            in_order(&links, root, &mut remaining);
            assert_eq!(remaining.len(), nodes.len() - i - 1);
            assert!(!remaining.contains(&key(node)));
        }

        assert_eq!(root, None);

        for node in nodes {
            drop(unsafe { TestNode::from_ptr(node) });
        }
    }
}
