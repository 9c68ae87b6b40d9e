use core::{
    fmt,
    ops::{Index, IndexMut},
};

use crate::{Linkage, Side};

/// The index of a node in an [`Arena`].
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the slot index this id refers to.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Slot<T> {
    parent: Option<NodeId>,
    children: [Option<NodeId>; 2],
    black: bool,
    value: Option<T>,
}

/// Contiguous node storage addressed by [`NodeId`].
///
/// Each slot carries the links and color bit the rebalancing algorithms operate on, plus an
/// optional payload of type `T` that they never touch. Freed slots are reused by later
/// allocations, so a `NodeId` is only meaningful until the node it names is freed.
///
/// Indexing an `Arena` with a `NodeId` that was never allocated panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena<T = ()> {
    slots: Vec<Slot<T>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<T> Arena<T> {
    /// Returns a new empty arena.
    pub const fn new() -> Arena<T> {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns a new empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Arena<T> {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live nodes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live nodes.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates an unlinked red node carrying `value`.
    pub fn alloc(&mut self, value: T) -> NodeId {
        let slot = Slot {
            parent: None,
            children: [None; 2],
            black: false,
            value: Some(value),
        };

        self.len += 1;

        match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = slot;
                id
            }
            None => {
                let id = u32::try_from(self.slots.len()).expect("arena exceeded u32::MAX nodes");
                self.slots.push(slot);
                NodeId(id)
            }
        }
    }

    /// Frees the node `id`, returning its payload.
    ///
    /// The node should already have been detached from any tree; its links are discarded. Returns
    /// `None` if `id` was already free.
    pub fn free(&mut self, id: NodeId) -> Option<T> {
        let slot = self.slots.get_mut(id.index())?;
        let value = slot.value.take()?;

        slot.parent = None;
        slot.children = [None; 2];
        slot.black = false;

        self.free.push(id);
        self.len -= 1;

        Some(value)
    }

    /// Returns `true` if `id` names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots
            .get(id.index())
            .is_some_and(|slot| slot.value.is_some())
    }

    /// Returns a reference to the payload of `id`, if it is live.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slots.get(id.index())?.value.as_ref()
    }

    /// Returns a mutable reference to the payload of `id`, if it is live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slots.get_mut(id.index())?.value.as_mut()
    }

    #[inline]
    fn slot(&self, id: NodeId) -> &Slot<T> {
        &self.slots[id.index()]
    }

    #[inline]
    fn slot_mut(&mut self, id: NodeId) -> &mut Slot<T> {
        &mut self.slots[id.index()]
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("no live node at this id")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("no live node at this id")
    }
}

impl<T> Linkage for Arena<T> {
    type Handle = NodeId;

    #[inline]
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).parent
    }

    #[inline]
    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        self.slot_mut(node).parent = parent;
    }

    #[inline]
    fn child(&self, node: NodeId, side: Side) -> Option<NodeId> {
        self.slot(node).children[side as usize]
    }

    #[inline]
    fn set_child(&mut self, node: NodeId, side: Side, child: Option<NodeId>) {
        self.slot_mut(node).children[side as usize] = child;
    }

    #[inline]
    fn is_black(&self, node: NodeId) -> bool {
        self.slot(node).black
    }

    #[inline]
    fn set_black(&mut self, node: NodeId, black: bool) {
        self.slot_mut(node).black = black;
    }
}
