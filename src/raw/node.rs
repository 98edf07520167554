use super::handle::Handle;

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One key binding of the treap.
///
/// The value itself lives in a separate arena; the node only stores its handle.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    // Drawn once at construction, never recomputed.
    priority: u32,
    value: Handle,
    children: [Option<Handle>; 2],
}

impl<K> Node<K> {
    /// Creates a childless node.
    pub(crate) fn new(key: K, priority: u32, value: Handle) -> Self {
        Self {
            key,
            priority,
            value,
            children: [None, None],
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn priority(&self) -> u32 {
        self.priority
    }

    #[inline]
    pub(crate) fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        self.children[side as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.child(Side::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.child(Side::Right)
    }

    /// Replaces the child on `side`, returning the old one.
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) -> Option<Handle> {
        core::mem::replace(&mut self.children[side as usize], child)
    }

    /// Unlinks both children, leaving a leaf.
    pub(crate) fn take_children(&mut self) -> [Option<Handle>; 2] {
        core::mem::take(&mut self.children)
    }

    /// Consumes the node, returning its key and value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }
}
