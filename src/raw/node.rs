use super::handle::Handle;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
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

/// Node color for the Red-Black discipline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A key/value record linked into the tree.
///
/// `left` and `right` are owned by position; `parent` is a back-reference that
/// is never followed to release anything. `tag` carries the per-discipline
/// augmentation: `()`, a height, or a [`Color`].
#[derive(Clone)]
pub(crate) struct Node<K, V, T> {
    key: K,
    value: V,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
    tag: T,
}

impl<K, V, T> Node<K, V, T> {
    /// Creates a detached node below `parent`.
    pub(crate) fn new(key: K, value: V, parent: Option<Handle>, tag: T) -> Self {
        Self {
            key,
            value,
            parent,
            left: None,
            right: None,
            tag,
        }
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn key_value(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }

    /// Returns the key with a mutable value, for cursors that hand out both.
    #[inline]
    pub(crate) fn entry_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    /// Overwrites the value in place, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        core::mem::replace(&mut self.value, value)
    }

    /// Exchanges key and value with `other`, leaving links and tags in place.
    pub(crate) fn swap_entry(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs below this node.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not linked below this node.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else if self.right == Some(child) {
            Side::Right
        } else {
            panic!("`Node::side_of()` - `child` is not linked below this node!")
        }
    }

    /// Returns true if both child slots are occupied.
    #[inline]
    pub(crate) fn has_both_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    #[inline]
    pub(crate) fn tag(&self) -> &T {
        &self.tag
    }

    #[inline]
    pub(crate) fn set_tag(&mut self, tag: T) {
        self.tag = tag;
    }

    pub(crate) fn into_parts(self) -> (K, V, T) {
        (self.key, self.value, self.tag)
    }
}
