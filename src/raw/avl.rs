//! Height-balance layer.
//!
//! Every node stores the height of its subtree (a leaf is 0, an absent
//! subtree counts as -1). After each structural change heights are refreshed
//! bottom-up and any ancestor whose balance factor leaves [-1, 1] is rotated.

use super::handle::Handle;
use super::node::Side;
use super::raw_tree::{RawTree, Unlinked};
use crate::balance::Avl;

impl<K, V> RawTree<K, V, Avl> {
    /// Height of an optional subtree.
    #[inline]
    pub(crate) fn height(&self, subtree: Option<Handle>) -> i32 {
        subtree.map_or(-1, |h| i32::from(*self.node(h).tag()))
    }

    /// Right height minus left height.
    pub(crate) fn balance_factor(&self, handle: Handle) -> i32 {
        let node = self.node(handle);
        self.height(node.right()) - self.height(node.left())
    }

    fn recompute_height(&mut self, handle: Handle) {
        let node = self.node(handle);
        let height = self.height(node.left()).max(self.height(node.right())) + 1;
        let height = u8::try_from(height).expect("AVL height fits in a byte");
        self.node_mut(handle).set_tag(height);
    }

    /// Recomputes heights from `from` up to the root.
    fn refresh_heights(&mut self, from: Option<Handle>) {
        let mut current = from;
        while let Some(handle) = current {
            self.recompute_height(handle);
            current = self.node(handle).parent();
        }
    }

    /// Rotates `pivot` toward `toward`, first straightening a zig-zag below it
    /// so the double rotation becomes two simple ones. Returns the new
    /// subtree root.
    fn rotate_balanced(&mut self, pivot: Handle, toward: Side) -> Handle {
        let rising = self
            .node(pivot)
            .child(toward.opposite())
            .expect("an unbalanced node has a child on its heavy side");

        let inner = self.height(self.node(rising).child(toward));
        let outer = self.height(self.node(rising).child(toward.opposite()));
        if inner > outer {
            log::trace!("avl: straighten node {} before rotating {toward:?}", rising.to_index());
            self.rotate_simple(rising, toward.opposite());
        }

        self.rotate_simple(pivot, toward)
    }

    fn rotate_simple(&mut self, pivot: Handle, toward: Side) -> Handle {
        let risen = self.rotate(pivot, toward);
        self.recompute_height(pivot);
        self.recompute_height(risen);
        self.refresh_heights(self.node(risen).parent());
        risen
    }

    /// Rotates `handle` if it is out of balance. Returns the root of the
    /// subtree now standing where `handle` stood.
    fn restore(&mut self, handle: Handle) -> Option<Handle> {
        match self.balance_factor(handle) {
            factor if factor <= -2 => {
                log::trace!("avl: node {} left-heavy ({factor})", handle.to_index());
                Some(self.rotate_balanced(handle, Side::Right))
            }
            factor if factor >= 2 => {
                log::trace!("avl: node {} right-heavy ({factor})", handle.to_index());
                Some(self.rotate_balanced(handle, Side::Left))
            }
            _ => None,
        }
    }

    /// One rotation at the lowest unbalanced ancestor always suffices after a
    /// single insertion.
    pub(crate) fn rebalance_after_insert(&mut self, inserted: Handle) {
        let Some(parent) = self.node(inserted).parent() else {
            return;
        };
        // The new leaf filled the parent's empty slot; the parent's height is unchanged.
        if self.node(parent).has_both_children() {
            return;
        }

        self.refresh_heights(Some(inserted));

        let mut current = Some(parent);
        while let Some(handle) = current {
            if self.restore(handle).is_some() {
                return;
            }
            current = self.node(handle).parent();
        }
    }

    /// Deletions can unbalance several ancestors, so the walk continues to the root.
    pub(crate) fn rebalance_after_unlink(&mut self, unlinked: &Unlinked<u8>) {
        let Some((parent, _)) = unlinked.parent else {
            return;
        };

        self.refresh_heights(Some(parent));

        let mut current = Some(parent);
        while let Some(handle) = current {
            let top = self.restore(handle).unwrap_or(handle);
            current = self.node(top).parent();
        }
    }
}
