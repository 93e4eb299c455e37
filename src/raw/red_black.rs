//! Color-balance layer.
//!
//! Invariants: the root is black, a red node has no red child, and every
//! downward path from a node to an absent child crosses the same number of
//! black nodes. Absent children count as black.

use core::mem;

use super::handle::Handle;
use super::node::{Color, Side};
use super::raw_tree::{RawTree, Unlinked};
use crate::balance::RedBlack;

impl<K, V> RawTree<K, V, RedBlack> {
    #[inline]
    pub(crate) fn color(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |h| *self.node(h).tag())
    }

    #[inline]
    fn is_red(&self, node: Option<Handle>) -> bool {
        self.color(node) == Color::Red
    }

    #[inline]
    fn paint(&mut self, node: Handle, color: Color) {
        self.node_mut(node).set_tag(color);
    }

    /// Repairs a red-red edge between `inserted` and its parent.
    pub(crate) fn insert_fixup(&mut self, inserted: Handle) {
        let mut node = inserted;

        while let Some(mut parent) = self.node(node).parent() {
            if !self.is_red(Some(parent)) {
                break;
            }
            let grandparent = self.node(parent).parent().expect("a red node is never the root");
            let parent_side = self.node(grandparent).side_of(parent);
            let uncle = self.node(grandparent).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                log::trace!("red_black: insert recolor at node {}", grandparent.to_index());
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.node(parent).side_of(node) != parent_side {
                log::trace!("red_black: insert zig-zag at node {}", parent.to_index());
                self.rotate(parent, parent_side);
                mem::swap(&mut node, &mut parent);
            }

            log::trace!("red_black: insert rotate at node {}", grandparent.to_index());
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root() {
            self.paint(root, Color::Black);
        }
    }

    /// Restores the black-height after a node has been unlinked.
    pub(crate) fn erase_fixup(&mut self, unlinked: &Unlinked<Color>) {
        if unlinked.tag == Color::Red {
            return;
        }
        if let Some(child) = unlinked.child.filter(|&c| self.is_red(Some(c))) {
            self.paint(child, Color::Black);
            return;
        }

        // `slot` is the double-black position: `side` of `parent`, holding `node`.
        let mut node = unlinked.child;
        let mut slot = unlinked.parent;

        while let Some((parent, side)) = slot {
            if self.is_red(node) {
                break;
            }

            let mut sibling = self.sibling(parent, side);

            if self.is_red(Some(sibling)) {
                log::trace!("red_black: erase case 1 at node {}", parent.to_index());
                self.paint(sibling, Color::Black);
                self.paint(parent, Color::Red);
                self.rotate(parent, side);
                sibling = self.sibling(parent, side);
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());

            if !self.is_red(near) && !self.is_red(far) {
                log::trace!("red_black: erase case 2 at node {}", parent.to_index());
                self.paint(sibling, Color::Red);
                node = Some(parent);
                slot = self.node(parent).parent().map(|gp| (gp, self.node(gp).side_of(parent)));
                continue;
            }

            if !self.is_red(far) {
                log::trace!("red_black: erase case 3 at node {}", parent.to_index());
                let near = near.expect("a red nephew exists");
                self.paint(near, Color::Black);
                self.paint(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(parent, side);
            }

            log::trace!("red_black: erase case 4 at node {}", parent.to_index());
            let far = self.node(sibling).child(side.opposite()).expect("a red far nephew exists");
            let parent_color = self.color(Some(parent));
            self.paint(sibling, parent_color);
            self.paint(parent, Color::Black);
            self.paint(far, Color::Black);
            self.rotate(parent, side);
            node = self.root();
            break;
        }

        if let Some(node) = node {
            self.paint(node, Color::Black);
        }
    }

    fn sibling(&self, parent: Handle, side: Side) -> Handle {
        self.node(parent)
            .child(side.opposite())
            .expect("a double-black position always has a sibling")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    type RbTree = RawTree<i32, i32, RedBlack>;

    fn build(keys: impl IntoIterator<Item = i32>) -> RbTree {
        let mut tree = RbTree::new();
        for key in keys {
            tree.insert(key, key);
            tree.validate();
        }
        tree
    }

    fn color_of(tree: &RbTree, key: i32) -> Color {
        tree.color(tree.search(&key))
    }

    fn keys_in_order(tree: &RbTree) -> Vec<i32> {
        let mut keys = Vec::new();
        let mut current = tree.first();
        while let Some(handle) = current {
            keys.push(*tree.node(handle).key());
            current = tree.successor(handle);
        }
        keys
    }

    #[test]
    fn single_node_is_black() {
        let tree = build([1]);
        assert_eq!(color_of(&tree, 1), Color::Black);
    }

    #[test]
    fn balanced_insert_order_keeps_black_root() {
        let tree = build([5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(tree.color(tree.root()), Color::Black);
        assert_eq!(keys_in_order(&tree), [1, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn red_uncle_recolors_without_rotation() {
        //      20(B)              20(B)
        //    10(R) 30(R)   ->   10(B) 30(B)
        //                          15(R)
        let mut tree = build([10, 20, 30]);
        let root = tree.root();
        assert_eq!(*tree.node(root.unwrap()).key(), 20);

        tree.insert(15, 15);
        tree.validate();
        assert_eq!(tree.root(), root);
        assert_eq!(color_of(&tree, 10), Color::Black);
        assert_eq!(color_of(&tree, 30), Color::Black);
        assert_eq!(color_of(&tree, 15), Color::Red);
        assert_eq!(tree.color(root), Color::Black);
    }

    #[test]
    fn black_uncle_zig_zag_rotates_twice() {
        let tree = build([30, 10, 20]);
        assert_eq!(*tree.node(tree.root().unwrap()).key(), 20);
        assert_eq!(color_of(&tree, 10), Color::Red);
        assert_eq!(color_of(&tree, 30), Color::Red);
    }

    #[test]
    fn red_leaf_erase_needs_no_fixup() {
        let mut tree = build([20, 10, 30, 15]);
        assert_eq!(tree.remove_entry(&15), Some((15, 15)));
        tree.validate();
    }

    #[test]
    fn black_node_with_red_child_passes_color_down() {
        let mut tree = build([20, 10, 30, 5]);
        assert_eq!(color_of(&tree, 5), Color::Red);
        tree.remove_entry(&10);
        tree.validate();
        assert_eq!(color_of(&tree, 5), Color::Black);
    }

    #[test]
    fn right_only_child_is_handled_like_left_only_child() {
        let mut left = build([20, 10, 30, 5]);
        let mut right = build([20, 10, 30, 35]);
        left.remove_entry(&10);
        right.remove_entry(&30);
        left.validate();
        right.validate();
        assert_eq!(color_of(&left, 5), Color::Black);
        assert_eq!(color_of(&right, 35), Color::Black);
    }

    #[test]
    fn root_with_red_child_erases_cleanly() {
        let mut tree = build([1, 2]);
        tree.remove_entry(&1);
        tree.validate();
        assert_eq!(color_of(&tree, 2), Color::Black);
    }

    #[test]
    fn peeling_left_edge_keeps_colors_valid() {
        // Sequential inserts leave a red-heavy right side, so peeling the left
        // edge reaches the sibling cases.
        let mut tree = build(1..=10);
        for key in [1, 3, 2, 4] {
            tree.remove_entry(&key);
            tree.validate();
        }
        assert_eq!(keys_in_order(&tree), [5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn drain_everything_in_both_orders() {
        let mut forward = build(0..64);
        let mut backward = build(0..64);
        for key in 0..64 {
            assert!(forward.remove_entry(&key).is_some());
            forward.validate();
            assert!(backward.remove_entry(&(63 - key)).is_some());
            backward.validate();
        }
        assert!(forward.is_empty());
        assert!(backward.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn colors_stay_valid(ops in prop::collection::vec((any::<bool>(), 0i32..300), 0..500)) {
            let mut tree = RbTree::new();
            let mut model = alloc::collections::BTreeSet::new();

            for (is_insert, key) in ops {
                if is_insert {
                    prop_assert_eq!(tree.insert(key, key), model.insert(key));
                } else {
                    prop_assert_eq!(tree.remove_entry(&key).is_some(), model.remove(&key));
                }
                tree.validate();
            }

            prop_assert_eq!(keys_in_order(&tree), model.into_iter().collect::<Vec<_>>());
        }
    }
}
