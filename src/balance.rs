//! Balancing disciplines.
//!
//! A [`TreeMap`](crate::TreeMap) is parameterised by one of the marker types
//! in this module. The marker decides what each node carries besides its key
//! and value, and which fix-up pass runs after every insert and erase. It is
//! part of the map's type, so a tree can never switch discipline.

use crate::raw::{Color, Handle, RawTree, Unlinked};
use crate::violation::Violation;

/// A balancing discipline for [`TreeMap`](crate::TreeMap).
///
/// This trait is sealed: the disciplines are [`Unbalanced`], [`Avl`], and
/// [`RedBlack`].
#[allow(private_bounds)]
pub trait Balance: Rebalance {}

/// Hooks the engine calls around structural mutation.
pub(crate) trait Rebalance: Sized {
    /// Per-node augmentation.
    type Tag: Copy;

    /// Tag given to a freshly created node.
    fn fresh_tag() -> Self::Tag;

    /// Runs after `inserted` has been linked in as a leaf (or as the root).
    fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, inserted: Handle);

    /// Runs after a node has been physically unlinked.
    fn after_unlink<K, V>(tree: &mut RawTree<K, V, Self>, unlinked: &Unlinked<Self::Tag>);

    /// Checks the discipline's own invariants over the whole tree.
    fn check<K, V>(tree: &RawTree<K, V, Self>) -> Result<(), Violation<'_, K>>;
}

/// Plain binary search tree: no augmentation, no rebalancing.
#[derive(Clone, Copy, Debug)]
pub enum Unbalanced {}

/// Height-balanced (AVL) tree: sibling subtree heights differ by at most one.
#[derive(Clone, Copy, Debug)]
pub enum Avl {}

/// Color-balanced (Red-Black) tree.
#[derive(Clone, Copy, Debug)]
pub enum RedBlack {}

impl Balance for Unbalanced {}
impl Balance for Avl {}
impl Balance for RedBlack {}

impl Rebalance for Unbalanced {
    type Tag = ();

    fn fresh_tag() {}

    fn after_insert<K, V>(_tree: &mut RawTree<K, V, Self>, _inserted: Handle) {}

    fn after_unlink<K, V>(_tree: &mut RawTree<K, V, Self>, _unlinked: &Unlinked<()>) {}

    fn check<K, V>(_tree: &RawTree<K, V, Self>) -> Result<(), Violation<'_, K>> {
        Ok(())
    }
}

impl Rebalance for Avl {
    // Height of the subtree rooted at the node; a leaf has height 0.
    type Tag = u8;

    fn fresh_tag() -> u8 {
        0
    }

    fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, inserted: Handle) {
        tree.rebalance_after_insert(inserted);
    }

    fn after_unlink<K, V>(tree: &mut RawTree<K, V, Self>, unlinked: &Unlinked<u8>) {
        tree.rebalance_after_unlink(unlinked);
    }

    fn check<K, V>(tree: &RawTree<K, V, Self>) -> Result<(), Violation<'_, K>> {
        tree.check_heights()
    }
}

impl Rebalance for RedBlack {
    type Tag = Color;

    fn fresh_tag() -> Color {
        Color::Red
    }

    fn after_insert<K, V>(tree: &mut RawTree<K, V, Self>, inserted: Handle) {
        tree.insert_fixup(inserted);
    }

    fn after_unlink<K, V>(tree: &mut RawTree<K, V, Self>, unlinked: &Unlinked<Color>) {
        tree.erase_fixup(unlinked);
    }

    fn check<K, V>(tree: &RawTree<K, V, Self>) -> Result<(), Violation<'_, K>> {
        tree.check_colors()
    }
}
