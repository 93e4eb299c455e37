use core::borrow::Borrow;
use core::cmp::Ordering;
use core::marker::PhantomData;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::balance::Rebalance;

/// Explicit stack for the iterative in-order walks.
pub(crate) type Stack = SmallVec<[Handle; 32]>;

/// The binary search tree engine backing `TreeMap`.
///
/// Structural insert and unlink are variant-agnostic; after each one the
/// engine hands the affected position to the discipline `B`.
pub(crate) struct RawTree<K, V, B: Rebalance> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V, B::Tag>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live nodes.
    len: usize,
    _balance: PhantomData<B>,
}

/// What is left behind when a node is physically removed from the tree.
pub(crate) struct Unlinked<T> {
    /// Augmentation the removed node carried.
    pub(crate) tag: T,
    /// Former parent of the removed node and the slot it occupied there.
    pub(crate) parent: Option<(Handle, Side)>,
    /// The child spliced into the vacated slot.
    pub(crate) child: Option<Handle>,
}

impl<K, V, B: Rebalance> RawTree<K, V, B> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            _balance: PhantomData,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            _balance: PhantomData,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V, B::Tag> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V, B::Tag> {
        self.nodes.get_mut(handle)
    }

    /// Returns the leftmost node of the subtree rooted at `from`.
    pub(crate) fn leftmost(&self, from: Handle) -> Handle {
        let mut current = from;
        while let Some(left) = self.node(current).left() {
            current = left;
        }
        current
    }

    /// Returns the rightmost node of the subtree rooted at `from`.
    pub(crate) fn rightmost(&self, from: Handle) -> Handle {
        let mut current = from;
        while let Some(right) = self.node(current).right() {
            current = right;
        }
        current
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| self.leftmost(root))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| self.rightmost(root))
    }

    /// Returns the in-order successor of `handle`.
    ///
    /// With a right subtree the successor is its leftmost node. Otherwise we
    /// climb while we are a right child; the first parent reached from the
    /// left is the successor.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Right)
    }

    /// Returns the in-order predecessor of `handle`.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbor(handle, Side::Left)
    }

    fn neighbor(&self, handle: Handle, toward: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(toward) {
            let mut current = child;
            while let Some(next) = self.node(current).child(toward.opposite()) {
                current = next;
            }
            return Some(current);
        }

        let mut current = handle;
        while let Some(parent) = self.node(current).parent() {
            if self.node(parent).child(toward) != Some(current) {
                return Some(parent);
            }
            current = parent;
        }
        None
    }

    /// Pushes `from` and its chain of left descendants onto `stack`.
    pub(crate) fn push_left_spine(&self, stack: &mut Stack, from: Option<Handle>) {
        let mut current = from;
        while let Some(handle) = current {
            stack.push(handle);
            current = self.node(handle).left();
        }
    }

    /// Pushes `from` and its chain of right descendants onto `stack`.
    pub(crate) fn push_right_spine(&self, stack: &mut Stack, from: Option<Handle>) {
        let mut current = from;
        while let Some(handle) = current {
            stack.push(handle);
            current = self.node(handle).right();
        }
    }

    /// Releases every node exactly once with an iterative in-order walk.
    pub(crate) fn clear(&mut self) {
        let mut stack = Stack::new();
        let mut current = self.root.take();

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else { break };

            current = self.nodes.get(handle).right();
            drop(self.nodes.take(handle));
            self.len -= 1;
        }

        debug_assert_eq!(self.len, 0, "`RawTree::clear()` - walk missed nodes");
        self.nodes.clear();
        self.len = 0;
    }

    /// Moves every entry out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack = Stack::new();
        let mut current = self.root.take();

        loop {
            while let Some(handle) = current {
                stack.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else { break };

            current = self.nodes.get(handle).right();
            let (key, value, _) = self.nodes.take(handle).into_parts();
            result.push((key, value));
        }

        self.nodes.clear();
        self.len = 0;
        result
    }

    /// Rotates `pivot` down toward `toward`; its child on the other side
    /// takes its place. Returns the new subtree root.
    ///
    /// Exactly three link pairs change: the grandparent and the rising child,
    /// the rising child and `pivot`, and `pivot` and the inner subtree that
    /// changes hands.
    ///
    /// # Panics
    ///
    /// Panics if `pivot` has no child on the rising side.
    pub(crate) fn rotate(&mut self, pivot: Handle, toward: Side) -> Handle {
        let rising_side = toward.opposite();
        let rising = self
            .node(pivot)
            .child(rising_side)
            .expect("`RawTree::rotate()` - `pivot` has no child on the rising side!");
        let inner = self.node(rising).child(toward);
        let grandparent = self.node(pivot).parent();

        log::trace!("raw_tree: rotate {toward:?} at node {}", pivot.to_index());

        self.node_mut(pivot).set_child(rising_side, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(pivot));
        }

        match grandparent {
            Some(gp) => {
                let side = self.node(gp).side_of(pivot);
                self.node_mut(gp).set_child(side, Some(rising));
            }
            None => self.root = Some(rising),
        }
        self.node_mut(rising).set_parent(grandparent);

        self.node_mut(rising).set_child(toward, Some(pivot));
        self.node_mut(pivot).set_parent(Some(rising));

        rising
    }

    /// Exchanges the key/value pairs of two distinct nodes; links and tags stay put.
    pub(crate) fn swap_entries(&mut self, a: Handle, b: Handle) {
        let (a, b) = self.nodes.pair_mut(a, b);
        a.swap_entry(b);
    }

    /// Physically removes the node holding the entry at `handle`.
    ///
    /// A node with two children trades its entry with its in-order
    /// predecessor, which is then removed instead; that node has at most a
    /// left child. Returns the removed entry and the position it left.
    pub(crate) fn unlink(&mut self, handle: Handle) -> ((K, V), Unlinked<B::Tag>) {
        let target = if self.node(handle).has_both_children() {
            let left = self.node(handle).left().expect("checked above");
            let predecessor = self.rightmost(left);
            self.swap_entries(handle, predecessor);
            predecessor
        } else {
            handle
        };

        let node = self.node(target);
        let child = node.left().or(node.right());
        let parent = node.parent().map(|p| (p, self.node(p).side_of(target)));

        if let Some(child) = child {
            self.node_mut(child).set_parent(parent.map(|(p, _)| p));
        }
        match parent {
            Some((p, side)) => self.node_mut(p).set_child(side, child),
            None => self.root = child,
        }

        let (key, value, tag) = self.nodes.take(target).into_parts();
        self.len -= 1;
        debug_assert_eq!(self.nodes.len(), self.len, "`RawTree::unlink()` - arena and length disagree");

        ((key, value), Unlinked { tag, parent, child })
    }

    /// Removes the entry at `handle` and runs the discipline's fix-up.
    pub(crate) fn remove_handle(&mut self, handle: Handle) -> (K, V) {
        let (entry, unlinked) = self.unlink(handle);
        B::after_unlink(self, &unlinked);
        entry
    }
}

impl<K: Ord, V, B: Rebalance> RawTree<K, V, B> {
    /// Searches for a key and returns its node handle if found.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|h| self.node(h).value())
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.node_mut(handle).value_mut())
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).map(|h| self.node(h).key_value())
    }

    /// Links a new node for `key` below the leaf position the descent ends
    /// at. Returns `None`, without touching the tree, if `key` is present.
    pub(crate) fn link_new(&mut self, key: K, value: V) -> Option<Handle> {
        let Some(mut current) = self.root else {
            let handle = self.nodes.alloc(Node::new(key, value, None, B::fresh_tag()));
            self.root = Some(handle);
            self.len = 1;
            return Some(handle);
        };

        let side = loop {
            let node = self.node(current);
            let side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return None,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };

        let handle = self.nodes.alloc(Node::new(key, value, Some(current), B::fresh_tag()));
        self.node_mut(current).set_child(side, Some(handle));
        self.len += 1;
        Some(handle)
    }

    /// Inserts `key` if absent and rebalances. Returns false on a duplicate.
    pub(crate) fn insert(&mut self, key: K, value: V) -> bool {
        match self.link_new(key, value) {
            Some(handle) => {
                B::after_insert(self, handle);
                true
            }
            None => false,
        }
    }

    /// Overwrites the value stored under `key` without reshaping the tree.
    pub(crate) fn set_value<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            Some(handle) => {
                self.node_mut(handle).replace_value(value);
                true
            }
            None => false,
        }
    }

    /// Removes a key from the tree and returns the stored entry.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_handle(handle))
    }
}

impl<K: Clone, V: Clone, B: Rebalance> Clone for RawTree<K, V, B> {
    fn clone(&self) -> Self {
        // Handles are arena indices, so a slot-for-slot copy keeps every link valid.
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            _balance: PhantomData,
        }
    }
}
