use core::fmt;
use core::ptr;

use crate::balance::Balance;
use crate::raw::{Handle, RawTree};

/// Where a cursor stands: one of the two sentinels, or on a live entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    BeforeBegin,
    At(Handle),
    AfterEnd,
}

impl Position {
    fn first<K, V, B: Balance>(tree: &RawTree<K, V, B>) -> Self {
        tree.first().map_or(Position::AfterEnd, Position::At)
    }

    fn last<K, V, B: Balance>(tree: &RawTree<K, V, B>) -> Self {
        tree.last().map_or(Position::BeforeBegin, Position::At)
    }

    /// The position after `self`. The after-end sentinel is a fixed point.
    fn next<K, V, B: Balance>(self, tree: &RawTree<K, V, B>) -> Self {
        match self {
            Position::BeforeBegin => Position::first(tree),
            Position::At(handle) => tree.successor(handle).map_or(Position::AfterEnd, Position::At),
            Position::AfterEnd => Position::AfterEnd,
        }
    }

    /// The position before `self`. The before-begin sentinel is a fixed point.
    fn prev<K, V, B: Balance>(self, tree: &RawTree<K, V, B>) -> Self {
        match self {
            Position::BeforeBegin => Position::BeforeBegin,
            Position::At(handle) => tree.predecessor(handle).map_or(Position::BeforeBegin, Position::At),
            Position::AfterEnd => Position::last(tree),
        }
    }
}

/// A read-only cursor over the entries of a `TreeMap`.
///
/// Besides every entry, a cursor can stand on one of two sentinels: before
/// the first entry or after the last one. Moving past a sentinel leaves the
/// cursor where it is.
///
/// Cursors are created by [`begin`], [`end`], [`before_begin`],
/// [`after_end`], and [`find`]. Two cursors compare equal when they stand at
/// the same position of the same map.
///
/// # Examples
///
/// ```
/// use bal_tree::RedBlackMap;
///
/// let map = RedBlackMap::from([(1, "a"), (2, "b")]);
/// let mut cursor = map.before_begin();
/// assert_eq!(cursor.key(), None);
///
/// cursor.move_next();
/// assert_eq!(cursor, map.begin());
/// cursor.move_prev();
/// cursor.move_prev(); // no-op
/// assert!(cursor.is_before_begin());
/// ```
///
/// [`begin`]: crate::TreeMap::begin
/// [`end`]: crate::TreeMap::end
/// [`before_begin`]: crate::TreeMap::before_begin
/// [`after_end`]: crate::TreeMap::after_end
/// [`find`]: crate::TreeMap::find
pub struct Cursor<'a, K, V, B: Balance> {
    tree: &'a RawTree<K, V, B>,
    position: Position,
}

impl<'a, K, V, B: Balance> Cursor<'a, K, V, B> {
    pub(super) fn first(tree: &'a RawTree<K, V, B>) -> Self {
        Cursor {
            tree,
            position: Position::first(tree),
        }
    }

    pub(super) fn last(tree: &'a RawTree<K, V, B>) -> Self {
        Cursor {
            tree,
            position: Position::last(tree),
        }
    }

    pub(super) fn before_begin(tree: &'a RawTree<K, V, B>) -> Self {
        Cursor {
            tree,
            position: Position::BeforeBegin,
        }
    }

    pub(super) fn after_end(tree: &'a RawTree<K, V, B>) -> Self {
        Cursor {
            tree,
            position: Position::AfterEnd,
        }
    }

    pub(super) fn at(tree: &'a RawTree<K, V, B>, handle: Handle) -> Self {
        Cursor {
            tree,
            position: Position::At(handle),
        }
    }

    /// Moves to the next entry in key order, or onto the after-end sentinel
    /// from the last entry.
    ///
    /// # Complexity
    ///
    /// O(height) worst case, O(1) amortized over a full traversal.
    pub fn move_next(&mut self) {
        self.position = self.position.next(self.tree);
    }

    /// Moves to the previous entry in key order, or onto the before-begin
    /// sentinel from the first entry.
    pub fn move_prev(&mut self) {
        self.position = self.position.prev(self.tree);
    }

    /// Returns the key of the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(k, _)| k)
    }

    /// Returns the value of the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Returns the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        match self.position {
            Position::At(handle) => Some(self.tree.node(handle).key_value()),
            Position::BeforeBegin | Position::AfterEnd => None,
        }
    }

    /// Returns `true` if the cursor is on the sentinel before the first entry.
    #[must_use]
    pub fn is_before_begin(&self) -> bool {
        self.position == Position::BeforeBegin
    }

    /// Returns `true` if the cursor is on the sentinel after the last entry.
    #[must_use]
    pub fn is_after_end(&self) -> bool {
        self.position == Position::AfterEnd
    }
}

impl<K, V, B: Balance> Clone for Cursor<'_, K, V, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, B: Balance> Copy for Cursor<'_, K, V, B> {}

impl<K, V, B: Balance> PartialEq for Cursor<'_, K, V, B> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.position == other.position
    }
}

impl<K, V, B: Balance> Eq for Cursor<'_, K, V, B> {}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for Cursor<'_, K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_position(f, "Cursor", self.position, self.key_value())
    }
}

/// A cursor that can also modify or remove the entry it stands on.
///
/// Created by [`begin_mut`](crate::TreeMap::begin_mut) and
/// [`find_mut`](crate::TreeMap::find_mut). Keys can never be modified
/// through a cursor; removing the current entry rebalances the tree and moves
/// the cursor to the following entry.
pub struct CursorMut<'a, K, V, B: Balance> {
    tree: &'a mut RawTree<K, V, B>,
    position: Position,
}

impl<'a, K, V, B: Balance> CursorMut<'a, K, V, B> {
    pub(super) fn first(tree: &'a mut RawTree<K, V, B>) -> Self {
        let position = Position::first(tree);
        CursorMut { tree, position }
    }

    pub(super) fn at(tree: &'a mut RawTree<K, V, B>, handle: Handle) -> Self {
        CursorMut {
            tree,
            position: Position::At(handle),
        }
    }

    /// Moves to the next entry in key order, or onto the after-end sentinel.
    pub fn move_next(&mut self) {
        self.position = self.position.next(self.tree);
    }

    /// Moves to the previous entry in key order, or onto the before-begin
    /// sentinel.
    pub fn move_prev(&mut self) {
        self.position = self.position.prev(self.tree);
    }

    /// Returns the key of the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|(k, _)| k)
    }

    /// Returns the value of the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.key_value().map(|(_, v)| v)
    }

    /// Returns the current entry, or `None` on a sentinel.
    #[must_use]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        match self.position {
            Position::At(handle) => Some(self.tree.node(handle).key_value()),
            Position::BeforeBegin | Position::AfterEnd => None,
        }
    }

    /// Returns a mutable reference to the current value, or `None` on a
    /// sentinel.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.key_value_mut().map(|(_, v)| v)
    }

    /// Returns the current key with a mutable value, or `None` on a sentinel.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        match self.position {
            Position::At(handle) => Some(self.tree.node_mut(handle).entry_mut()),
            Position::BeforeBegin | Position::AfterEnd => None,
        }
    }

    /// Removes the current entry and moves to the one after it. Returns
    /// `None`, without moving, on a sentinel.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let mut cursor = map.find_mut(&2).unwrap();
    /// assert_eq!(cursor.remove_current(), Some((2, 'b')));
    /// assert_eq!(cursor.key(), Some(&3));
    /// assert_eq!(map.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let Position::At(handle) = self.position else {
            return None;
        };
        // Removal relocates at most the predecessor's entry, never the
        // successor's, so this handle stays valid.
        let next = self.tree.successor(handle);
        let entry = self.tree.remove_handle(handle);
        self.position = next.map_or(Position::AfterEnd, Position::At);
        Some(entry)
    }

    /// Returns `true` if the cursor is on the sentinel before the first entry.
    #[must_use]
    pub fn is_before_begin(&self) -> bool {
        self.position == Position::BeforeBegin
    }

    /// Returns `true` if the cursor is on the sentinel after the last entry.
    #[must_use]
    pub fn is_after_end(&self) -> bool {
        self.position == Position::AfterEnd
    }

    /// Downgrades to a read-only cursor at the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, B> {
        Cursor {
            tree: &*self.tree,
            position: self.position,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for CursorMut<'_, K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_position(f, "CursorMut", self.position, self.key_value())
    }
}

fn debug_position<K: fmt::Debug, V: fmt::Debug>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    position: Position,
    entry: Option<(&K, &V)>,
) -> fmt::Result {
    match (position, entry) {
        (Position::At(_), Some((key, value))) => f.debug_tuple(name).field(key).field(value).finish(),
        (Position::BeforeBegin, _) => f.debug_tuple(name).field(&"before begin").finish(),
        _ => f.debug_tuple(name).field(&"after end").finish(),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{AvlMap, RedBlackMap, UnbalancedMap};
    use alloc::format;
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_map_sentinels_coincide() {
        let map: RedBlackMap<i32, i32> = RedBlackMap::new();
        assert_eq!(map.begin(), map.after_end());
        assert_eq!(map.end(), map.before_begin());

        let mut cursor = map.before_begin();
        cursor.move_next();
        assert!(cursor.is_after_end());
        cursor.move_prev();
        assert!(cursor.is_before_begin());
    }

    #[test]
    fn walking_from_begin_reaches_end_then_after_end() {
        let map: AvlMap<_, _> = (0..7).map(|k| (k, ())).collect();
        let mut cursor = map.begin();
        for _ in 1..map.len() {
            cursor.move_next();
        }
        assert_eq!(cursor, map.end());
        assert_eq!(cursor.key(), Some(&6));

        cursor.move_next();
        assert_eq!(cursor, map.after_end());
        cursor.move_next();
        assert_eq!(cursor, map.after_end());
    }

    #[test]
    fn walking_backward_from_after_end() {
        let map = UnbalancedMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
        let mut cursor = map.after_end();
        let mut seen = Vec::new();
        loop {
            cursor.move_prev();
            match cursor.key() {
                Some(&key) => seen.push(key),
                None => break,
            }
        }
        assert_eq!(seen, [3, 2, 1]);
        assert!(cursor.is_before_begin());
    }

    #[test]
    fn cursors_of_different_maps_differ() {
        let a = AvlMap::from([(1, ())]);
        let b = AvlMap::from([(1, ())]);
        assert_ne!(a.begin(), b.begin());
        assert_ne!(a.after_end(), b.after_end());
    }

    #[test]
    fn remove_current_walks_to_successor() {
        let mut map: RedBlackMap<_, _> = (0..32).map(|k| (k, k)).collect();
        let mut cursor = map.find_mut(&10).unwrap();
        for expected in 10..32 {
            assert_eq!(cursor.remove_current(), Some((expected, expected)));
        }
        assert!(cursor.is_after_end());
        assert_eq!(cursor.remove_current(), None);
        assert_eq!(map.len(), 10);
        assert_eq!(map.check_invariants(), Ok(()));
    }

    #[test]
    fn remove_current_on_node_with_two_children() {
        let mut map = AvlMap::from([(2, 'b'), (1, 'a'), (3, 'c')]);
        let mut cursor = map.find_mut(&2).unwrap();
        assert_eq!(cursor.remove_current(), Some((2, 'b')));
        assert_eq!(cursor.key_value(), Some((&3, &'c')));
        cursor.move_prev();
        assert_eq!(cursor.key(), Some(&1));
        assert_eq!(map.check_invariants(), Ok(()));
    }

    #[test]
    fn value_mut_updates_in_place() {
        let mut map = AvlMap::from([(1, 10)]);
        let mut cursor = map.begin_mut();
        if let Some(value) = cursor.value_mut() {
            *value += 5;
        }
        cursor.move_next();
        assert_eq!(cursor.value_mut(), None);
        assert_eq!(map[&1], 15);
    }

    #[test]
    fn debug_names_the_position() {
        let map = AvlMap::from([(1, "a")]);
        assert_eq!(format!("{:?}", map.begin()), r#"Cursor(1, "a")"#);
        assert_eq!(format!("{:?}", map.before_begin()), r#"Cursor("before begin")"#);
        assert_eq!(format!("{:?}", map.after_end()), r#"Cursor("after end")"#);
    }
}
