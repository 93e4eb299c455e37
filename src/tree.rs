use core::borrow::Borrow;
use core::fmt;
use core::ops::Index;

use alloc::vec::Vec;

use crate::balance::{Avl, Balance, RedBlack, Unbalanced};
use crate::raw::RawTree;
use crate::violation::Violation;

mod capacity;
mod cursor;
mod iter;

pub use cursor::{Cursor, CursorMut};
pub use iter::{IntoIter, Iter, Keys, Values};

/// An ordered map backed by a binary search tree whose balancing discipline
/// is chosen by the type parameter `B`.
///
/// Given a key type with a [total order], the map stores its entries in key
/// order. Every node lives in a contiguous arena and links to its parent and
/// children by handle, so rotations only rewrite a handful of indices.
///
/// The discipline is fixed for the lifetime of the map:
///
/// - [`Unbalanced`]: a plain binary search tree. Cheapest per mutation, but
///   sorted input degrades it to a list.
/// - [`Avl`]: sibling subtree heights never differ by more than one.
/// - [`RedBlack`]: color rules keep every path within a factor of two of the
///   shortest one.
///
/// Inserting a key that is already present leaves the map untouched and
/// returns `false`; the first value stored under a key wins. Use
/// [`set_value`](TreeMap::set_value) or [`get_mut`](TreeMap::get_mut) to
/// overwrite.
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the map. This is normally only possible through
/// [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The behavior
/// resulting from such a logic error is not specified, but will be
/// encapsulated to the `TreeMap` that observed the logic error and not result
/// in undefined behavior.
///
/// # Examples
///
/// ```
/// use bal_tree::RedBlackMap;
///
/// let mut movie_reviews = RedBlackMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// assert!(movie_reviews.erase("The Blues Brothers"));
///
/// // a second review of the same movie is ignored.
/// assert!(!movie_reviews.insert("Pulp Fiction", "Overrated."));
/// assert_eq!(movie_reviews["Pulp Fiction"], "Masterpiece.");
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A map with a known list of items can be initialized from an array:
///
/// ```
/// use bal_tree::AvlMap;
///
/// let solar_distance = AvlMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.root_key_value(), Some((&"Mercury", &0.4)));
/// ```
///
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct TreeMap<K, V, B: Balance> {
    raw: RawTree<K, V, B>,
}

/// A [`TreeMap`] that never rebalances.
pub type UnbalancedMap<K, V> = TreeMap<K, V, Unbalanced>;

/// A height-balanced [`TreeMap`].
pub type AvlMap<K, V> = TreeMap<K, V, Avl>;

/// A color-balanced [`TreeMap`].
pub type RedBlackMap<K, V> = TreeMap<K, V, RedBlack>;

impl<K, V, B: Balance> TreeMap<K, V, B> {
    /// Makes a new, empty `TreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        TreeMap { raw: RawTree::new() }
    }

    /// Clears the map, dropping every entry exactly once.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let mut a = RedBlackMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::UnbalancedMap;
    ///
    /// let mut a = UnbalancedMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|h| self.raw.node(h).key_value())
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Complexity
    ///
    /// O(height)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|h| self.raw.node(h).key_value())
    }

    /// Returns the entry stored at the root of the tree.
    ///
    /// Which entry that is depends on the insertion history and on the
    /// balancing discipline, which makes it handy for observing rotations.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::{AvlMap, UnbalancedMap};
    ///
    /// let avl = AvlMap::from([(1, ()), (2, ()), (3, ())]);
    /// assert_eq!(avl.root_key_value(), Some((&2, &())));
    ///
    /// let plain = UnbalancedMap::from([(1, ()), (2, ()), (3, ())]);
    /// assert_eq!(plain.root_key_value(), Some((&1, &())));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn root_key_value(&self) -> Option<(&K, &V)> {
        self.raw.root().map(|h| self.raw.node(h).key_value())
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height) to create the iterator; each step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, K, V, B> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V, B> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut a = AvlMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V, B> {
        Values { inner: self.iter() }
    }

    /// Returns an ordered snapshot of every entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let map = RedBlackMap::from([(5, 'e'), (3, 'c'), (8, 'h')]);
    /// assert_eq!(map.to_vec(), [(&3, &'c'), (&5, &'e'), (&8, &'h')]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn to_vec(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    /// Returns a cursor at the first entry, or at the after-end sentinel if
    /// the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let map = AvlMap::from([(1, "a"), (2, "b")]);
    /// let mut cursor = map.begin();
    /// assert_eq!(cursor.key(), Some(&1));
    /// cursor.move_next();
    /// assert_eq!(cursor, map.end());
    /// cursor.move_next();
    /// assert_eq!(cursor, map.after_end());
    ///
    /// let empty: AvlMap<i32, &str> = AvlMap::new();
    /// assert_eq!(empty.begin(), empty.after_end());
    /// ```
    pub fn begin(&self) -> Cursor<'_, K, V, B> {
        Cursor::first(&self.raw)
    }

    /// Returns a cursor at the last entry, or at the before-begin sentinel if
    /// the map is empty.
    pub fn end(&self) -> Cursor<'_, K, V, B> {
        Cursor::last(&self.raw)
    }

    /// Returns a cursor at the sentinel preceding the first entry.
    pub fn before_begin(&self) -> Cursor<'_, K, V, B> {
        Cursor::before_begin(&self.raw)
    }

    /// Returns a cursor at the sentinel following the last entry.
    pub fn after_end(&self) -> Cursor<'_, K, V, B> {
        Cursor::after_end(&self.raw)
    }

    /// Returns a mutable cursor at the first entry, or at the after-end
    /// sentinel if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let mut map: RedBlackMap<_, _> = (1..=6).map(|k| (k, k * 10)).collect();
    ///
    /// // drop the odd keys, bump the even ones
    /// let mut cursor = map.begin_mut();
    /// while let Some(&key) = cursor.key() {
    ///     if key % 2 == 1 {
    ///         cursor.remove_current();
    ///     } else {
    ///         *cursor.value_mut().unwrap() += 1;
    ///         cursor.move_next();
    ///     }
    /// }
    /// assert_eq!(map.to_vec(), [(&2, &21), (&4, &41), (&6, &61)]);
    /// ```
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V, B> {
        CursorMut::first(&mut self.raw)
    }
}

impl<K: Ord, V, B: Balance> TreeMap<K, V, B> {
    /// Makes a map holding a single entry.
    #[must_use]
    pub fn with_entry(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }

    /// Inserts a key-value pair if the key is not yet present.
    ///
    /// Returns `false`, leaving the map untouched and dropping the arguments,
    /// if the key already exists. The tree is rebalanced before this returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.is_empty());
    ///
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map[&37], "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map. Returns whether the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, "a");
    /// assert!(map.erase(&1));
    /// assert!(!map.erase(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn erase<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::UnbalancedMap;
    ///
    /// let mut map = UnbalancedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove_entry(key)
    }

    /// Overwrites the value stored under `key`. Returns `false` if the key
    /// is absent. The shape of the tree never changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let mut map = AvlMap::with_entry("k", 1);
    /// assert!(map.set_value("k", 2));
    /// assert_eq!(map.get("k"), Some(&2));
    /// assert!(!map.set_value("missing", 3));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn set_value<Q>(&mut self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.set_value(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Returns a cursor at the entry for `key`, or `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::AvlMap;
    ///
    /// let map = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let mut cursor = map.find(&2).unwrap();
    /// cursor.move_prev();
    /// assert_eq!(cursor.key_value(), Some((&1, &"a")));
    /// assert!(map.find(&4).is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn find<Q>(&self, key: &Q) -> Option<Cursor<'_, K, V, B>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(Cursor::at(&self.raw, handle))
    }

    /// Returns a mutable cursor at the entry for `key`, or `None` if it is
    /// absent.
    ///
    /// # Complexity
    ///
    /// O(height)
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<CursorMut<'_, K, V, B>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(CursorMut::at(&mut self.raw, handle))
    }

    /// Verifies every structural invariant of the tree.
    ///
    /// Checks strict key order, parent links, and the recorded length, then
    /// the discipline's own rules: stored heights and balance factors for
    /// [`Avl`]; a black root, no red-red edge, and uniform black-height for
    /// [`RedBlack`]. The first broken rule found is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] encountered. A map that is only ever
    /// mutated through its public API never reports one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<_, _> = (0..100).map(|k| (k, ())).collect();
    /// assert_eq!(map.check_invariants(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn check_invariants(&self) -> Result<(), Violation<'_, K>> {
        self.raw.check()
    }
}

impl<K: Clone, V: Clone, B: Balance> Clone for TreeMap<K, V, B> {
    fn clone(&self) -> Self {
        TreeMap { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq, B: Balance> PartialEq for TreeMap<K, V, B> {
    fn eq(&self, other: &TreeMap<K, V, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, B: Balance> Eq for TreeMap<K, V, B> {}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, B: Balance> Default for TreeMap<K, V, B> {
    fn default() -> Self {
        TreeMap::new()
    }
}

impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for TreeMap<K, V, B> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, B: Balance> Extend<(K, V)> for TreeMap<K, V, B> {
    /// Inserts every pair in turn; pairs whose key is already present are
    /// skipped.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy, B: Balance> Extend<(&'a K, &'a V)> for TreeMap<K, V, B> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, B: Balance> IntoIterator for &'a TreeMap<K, V, B> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Iter<'a, K, V, B> {
        self.iter()
    }
}

impl<K, V, B: Balance> IntoIterator for TreeMap<K, V, B> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let map = RedBlackMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter::new(self.raw.drain_to_vec())
    }
}

impl<K, Q, V, B> Index<&Q> for TreeMap<K, V, B>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
    B: Balance,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, B: Balance, const N: usize> From<[(K, V); N]> for TreeMap<K, V, B> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}
