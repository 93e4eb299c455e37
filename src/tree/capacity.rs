use super::TreeMap;
use crate::balance::Balance;
use crate::raw::RawTree;

impl<K, V, B: Balance> TreeMap<K, V, B> {
    /// Creates an empty map with room for at least `capacity` entries before
    /// the node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use bal_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<i32, i32> = RedBlackMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TreeMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Returns how many entries the map can hold before the node arena
    /// reallocates.
    ///
    /// Slots freed by removals are reused, so a map that shrinks and grows
    /// again within its capacity does not allocate.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
