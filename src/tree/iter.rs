use core::iter::FusedIterator;

use alloc::vec::{self, Vec};

use crate::balance::Balance;
use crate::raw::{RawTree, Stack};

/// An iterator over the entries of a `TreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`TreeMap`]. See its
/// documentation for more.
///
/// The walk is iterative: each end keeps its own stack of ancestors still to
/// be visited, and a shared count stops the two ends from crossing.
///
/// # Examples
///
/// ```
/// use bal_tree::AvlMap;
///
/// let map = AvlMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&3, &"c")));
/// assert_eq!(iter.len(), 1);
/// ```
///
/// [`iter`]: crate::TreeMap::iter
/// [`TreeMap`]: crate::TreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V, B: Balance> {
    tree: &'a RawTree<K, V, B>,
    front: Stack,
    back: Stack,
    remaining: usize,
}

impl<'a, K, V, B: Balance> Iter<'a, K, V, B> {
    pub(super) fn new(tree: &'a RawTree<K, V, B>) -> Self {
        let mut front = Stack::new();
        let mut back = Stack::new();
        tree.push_left_spine(&mut front, tree.root());
        tree.push_right_spine(&mut back, tree.root());
        Iter {
            tree,
            front,
            back,
            remaining: tree.len(),
        }
    }
}

impl<K, V, B: Balance> Clone for Iter<'_, K, V, B> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, B: Balance> Iterator for Iter<'a, K, V, B> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        let node = self.tree.node(handle);
        self.tree.push_left_spine(&mut self.front, node.right());
        self.remaining -= 1;
        Some(node.key_value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Iter<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        let node = self.tree.node(handle);
        self.tree.push_right_spine(&mut self.back, node.left());
        self.remaining -= 1;
        Some(node.key_value())
    }
}

impl<K, V, B: Balance> ExactSizeIterator for Iter<'_, K, V, B> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V, B: Balance> FusedIterator for Iter<'_, K, V, B> {}

/// An iterator over the keys of a `TreeMap`.
///
/// This `struct` is created by the [`keys`](crate::TreeMap::keys) method on
/// [`TreeMap`](crate::TreeMap).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V, B: Balance> {
    pub(super) inner: Iter<'a, K, V, B>,
}

impl<K, V, B: Balance> Clone for Keys<'_, K, V, B> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, B: Balance> Iterator for Keys<'a, K, V, B> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Keys<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, B: Balance> ExactSizeIterator for Keys<'_, K, V, B> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, B: Balance> FusedIterator for Keys<'_, K, V, B> {}

/// An iterator over the values of a `TreeMap`, in order by key.
///
/// This `struct` is created by the [`values`](crate::TreeMap::values) method
/// on [`TreeMap`](crate::TreeMap).
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V, B: Balance> {
    pub(super) inner: Iter<'a, K, V, B>,
}

impl<K, V, B: Balance> Clone for Values<'_, K, V, B> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, B: Balance> Iterator for Values<'a, K, V, B> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, B: Balance> DoubleEndedIterator for Values<'_, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V, B: Balance> ExactSizeIterator for Values<'_, K, V, B> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V, B: Balance> FusedIterator for Values<'_, K, V, B> {}

/// An owning iterator over the entries of a `TreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`TreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
/// [`TreeMap`]: crate::TreeMap
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(entries: Vec<(K, V)>) -> Self {
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{AvlMap, RedBlackMap, UnbalancedMap};
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_map_yields_nothing() {
        let map: AvlMap<i32, i32> = AvlMap::new();
        let mut iter = map.iter();
        assert_eq!(iter.len(), 0);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn both_ends_meet_without_overlap() {
        let map: RedBlackMap<_, _> = (0..10).map(|k| (k, ())).collect();
        let mut iter = map.keys();
        let mut seen = Vec::new();
        while let Some(&low) = iter.next() {
            seen.push(low);
            if let Some(&high) = iter.next_back() {
                seen.push(high);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn degenerate_chain_walks_both_ways() {
        // Sorted input gives an unbalanced tree with a single right spine.
        let map: UnbalancedMap<_, _> = (0..200).map(|k| (k, k * 2)).collect();
        assert!(map.values().copied().eq((0..200).map(|k| k * 2)));
        assert!(map.keys().rev().copied().eq((0..200).rev()));
    }

    #[test]
    fn cloned_iterator_is_independent() {
        let map = AvlMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
        let mut iter = map.iter();
        iter.next();
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, [(&2, &'b'), (&3, &'c')]);
        assert_eq!(iter.len(), 2);
    }

    proptest! {
        #[test]
        fn reverse_matches_forward(keys in prop::collection::vec(any::<i16>(), 0..200)) {
            let map: AvlMap<_, _> = keys.iter().map(|&k| (k, ())).collect();
            let forward: Vec<_> = map.keys().copied().collect();
            let mut backward: Vec<_> = map.keys().rev().copied().collect();
            backward.reverse();
            prop_assert_eq!(forward.len(), map.len());
            prop_assert_eq!(forward, backward);
        }
    }
}
