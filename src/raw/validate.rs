use super::handle::Handle;
use super::node::Color;
use super::raw_tree::{RawTree, Stack};
use crate::balance::{Avl, Rebalance, RedBlack};
use crate::violation::Violation;

impl<K: Ord, V, B: Rebalance> RawTree<K, V, B> {
    /// Checks ordering, parent links, and length, then the discipline's own
    /// invariants.
    ///
    /// The walk is iterative; an unbalanced tree may be as deep as it is long.
    pub(crate) fn check(&self) -> Result<(), Violation<'_, K>> {
        if let Some(root) = self.root()
            && self.node(root).parent().is_some()
        {
            return Err(Violation::BrokenParentLink { key: self.node(root).key() });
        }

        let mut stack = Stack::new();
        self.push_left_spine(&mut stack, self.root());
        let mut previous: Option<&K> = None;
        let mut counted = 0;

        while let Some(handle) = stack.pop() {
            let node = self.node(handle);
            for child in [node.left(), node.right()].into_iter().flatten() {
                if self.node(child).parent() != Some(handle) {
                    return Err(Violation::BrokenParentLink { key: self.node(child).key() });
                }
            }
            if let Some(previous) = previous
                && previous >= node.key()
            {
                return Err(Violation::OutOfOrder { key: node.key() });
            }

            previous = Some(node.key());
            counted += 1;
            self.push_left_spine(&mut stack, node.right());
        }

        if counted != self.len() {
            return Err(Violation::LengthMismatch {
                recorded: self.len(),
                counted,
            });
        }

        B::check(self)
    }
}

impl<K, V> RawTree<K, V, Avl> {
    pub(crate) fn check_heights(&self) -> Result<(), Violation<'_, K>> {
        match self.root() {
            Some(root) => self.checked_height(root).map(drop),
            None => Ok(()),
        }
    }

    fn checked_height(&self, handle: Handle) -> Result<i32, Violation<'_, K>> {
        let node = self.node(handle);
        let left = node.left().map_or(Ok(-1), |l| self.checked_height(l))?;
        let right = node.right().map_or(Ok(-1), |r| self.checked_height(r))?;
        let actual = left.max(right) + 1;

        if i32::from(*node.tag()) != actual {
            return Err(Violation::StaleHeight {
                key: node.key(),
                stored: *node.tag(),
                actual,
            });
        }
        if (right - left).abs() > 1 {
            return Err(Violation::HeightImbalance {
                key: node.key(),
                factor: right - left,
            });
        }
        Ok(actual)
    }
}

impl<K, V> RawTree<K, V, RedBlack> {
    pub(crate) fn check_colors(&self) -> Result<(), Violation<'_, K>> {
        let Some(root) = self.root() else {
            return Ok(());
        };
        if *self.node(root).tag() == Color::Red {
            return Err(Violation::RedRoot { key: self.node(root).key() });
        }
        self.black_height(root).map(drop)
    }

    /// Black nodes on every path from `handle` down to an absent child, not
    /// counting `handle` itself.
    fn black_height(&self, handle: Handle) -> Result<usize, Violation<'_, K>> {
        let node = self.node(handle);
        let mut below = [0; 2];

        for (slot, child) in below.iter_mut().zip([node.left(), node.right()]) {
            let Some(child) = child else { continue };
            let color = *self.node(child).tag();
            if color == Color::Red && *node.tag() == Color::Red {
                return Err(Violation::RedChildOfRed { key: self.node(child).key() });
            }
            *slot = self.black_height(child)? + usize::from(color == Color::Black);
        }

        let [left, right] = below;
        if left != right {
            return Err(Violation::UnevenBlackHeight {
                key: node.key(),
                left,
                right,
            });
        }
        Ok(left)
    }
}

#[cfg(test)]
impl<K: Ord + core::fmt::Debug, V, B: Rebalance> RawTree<K, V, B> {
    /// Panics with a descriptive message if any invariant is broken.
    pub(crate) fn validate(&self) {
        if let Err(violation) = self.check() {
            panic!("Tree invariant violated: {violation}");
        }
    }
}
