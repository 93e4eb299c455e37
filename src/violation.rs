use core::fmt;

/// A broken tree invariant, as reported by
/// [`TreeMap::check_invariants`](crate::TreeMap::check_invariants).
///
/// Key-carrying variants borrow the key of the first offending node found by
/// an in-order (or, for the balance checks, post-order) walk.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Violation<'a, K> {
    /// `key` is not greater than the key visited before it.
    OutOfOrder { key: &'a K },
    /// The node holding `key` does not point back at the node that links to it.
    BrokenParentLink { key: &'a K },
    /// The recorded length differs from the number of reachable nodes.
    LengthMismatch { recorded: usize, counted: usize },
    /// AVL: the stored height of `key`'s subtree is out of date.
    StaleHeight { key: &'a K, stored: u8, actual: i32 },
    /// AVL: the subtree heights below `key` differ by more than one.
    HeightImbalance { key: &'a K, factor: i32 },
    /// Red-Black: the root holding `key` is red.
    RedRoot { key: &'a K },
    /// Red-Black: `key` is red and so is its parent.
    RedChildOfRed { key: &'a K },
    /// Red-Black: the two subtrees below `key` have different black-heights.
    UnevenBlackHeight { key: &'a K, left: usize, right: usize },
}

impl<K: fmt::Debug> fmt::Display for Violation<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::OutOfOrder { key } => write!(f, "key {key:?} is out of order"),
            Violation::BrokenParentLink { key } => write!(f, "node {key:?} has a stale parent link"),
            Violation::LengthMismatch { recorded, counted } => {
                write!(f, "length is {recorded} but {counted} nodes are reachable")
            }
            Violation::StaleHeight { key, stored, actual } => {
                write!(f, "node {key:?} stores height {stored}, actual height is {actual}")
            }
            Violation::HeightImbalance { key, factor } => {
                write!(f, "node {key:?} has balance factor {factor}")
            }
            Violation::RedRoot { key } => write!(f, "root {key:?} is red"),
            Violation::RedChildOfRed { key } => write!(f, "red node {key:?} has a red parent"),
            Violation::UnevenBlackHeight { key, left, right } => {
                write!(f, "node {key:?} has black-heights {left} (left) and {right} (right)")
            }
        }
    }
}

impl<K: fmt::Debug> core::error::Error for Violation<'_, K> {}
