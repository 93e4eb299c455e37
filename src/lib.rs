//! Ordered maps over a binary search tree with a choice of balancing
//! discipline.
//!
//! This crate provides [`TreeMap`], an ordered key-value map whose balancing
//! strategy is part of its type:
//!
//! - [`UnbalancedMap`] - a plain binary search tree
//! - [`AvlMap`] - height-balanced; sibling subtree heights differ by at most one
//! - [`RedBlackMap`] - color-balanced; no path is more than twice as long as another
//!
//! All three share the same structural engine and public surface, and each
//! offers bidirectional [`Cursor`]s with explicit before-begin and after-end
//! positions.
//!
//! # Example
//!
//! ```
//! use bal_tree::{AvlMap, RedBlackMap};
//!
//! let mut scores = RedBlackMap::new();
//! assert!(scores.insert("Alice", 100));
//! assert!(scores.insert("Bob", 85));
//! assert!(scores.insert("Carol", 92));
//!
//! // Duplicate keys are rejected; the first value stays.
//! assert!(!scores.insert("Bob", 0));
//! assert_eq!(scores.get("Bob"), Some(&85));
//!
//! // Walk the entries in key order with a cursor.
//! let mut cursor = scores.begin();
//! while let Some((name, score)) = cursor.key_value() {
//!     println!("{name}: {score}");
//!     cursor.move_next();
//! }
//! assert!(cursor.is_after_end());
//!
//! // Ascending input triggers a single left rotation in an AVL tree.
//! let avl = AvlMap::from([(1, ()), (2, ()), (3, ())]);
//! assert_eq!(avl.root_key_value(), Some((&2, &())));
//! assert_eq!(avl.check_invariants(), Ok(()));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Arena storage** - Nodes live in one contiguous arena and link by index, so rotations
//!   rewrite handles instead of pointers
//! - **No recursion on the hot paths** - Traversal and teardown walk an explicit stack, so
//!   even a degenerate unbalanced tree cannot overflow the call stack
//! - **Checkable** - [`TreeMap::check_invariants`] reports the first broken rule as a [`Violation`]
//!
//! # Logging
//!
//! Rotations and rebalancing cases are reported through the [`log`] facade
//! at `trace` level. No logger is installed by this crate.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;
mod violation;

pub mod balance;
pub mod tree;

pub use balance::{Avl, Balance, RedBlack, Unbalanced};
pub use tree::{AvlMap, RedBlackMap, TreeMap, UnbalancedMap};
pub use tree::{Cursor, CursorMut, IntoIter, Iter, Keys, Values};
pub use violation::Violation;
