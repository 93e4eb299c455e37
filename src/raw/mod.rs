mod arena;
mod avl;
mod handle;
mod node;
mod raw_tree;
mod red_black;
mod validate;

pub(crate) use handle::Handle;
pub(crate) use node::Color;
pub(crate) use raw_tree::{RawTree, Stack, Unlinked};
