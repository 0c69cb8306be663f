//! AVL tree family: arena node layout, rotation and rebalance algorithms,
//! the owning [`AvlTree`] handle, traversals and detached cursors.

pub mod cursor;
pub mod traverse;
pub mod tree;
pub mod types;
pub mod util;

pub use cursor::Cursor;
pub use traverse::{Indices, Traverse, TraversalMode};
pub use tree::AvlTree;
pub use types::{AvlNode, AvlNodeLike};
pub use util::{assert_avl_tree, rebalance, remove, rotate_left, rotate_right, Removal};
