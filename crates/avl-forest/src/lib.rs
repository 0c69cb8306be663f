//! Arena-based AVL tree.
//!
//! [`AvlTree`] stores unique elements ordered by a caller-supplied
//! [`Interface`] (a three-way comparator plus an element destructor) and
//! keeps every node's balance factor within `-1..=1` across insertions and
//! deletions.
//!
//! Instead of raw pointers, all links are `Option<u32>` indices into a
//! `Vec`-backed arena owned by the tree, so parent back-references are
//! plain lookups and can never dangle.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Node`] and [`ElementNode`] link traits |
//! | [`util`] | `first`, `last`, `next`, `prev`, `find` over any arena |
//! | [`avl`] | node layout, rotations, rebalance walk, [`AvlTree`], traversal |
//! | [`interface`] | [`Interface`], [`Natural`], [`FnInterface`] |
//! | [`config`] | [`TreeConfig`] |
//! | [`error`] | [`TreeError`], [`InsertError`] |
//!
//! ```
//! use avl_forest::AvlTree;
//!
//! let mut tree = AvlTree::new();
//! for k in [10, 20, 30] {
//!     tree.insert(k).unwrap();
//! }
//! assert_eq!(tree.peek(), Some(&20));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30]);
//! ```

pub mod avl;
pub mod config;
pub mod error;
pub mod interface;
pub mod types;
pub mod util;

pub use avl::{AvlTree, Cursor, TraversalMode, Traverse};
pub use config::TreeConfig;
pub use error::{InsertError, TreeError};
pub use interface::{FnInterface, Interface, Natural};
pub use types::{ElementNode, Node};
