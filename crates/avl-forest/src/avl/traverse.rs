use std::iter::FusedIterator;

use crate::types::ElementNode;
use crate::util::{get_l, get_r};

use super::types::AvlNode;

/// Order in which [`Traverse`] visits nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraversalMode {
    /// Node, then left subtree, then right subtree.
    Pre,
    /// Ascending element order.
    In,
    /// Left subtree, then right subtree, then node.
    Post,
    /// Leaf nodes only, left to right.
    Leaves,
}

/// Lazy walk over a tree's elements driven by an explicit stack.
///
/// The walk borrows the tree, so it cannot outlive a mutation. Use
/// [`Traverse::restart`] to walk again from the top.
pub struct Traverse<'a, T> {
    arena: &'a [AvlNode<T>],
    root: Option<u32>,
    mode: TraversalMode,
    stack: Vec<(u32, bool)>,
    curr: Option<u32>,
}

impl<'a, T> Traverse<'a, T> {
    pub(crate) fn new(arena: &'a [AvlNode<T>], root: Option<u32>, mode: TraversalMode) -> Self {
        let mut walk = Self {
            arena,
            root,
            mode,
            stack: Vec::new(),
            curr: None,
        };
        walk.restart();
        walk
    }

    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Rewinds to the first node of the walk.
    pub fn restart(&mut self) {
        self.stack.clear();
        self.curr = None;
        match self.mode {
            TraversalMode::In => self.curr = self.root,
            _ => self.stack.extend(self.root.map(|r| (r, false))),
        }
    }

    /// Yields node handles instead of elements.
    pub fn indices(self) -> Indices<'a, T> {
        Indices(self)
    }

    fn next_index(&mut self) -> Option<u32> {
        let arena = self.arena;
        match self.mode {
            TraversalMode::Pre => {
                let (n, _) = self.stack.pop()?;
                self.stack.extend(get_r(arena, n).map(|r| (r, false)));
                self.stack.extend(get_l(arena, n).map(|l| (l, false)));
                Some(n)
            }
            TraversalMode::Leaves => {
                while let Some((n, _)) = self.stack.pop() {
                    let node = &arena[n as usize];
                    if node.is_leaf() {
                        return Some(n);
                    }
                    self.stack.extend(node.r.map(|r| (r, false)));
                    self.stack.extend(node.l.map(|l| (l, false)));
                }
                None
            }
            TraversalMode::In => {
                while let Some(c) = self.curr {
                    self.stack.push((c, false));
                    self.curr = get_l(arena, c);
                }
                let (n, _) = self.stack.pop()?;
                self.curr = get_r(arena, n);
                Some(n)
            }
            TraversalMode::Post => {
                while let Some((n, expanded)) = self.stack.pop() {
                    if expanded {
                        return Some(n);
                    }
                    self.stack.push((n, true));
                    self.stack.extend(get_r(arena, n).map(|r| (r, false)));
                    self.stack.extend(get_l(arena, n).map(|l| (l, false)));
                }
                None
            }
        }
    }
}

impl<T> Clone for Traverse<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            root: self.root,
            mode: self.mode,
            stack: self.stack.clone(),
            curr: self.curr,
        }
    }
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.next_index().map(|i| arena[i as usize].element())
    }
}

impl<T> FusedIterator for Traverse<'_, T> {}

/// Handle-yielding adapter returned by [`Traverse::indices`].
pub struct Indices<'a, T>(Traverse<'a, T>);

impl<T> Iterator for Indices<'_, T> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next_index()
    }
}

impl<T> FusedIterator for Indices<'_, T> {}
