use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::config::{normalize_limit, TreeConfig};
use crate::error::{InsertError, TreeError};
use crate::interface::{FnInterface, Interface, Natural};
use crate::types::ElementNode;
use crate::util::{self, first, last, next, prev};

use super::cursor::Cursor;
use super::traverse::{Traverse, TraversalMode};
use super::types::AvlNode;
use super::util::{assert_avl_tree, height_of, insert_left, insert_right, remove, Removal};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Self-balancing binary search tree of unique elements.
///
/// Nodes live in an arena owned by the tree and are addressed by stable
/// `u32` handles. A handle stays valid until the element it refers to is
/// removed; removing a node with two children also moves its in-order
/// successor into the removed node's slot, so handles should be treated as
/// invalid after any mutation (see [`AvlTree::version`]).
pub struct AvlTree<T, I = Natural>
where
    I: Interface<T>,
{
    arena: Vec<AvlNode<T>>,
    free: Vec<u32>,
    root: Option<u32>,
    len: usize,
    limit: Option<usize>,
    version: u64,
    id: u64,
    interface: I,
}

impl<T: Ord> AvlTree<T, Natural> {
    pub fn new() -> Self {
        Self::with_interface(Natural)
    }
}

impl<T: Ord> Default for AvlTree<T, Natural> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> AvlTree<T, FnInterface<T, C>>
where
    C: Fn(&T, &T) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_interface(FnInterface::new(comparator))
    }
}

impl<T, I> AvlTree<T, I>
where
    I: Interface<T>,
{
    pub fn with_interface(interface: I) -> Self {
        Self::with_config(interface, TreeConfig::default())
    }

    pub fn with_config(interface: I, config: TreeConfig) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
            limit: normalize_limit(config.limit),
            version: 0,
            id: NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed),
            interface,
        }
    }

    #[inline]
    fn compare(&self, a: &T, b: &T) -> i32 {
        self.interface.compare(a, b)
    }

    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|l| self.len >= l)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Sets the maximum number of elements. `None` or `Some(0)` lifts the limit.
    pub fn set_limit(&mut self, limit: Option<usize>) -> Result<(), TreeError> {
        let limit = normalize_limit(limit);
        if let Some(l) = limit {
            if l < self.len {
                return Err(TreeError::InvalidLimit {
                    limit: l,
                    size: self.len,
                });
            }
        }
        debug!(?limit, size = self.len, "avl tree limit changed");
        self.limit = limit;
        Ok(())
    }

    /// Structural modification counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn height(&self) -> usize {
        height_of(&self.arena, self.root) as usize
    }

    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Swaps in a new interface and returns the previous one.
    ///
    /// Existing nodes are not re-sorted: on a non-empty tree the new
    /// comparator must induce the same order as the old one.
    pub fn reconfigure(&mut self, interface: I) -> I {
        if self.len > 0 {
            warn!(size = self.len, "avl tree interface replaced on a non-empty tree");
        } else {
            debug!("avl tree interface replaced");
        }
        std::mem::replace(&mut self.interface, interface)
    }

    pub fn root_index(&self) -> Option<u32> {
        self.root
    }

    /// Node at `idx`, if the handle refers to a live node.
    pub fn node(&self, idx: u32) -> Option<&AvlNode<T>> {
        self.arena.get(idx as usize).filter(|n| n.is_live())
    }

    fn is_live(&self, idx: u32) -> bool {
        self.node(idx).is_some()
    }

    /// Element at `idx`, if the handle refers to a live node.
    pub fn get(&self, idx: u32) -> Option<&T> {
        self.arena.get(idx as usize).and_then(|n| n.get())
    }

    pub fn find(&self, element: &T) -> Option<u32> {
        util::find(
            &self.arena,
            self.root,
            element,
            |n| n.element(),
            |a, b| self.compare(a, b),
        )
    }

    pub fn first(&self) -> Option<u32> {
        first(&self.arena, self.root)
    }

    pub fn last(&self) -> Option<u32> {
        last(&self.arena, self.root)
    }

    /// In-order successor of `curr`. `None` for handles that are not live.
    pub fn next(&self, curr: u32) -> Option<u32> {
        if !self.is_live(curr) {
            return None;
        }
        next(&self.arena, curr)
    }

    /// In-order predecessor of `curr`. `None` for handles that are not live.
    pub fn prev(&self, curr: u32) -> Option<u32> {
        if !self.is_live(curr) {
            return None;
        }
        prev(&self.arena, curr)
    }

    pub fn contains(&self, element: &T) -> bool {
        self.find(element).is_some()
    }

    /// Element stored at the root.
    pub fn peek(&self) -> Option<&T> {
        self.root.and_then(|i| self.get(i))
    }

    pub fn min(&self) -> Option<&T> {
        self.first().and_then(|i| self.get(i))
    }

    pub fn max(&self) -> Option<&T> {
        self.last().and_then(|i| self.get(i))
    }

    /// Equal element, or the greatest element below `element`.
    pub fn get_or_next_lower(&self, element: &T) -> Option<&T> {
        util::find_or_next_lower(
            &self.arena,
            self.root,
            element,
            |n| n.element(),
            |a, b| self.compare(a, b),
        )
        .and_then(|i| self.get(i))
    }

    /// Equal element, or the smallest element above `element`.
    pub fn get_or_next_higher(&self, element: &T) -> Option<&T> {
        util::find_or_next_higher(
            &self.arena,
            self.root,
            element,
            |n| n.element(),
            |a, b| self.compare(a, b),
        )
        .and_then(|i| self.get(i))
    }

    fn alloc(&mut self, element: T) -> Result<u32, InsertError<T>> {
        if let Some(idx) = self.free.pop() {
            self.arena[idx as usize].reset(element);
            return Ok(idx);
        }
        let idx = match u32::try_from(self.arena.len()) {
            Ok(idx) if idx < u32::MAX => idx,
            _ => return Err(InsertError::new(TreeError::AllocationFailed, element)),
        };
        if self.arena.try_reserve(1).is_err() {
            return Err(InsertError::new(TreeError::AllocationFailed, element));
        }
        self.arena.push(AvlNode::new(element));
        Ok(idx)
    }

    /// Inserts `element` and returns the handle of its node.
    ///
    /// Fails without touching the tree when it is full, when an equal
    /// element is already stored, or when no node can be allocated. The
    /// rejected element is handed back inside the error.
    pub fn insert(&mut self, element: T) -> Result<u32, InsertError<T>> {
        if let Some(limit) = self.limit {
            if self.len >= limit {
                return Err(InsertError::new(
                    TreeError::CapacityExceeded { limit },
                    element,
                ));
            }
        }

        let Some(root) = self.root else {
            let idx = self.alloc(element)?;
            self.root = Some(idx);
            self.len = 1;
            self.bump();
            trace!(node = idx, "avl insert root");
            return Ok(idx);
        };

        let mut curr = root;
        let go_left = loop {
            let cmp = self.compare(self.arena[curr as usize].element(), &element);
            if cmp == 0 {
                return Err(InsertError::new(TreeError::Duplicate, element));
            }
            let child = if cmp > 0 {
                self.arena[curr as usize].l
            } else {
                self.arena[curr as usize].r
            };
            match child {
                Some(c) => curr = c,
                None => break cmp > 0,
            }
        };

        let idx = self.alloc(element)?;
        let root = if go_left {
            insert_left(&mut self.arena, root, idx, curr)
        } else {
            insert_right(&mut self.arena, root, idx, curr)
        };
        self.root = Some(root);
        self.len += 1;
        self.bump();
        trace!(node = idx, parent = curr, size = self.len, "avl insert");
        Ok(idx)
    }

    /// Unlinks the node at `idx` and returns its element without destroying it.
    fn unlink(&mut self, idx: u32) -> Option<T> {
        let root = self.root?;
        let Removal { root, unlinked } = remove::<T, _>(&mut self.arena, root, idx);
        self.root = root;
        self.len -= 1;
        self.bump();
        self.free.push(unlinked);
        trace!(node = idx, unlinked, size = self.len, "avl remove");
        self.arena[unlinked as usize].release()
    }

    /// Removes the element equal to `element` and passes it to the destructor.
    pub fn remove(&mut self, element: &T) -> Result<(), TreeError> {
        let removed = self.take(element).ok_or(TreeError::NotFound)?;
        self.interface.destroy(removed);
        Ok(())
    }

    /// Removes the element equal to `element` and returns it to the caller.
    ///
    /// The destructor is not invoked.
    pub fn take(&mut self, element: &T) -> Option<T> {
        let idx = self.find(element)?;
        self.unlink(idx)
    }

    /// Removes the root element and returns it.
    pub fn pop_root(&mut self) -> Option<T> {
        let idx = self.root?;
        self.unlink(idx)
    }

    pub fn pop_min(&mut self) -> Option<T> {
        let idx = self.first()?;
        self.unlink(idx)
    }

    pub fn pop_max(&mut self) -> Option<T> {
        let idx = self.last()?;
        self.unlink(idx)
    }

    /// Destroys every element and empties the tree. The limit is kept.
    pub fn clear(&mut self) {
        for element in self.drain_post_order() {
            self.interface.destroy(element);
        }
    }

    /// Takes every element out in post-order, children before parents.
    fn drain_post_order(&mut self) -> Vec<T> {
        let order: Vec<u32> = Traverse::new(&self.arena, self.root, TraversalMode::Post)
            .indices()
            .collect();
        let out = order
            .into_iter()
            .filter_map(|i| self.arena[i as usize].release())
            .collect();
        self.reset_storage();
        out
    }

    fn reset_storage(&mut self) {
        let had_nodes = self.root.is_some();
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
        if had_nodes {
            self.bump();
        }
    }

    /// Empties the tree, returning the elements in ascending order without
    /// invoking the destructor.
    pub fn into_elements(mut self) -> Vec<T> {
        let order: Vec<u32> = Traverse::new(&self.arena, self.root, TraversalMode::In)
            .indices()
            .collect();
        let out = order
            .into_iter()
            .filter_map(|i| self.arena[i as usize].release())
            .collect();
        self.reset_storage();
        out
    }

    pub fn traverse(&self, mode: TraversalMode) -> Traverse<'_, T> {
        Traverse::new(&self.arena, self.root, mode)
    }

    /// Ascending iteration.
    pub fn iter(&self) -> Traverse<'_, T> {
        self.traverse(TraversalMode::In)
    }

    pub fn for_each<G: FnMut(u32, &T)>(&self, mut f: G) {
        let mut curr = self.first();
        while let Some(i) = curr {
            f(i, self.arena[i as usize].element());
            curr = self.next(i);
        }
    }

    pub fn cursor_first(&self) -> Cursor {
        Cursor::new(self.first(), self.id, self.version)
    }

    pub fn cursor_last(&self) -> Cursor {
        Cursor::new(self.last(), self.id, self.version)
    }

    /// Cursor positioned at the element equal to `element`, or past the end.
    pub fn cursor_at(&self, element: &T) -> Cursor {
        Cursor::new(self.find(element), self.id, self.version)
    }

    /// Rejects cursors taken from another tree or before the last mutation.
    fn check(&self, cursor: &Cursor) -> Result<(), TreeError> {
        if cursor.tree() != self.id || cursor.version() != self.version {
            return Err(TreeError::StaleCursor);
        }
        match cursor.position() {
            Some(i) if !self.is_live(i) => Err(TreeError::StaleCursor),
            _ => Ok(()),
        }
    }

    /// Element under the cursor.
    pub fn cursor_get(&self, cursor: &Cursor) -> Result<Option<&T>, TreeError> {
        self.check(cursor)?;
        Ok(cursor.position().and_then(|i| self.get(i)))
    }

    /// Returns the element under the cursor and moves it forward.
    pub fn advance(&self, cursor: &mut Cursor) -> Result<Option<&T>, TreeError> {
        self.check(cursor)?;
        let Some(i) = cursor.position() else {
            return Ok(None);
        };
        cursor.set_position(self.next(i));
        Ok(self.get(i))
    }

    /// Returns the element under the cursor and moves it backward.
    pub fn retreat(&self, cursor: &mut Cursor) -> Result<Option<&T>, TreeError> {
        self.check(cursor)?;
        let Some(i) = cursor.position() else {
            return Ok(None);
        };
        cursor.set_position(self.prev(i));
        Ok(self.get(i))
    }

    /// Verifies every structural invariant of the tree.
    pub fn assert_valid(&self) -> Result<(), String> {
        if self.root.is_none() != (self.len == 0) {
            return Err(format!(
                "Root presence does not match size {}",
                self.len
            ));
        }
        assert_avl_tree(&self.arena, self.root, &|a: &T, b: &T| self.compare(a, b))?;
        let reachable = util::size(&self.arena, self.root);
        if reachable != self.len {
            return Err(format!(
                "Size mismatch: counted {reachable}, recorded {}",
                self.len
            ));
        }
        let live = self.arena.iter().filter(|n| n.is_live()).count();
        if live != self.len {
            return Err(format!("Leaked nodes: {live} live, {} stored", self.len));
        }
        Ok(())
    }
}

impl<T, I> Drop for AvlTree<T, I>
where
    I: Interface<T>,
{
    fn drop(&mut self) {
        for element in self.drain_post_order() {
            self.interface.destroy(element);
        }
    }
}

impl<T, I> fmt::Debug for AvlTree<T, I>
where
    I: Interface<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvlTree")
            .field("len", &self.len)
            .field("limit", &self.limit)
            .field("height", &self.height())
            .field("version", &self.version)
            .finish()
    }
}

impl<T: Ord> FromIterator<T> for AvlTree<T, Natural> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

/// Duplicates are skipped, as are elements past the limit.
impl<T, I> Extend<T> for AvlTree<T, I>
where
    I: Interface<T>,
{
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        for element in iter {
            if let Err(err) = self.insert(element) {
                self.interface.destroy(err.into_element());
            }
        }
    }
}

impl<T, I> IntoIterator for AvlTree<T, I>
where
    I: Interface<T>,
{
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_elements().into_iter()
    }
}

impl<'a, T, I> IntoIterator for &'a AvlTree<T, I>
where
    I: Interface<T>,
{
    type Item = &'a T;
    type IntoIter = Traverse<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
