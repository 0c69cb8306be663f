/// Detached in-order position in an [`AvlTree`](super::AvlTree).
///
/// A cursor does not borrow the tree. It records which tree it came from and
/// that tree's version when it was taken. Cursor operations fail with
/// [`TreeError::StaleCursor`](crate::TreeError::StaleCursor) on any other
/// tree, or once the tree has been structurally modified since.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    node: Option<u32>,
    tree: u64,
    version: u64,
}

impl Cursor {
    pub(crate) fn new(node: Option<u32>, tree: u64, version: u64) -> Self {
        Self {
            node,
            tree,
            version,
        }
    }

    /// Handle of the node under the cursor, `None` once past either end.
    pub fn position(&self) -> Option<u32> {
        self.node
    }

    pub fn is_accessible(&self) -> bool {
        self.node.is_some()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn tree(&self) -> u64 {
        self.tree
    }

    pub(crate) fn set_position(&mut self, node: Option<u32>) {
        self.node = node;
    }
}
