//! Node trait definitions.
//!
//! Every "pointer" in this crate is an `Option<u32>` index into a
//! [`Vec`]-backed arena owned by the tree. Tree-manipulation functions take
//! the arena as a slice and work with indices, so a parent link is a plain
//! index lookup and can never dangle after a rotation reparents a subtree.

/// Structural links (`p`, `l`, `r`).
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// Node that carries an element.
///
/// A live node always holds its element. The element slot is only empty
/// while two nodes exchange elements during deletion, or once the node
/// has been released back to the arena.
pub trait ElementNode<T>: Node {
    fn element(&self) -> &T;
    fn take_element(&mut self) -> Option<T>;
    fn put_element(&mut self, element: T);
}
