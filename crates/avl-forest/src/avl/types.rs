use crate::types::{ElementNode, Node};

/// AVL tree node stored in the tree's arena.
///
/// Heights follow the "leaf = 1, absent child = 0" convention.
#[derive(Clone, Debug)]
pub struct AvlNode<T> {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub height: i32,
    // Option so an element can leave the arena by value without moving the
    // node itself; `None` marks a released slot.
    element: Option<T>,
}

impl<T> AvlNode<T> {
    pub fn new(element: T) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            height: 1,
            element: Some(element),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.l.is_none() && self.r.is_none()
    }

    pub(crate) fn is_live(&self) -> bool {
        self.element.is_some()
    }

    pub(crate) fn get(&self) -> Option<&T> {
        self.element.as_ref()
    }

    /// Resets links and height so the slot can be reused.
    pub(crate) fn reset(&mut self, element: T) {
        self.p = None;
        self.l = None;
        self.r = None;
        self.height = 1;
        self.element = Some(element);
    }

    /// Detaches the slot from the tree and hands back whatever it held.
    pub(crate) fn release(&mut self) -> Option<T> {
        self.p = None;
        self.l = None;
        self.r = None;
        self.height = 0;
        self.element.take()
    }
}

impl<T> Node for AvlNode<T> {
    fn p(&self) -> Option<u32> {
        self.p
    }

    fn l(&self) -> Option<u32> {
        self.l
    }

    fn r(&self) -> Option<u32> {
        self.r
    }

    fn set_p(&mut self, v: Option<u32>) {
        self.p = v;
    }

    fn set_l(&mut self, v: Option<u32>) {
        self.l = v;
    }

    fn set_r(&mut self, v: Option<u32>) {
        self.r = v;
    }
}

impl<T> ElementNode<T> for AvlNode<T> {
    fn element(&self) -> &T {
        self.element.as_ref().expect("live node holds an element")
    }

    fn take_element(&mut self) -> Option<T> {
        self.element.take()
    }

    fn put_element(&mut self, element: T) {
        self.element = Some(element);
    }
}

/// AVL-specific node behavior.
pub trait AvlNodeLike: Node {
    fn height(&self) -> i32;
    fn set_height(&mut self, height: i32);
}

impl<T> AvlNodeLike for AvlNode<T> {
    fn height(&self) -> i32 {
        self.height
    }

    fn set_height(&mut self, height: i32) {
        self.height = height;
    }
}
