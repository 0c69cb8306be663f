//! Arena-level AVL algorithms: height bookkeeping, rotations, the upward
//! rebalance walk, leaf linking and node unlinking.
//!
//! Everything here is allocation-free. Functions receive the current root
//! and return the root after any rotation that may have replaced it.

use tracing::trace;

use crate::types::{ElementNode, Node};
use crate::util::{first, get_l, get_p, get_r, next, set_l, set_p, set_r};

use super::types::AvlNodeLike;

#[inline]
pub fn height_of<N: AvlNodeLike>(arena: &[N], node: Option<u32>) -> i32 {
    node.map_or(0, |i| arena[i as usize].height())
}

/// Recomputes the cached height of `node` from its children.
#[inline]
pub fn update_height<N: AvlNodeLike>(arena: &mut [N], node: u32) {
    let h = 1 + height_of(arena, get_l(arena, node)).max(height_of(arena, get_r(arena, node)));
    arena[node as usize].set_height(h);
}

/// `height(right) - height(left)`.
#[inline]
pub fn balance<N: AvlNodeLike>(arena: &[N], node: u32) -> i32 {
    height_of(arena, get_r(arena, node)) - height_of(arena, get_l(arena, node))
}

/// Points whichever child slot of `p` held `old` at `new`.
#[inline]
fn replace_child<N: Node>(arena: &mut [N], p: Option<u32>, old: u32, new: Option<u32>) {
    if let Some(p) = p {
        if get_l(arena, p) == Some(old) {
            set_l(arena, p, new);
        } else {
            set_r(arena, p, new);
        }
    }
}

/// Rotates the subtree rooted at `z` to the left and returns its new root.
///
/// ```text
///    z                y
///   / \             /   \
///  a   y    -->    z     c
///     / \         / \
///    b   c       a   b
/// ```
pub fn rotate_left<N: AvlNodeLike>(arena: &mut [N], z: u32) -> u32 {
    let y = get_r(arena, z).expect("left rotation needs a right child");
    let p = get_p(arena, z);
    let b = get_l(arena, y);

    set_r(arena, z, b);
    if let Some(b) = b {
        set_p(arena, b, Some(z));
    }
    set_l(arena, y, Some(z));
    set_p(arena, z, Some(y));
    set_p(arena, y, p);
    replace_child(arena, p, z, Some(y));

    update_height(arena, z);
    update_height(arena, y);
    if let Some(p) = p {
        update_height(arena, p);
    }
    trace!(pivot = z, new_root = y, "avl rotate left");
    y
}

/// Rotates the subtree rooted at `z` to the right and returns its new root.
///
/// ```text
///      z            y
///     / \         /   \
///    y   c  -->  a     z
///   / \               / \
///  a   b             b   c
/// ```
pub fn rotate_right<N: AvlNodeLike>(arena: &mut [N], z: u32) -> u32 {
    let y = get_l(arena, z).expect("right rotation needs a left child");
    let p = get_p(arena, z);
    let b = get_r(arena, y);

    set_l(arena, z, b);
    if let Some(b) = b {
        set_p(arena, b, Some(z));
    }
    set_r(arena, y, Some(z));
    set_p(arena, z, Some(y));
    set_p(arena, y, p);
    replace_child(arena, p, z, Some(y));

    update_height(arena, z);
    update_height(arena, y);
    if let Some(p) = p {
        update_height(arena, p);
    }
    trace!(pivot = z, new_root = y, "avl rotate right");
    y
}

/// Restores heights and balance from `start` up to the root.
///
/// Returns the root of the whole tree, which changes when a rotation
/// happens at the topmost node.
pub fn rebalance<N: AvlNodeLike>(arena: &mut [N], root: u32, start: u32) -> u32 {
    let mut root = root;
    let mut curr = Some(start);
    let mut rotations = 0u32;

    while let Some(n) = curr {
        update_height(arena, n);
        let bf = balance(arena, n);
        let mut top = n;

        if bf >= 2 {
            let child = get_r(arena, n).expect("right-heavy node has a right child");
            if height_of(arena, get_l(arena, child)) > height_of(arena, get_r(arena, child)) {
                rotate_right(arena, child);
                rotations += 1;
            }
            top = rotate_left(arena, n);
            rotations += 1;
        } else if bf <= -2 {
            let child = get_l(arena, n).expect("left-heavy node has a left child");
            if height_of(arena, get_r(arena, child)) > height_of(arena, get_l(arena, child)) {
                rotate_left(arena, child);
                rotations += 1;
            }
            top = rotate_right(arena, n);
            rotations += 1;
        }

        curr = get_p(arena, top);
        if curr.is_none() {
            root = top;
        }
    }

    trace!(start, root, rotations, "avl rebalance walk done");
    root
}

/// Links detached node `n` as the left child of `parent` and rebalances.
pub fn insert_left<N: AvlNodeLike>(arena: &mut [N], root: u32, n: u32, parent: u32) -> u32 {
    debug_assert!(get_l(arena, parent).is_none());
    set_l(arena, parent, Some(n));
    set_p(arena, n, Some(parent));
    rebalance(arena, root, n)
}

/// Links detached node `n` as the right child of `parent` and rebalances.
pub fn insert_right<N: AvlNodeLike>(arena: &mut [N], root: u32, n: u32, parent: u32) -> u32 {
    debug_assert!(get_r(arena, parent).is_none());
    set_r(arena, parent, Some(n));
    set_p(arena, n, Some(parent));
    rebalance(arena, root, n)
}

/// Outcome of [`remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    /// Root of the tree after the removal.
    pub root: Option<u32>,
    /// Node that was physically unlinked. It holds the removed element.
    pub unlinked: u32,
}

/// Removes the element stored at `n` from the tree rooted at `root`.
///
/// A node with two children keeps its position: it receives the in-order
/// successor's element and the successor node is unlinked instead. Either
/// way, [`Removal::unlinked`] is fully detached and carries the element
/// that was at `n` when the call started.
pub fn remove<T, N>(arena: &mut [N], root: u32, n: u32) -> Removal
where
    N: AvlNodeLike + ElementNode<T>,
{
    let victim = match (get_l(arena, n), get_r(arena, n)) {
        (Some(_), Some(r)) => {
            let succ = first(arena, Some(r)).expect("right subtree is non-empty");
            let succ_el = arena[succ as usize].take_element();
            let target_el = arena[n as usize].take_element();
            if let Some(e) = succ_el {
                arena[n as usize].put_element(e);
            }
            if let Some(e) = target_el {
                arena[succ as usize].put_element(e);
            }
            succ
        }
        _ => n,
    };

    // `victim` has at most one child here.
    let child = get_l(arena, victim).or(get_r(arena, victim));
    let p = get_p(arena, victim);
    if let Some(c) = child {
        set_p(arena, c, p);
    }
    replace_child(arena, p, victim, child);
    set_p(arena, victim, None);
    set_l(arena, victim, None);
    set_r(arena, victim, None);
    arena[victim as usize].set_height(1);

    let root = match p {
        Some(p) => Some(rebalance(arena, root, p)),
        None => child,
    };
    Removal {
        root,
        unlinked: victim,
    }
}

/// Checks links, cached heights, balance and ordering of the tree at `root`.
pub fn assert_avl_tree<T, N, C>(arena: &[N], root: Option<u32>, comparator: &C) -> Result<(), String>
where
    N: AvlNodeLike + ElementNode<T>,
    C: Fn(&T, &T) -> i32,
{
    let Some(root) = root else {
        return Ok(());
    };

    if get_p(arena, root).is_some() {
        return Err("Root has parent".to_string());
    }

    fn validate<N: AvlNodeLike>(arena: &[N], node: u32) -> Result<i32, String> {
        let l = get_l(arena, node);
        let r = get_r(arena, node);

        let lh = match l {
            Some(l) => {
                if get_p(arena, l) != Some(node) {
                    return Err(format!("Broken parent link on left child of {node}"));
                }
                validate(arena, l)?
            }
            None => 0,
        };
        let rh = match r {
            Some(r) => {
                if get_p(arena, r) != Some(node) {
                    return Err(format!("Broken parent link on right child of {node}"));
                }
                validate(arena, r)?
            }
            None => 0,
        };

        let expected = 1 + lh.max(rh);
        let actual = arena[node as usize].height();
        if actual != expected {
            return Err(format!(
                "Height mismatch at {node}: expected {expected}, got {actual}"
            ));
        }
        if !(-1..=1).contains(&(rh - lh)) {
            return Err(format!("AVL balance violated at {node}: {}", rh - lh));
        }
        Ok(expected)
    }

    validate(arena, root)?;

    let mut curr = first(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            let cmp = comparator(arena[prev as usize].element(), arena[i as usize].element());
            if cmp >= 0 {
                return Err("Node order violated".to_string());
            }
        }
        prev_node = Some(i);
        curr = next(arena, i);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avl::types::AvlNode;

    fn cmp(a: &i32, b: &i32) -> i32 {
        a - b
    }

    fn chain(keys: &[i32], right: bool) -> Vec<AvlNode<i32>> {
        let mut arena: Vec<AvlNode<i32>> = keys.iter().map(|&k| AvlNode::new(k)).collect();
        for i in 1..arena.len() {
            let parent = (i - 1) as u32;
            if right {
                arena[i - 1].r = Some(i as u32);
            } else {
                arena[i - 1].l = Some(i as u32);
            }
            arena[i].p = Some(parent);
        }
        for i in (0..arena.len()).rev() {
            update_height(&mut arena, i as u32);
        }
        arena
    }

    #[test]
    fn height_convention() {
        let arena = chain(&[1], true);
        assert_eq!(height_of(&arena, None), 0);
        assert_eq!(height_of(&arena, Some(0)), 1);
        let arena = chain(&[1, 2, 3], true);
        assert_eq!(height_of(&arena, Some(0)), 3);
        assert_eq!(balance(&arena, 0), 2);
    }

    #[test]
    fn single_left_rotation_at_root() {
        let mut arena = chain(&[10, 20, 30], true);
        let root = rotate_left(&mut arena, 0);
        assert_eq!(root, 1);
        assert_eq!(arena[1].p, None);
        assert_eq!(arena[1].l, Some(0));
        assert_eq!(arena[1].r, Some(2));
        assert_eq!(arena[0].p, Some(1));
        assert_eq!(arena[0].r, None);
        assert_eq!(arena[1].height, 2);
        assert_eq!(arena[0].height, 1);
        assert_avl_tree(&arena, Some(1), &cmp).unwrap();
    }

    #[test]
    fn single_right_rotation_at_root() {
        let mut arena = chain(&[30, 20, 10], false);
        let root = rotate_right(&mut arena, 0);
        assert_eq!(root, 1);
        assert_eq!(arena[1].l, Some(2));
        assert_eq!(arena[1].r, Some(0));
        assert_avl_tree(&arena, Some(1), &cmp).unwrap();
    }

    #[test]
    fn rotation_repoints_parent_slot() {
        // 5 -> r: 10 -> r: 20 -> r: 30; rotate at 10.
        let mut arena = chain(&[5, 10, 20, 30], true);
        let sub = rotate_left(&mut arena, 1);
        assert_eq!(sub, 2);
        assert_eq!(arena[0].r, Some(2));
        assert_eq!(arena[2].p, Some(0));
        assert_eq!(arena[0].height, 3);
    }

    #[test]
    fn rebalance_resolves_zig_zag() {
        // 30 -> l: 10 -> r: 20
        let mut arena = vec![AvlNode::new(30), AvlNode::new(10), AvlNode::new(20)];
        arena[0].l = Some(1);
        arena[1].p = Some(0);
        arena[1].r = Some(2);
        arena[2].p = Some(1);
        let root = rebalance(&mut arena, 0, 2);
        assert_eq!(root, 2);
        assert_eq!(arena[2].l, Some(1));
        assert_eq!(arena[2].r, Some(0));
        assert_avl_tree(&arena, Some(root), &cmp).unwrap();
    }

    #[test]
    fn remove_two_children_moves_successor_element() {
        let mut arena = vec![AvlNode::new(20), AvlNode::new(10), AvlNode::new(30)];
        arena[0].l = Some(1);
        arena[0].r = Some(2);
        arena[1].p = Some(0);
        arena[2].p = Some(0);
        update_height(&mut arena, 0);

        let out = remove::<i32, _>(&mut arena, 0, 0);
        assert_eq!(out.root, Some(0));
        assert_eq!(out.unlinked, 2);
        assert_eq!(*arena[0].element(), 30);
        assert_eq!(*arena[2].element(), 20);
        assert_eq!(arena[0].r, None);
        assert_eq!(arena[0].height, 2);
        assert_avl_tree(&arena, out.root, &cmp).unwrap();
    }

    #[test]
    fn validation_reports_stale_height() {
        let mut arena = chain(&[10, 20], true);
        arena[0].height = 5;
        assert!(assert_avl_tree(&arena, Some(0), &cmp).is_err());
    }
}
