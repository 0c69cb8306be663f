use std::collections::BTreeSet;

use avl_forest::{AvlTree, TraversalMode, TreeError};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    PopRoot,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u16..128).prop_map(Op::Insert),
        3 => (0u16..128).prop_map(Op::Remove),
        1 => Just(Op::PopRoot),
    ]
}

/// Tallest AVL tree that `n` nodes can form: the sparsest AVL tree of
/// height `h` has `N(h) = N(h - 1) + N(h - 2) + 1` nodes.
fn max_avl_height(n: usize) -> usize {
    let (mut prev, mut curr, mut h) = (0usize, 1usize, 1usize);
    if n == 0 {
        return 0;
    }
    while prev + curr + 1 <= n {
        let next = prev + curr + 1;
        prev = curr;
        curr = next;
        h += 1;
    }
    h
}

proptest! {
    #[test]
    fn random_ops_keep_invariants(ops in prop::collection::vec(op(), 0..200)) {
        let mut tree = AvlTree::new();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    let fresh = model.insert(k);
                    let res = tree.insert(k);
                    prop_assert_eq!(res.is_ok(), fresh);
                    if !fresh {
                        prop_assert_eq!(res.unwrap_err().kind, TreeError::Duplicate);
                    }
                }
                Op::Remove(k) => {
                    let present = model.remove(&k);
                    let res = tree.remove(&k);
                    prop_assert_eq!(res.is_ok(), present);
                }
                Op::PopRoot => {
                    let popped = tree.pop_root();
                    prop_assert_eq!(popped.is_some(), !model.is_empty());
                    if let Some(k) = popped {
                        prop_assert!(model.remove(&k));
                    }
                }
            }
            prop_assert!(tree.assert_valid().is_ok(), "{:?}", tree.assert_valid());
            prop_assert_eq!(tree.len(), model.len());
            prop_assert!(tree.height() <= max_avl_height(tree.len()));
        }

        let ordered: Vec<u16> = tree.iter().copied().collect();
        let expected: Vec<u16> = model.iter().copied().collect();
        prop_assert_eq!(ordered, expected);
        prop_assert_eq!(tree.min(), model.iter().next());
        prop_assert_eq!(tree.max(), model.iter().next_back());
    }

    #[test]
    fn in_order_is_strictly_ascending(keys in prop::collection::hash_set(any::<i32>(), 0..300)) {
        let tree: AvlTree<i32> = keys.iter().copied().collect();
        let ordered: Vec<i32> = tree.traverse(TraversalMode::In).copied().collect();
        prop_assert_eq!(ordered.len(), keys.len());
        prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn insert_then_remove_restores_contents(
        keys in prop::collection::btree_set(0i32..1000, 0..100),
        extra in 1000i32..2000,
    ) {
        let mut tree: AvlTree<i32> = keys.iter().copied().collect();
        let before: Vec<i32> = tree.iter().copied().collect();
        let len = tree.len();

        tree.insert(extra).unwrap();
        prop_assert!(tree.contains(&extra));
        tree.remove(&extra).unwrap();

        prop_assert!(tree.assert_valid().is_ok());
        prop_assert_eq!(tree.len(), len);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
    }

    #[test]
    fn removing_absent_key_changes_nothing(
        keys in prop::collection::btree_set(0i32..500, 1..100),
        probe in 500i32..600,
    ) {
        let mut tree: AvlTree<i32> = keys.iter().copied().collect();
        let version = tree.version();
        let pre: Vec<i32> = tree.traverse(TraversalMode::Pre).copied().collect();

        prop_assert_eq!(tree.remove(&probe), Err(TreeError::NotFound));
        prop_assert_eq!(tree.version(), version);
        prop_assert_eq!(tree.traverse(TraversalMode::Pre).copied().collect::<Vec<_>>(), pre);
    }
}
