use std::cell::{Cell, RefCell};
use std::rc::Rc;

use avl_forest::{AvlTree, FnInterface};

type Log = Rc<RefCell<Vec<i32>>>;

fn cmp(a: &i32, b: &i32) -> i32 {
    a - b
}

fn logging_tree(keys: &[i32]) -> (AvlTree<i32, FnInterface<i32, fn(&i32, &i32) -> i32, impl Fn(i32)>>, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let iface = FnInterface::with_destructor(
        cmp as fn(&i32, &i32) -> i32,
        move |e: i32| sink.borrow_mut().push(e),
    );
    let mut tree = AvlTree::with_interface(iface);
    for &k in keys {
        tree.insert(k).unwrap();
    }
    (tree, log)
}

#[test]
fn remove_destroys_exactly_once_matrix() {
    let (mut tree, log) = logging_tree(&[2, 1, 3]);
    tree.remove(&2).unwrap();
    assert_eq!(*log.borrow(), vec![2]);
    assert!(tree.remove(&2).is_err());
    assert_eq!(*log.borrow(), vec![2]);
}

#[test]
fn shallow_removals_skip_destructor_matrix() {
    let (mut tree, log) = logging_tree(&[4, 2, 6, 1, 3, 5, 7]);
    assert_eq!(tree.take(&3), Some(3));
    assert_eq!(tree.pop_root(), Some(4));
    assert_eq!(tree.pop_min(), Some(1));
    assert_eq!(tree.pop_max(), Some(7));
    assert!(log.borrow().is_empty());
    tree.assert_valid().unwrap();
}

#[test]
fn rejected_insert_returns_element_matrix() {
    let (mut tree, log) = logging_tree(&[1]);
    let err = tree.insert(1).unwrap_err();
    assert_eq!(err.into_element(), 1);
    assert!(log.borrow().is_empty());

    tree.extend([1, 2]);
    assert_eq!(*log.borrow(), vec![1]);
    assert_eq!(tree.len(), 2);
}

#[test]
fn drop_destroys_in_post_order_matrix() {
    let (tree, log) = logging_tree(&[20, 10, 30, 5, 15]);
    drop(tree);
    assert_eq!(*log.borrow(), vec![5, 15, 10, 30, 20]);
}

#[test]
fn clear_destroys_everything_matrix() {
    let (mut tree, log) = logging_tree(&[2, 1, 3]);
    tree.clear();
    assert_eq!(*log.borrow(), vec![1, 3, 2]);
    assert!(tree.is_empty());
    drop(tree);
    assert_eq!(log.borrow().len(), 3);
}

#[test]
fn shallow_teardown_hands_elements_back_matrix() {
    let (tree, log) = logging_tree(&[3, 1, 2]);
    assert_eq!(tree.into_elements(), vec![1, 2, 3]);
    assert!(log.borrow().is_empty());
}

struct Tracked {
    key: i32,
    drops: Rc<Cell<usize>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn every_element_dropped_once_matrix() {
    let drops = Rc::new(Cell::new(0));
    let mut tree = AvlTree::with_comparator(|a: &Tracked, b: &Tracked| a.key - b.key);
    for key in 0..64 {
        let _ = tree.insert(Tracked {
            key,
            drops: Rc::clone(&drops),
        });
    }
    for key in (0..64).step_by(2) {
        let probe = Tracked {
            key,
            drops: Rc::clone(&drops),
        };
        tree.remove(&probe).unwrap();
    }
    // 32 removed elements plus 32 probes.
    assert_eq!(drops.get(), 64);
    tree.assert_valid().unwrap();
    drop(tree);
    assert_eq!(drops.get(), 96);
}
