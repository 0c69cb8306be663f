//! Element capabilities consumed by the trees.
//!
//! A tree is generic over an [`Interface`] fixed at construction time. The
//! interface supplies the three-way comparison that orders elements and the
//! destructor invoked exactly once for every element the tree frees.

use std::fmt;
use std::marker::PhantomData;

/// Comparison and destruction capabilities for elements of type `T`.
pub trait Interface<T> {
    /// Returns a negative number if `a < b`, zero if equal, positive if `a > b`.
    fn compare(&self, a: &T, b: &T) -> i32;

    /// Releases an element the tree no longer stores.
    fn destroy(&self, element: T) {
        drop(element);
    }
}

/// Orders elements by their [`Ord`] implementation and drops them on destroy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord> Interface<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> i32 {
        match a.cmp(b) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    }
}

/// Interface assembled from a comparator closure and a destructor closure.
pub struct FnInterface<T, C, D = fn(T)>
where
    C: Fn(&T, &T) -> i32,
    D: Fn(T),
{
    compare: C,
    destroy: D,
    _element: PhantomData<fn(T)>,
}

impl<T, C> FnInterface<T, C, fn(T)>
where
    C: Fn(&T, &T) -> i32,
{
    /// Comparator only; removed elements are dropped.
    pub fn new(compare: C) -> Self {
        Self::with_destructor(compare, drop::<T>)
    }
}

impl<T, C, D> FnInterface<T, C, D>
where
    C: Fn(&T, &T) -> i32,
    D: Fn(T),
{
    pub fn with_destructor(compare: C, destroy: D) -> Self {
        Self {
            compare,
            destroy,
            _element: PhantomData,
        }
    }
}

impl<T, C, D> Interface<T> for FnInterface<T, C, D>
where
    C: Fn(&T, &T) -> i32,
    D: Fn(T),
{
    fn compare(&self, a: &T, b: &T) -> i32 {
        (self.compare)(a, b)
    }

    fn destroy(&self, element: T) {
        (self.destroy)(element)
    }
}

impl<T, C, D> fmt::Debug for FnInterface<T, C, D>
where
    C: Fn(&T, &T) -> i32,
    D: Fn(T),
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnInterface").finish_non_exhaustive()
    }
}
