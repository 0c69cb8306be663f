//! Error types reported by tree operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("tree is full (limit {limit})")]
    CapacityExceeded { limit: usize },
    #[error("element not found")]
    NotFound,
    #[error("an equal element is already stored")]
    Duplicate,
    #[error("node allocation failed")]
    AllocationFailed,
    #[error("limit {limit} is lower than the current size {size}")]
    InvalidLimit { limit: usize, size: usize },
    #[error("cursor belongs to another tree or predates its last modification")]
    StaleCursor,
}

/// Rejected insertion. Hands the element back to the caller untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct InsertError<T> {
    pub kind: TreeError,
    pub element: T,
}

impl<T> InsertError<T> {
    pub fn new(kind: TreeError, element: T) -> Self {
        Self { kind, element }
    }

    pub fn kind(&self) -> &TreeError {
        &self.kind
    }

    pub fn into_element(self) -> T {
        self.element
    }
}

impl<T> From<InsertError<T>> for TreeError {
    fn from(err: InsertError<T>) -> Self {
        err.kind
    }
}
