//! Construction-time tree options.

/// Options applied when a tree is created.
///
/// A limit of `0` is treated the same as no limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    pub limit: Option<usize>,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = normalize_limit(Some(limit));
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.limit = None;
        self
    }
}

#[inline]
pub(crate) fn normalize_limit(limit: Option<usize>) -> Option<usize> {
    limit.filter(|&l| l > 0)
}
