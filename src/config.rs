//! Sizing of the node arena backing a tree.

/// Arena configuration shared by `IntervalSet` and `IntervalIndex`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Number of node slots reserved up front.
    pub initial_capacity: usize,
    /// Largest number of live nodes, `None` for the limit of the index type.
    pub max_nodes: Option<usize>,
}

impl Config {
    /// Create the default configuration: no reservation, no limit
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}
