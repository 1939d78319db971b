//! Error types returned by the mutating operations of the trees.

use thiserror::Error;

/// Result type alias using the crate [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when modifying an `IntervalSet` or `IntervalIndex`.
///
/// A failed operation never leaves a partial modification behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The low bound of a range is greater than its high bound.
    #[error("invalid range: low bound is greater than high bound")]
    InvalidRange,

    /// The node arena has no room for another node.
    #[error("node arena exhausted: capacity is {capacity} nodes")]
    CapacityExhausted { capacity: usize },
}
