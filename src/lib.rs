//! `avl_interval_set` stores sets of discrete values as balanced trees of closed intervals.
//!
//! [`IntervalSet`] keeps its intervals disjoint and non-adjacent: an insertion merges the new
//! range with every stored interval it overlaps or touches, and a removal trims or splits
//! them. It is a discrete interval encoding tree kept balanced with AVL rotations.
//!
//! [`IntervalIndex`] keeps every inserted interval, each with a value, and augments the same
//! AVL skeleton with the largest high bound of every subtree to answer overlap queries in
//! time proportional to the height of the tree.
//!
//! Nodes of both trees live in an arena and are addressed by [`NodeIndex`], so the trees are
//! `Send` whenever their contents are, and a full arena is reported as
//! [`Error::CapacityExhausted`] instead of aborting.
//!
//! # Example
//!
//! ```rust
//! use avl_interval_set::{Interval, IntervalIndex, IntervalSet};
//!
//! let mut set = IntervalSet::new();
//! for x in [2, 4, 6, 8] {
//!     set.insert(x, x).unwrap();
//! }
//! set.insert(3, 7).unwrap();
//! assert_eq!(set.iter().collect::<Vec<_>>(), [&Interval::new(2, 8)]);
//!
//! let mut index = IntervalIndex::new();
//! index.insert(1, 3, 'a').unwrap();
//! let b = index.insert(5, 8, 'b').unwrap();
//! let c = index.insert(2, 6, 'c').unwrap();
//! assert_eq!(index.find_all_overlaps(4, 4), [c]);
//! let mut found = index.find_all_overlaps(4, 5);
//! found.sort();
//! assert_eq!(found, [b, c]);
//! ```

mod arena;
mod config;
mod error;
mod index;
mod interval;
mod intervalindex;
mod intervalset;
mod iter;
mod node;

#[cfg(test)]
mod check;
#[cfg(test)]
mod proptests;

pub use config::Config;
pub use error::{Error, Result};
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use interval::{Discrete, Interval};
pub use intervalindex::IntervalIndex;
pub use intervalset::IntervalSet;
pub use iter::{FilterIter, Iter, SpanRange, Spans};
