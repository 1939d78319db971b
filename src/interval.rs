//! The `Interval` stored in `IntervalSet` and `IntervalIndex`, representing the closed range [low, high]
//!
//! Intervals are ordered by `low` first and `high` second. For instance, with intervals of type `Interval<u32>`:
//! - [1,4]<[2,5], because 1<2
//! - [1,4]<[1,5], because 4<5
//!
//! The domain is discrete, so [1,4] and [5,9] are adjacent: there is no value between them.

use crate::error::{Error, Result};

/// A totally ordered domain where every value has a well defined successor and predecessor.
pub trait Discrete: Ord + Copy {
    /// The next value, or `self` at the top of the domain.
    fn successor(self) -> Self;

    /// The previous value, or `self` at the bottom of the domain.
    fn predecessor(self) -> Self;
}

macro_rules! impl_discrete {
    ($($ty:ty),*) => {
        $(
            impl Discrete for $ty {
                #[inline(always)]
                fn successor(self) -> Self {
                    self.saturating_add(1)
                }
                #[inline(always)]
                fn predecessor(self) -> Self {
                    self.saturating_sub(1)
                }
            }
        )*
    };
}

impl_discrete!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// The interval stored in the trees, represents [low, high]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Interval<T> {
    /// Low value
    pub low: T,
    /// high value
    pub high: T,
}

impl<T: Ord> Interval<T> {
    /// Create a new `Interval`
    ///
    /// # Panics
    ///
    /// This method panics when low > high
    #[inline]
    pub fn new(low: T, high: T) -> Self {
        assert!(low <= high, "invalid range");
        Self { low, high }
    }

    /// Create a new `Interval`, rejecting low > high with [`Error::InvalidRange`].
    #[inline]
    pub fn try_new(low: T, high: T) -> Result<Self> {
        if low > high {
            return Err(Error::InvalidRange);
        }
        Ok(Self { low, high })
    }

    /// Checks if self overlaps with other interval
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.low <= other.high && other.low <= self.high
    }

    /// Checks if the point lies inside self
    #[inline]
    pub fn contains(&self, point: &T) -> bool {
        &self.low <= point && point <= &self.high
    }

    /// Checks if other lies entirely inside self
    #[inline]
    pub fn contains_interval(&self, other: &Self) -> bool {
        self.low <= other.low && other.high <= self.high
    }
}

impl<T: Discrete> Interval<T> {
    /// Checks if self overlaps with or is adjacent to other interval
    #[inline]
    pub fn touches(&self, other: &Self) -> bool {
        self.low <= other.high.successor() && other.low <= self.high.successor()
    }
}

/// Builds the query range of a read-only operation, `None` when low > high.
pub(crate) fn query<T: Ord>(low: T, high: T) -> Option<Interval<T>> {
    (low <= high).then_some(Interval { low, high })
}
