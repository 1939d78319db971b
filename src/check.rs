//! Structural invariant checks run by the tests after every mutation.

use std::cmp;

use crate::index::{IndexType, NodeIndex};
use crate::interval::Discrete;
use crate::intervalindex::IntervalIndex;
use crate::intervalset::IntervalSet;

/// Bounds on the `low` values a subtree may hold.
type Bounds<T> = (Option<T>, Option<T>);

fn check_bounds<T: Discrete>(low: T, (lo, hi): Bounds<T>) {
    if let Some(lo) = lo {
        assert!(low >= lo, "node out of order");
    }
    if let Some(hi) = hi {
        assert!(low <= hi, "node out of order");
    }
}

fn check_height(stored: u8, lh: u8, rh: u8) -> u8 {
    assert!(lh.abs_diff(rh) <= 1, "unbalanced node: {lh} vs {rh}");
    let height = 1 + cmp::max(lh, rh);
    assert_eq!(stored, height, "stale height");
    height
}

impl<T, Ix> IntervalSet<T, Ix>
where
    T: Discrete + std::fmt::Debug,
    Ix: IndexType,
{
    /// Panics unless the set is ordered, coalesced, balanced and accounts for every node.
    pub(crate) fn check(&self) {
        let mut reachable = 0;
        self.check_inner(self.root, (None, None), &mut reachable);
        assert_eq!(self.nodes.len(), reachable, "orphaned nodes in the arena");
        assert_eq!(self.nodes.is_empty(), self.root.is_none());

        let spans: Vec<_> = self.iter().collect();
        for pair in spans.windows(2) {
            assert!(
                pair[0].high.successor() < pair[1].low,
                "{:?} and {:?} should have been merged",
                pair[0],
                pair[1]
            );
        }
    }

    fn check_inner(
        &self,
        x: Option<NodeIndex<Ix>>,
        bounds: Bounds<T>,
        reachable: &mut usize,
    ) -> u8 {
        let Some(x) = x else {
            return 0;
        };
        *reachable += 1;
        let node = &self.nodes[x];
        let low = node.interval.low;
        assert!(low <= node.interval.high);
        check_bounds(low, bounds);
        let lh = self.check_inner(node.left, (bounds.0, Some(low)), reachable);
        let rh = self.check_inner(node.right, (Some(low), bounds.1), reachable);
        check_height(node.height, lh, rh)
    }
}

impl<T, V, Ix> IntervalIndex<T, V, Ix>
where
    T: Discrete + std::fmt::Debug,
    Ix: IndexType,
{
    /// Panics unless the index is ordered, balanced, has exact `max` values and parent links,
    /// and accounts for every node.
    pub(crate) fn check(&self) {
        if let Some(root) = self.root {
            assert_eq!(self.nodes[root].parent(), None, "root has a parent");
        }
        let mut reachable = 0;
        self.check_inner(self.root, (None, None), &mut reachable);
        assert_eq!(self.nodes.len(), reachable, "orphaned nodes in the arena");
        assert_eq!(self.nodes.is_empty(), self.root.is_none());
    }

    /// Returns the height and the largest `high` of the subtree.
    fn check_inner(
        &self,
        x: Option<NodeIndex<Ix>>,
        bounds: Bounds<T>,
        reachable: &mut usize,
    ) -> (u8, Option<T>) {
        let Some(x) = x else {
            return (0, None);
        };
        *reachable += 1;
        let node = &self.nodes[x];
        check_bounds(node.low(), bounds);
        for child in [node.left(), node.right()].into_iter().flatten() {
            assert_eq!(self.nodes[child].parent(), Some(x), "broken parent link");
        }
        let (lh, lmax) = self.check_inner(node.left(), (bounds.0, Some(node.low())), reachable);
        let (rh, rmax) = self.check_inner(node.right(), (Some(node.low()), bounds.1), reachable);
        let max = [lmax, rmax]
            .into_iter()
            .flatten()
            .fold(node.interval().high, cmp::max);
        assert_eq!(node.max(), max, "stale max at {x:?}");
        (check_height(node.height(), lh, rh), Some(max))
    }
}
