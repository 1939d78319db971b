use std::cmp;

use log::debug;

use crate::arena::Arena;
use crate::config::Config;
use crate::error::Result;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::interval::{query, Discrete, Interval};
use crate::iter::{SpanRange, Spans};
use crate::node::SpanNode;

/// A set of discrete values stored as disjoint, non-adjacent closed intervals.
///
/// Inserting a range merges it with every stored interval it overlaps or touches, so the
/// set always holds the fewest intervals that cover its content. The intervals live in an
/// AVL tree whose nodes are kept in an arena and addressed by index.
#[derive(Debug)]
pub struct IntervalSet<T, Ix = DefaultIx> {
    /// Arena that stores nodes
    pub(crate) nodes: Arena<SpanNode<T, Ix>, Ix>,
    /// Root of the tree
    pub(crate) root: Option<NodeIndex<Ix>>,
}

impl<T, Ix> IntervalSet<T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    /// Creates a new `IntervalSet` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&Config::new().with_initial_capacity(capacity))
    }

    /// Creates a new `IntervalSet` whose arena follows `config`.
    #[inline]
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        IntervalSet {
            nodes: Arena::with_config(config),
            root: None,
        }
    }

    /// Add every value of [low, high] to the set.
    ///
    /// Returns `Ok(false)` when the range was already covered, in which case the tree is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`](crate::Error::InvalidRange) when low > high, and
    /// [`Error::CapacityExhausted`](crate::Error::CapacityExhausted) when a new node is
    /// needed but the arena is full. The set is unchanged in both cases.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// assert_eq!(set.insert(6, 9), Ok(true));
    /// assert_eq!(set.insert(2, 5), Ok(true));
    /// assert_eq!(set.insert(3, 4), Ok(false));
    /// assert_eq!(set.iter().collect::<Vec<_>>(), [&Interval::new(2, 9)]);
    /// ```
    #[inline]
    pub fn insert(&mut self, low: T, high: T) -> Result<bool> {
        let interval = Interval::try_new(low, high)?;
        if self.contains_range(low, high) {
            return Ok(false);
        }
        self.root = Some(self.insert_inner(self.root, interval)?);
        Ok(true)
    }

    /// Remove every value of [low, high] from the set, trimming or splitting the stored
    /// intervals it overlaps.
    ///
    /// Returns `Ok(false)` when nothing in the set overlapped the range.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`](crate::Error::InvalidRange) when low > high, and
    /// [`Error::CapacityExhausted`](crate::Error::CapacityExhausted) when a stored interval
    /// has to be split but the arena is full. The set is unchanged in both cases.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.insert(1, 10).unwrap();
    /// assert_eq!(set.remove(4, 6), Ok(true));
    /// assert_eq!(
    ///     set.iter().collect::<Vec<_>>(),
    ///     [&Interval::new(1, 3), &Interval::new(7, 10)]
    /// );
    /// assert_eq!(set.remove(4, 6), Ok(false));
    /// ```
    #[inline]
    pub fn remove(&mut self, low: T, high: T) -> Result<bool> {
        let interval = Interval::try_new(low, high)?;
        if !self.overlaps(low, high) {
            return Ok(false);
        }
        self.root = self.remove_inner(self.root, interval)?;
        Ok(true)
    }

    /// Check if the point is in the set.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::IntervalSet;
    ///
    /// let mut set = IntervalSet::new();
    /// set.insert(2, 4).unwrap();
    /// assert!(set.contains(4));
    /// assert!(!set.contains(5));
    /// ```
    #[inline]
    pub fn contains(&self, point: T) -> bool {
        self.search(point).is_some()
    }

    /// Return the stored interval containing the point.
    #[inline]
    pub fn get(&self, point: T) -> Option<&Interval<T>> {
        self.search(point).map(|x| &self.nodes[x].interval)
    }

    /// Check if every value of [low, high] is in the set.
    ///
    /// Stored intervals never touch, so this holds exactly when one of them covers the range.
    /// An empty range (low > high) is never covered.
    #[inline]
    pub fn contains_range(&self, low: T, high: T) -> bool {
        query(low, high).is_some_and(|q| self.get(low).is_some_and(|i| i.contains_interval(&q)))
    }

    /// Check if any value of [low, high] is in the set.
    #[inline]
    pub fn overlaps(&self, low: T, high: T) -> bool {
        self.overlapping(low, high).next().is_some()
    }

    /// Get a sorted iterator over the stored intervals that overlap [low, high].
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.insert(1, 2).unwrap();
    /// set.insert(5, 6).unwrap();
    /// set.insert(9, 12).unwrap();
    /// let found: Vec<_> = set.overlapping(2, 9).collect();
    /// assert_eq!(found, [&Interval::new(1, 2), &Interval::new(5, 6), &Interval::new(9, 12)]);
    /// ```
    #[inline]
    pub fn overlapping(&self, low: T, high: T) -> SpanRange<'_, T, Ix> {
        SpanRange::new(self, query(low, high))
    }

    /// Return the sorted sub-ranges of [low, high] that are not in the set.
    ///
    /// Taken right before an `insert` of the same range, these are the values the insertion
    /// adds.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalSet};
    ///
    /// let mut set = IntervalSet::new();
    /// set.insert(3, 4).unwrap();
    /// set.insert(8, 8).unwrap();
    /// assert_eq!(
    ///     set.gaps(1, 9),
    ///     [Interval::new(1, 2), Interval::new(5, 7), Interval::new(9, 9)]
    /// );
    /// ```
    pub fn gaps(&self, low: T, high: T) -> Vec<Interval<T>> {
        let mut gaps = Vec::new();
        if low > high {
            return gaps;
        }
        let mut cursor = Some(low);
        for span in self.overlapping(low, high) {
            let Some(c) = cursor else {
                break;
            };
            if span.low > c {
                gaps.push(Interval {
                    low: c,
                    high: span.low.predecessor(),
                });
            }
            cursor = (span.high < high).then(|| span.high.successor());
        }
        if let Some(c) = cursor {
            gaps.push(Interval { low: c, high });
        }
        gaps
    }

    /// Get a sorted iterator over the stored intervals.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Spans<'_, T, Ix> {
        Spans::new(self)
    }

    /// Remove all intervals from the set
    #[inline]
    pub fn clear(&mut self) {
        debug!("clearing interval set of {} intervals", self.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Return the number of stored intervals.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the set contains no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the height of the tree, 0 when empty.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }
}

impl<T> IntervalSet<T>
where
    T: Discrete,
{
    /// Create an empty `IntervalSet`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<T> Default for IntervalSet<T>
where
    T: Discrete,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T, Ix> IntoIterator for &'a IntervalSet<T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    type Item = &'a Interval<T>;
    type IntoIter = Spans<'a, T, Ix>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Coalescing insertion and removal.
//
// Every function takes a subtree, rewrites it in place and returns its new root. Nodes taken
// apart on the way down are put back together with `join` on the way up. The only allocation
// happens at the bottom of the recursion, before any node is rewritten.
impl<T, Ix> IntervalSet<T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    /// Insert an interval into a subtree, merging it with the nodes it touches.
    fn insert_inner(
        &mut self,
        tree: Option<NodeIndex<Ix>>,
        interval: Interval<T>,
    ) -> Result<NodeIndex<Ix>> {
        let Some(x) = tree else {
            return self.nodes.alloc(SpanNode::leaf(interval));
        };
        let SpanNode {
            interval: Interval { low: s, high: e },
            left,
            right,
            ..
        } = self.nodes[x];

        if interval.high.successor() < s {
            let left = self.insert_inner(left, interval)?;
            return Ok(self.join(Some(left), x, right));
        }
        if e.successor() < interval.low {
            let right = self.insert_inner(right, interval)?;
            return Ok(self.join(left, x, Some(right)));
        }

        let (low, left) = if interval.low < s {
            self.absorb_left(left, interval.low)
        } else {
            (s, left)
        };
        let (high, right) = if interval.high > e {
            self.absorb_right(right, interval.high)
        } else {
            (e, right)
        };
        self.nodes[x].interval = Interval { low, high };
        Ok(self.join(left, x, right))
    }

    /// Merge into `low` every node of the subtree that touches [low, ..], returning the
    /// merged low bound and what is left of the subtree.
    ///
    /// Everything in the subtree lies below the interval being inserted, so a node touching
    /// `low` takes its whole right subtree with it.
    fn absorb_left(
        &mut self,
        tree: Option<NodeIndex<Ix>>,
        low: T,
    ) -> (T, Option<NodeIndex<Ix>>) {
        let Some(x) = tree else {
            return (low, None);
        };
        let SpanNode {
            interval: Interval { low: s, high: e },
            left,
            right,
            ..
        } = self.nodes[x];

        if e.successor() < low {
            let (low, right) = self.absorb_left(right, low);
            return (low, Some(self.join(left, x, right)));
        }
        self.release(x, right);
        if low < s {
            self.absorb_left(left, low)
        } else {
            (s, left)
        }
    }

    /// Mirror image of `absorb_left`.
    fn absorb_right(
        &mut self,
        tree: Option<NodeIndex<Ix>>,
        high: T,
    ) -> (T, Option<NodeIndex<Ix>>) {
        let Some(x) = tree else {
            return (high, None);
        };
        let SpanNode {
            interval: Interval { low: s, high: e },
            left,
            right,
            ..
        } = self.nodes[x];

        if high.successor() < s {
            let (high, left) = self.absorb_right(left, high);
            return (high, Some(self.join(left, x, right)));
        }
        self.release(x, left);
        if high > e {
            self.absorb_right(right, high)
        } else {
            (e, right)
        }
    }

    /// Remove an interval from a subtree.
    fn remove_inner(
        &mut self,
        tree: Option<NodeIndex<Ix>>,
        interval: Interval<T>,
    ) -> Result<Option<NodeIndex<Ix>>> {
        let Some(x) = tree else {
            return Ok(None);
        };
        let SpanNode {
            interval: Interval { low: s, high: e },
            left,
            right,
            ..
        } = self.nodes[x];

        if interval.high < s {
            let left = self.remove_inner(left, interval)?;
            return Ok(Some(self.join(left, x, right)));
        }
        if e < interval.low {
            let right = self.remove_inner(right, interval)?;
            return Ok(Some(self.join(left, x, right)));
        }

        match (s < interval.low, interval.high < e) {
            // [s, e] outlives the removal on both sides: split it in two
            (true, true) => {
                let upper = self.nodes.alloc(SpanNode::leaf(Interval {
                    low: interval.high.successor(),
                    high: e,
                }))?;
                self.nodes[x].interval.high = interval.low.predecessor();
                let right = self.join(None, upper, right);
                Ok(Some(self.join(left, x, Some(right))))
            }
            (true, false) => {
                let right = if interval.high > e {
                    self.remove_inner(right, interval)?
                } else {
                    right
                };
                self.nodes[x].interval.high = interval.low.predecessor();
                Ok(Some(self.join(left, x, right)))
            }
            (false, true) => {
                let left = if interval.low < s {
                    self.remove_inner(left, interval)?
                } else {
                    left
                };
                self.nodes[x].interval.low = interval.high.successor();
                Ok(Some(self.join(left, x, right)))
            }
            (false, false) => {
                let left = if interval.low < s {
                    self.remove_inner(left, interval)?
                } else {
                    left
                };
                let right = if interval.high > e {
                    self.remove_inner(right, interval)?
                } else {
                    right
                };
                self.nodes.free(x);
                Ok(self.concat(left, right))
            }
        }
    }

    /// Free a node together with one of its subtrees.
    fn release(&mut self, x: NodeIndex<Ix>, subtree: Option<NodeIndex<Ix>>) {
        let mut count = 0usize;
        let mut stack = vec![x];
        stack.extend(subtree);
        while let Some(n) = stack.pop() {
            if n != x {
                stack.extend(self.nodes[n].left);
                stack.extend(self.nodes[n].right);
            }
            self.nodes.free(n);
            count += 1;
        }
        debug!("reclaimed {count} absorbed nodes");
    }
}

// AVL balancing over detached nodes.
impl<T, Ix> IntervalSet<T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    /// Combine a left subtree, a node and a right subtree into one balanced subtree.
    ///
    /// Every interval of `left` must be below the one of `x`, every interval of `right`
    /// above it. The children `x` had before are ignored.
    fn join(
        &mut self,
        left: Option<NodeIndex<Ix>>,
        x: NodeIndex<Ix>,
        right: Option<NodeIndex<Ix>>,
    ) -> NodeIndex<Ix> {
        let (l, r) = match (left, right) {
            (None, _) => return self.add_leftmost(right, x),
            (_, None) => return self.add_rightmost(left, x),
            (Some(l), Some(r)) => (l, r),
        };
        let lh = self.nodes[l].height;
        let rh = self.nodes[r].height;
        if lh > rh + 1 {
            let lr = self.join(self.nodes[l].right, x, right);
            self.nodes[l].right = Some(lr);
            self.balance(l)
        } else if rh > lh + 1 {
            let rl = self.join(left, x, self.nodes[r].left);
            self.nodes[r].left = Some(rl);
            self.balance(r)
        } else {
            self.attach(x, left, right)
        }
    }

    /// Concatenate two subtrees, every interval of `left` being below those of `right`.
    fn concat(
        &mut self,
        left: Option<NodeIndex<Ix>>,
        right: Option<NodeIndex<Ix>>,
    ) -> Option<NodeIndex<Ix>> {
        match (left, right) {
            (None, tree) | (tree, None) => tree,
            (Some(_), Some(r)) => {
                let (min, right) = self.detach_min(r);
                Some(self.join(left, min, right))
            }
        }
    }

    /// Unlink the leftmost node of a subtree, returning it and the rest of the subtree.
    fn detach_min(&mut self, x: NodeIndex<Ix>) -> (NodeIndex<Ix>, Option<NodeIndex<Ix>>) {
        match self.nodes[x].left {
            None => (x, self.nodes[x].right),
            Some(l) => {
                let (min, left) = self.detach_min(l);
                self.nodes[x].left = left;
                (min, Some(self.balance(x)))
            }
        }
    }

    fn add_leftmost(&mut self, tree: Option<NodeIndex<Ix>>, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        match tree {
            None => self.attach(x, None, None),
            Some(t) => {
                let left = self.add_leftmost(self.nodes[t].left, x);
                self.nodes[t].left = Some(left);
                self.balance(t)
            }
        }
    }

    fn add_rightmost(&mut self, tree: Option<NodeIndex<Ix>>, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        match tree {
            None => self.attach(x, None, None),
            Some(t) => {
                let right = self.add_rightmost(self.nodes[t].right, x);
                self.nodes[t].right = Some(right);
                self.balance(t)
            }
        }
    }

    /// Make `left` and `right` the children of `x`.
    fn attach(
        &mut self,
        x: NodeIndex<Ix>,
        left: Option<NodeIndex<Ix>>,
        right: Option<NodeIndex<Ix>>,
    ) -> NodeIndex<Ix> {
        self.nodes[x].left = left;
        self.nodes[x].right = right;
        self.update_height(x);
        x
    }

    /// Restore the AVL property at `x`, whose subtrees differ in height by at most two.
    fn balance(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let SpanNode { left, right, .. } = self.nodes[x];
        let lh = self.height_of(left);
        let rh = self.height_of(right);
        match (left, right) {
            (Some(l), _) if lh > rh + 1 => {
                let SpanNode {
                    left: ll,
                    right: lr,
                    ..
                } = self.nodes[l];
                if self.height_of(ll) < self.height_of(lr) {
                    let l = self.left_rotate(l);
                    self.nodes[x].left = Some(l);
                }
                self.right_rotate(x)
            }
            (_, Some(r)) if rh > lh + 1 => {
                let SpanNode {
                    left: rl,
                    right: rr,
                    ..
                } = self.nodes[r];
                if self.height_of(rr) < self.height_of(rl) {
                    let r = self.right_rotate(r);
                    self.nodes[x].right = Some(r);
                }
                self.left_rotate(x)
            }
            _ => {
                self.update_height(x);
                x
            }
        }
    }

    /// Binary tree left rotate, returning the new subtree root.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let Some(y) = self.nodes[x].right else {
            return x;
        };
        self.nodes[x].right = self.nodes[y].left;
        self.update_height(x);
        self.nodes[y].left = Some(x);
        self.update_height(y);
        y
    }

    /// Binary tree right rotate, returning the new subtree root.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let Some(y) = self.nodes[x].left else {
            return x;
        };
        self.nodes[x].left = self.nodes[y].right;
        self.update_height(x);
        self.nodes[y].right = Some(x);
        self.update_height(y);
        y
    }

    fn update_height(&mut self, x: NodeIndex<Ix>) {
        let SpanNode { left, right, .. } = self.nodes[x];
        self.nodes[x].height = 1 + cmp::max(self.height_of(left), self.height_of(right));
    }

    fn height_of(&self, x: Option<NodeIndex<Ix>>) -> u8 {
        x.map_or(0, |x| self.nodes[x].height)
    }

    /// Search for the node containing the point.
    fn search(&self, point: T) -> Option<NodeIndex<Ix>> {
        let mut x = self.root;
        while let Some(n) = x {
            let node = &self.nodes[n];
            if point < node.interval.low {
                x = node.left;
            } else if point > node.interval.high {
                x = node.right;
            } else {
                return Some(n);
            }
        }
        None
    }
}
