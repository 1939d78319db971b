use std::cmp;
use std::collections::VecDeque;

use log::debug;

use crate::arena::Arena;
use crate::config::Config;
use crate::error::Result;
use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::interval::{query, Discrete, Interval};
use crate::iter::{FilterIter, Iter};
use crate::node::Node;

/// An interval-value index, which supports overlap queries on a dynamic multiset of intervals.
///
/// Unlike `IntervalSet`, intervals are never merged: equal and overlapping intervals are
/// stored side by side, each under its own handle. Nodes are ordered by `low` and every node
/// records the largest `high` of its subtree, which lets overlap queries skip subtrees.
#[derive(Debug)]
pub struct IntervalIndex<T, V, Ix = DefaultIx> {
    /// Arena that stores nodes
    pub(crate) nodes: Arena<Node<T, V, Ix>, Ix>,
    /// Root of the interval tree
    pub(crate) root: Option<NodeIndex<Ix>>,
}

impl<T, V, Ix> IntervalIndex<T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    /// Creates a new `IntervalIndex` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(&Config::new().with_initial_capacity(capacity))
    }

    /// Creates a new `IntervalIndex` whose arena follows `config`.
    #[inline]
    #[must_use]
    pub fn with_config(config: &Config) -> Self {
        IntervalIndex {
            nodes: Arena::with_config(config),
            root: None,
        }
    }

    /// Insert an interval-value pair into the index, returning the handle of the new entry.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`](crate::Error::InvalidRange) when low > high, and
    /// [`Error::CapacityExhausted`](crate::Error::CapacityExhausted) when the arena is full.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::new();
    /// let a = index.insert(1, 3, "a").unwrap();
    /// let b = index.insert(1, 3, "b").unwrap();
    /// assert_ne!(a, b);
    /// assert_eq!(index.get(a), Some((&Interval::new(1, 3), &"a")));
    /// assert_eq!(index.len(), 2);
    /// ```
    #[inline]
    pub fn insert(&mut self, low: T, high: T, value: V) -> Result<NodeIndex<Ix>> {
        let interval = Interval::try_new(low, high)?;
        let node_idx = self.nodes.alloc(Node::new(interval, value))?;
        self.insert_inner(node_idx);
        Ok(node_idx)
    }

    /// Remove an entry from the index, returning its interval and value if the handle is live.
    ///
    /// The handles of the other entries stay valid.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::new();
    /// let a = index.insert(1, 3, 1).unwrap();
    /// let b = index.insert(2, 4, 2).unwrap();
    /// assert_eq!(index.remove(a), Some((Interval::new(1, 3), 1)));
    /// assert_eq!(index.remove(a), None);
    /// assert_eq!(index.get(b), Some((&Interval::new(2, 4), &2)));
    /// ```
    #[inline]
    pub fn remove(&mut self, node_idx: NodeIndex<Ix>) -> Option<(Interval<T>, V)> {
        self.nodes.get(node_idx)?;
        self.remove_inner(node_idx);
        self.nodes
            .free(node_idx)
            .map(|node| (node.interval, node.value))
    }

    /// Return the interval and value of an entry.
    #[inline]
    pub fn get(&self, node_idx: NodeIndex<Ix>) -> Option<(&Interval<T>, &V)> {
        self.nodes
            .get(node_idx)
            .map(|node| (node.interval(), node.value()))
    }

    /// Return a mutable reference to the value of an entry.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::new();
    /// let a = index.insert(3, 5, 0).unwrap();
    /// if let Some(v) = index.get_mut(a) {
    ///     *v += 1;
    /// }
    /// assert_eq!(index.get(a).map(|(_, v)| *v), Some(1));
    /// ```
    #[inline]
    pub fn get_mut(&mut self, node_idx: NodeIndex<Ix>) -> Option<&mut V> {
        self.nodes.get_mut(node_idx).map(Node::value_mut)
    }

    /// Find one entry whose interval overlaps with [low, high].
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::{Interval, IntervalIndex};
    ///
    /// let mut index = IntervalIndex::new();
    /// index.insert(1, 3, ()).unwrap();
    /// let b = index.insert(6, 7, ()).unwrap();
    /// assert_eq!(index.find_one_overlap(5, 6), Some(b));
    /// assert_eq!(index.find_one_overlap(4, 5), None);
    /// ```
    #[inline]
    pub fn find_one_overlap(&self, low: T, high: T) -> Option<NodeIndex<Ix>> {
        self.search(&query(low, high)?)
    }

    /// Check if an entry of the index overlaps with [low, high].
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::new();
    /// index.insert(1, 3, ()).unwrap();
    /// index.insert(6, 7, ()).unwrap();
    /// index.insert(9, 11, ()).unwrap();
    /// assert!(index.overlaps(2, 5));
    /// assert!(index.overlaps(1, 17));
    /// assert!(!index.overlaps(4, 5));
    /// assert!(!index.overlaps(12, 23));
    /// ```
    #[inline]
    pub fn overlaps(&self, low: T, high: T) -> bool {
        self.find_one_overlap(low, high).is_some()
    }

    /// Find all entries whose interval overlaps with [low, high].
    ///
    /// The handles come in no particular order, each one once.
    ///
    /// # Example
    /// ```rust
    /// use avl_interval_set::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::new();
    /// let a = index.insert(1, 3, ()).unwrap();
    /// index.insert(2, 4, ()).unwrap();
    /// index.insert(6, 7, ()).unwrap();
    /// index.insert(8, 11, ()).unwrap();
    /// assert_eq!(index.find_all_overlaps(2, 7).len(), 3);
    /// index.remove(a);
    /// assert_eq!(index.find_all_overlaps(2, 7).len(), 2);
    /// ```
    #[inline]
    pub fn find_all_overlaps(&self, low: T, high: T) -> Vec<NodeIndex<Ix>> {
        match (self.root, query(low, high)) {
            (Some(root), Some(q)) => self.find_all_overlaps_inner_unordered(root, &q),
            _ => Vec::new(),
        }
    }

    /// Get a sorted iterator over the entries that overlap with [low, high].
    ///
    /// Yields the same entries in the same order as `iter().filter(..)`, skipping the subtrees
    /// that can't hold a match.
    #[inline]
    pub fn filter_iter(&self, low: T, high: T) -> FilterIter<'_, T, V, Ix> {
        FilterIter::new(self, query(low, high))
    }

    /// Get an iterator over the entries of the index, sorted by `low`.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, V, Ix> {
        Iter::new(self)
    }

    /// Remove all entries from the index
    #[inline]
    pub fn clear(&mut self) {
        debug!("clearing interval index of {} entries", self.len());
        self.nodes.clear();
        self.root = None;
    }

    /// Return the number of entries in the index.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` if the index contains no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<T, V> IntervalIndex<T, V>
where
    T: Discrete,
{
    /// Create an empty `IntervalIndex`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<T, V> Default for IntervalIndex<T, V>
where
    T: Discrete,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, Ix> IntervalIndex<T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    /// Insert a node into the tree.
    fn insert_inner(&mut self, z: NodeIndex<Ix>) {
        let low = self.node_ref(z, Node::low);
        let mut y = None;
        let mut x = self.root;

        while let Some(n) = x {
            y = Some(n);
            if low < self.node_ref(n, Node::low) {
                x = self.node_ref(n, Node::left);
            } else {
                x = self.node_ref(n, Node::right);
            }
        }
        self.node_mut(z, Node::set_parent(y));
        match y {
            None => self.root = Some(z),
            Some(p) => {
                if low < self.node_ref(p, Node::low) {
                    self.node_mut(p, Node::set_left(Some(z)));
                } else {
                    self.node_mut(p, Node::set_right(Some(z)));
                }
                self.rebalance_bottom_up(Some(p));
            }
        }
    }

    /// Unlink a node from the tree, leaving it in the arena.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let z_left = self.node_ref(z, Node::left);
        let z_right = self.node_ref(z, Node::right);
        let fix_from = match (z_left, z_right) {
            (None, _) => {
                self.transplant(z, z_right);
                self.node_ref(z, Node::parent)
            }
            (_, None) => {
                self.transplant(z, z_left);
                self.node_ref(z, Node::parent)
            }
            (Some(l), Some(r)) => {
                let y = self.tree_minimum(r);
                let fix_from = if self.node_ref(y, Node::parent) == Some(z) {
                    y
                } else {
                    let p = self.node_ref(y, Node::parent);
                    self.transplant(y, self.node_ref(y, Node::right));
                    self.node_mut(y, Node::set_right(Some(r)));
                    self.node_mut(r, Node::set_parent(Some(y)));
                    // y was a left child, so it has a parent
                    p.unwrap_or(y)
                };
                self.transplant(z, Some(y));
                self.node_mut(y, Node::set_left(Some(l)));
                self.node_mut(l, Node::set_parent(Some(y)));
                Some(fix_from)
            }
        };
        self.rebalance_bottom_up(fix_from);
    }

    /// Find all intervals in the index that overlap with the given interval.
    ///
    /// The result is unordered because of breadth-first search to save stack size
    fn find_all_overlaps_inner_unordered(
        &self,
        x: NodeIndex<Ix>,
        interval: &Interval<T>,
    ) -> Vec<NodeIndex<Ix>> {
        let mut list = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(x);
        while let Some(p) = queue.pop_front() {
            if self.node_ref(p, Node::interval).overlaps(interval) {
                list.push(p);
            }
            let p_left = self.node_ref(p, Node::left);
            let p_right = self.node_ref(p, Node::right);
            if self.max(p_left) >= Some(interval.low) {
                queue.extend(p_left);
            }
            if self.node_ref(p, Node::low) <= interval.high
                && self.max(p_right) >= Some(interval.low)
            {
                queue.extend(p_right);
            }
        }

        list
    }

    /// Search for a node that overlaps with the given interval.
    fn search(&self, interval: &Interval<T>) -> Option<NodeIndex<Ix>> {
        let mut x = self.root;
        while let Some(n) = x {
            if self.node_ref(n, Node::interval).overlaps(interval) {
                return Some(n);
            }
            let left = self.node_ref(n, Node::left);
            if self.max(left) >= Some(interval.low) {
                x = left;
            } else {
                x = self.node_ref(n, Node::right);
            }
        }
        None
    }

    /// Restore the AVL property and the augmented fields from `x` up to the root.
    fn rebalance_bottom_up(&mut self, mut x: Option<NodeIndex<Ix>>) {
        while let Some(n) = x {
            let n = self.balance(n);
            x = self.node_ref(n, Node::parent);
        }
    }

    /// Rebalance the subtree rooted at `x`, returning its new root.
    fn balance(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let diff = self.balance_factor(x);
        if diff > 1 {
            if let Some(r) = self.node_ref(x, Node::right) {
                if self.balance_factor(r) < 0 {
                    self.right_rotate(r);
                }
            }
            return self.left_rotate(x);
        }
        if diff < -1 {
            if let Some(l) = self.node_ref(x, Node::left) {
                if self.balance_factor(l) > 0 {
                    self.left_rotate(l);
                }
            }
            return self.right_rotate(x);
        }
        self.recalculate(x);
        x
    }

    /// Height of the right subtree minus height of the left subtree.
    fn balance_factor(&self, x: NodeIndex<Ix>) -> i16 {
        let lh = self.height(self.node_ref(x, Node::left));
        let rh = self.height(self.node_ref(x, Node::right));
        i16::from(rh) - i16::from(lh)
    }

    /// Binary tree left rotate.
    fn left_rotate(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let Some(y) = self.node_ref(x, Node::right) else {
            return x;
        };
        let y_left = self.node_ref(y, Node::left);
        self.node_mut(x, Node::set_right(y_left));
        if let Some(yl) = y_left {
            self.node_mut(yl, Node::set_parent(Some(x)));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_left(Some(x)));

        self.recalculate(x);
        self.recalculate(y);
        y
    }

    /// Binary tree right rotate.
    fn right_rotate(&mut self, x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        let Some(y) = self.node_ref(x, Node::left) else {
            return x;
        };
        let y_right = self.node_ref(y, Node::right);
        self.node_mut(x, Node::set_left(y_right));
        if let Some(yr) = y_right {
            self.node_mut(yr, Node::set_parent(Some(x)));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_right(Some(x)));

        self.recalculate(x);
        self.recalculate(y);
        y
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        let parent = self.node_ref(x, Node::parent);
        self.node_mut(y, Node::set_parent(parent));
        match parent {
            None => self.root = Some(y),
            Some(p) if self.node_ref(p, Node::left) == Some(x) => {
                self.node_mut(p, Node::set_left(Some(y)));
            }
            Some(p) => self.node_mut(p, Node::set_right(Some(y))),
        }
        self.node_mut(x, Node::set_parent(Some(y)));
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: Option<NodeIndex<Ix>>) {
        let parent = self.node_ref(u, Node::parent);
        match parent {
            None => self.root = v,
            Some(p) if self.node_ref(p, Node::left) == Some(u) => {
                self.node_mut(p, Node::set_left(v));
            }
            Some(p) => self.node_mut(p, Node::set_right(v)),
        }
        if let Some(v) = v {
            self.node_mut(v, Node::set_parent(parent));
        }
    }

    /// Recalculate height and max value from left and right children
    fn recalculate(&mut self, x: NodeIndex<Ix>) {
        let x_left = self.node_ref(x, Node::left);
        let x_right = self.node_ref(x, Node::right);
        let height = 1 + cmp::max(self.height(x_left), self.height(x_right));
        let mut max = self.node_ref(x, Node::interval).high;
        if let Some(left_max) = self.max(x_left) {
            max = max.max(left_max);
        }
        if let Some(right_max) = self.max(x_right) {
            max = max.max(right_max);
        }
        self.node_mut(x, Node::set_height(height));
        self.node_mut(x, Node::set_max(max));
    }

    /// Find the node with the minimum interval.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while let Some(l) = self.node_ref(x, Node::left) {
            x = l;
        }
        x
    }
}

// Convenient methods for reference or mutate current node
impl<'a, T, V, Ix> IntervalIndex<T, V, Ix>
where
    T: Copy,
    Ix: IndexType,
{
    fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, V, Ix>) -> R,
    {
        op(&self.nodes[node])
    }

    fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, V, Ix>) -> R,
    {
        op(&mut self.nodes[node])
    }

    fn height(&self, node: Option<NodeIndex<Ix>>) -> u8 {
        node.map_or(0, |n| self.nodes[n].height())
    }

    fn max(&self, node: Option<NodeIndex<Ix>>) -> Option<T> {
        node.map(|n| self.nodes[n].max())
    }
}
