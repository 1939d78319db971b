use crate::arena::Arena;
use crate::index::{IndexType, NodeIndex};
use crate::interval::{Discrete, Interval};
use crate::intervalindex::IntervalIndex;
use crate::intervalset::IntervalSet;
use crate::node::{Node, SpanNode, TreeNode};

/// Pushes a link of nodes on the left to stack.
fn left_link<N, Ix>(nodes: &Arena<N, Ix>, mut x: Option<NodeIndex<Ix>>) -> Vec<NodeIndex<Ix>>
where
    N: TreeNode<Ix>,
    Ix: IndexType,
{
    let mut stack = vec![];
    while let Some(n) = x {
        stack.push(n);
        x = nodes[n].left();
    }
    stack
}

/// A sorted iterator over the intervals of an `IntervalSet`.
#[derive(Debug)]
pub struct Spans<'a, T, Ix> {
    /// Reference to the set
    pub(crate) set_ref: &'a IntervalSet<T, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
}

impl<'a, T, Ix> Spans<'a, T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    pub(crate) fn new(set_ref: &'a IntervalSet<T, Ix>) -> Self {
        Spans {
            set_ref,
            stack: left_link(&set_ref.nodes, set_ref.root),
        }
    }
}

impl<'a, T, Ix> Iterator for Spans<'a, T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    type Item = &'a Interval<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let node: &'a SpanNode<T, Ix> = &self.set_ref.nodes[x];
        self.stack.extend(left_link(&self.set_ref.nodes, node.right));
        Some(&node.interval)
    }
}

/// A sorted iterator over the intervals of an `IntervalSet` that overlap a query range.
///
/// The stored intervals are disjoint, so the walk starts at the first interval ending at
/// or after `query.low` and stops at the first one starting after `query.high`.
#[derive(Debug)]
pub struct SpanRange<'a, T, Ix> {
    /// Reference to the set
    pub(crate) set_ref: &'a IntervalSet<T, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
    /// Filter criteria, `None` for an empty query
    pub(crate) query: Option<Interval<T>>,
}

impl<'a, T, Ix> SpanRange<'a, T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    pub(crate) fn new(set_ref: &'a IntervalSet<T, Ix>, query: Option<Interval<T>>) -> Self {
        let mut stack = vec![];
        if let Some(query) = query {
            let mut x = set_ref.root;
            while let Some(n) = x {
                let node = &set_ref.nodes[n];
                if node.interval.high < query.low {
                    x = node.right;
                } else {
                    stack.push(n);
                    x = node.left;
                }
            }
        }
        SpanRange {
            set_ref,
            stack,
            query,
        }
    }
}

impl<'a, T, Ix> Iterator for SpanRange<'a, T, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    type Item = &'a Interval<T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query?;
        let x = self.stack.pop()?;
        let node: &'a SpanNode<T, Ix> = &self.set_ref.nodes[x];
        if node.interval.low > query.high {
            self.stack.clear();
            return None;
        }
        self.stack
            .extend(left_link(&self.set_ref.nodes, node.right));
        Some(&node.interval)
    }
}

/// A sorted iterator over the entries of an `IntervalIndex`.
#[derive(Debug)]
pub struct Iter<'a, T, V, Ix> {
    /// Reference to the index
    pub(crate) index_ref: &'a IntervalIndex<T, V, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
}

impl<'a, T, V, Ix> Iter<'a, T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    pub(crate) fn new(index_ref: &'a IntervalIndex<T, V, Ix>) -> Self {
        Iter {
            index_ref,
            stack: left_link(&index_ref.nodes, index_ref.root),
        }
    }
}

impl<'a, T, V, Ix> Iterator for Iter<'a, T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    type Item = (NodeIndex<Ix>, &'a Interval<T>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        let node: &'a Node<T, V, Ix> = &self.index_ref.nodes[x];
        self.stack
            .extend(left_link(&self.index_ref.nodes, node.right()));
        Some((x, node.interval(), node.value()))
    }
}

/// Pushes the left link of nodes that may lead to an overlap with `query`.
fn left_link_with_query<T, V, Ix>(
    index_ref: &IntervalIndex<T, V, Ix>,
    mut x: Option<NodeIndex<Ix>>,
    query: &Interval<T>,
) -> Vec<NodeIndex<Ix>>
where
    T: Discrete,
    Ix: IndexType,
{
    let mut stack = vec![];
    while let Some(n) = x {
        let node = &index_ref.nodes[n];
        if node.max() < query.low {
            break;
        }
        // right of a node starting after the query can't overlap either
        if node.low() <= query.high {
            stack.push(n);
        }
        x = node.left();
    }
    stack
}

/// A filter iterator over the entries of an `IntervalIndex`. It's equal to `iter().filter()`
/// but faster than the latter.
#[derive(Debug)]
pub struct FilterIter<'a, T, V, Ix> {
    /// Reference to the index
    pub(crate) index_ref: &'a IntervalIndex<T, V, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
    /// Filter criteria, `None` for an empty query
    pub(crate) query: Option<Interval<T>>,
}

impl<'a, T, V, Ix> FilterIter<'a, T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    pub(crate) fn new(index_ref: &'a IntervalIndex<T, V, Ix>, query: Option<Interval<T>>) -> Self {
        let stack = query
            .as_ref()
            .map(|q| left_link_with_query(index_ref, index_ref.root, q))
            .unwrap_or_default();
        FilterIter {
            index_ref,
            stack,
            query,
        }
    }
}

impl<'a, T, V, Ix> Iterator for FilterIter<'a, T, V, Ix>
where
    T: Discrete,
    Ix: IndexType,
{
    type Item = (NodeIndex<Ix>, &'a Interval<T>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query?;
        while let Some(x) = self.stack.pop() {
            let node: &'a Node<T, V, Ix> = &self.index_ref.nodes[x];
            self.stack
                .extend(left_link_with_query(self.index_ref, node.right(), &query));
            if node.interval().overlaps(&query) {
                return Some((x, node.interval(), node.value()));
            }
        }
        None
    }
}
