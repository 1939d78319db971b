use crate::index::{IndexType, NodeIndex};
use crate::interval::Interval;

/// Left link shared by the nodes of both trees, for in-order walks.
pub(crate) trait TreeNode<Ix> {
    fn left(&self) -> Option<NodeIndex<Ix>>;
}

/// Node of the coalescing interval set
#[derive(Debug)]
pub(crate) struct SpanNode<T, Ix> {
    /// Interval of the node
    pub interval: Interval<T>,
    /// Left children
    pub left: Option<NodeIndex<Ix>>,
    /// Right children
    pub right: Option<NodeIndex<Ix>>,
    /// Height of the subtree rooted here
    pub height: u8,
}

impl<T, Ix> SpanNode<T, Ix> {
    pub fn leaf(interval: Interval<T>) -> Self {
        SpanNode {
            interval,
            left: None,
            right: None,
            height: 1,
        }
    }
}

impl<T, Ix: IndexType> TreeNode<Ix> for SpanNode<T, Ix> {
    fn left(&self) -> Option<NodeIndex<Ix>> {
        self.left
    }
}

/// Node of the augmented interval index
#[derive(Debug)]
pub(crate) struct Node<T, V, Ix> {
    /// Left children
    pub left: Option<NodeIndex<Ix>>,
    /// Right children
    pub right: Option<NodeIndex<Ix>>,
    /// Parent, a back reference only
    pub parent: Option<NodeIndex<Ix>>,
    /// Height of the subtree rooted here
    pub height: u8,

    /// Interval of the node
    pub interval: Interval<T>,
    /// The max high value of the subtree
    pub max: T,
    /// Value of the node
    pub value: V,
}

// Convenient getter/setter methods
impl<T, V, Ix> Node<T, V, Ix>
where
    T: Copy,
    Ix: IndexType,
{
    pub fn new(interval: Interval<T>, value: V) -> Self {
        Node {
            left: None,
            right: None,
            parent: None,
            height: 1,
            max: interval.high,
            interval,
            value,
        }
    }

    pub fn interval(&self) -> &Interval<T> {
        &self.interval
    }

    pub fn low(&self) -> T {
        self.interval.low
    }

    pub fn max(&self) -> T {
        self.max
    }

    pub fn left(&self) -> Option<NodeIndex<Ix>> {
        self.left
    }

    pub fn right(&self) -> Option<NodeIndex<Ix>> {
        self.right
    }

    pub fn parent(&self) -> Option<NodeIndex<Ix>> {
        self.parent
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    pub fn set_left(left: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<T, V, Ix>) {
        move |node: &mut Node<T, V, Ix>| {
            node.left = left;
        }
    }

    pub fn set_right(right: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<T, V, Ix>) {
        move |node: &mut Node<T, V, Ix>| {
            node.right = right;
        }
    }

    pub fn set_parent(parent: Option<NodeIndex<Ix>>) -> impl FnOnce(&mut Node<T, V, Ix>) {
        move |node: &mut Node<T, V, Ix>| {
            node.parent = parent;
        }
    }

    pub fn set_height(height: u8) -> impl FnOnce(&mut Node<T, V, Ix>) {
        move |node: &mut Node<T, V, Ix>| {
            node.height = height;
        }
    }

    pub fn set_max(max: T) -> impl FnOnce(&mut Node<T, V, Ix>) {
        move |node: &mut Node<T, V, Ix>| {
            node.max = max;
        }
    }
}

impl<T: Copy, V, Ix: IndexType> TreeNode<Ix> for Node<T, V, Ix> {
    fn left(&self) -> Option<NodeIndex<Ix>> {
        self.left
    }
}
