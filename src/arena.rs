//! Slot table owning the nodes of one tree.
//!
//! Nodes are addressed by [`NodeIndex`] and never move. Freed slots are kept on an
//! intrusive free list and handed out again before the table grows.

use std::ops::{Index, IndexMut};

use log::{trace, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::{DefaultIx, IndexType, NodeIndex};

#[derive(Debug)]
enum Slot<N, Ix> {
    Occupied(N),
    /// Link to the next free slot
    Vacant(Option<NodeIndex<Ix>>),
}

/// Node storage of a tree.
#[derive(Debug)]
pub(crate) struct Arena<N, Ix = DefaultIx> {
    /// Vector that stores slots
    slots: Vec<Slot<N, Ix>>,
    /// Head of the free list
    free: Option<NodeIndex<Ix>>,
    /// Number of occupied slots
    len: usize,
    /// Largest number of occupied slots
    capacity: usize,
}

impl<N, Ix> Arena<N, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn with_config(config: &Config) -> Self {
        // the largest index value itself is never handed out
        let addressable = <Ix as IndexType>::max().index();
        let capacity = config.max_nodes.map_or(addressable, |n| n.min(addressable));
        Arena {
            slots: Vec::with_capacity(config.initial_capacity.min(capacity)),
            free: None,
            len: 0,
            capacity,
        }
    }

    /// Store a node, returning its handle.
    ///
    /// Fails without side effects when `capacity` nodes are already live.
    pub(crate) fn alloc(&mut self, node: N) -> Result<NodeIndex<Ix>> {
        if self.len >= self.capacity {
            warn!("node arena exhausted at {} nodes", self.capacity);
            return Err(Error::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        let idx = match self.free {
            Some(idx) => {
                let slot = &mut self.slots[idx.index()];
                if let Slot::Vacant(next) = *slot {
                    self.free = next;
                }
                *slot = Slot::Occupied(node);
                trace!("reusing free slot {idx:?}");
                idx
            }
            None => {
                let idx = NodeIndex::new(self.slots.len());
                if self.slots.len() == self.slots.capacity() {
                    trace!("growing node arena past {} slots", self.slots.len());
                }
                self.slots.push(Slot::Occupied(node));
                idx
            }
        };
        self.len += 1;
        Ok(idx)
    }

    /// Vacate a slot, returning the node it held.
    pub(crate) fn free(&mut self, idx: NodeIndex<Ix>) -> Option<N> {
        let slot = self.slots.get_mut(idx.index())?;
        match std::mem::replace(slot, Slot::Vacant(self.free)) {
            Slot::Occupied(node) => {
                self.free = Some(idx);
                self.len -= 1;
                Some(node)
            }
            vacant => {
                *slot = vacant;
                None
            }
        }
    }

    pub(crate) fn get(&self, idx: NodeIndex<Ix>) -> Option<&N> {
        match self.slots.get(idx.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, idx: NodeIndex<Ix>) -> Option<&mut N> {
        match self.slots.get_mut(idx.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.len = 0;
    }
}

impl<N, Ix: IndexType> Index<NodeIndex<Ix>> for Arena<N, Ix> {
    type Output = N;

    /// # Panics
    ///
    /// Panics when the slot is vacant; trees only hold handles of live nodes.
    #[inline]
    fn index(&self, idx: NodeIndex<Ix>) -> &N {
        match &self.slots[idx.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => panic!("dangling node handle {idx:?}"),
        }
    }
}

impl<N, Ix: IndexType> IndexMut<NodeIndex<Ix>> for Arena<N, Ix> {
    #[inline]
    fn index_mut(&mut self, idx: NodeIndex<Ix>) -> &mut N {
        match &mut self.slots[idx.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant(_) => panic!("dangling node handle {idx:?}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn arena(max_nodes: usize) -> Arena<&'static str> {
        Arena::with_config(&Config::new().with_max_nodes(max_nodes))
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = arena(8);
        let a = arena.alloc("a").unwrap();
        let b = arena.alloc("b").unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.free(a), Some("a"));
        assert_eq!(arena.free(a), None);
        assert_eq!(arena.get(a), None);
        let c = arena.alloc("c").unwrap();
        assert_eq!(c, a);
        assert_eq!(arena[c], "c");
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn double_free_keeps_free_list_intact() {
        let mut arena = arena(8);
        let a = arena.alloc("a").unwrap();
        let b = arena.alloc("b").unwrap();
        assert_eq!(arena.free(a), Some("a"));
        assert_eq!(arena.free(a), None);
        assert_eq!(arena.free(b), Some("b"));
        assert_eq!(arena.free(b), None);
        assert!(arena.is_empty());
        assert_eq!(arena.alloc("c").unwrap(), b);
        assert_eq!(arena.alloc("d").unwrap(), a);
        assert_eq!(arena.alloc("e").unwrap(), NodeIndex::new(2));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut arena = arena(2);
        let a = arena.alloc("a").unwrap();
        arena.alloc("b").unwrap();
        assert_eq!(
            arena.alloc("c"),
            Err(Error::CapacityExhausted { capacity: 2 })
        );
        assert_eq!(arena.len(), 2);
        arena.free(a);
        assert!(arena.alloc("c").is_ok());
    }

    #[test]
    fn index_type_bounds_capacity() {
        let arena: Arena<(), u16> = Arena::with_config(&Config::new());
        assert_eq!(arena.capacity(), u16::MAX as usize);
        let arena: Arena<(), u16> = Arena::with_config(&Config::new().with_max_nodes(10));
        assert_eq!(arena.capacity(), 10);
    }

    #[test]
    fn clear_drops_everything() {
        let mut arena = arena(4);
        let a = arena.alloc("a").unwrap();
        arena.alloc("b").unwrap();
        arena.free(a);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.alloc("c").unwrap(), NodeIndex::new(0));
    }

    #[test]
    #[should_panic(expected = "dangling node handle")]
    fn indexing_a_vacant_slot_panics() {
        let mut arena = arena(4);
        let a = arena.alloc("a").unwrap();
        arena.free(a);
        let _node: &str = arena[a];
    }
}
