//! A flat, capacity-bounded arena for automaton nodes.
//!
//! Nodes are addressed by [`NodeIndex`] and never freed individually; the
//! whole pool is released when the arena is dropped.

use std::ops::{Index, IndexMut};

use super::builder::BuildError;
use super::node::{DfaNode, NodeIndex};

/// Nodes reserved up front. The pool grows towards its capacity on demand.
const INITIAL_RESERVE: usize = 1024;

/// Append-only node pool with a hard upper bound on the number of nodes.
pub(crate) struct NodeArena {
    nodes: Vec<DfaNode>,
    capacity: usize,
}

impl NodeArena {
    /// Creates an arena holding only the root node.
    ///
    /// `capacity` is clamped to what a [`NodeIndex`] can address. A capacity
    /// of zero cannot hold the root and fails with
    /// [`BuildError::CapacityExceeded`].
    pub fn with_capacity(capacity: usize) -> Result<Self, BuildError> {
        let capacity = capacity.min(NodeIndex::MAX_NODES);
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(capacity.min(INITIAL_RESERVE))?;
        let mut arena = NodeArena { nodes, capacity };
        let root = arena.alloc()?;
        debug_assert_eq!(root, NodeIndex::ROOT);
        Ok(arena)
    }

    /// Allocates an empty node and returns its index.
    ///
    /// The capacity check happens before anything is written, so a full arena
    /// is left untouched.
    pub fn alloc(&mut self) -> Result<NodeIndex, BuildError> {
        let len = self.nodes.len();
        if len >= self.capacity {
            return Err(BuildError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if len == self.nodes.capacity() {
            // Double, but never reserve past the configured ceiling.
            let additional = len.clamp(1, self.capacity - len);
            self.nodes.try_reserve_exact(additional)?;
        }
        self.nodes.push(DfaNode::new());
        Ok(NodeIndex::new(len))
    }

    /// Returns the number of nodes allocated in this arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the maximum number of nodes this arena may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over every allocated node in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, DfaNode> {
        self.nodes.iter()
    }

    /// Gives back any reserved memory beyond the nodes in use.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

impl Index<NodeIndex> for NodeArena {
    type Output = DfaNode;

    #[inline]
    fn index(&self, index: NodeIndex) -> &DfaNode {
        &self.nodes[index.index()]
    }
}

impl IndexMut<NodeIndex> for NodeArena {
    #[inline]
    fn index_mut(&mut self, index: NodeIndex) -> &mut DfaNode {
        &mut self.nodes[index.index()]
    }
}
