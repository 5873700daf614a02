use std::fmt;

use super::config::DfaConfig;
use super::node::{DfaNode, NodeIndex};
use super::node_arena::NodeArena;

/// A built, immutable sensitive-word automaton.
///
/// Produced by [`Builder::build`](super::Builder::build) or
/// [`build_dfa`](super::build_dfa). The node table is never modified after
/// construction, so a `Dfa` can be shared between threads and scanned
/// concurrently through `&Dfa`. All memory is released when it is dropped.
pub struct Dfa {
    arena: NodeArena,
    config: DfaConfig,
    words: usize,
}

impl Dfa {
    pub(crate) fn new(arena: NodeArena, config: DfaConfig, words: usize) -> Self {
        Dfa {
            arena,
            config,
            words,
        }
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &DfaNode {
        &self.arena[NodeIndex::ROOT]
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not produced by this automaton.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &DfaNode {
        &self.arena[index]
    }

    /// Iterates over all nodes in allocation order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &DfaNode> + '_ {
        self.arena.iter()
    }

    /// Returns the number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns the node capacity this automaton was built with.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the number of accepted insertions, duplicates included.
    pub fn word_count(&self) -> usize {
        self.words
    }

    /// Returns the total number of end markers over all nodes, which equals
    /// the number of distinct stored words.
    pub fn end_marker_count(&self) -> usize {
        self.nodes().map(|n| n.ends().len()).sum()
    }

    /// Returns the configuration used to build this automaton.
    pub fn config(&self) -> &DfaConfig {
        &self.config
    }

    /// True if `word` is exactly one of the stored words.
    pub fn contains(&self, word: impl AsRef<[u8]>) -> bool {
        let Some((&last, prefix)) = word.as_ref().split_last() else {
            return false;
        };
        prefix
            .iter()
            .try_fold(NodeIndex::ROOT, |state, &b| self.node(state).get(b))
            .is_some_and(|state| self.node(state).is_end(last))
    }
}

impl fmt::Debug for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dfa")
            .field("nodes", &self.node_count())
            .field("words", &self.words)
            .field("config", &self.config)
            .finish()
    }
}
