use std::collections::TryReserveError;

use smallvec::SmallVec;

use super::automaton::Dfa;
use super::config::DfaConfig;
use super::node::{NodeIndex, ALPHABET_SIZE};
use super::node_arena::NodeArena;

/// Trait for types that can be used as a word when building an automaton.
///
/// Implemented for common string and byte sequence types so that
/// [`Builder::insert_word`] and [`build_dfa`] accept them directly. Words are
/// raw bytes: a `&str` contributes its UTF-8 encoding.
pub trait IntoWord {
    /// Collects this word into a byte buffer.
    fn collect_word(self) -> SmallVec<[u8; 32]>;
}

// String types → UTF-8 bytes

impl IntoWord for &str {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoWord for &&str {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

impl IntoWord for String {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_vec(self.into_bytes())
    }
}

impl IntoWord for &String {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self.as_bytes())
    }
}

// Byte sequences

impl IntoWord for &[u8] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl IntoWord for Vec<u8> {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_vec(self)
    }
}

impl IntoWord for &Vec<u8> {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

impl<const N: usize> IntoWord for [u8; N] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(&self)
    }
}

impl<const N: usize> IntoWord for &[u8; N] {
    fn collect_word(self) -> SmallVec<[u8; 32]> {
        SmallVec::from_slice(self)
    }
}

/// Errors that can occur while building an automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The vocabulary needs more nodes than the configured capacity allows.
    #[error("node capacity of {capacity} exceeded, raise DfaConfig::capacity")]
    CapacityExceeded {
        /// The configured node capacity.
        capacity: usize,
    },

    /// The node pool could not be allocated or grown.
    #[error("failed to allocate node pool: {0}")]
    AllocationFailure(#[from] TryReserveError),
}

/// Inserts words one at a time into a fresh automaton.
///
/// Words may be added in any order and duplicates are harmless. Once an
/// insertion fails the builder is unusable: every later call returns the same
/// error and [`build`](Builder::build) never yields a partial automaton.
pub struct Builder {
    arena: NodeArena,
    config: DfaConfig,
    words: usize,
    ignored: usize,
    failure: Option<BuildError>,
}

impl Builder {
    /// Creates a builder with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::AllocationFailure`] if the node pool cannot be
    /// reserved.
    pub fn new() -> Result<Self, BuildError> {
        Self::with_config(DfaConfig::default())
    }

    /// Creates a builder whose arena holds at most `config.capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CapacityExceeded`] for a zero capacity and
    /// [`BuildError::AllocationFailure`] if the pool cannot be reserved.
    pub fn with_config(config: DfaConfig) -> Result<Self, BuildError> {
        Ok(Builder {
            arena: NodeArena::with_capacity(config.capacity)?,
            config,
            words: 0,
            ignored: 0,
            failure: None,
        })
    }

    /// Adds a word to the automaton being constructed.
    ///
    /// Returns `Ok(false)` if the word was skipped: words shorter than
    /// [`DfaConfig::min_word_len`] and words containing the byte `0xFF` are
    /// not stored.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CapacityExceeded`] as soon as a node would be
    /// allocated past the capacity, and [`BuildError::AllocationFailure`] if
    /// the pool cannot grow. Either error poisons the builder.
    pub fn insert_word(&mut self, word: impl IntoWord) -> Result<bool, BuildError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let word = word.collect_word();
        match self.insert_bytes(&word) {
            Ok(inserted) => {
                if inserted {
                    self.words += 1;
                } else {
                    self.ignored += 1;
                }
                Ok(inserted)
            }
            Err(err) => {
                tracing::warn!(
                    nodes = self.arena.len(),
                    capacity = self.arena.capacity(),
                    "automaton construction aborted: {err}"
                );
                self.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    fn insert_bytes(&mut self, word: &[u8]) -> Result<bool, BuildError> {
        if word.len() < self.config.min_len() {
            tracing::trace!(len = word.len(), "ignoring short word");
            return Ok(false);
        }
        if word.iter().any(|&b| usize::from(b) >= ALPHABET_SIZE) {
            tracing::warn!(
                word = %String::from_utf8_lossy(word),
                "ignoring word containing byte 0xFF"
            );
            return Ok(false);
        }
        let Some((&last, prefix)) = word.split_last() else {
            return Ok(false);
        };

        let mut state = NodeIndex::ROOT;
        for &byte in prefix {
            state = self.child_or_insert(state, byte)?;
        }
        // The end flag lives on the node the last byte is consumed from.
        self.child_or_insert(state, last)?;
        self.arena[state].mark_end(last);
        Ok(true)
    }

    fn child_or_insert(&mut self, state: NodeIndex, byte: u8) -> Result<NodeIndex, BuildError> {
        if let Some(child) = self.arena[state].get(byte) {
            return Ok(child);
        }
        let child = self.arena.alloc()?;
        self.arena[state].set(byte, child);
        Ok(child)
    }

    /// Returns the number of nodes allocated so far, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Finalizes construction and returns the automaton.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failed insertion, if any. The partially
    /// built arena is dropped.
    pub fn build(mut self) -> Result<Dfa, BuildError> {
        if let Some(err) = self.failure {
            return Err(err);
        }
        self.arena.shrink_to_fit();
        tracing::debug!(
            nodes = self.arena.len(),
            words = self.words,
            ignored = self.ignored,
            capacity = self.arena.capacity(),
            "automaton built"
        );
        Ok(Dfa::new(self.arena, self.config, self.words))
    }
}

/// Builds an automaton from an iterator of words with the default
/// configuration.
///
/// Each word must implement [`IntoWord`], so `&str`, `String`, byte slices,
/// vectors and arrays are all accepted. Words shorter than two bytes are
/// skipped.
///
/// # Examples
///
/// ```
/// use libsensitive::dfa::build_dfa;
///
/// let dfa = build_dfa(["bad", "badger"]).unwrap();
/// let result = dfa.scan("a badger", 10);
/// assert!(result.found);
/// assert_eq!(result.offsets(), vec![2, 4, 2, 7]);
/// ```
///
/// Building from byte sequences:
///
/// ```
/// use libsensitive::dfa::build_dfa;
///
/// let words: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![200, 201]];
/// let dfa = build_dfa(words).unwrap();
/// assert!(dfa.is_match([0u8, 200, 201]));
/// assert!(!dfa.is_match([1u8, 2]));
/// ```
pub fn build_dfa<W: IntoWord>(
    words: impl IntoIterator<Item = W>,
) -> Result<Dfa, BuildError> {
    build_dfa_with_config(words, DfaConfig::default())
}

/// Builds an automaton from an iterator of words.
///
/// # Errors
///
/// Fails with [`BuildError::CapacityExceeded`] as soon as the vocabulary needs
/// more than `config.capacity` nodes; no automaton is returned and nothing is
/// left to clean up.
///
/// ```
/// use libsensitive::dfa::{build_dfa_with_config, BuildError, DfaConfig};
///
/// let config = DfaConfig::default().with_capacity(3);
/// assert!(build_dfa_with_config(["ab"], config).is_ok());
/// assert_eq!(
///     build_dfa_with_config(["abc"], config).unwrap_err(),
///     BuildError::CapacityExceeded { capacity: 3 },
/// );
/// ```
pub fn build_dfa_with_config<W: IntoWord>(
    words: impl IntoIterator<Item = W>,
    config: DfaConfig,
) -> Result<Dfa, BuildError> {
    let mut builder = Builder::with_config(config)?;
    for word in words {
        builder.insert_word(word)?;
    }
    builder.build()
}
