#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default node capacity.
///
/// At roughly 1 KiB per node this bounds an automaton to about 3 GiB.
pub const DEFAULT_CAPACITY: usize = 3_000_000;

/// Default minimum word length in bytes. Shorter words are ignored.
pub const DEFAULT_MIN_WORD_LEN: usize = 2;

/// Build-time settings for an automaton.
///
/// # Examples
///
/// ```
/// use libsensitive::dfa::DfaConfig;
///
/// let config = DfaConfig::default().with_capacity(10_000).with_min_word_len(3);
/// assert_eq!(config.capacity, 10_000);
/// assert_eq!(config.min_word_len, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DfaConfig {
    /// Maximum number of nodes, root included. Building a vocabulary that
    /// needs more fails with
    /// [`BuildError::CapacityExceeded`](super::BuildError::CapacityExceeded).
    pub capacity: usize,
    /// Words shorter than this many bytes are silently skipped.
    pub min_word_len: usize,
}

impl DfaConfig {
    /// Sets the node capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the minimum word length. Empty words can never be stored, so
    /// values below 1 are raised to 1.
    pub fn with_min_word_len(mut self, min_word_len: usize) -> Self {
        self.min_word_len = min_word_len.max(1);
        self
    }

    /// The effective minimum word length.
    pub(crate) fn min_len(&self) -> usize {
        self.min_word_len.max(1)
    }
}

impl Default for DfaConfig {
    fn default() -> Self {
        DfaConfig {
            capacity: DEFAULT_CAPACITY,
            min_word_len: DEFAULT_MIN_WORD_LEN,
        }
    }
}
