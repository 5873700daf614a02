/// The built, immutable automaton.
pub mod automaton;
/// Automaton builder inserting words byte by byte.
pub mod builder;
/// Build-time configuration.
pub mod config;
/// Trie node type and the absent-transition sentinel.
pub mod node;
/// Internal capacity-bounded node pool.
pub(crate) mod node_arena;
/// Finding occurrences of stored words in text.
pub mod scanner;
/// Hot-swappable automaton shared between threads.
pub mod shared;
/// Loading word lists from files.
pub mod wordlist;

pub use automaton::Dfa;
pub use builder::{build_dfa, build_dfa_with_config, BuildError, Builder, IntoWord};
pub use config::{DfaConfig, DEFAULT_CAPACITY, DEFAULT_MIN_WORD_LEN};
pub use node::{ByteSet, DfaNode, NodeIndex, ALPHABET_SIZE};
pub use scanner::{MatchSpan, Matches, ScanReport, ScanResult};
pub use shared::SharedDfa;
pub use wordlist::{
    build_dfa_from_file, build_dfa_from_reader, read_words, read_words_from_file, LoadError,
};
#[cfg(feature = "serde")]
pub use wordlist::{read_words_json, read_words_json_from_file};
