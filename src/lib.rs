//! # libsensitive
//!
//! A byte-level trie matcher for detecting sensitive words in text.
//!
//! A vocabulary is compiled once into a [`Dfa`](dfa::Dfa): a flat arena of
//! trie nodes, each with 255 byte-indexed transitions. Scanning walks the trie
//! from every position of the text and reports every occurrence of every
//! stored word as an inclusive `(start, end)` byte span, up to a caller-chosen
//! cap.
//!
//! ## Features
//!
//! - **Byte-level**: words and text are raw bytes; UTF-8 words match as their
//!   encoded byte sequences
//! - **Overlapping matches**: a word and a longer word sharing its prefix are
//!   both reported
//! - **Bounded**: node capacity bounds memory at build time, the match cap
//!   bounds work at scan time
//! - **Thread-safe**: a built [`Dfa`](dfa::Dfa) is immutable and can be
//!   scanned from many threads; [`SharedDfa`](dfa::SharedDfa) swaps in new
//!   vocabularies while scans are running
//!
//! ## Quick Start
//!
//! ```
//! use libsensitive::dfa::{build_dfa, MatchSpan};
//!
//! let dfa = build_dfa(["bad", "badger", "eval"]).unwrap();
//! let result = dfa.scan("honey badger", 20);
//!
//! assert!(result.found);
//! assert_eq!(
//!     result.matches,
//!     [MatchSpan { start: 6, end: 8 }, MatchSpan { start: 6, end: 11 }]
//! );
//! ```
//!
//! Words shorter than two bytes are ignored and capacity is checked on every
//! node allocation:
//!
//! ```
//! use libsensitive::dfa::{build_dfa_with_config, BuildError, DfaConfig};
//!
//! let config = DfaConfig::default().with_capacity(8);
//! let dfa = build_dfa_with_config(["a", "ok"], config).unwrap();
//! assert!(!dfa.is_match("a"));
//! assert!(dfa.is_match("ok"));
//!
//! let err = build_dfa_with_config(["far too long"], config).unwrap_err();
//! assert_eq!(err, BuildError::CapacityExceeded { capacity: 8 });
//! ```

#![warn(missing_docs)]

/// Core automaton: nodes, builder, scanner and word-list loading.
pub mod dfa;

#[cfg(test)]
mod test {
    use super::dfa::{build_dfa, build_dfa_with_config, BuildError, DfaConfig, MatchSpan};
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn span(start: usize, end: usize) -> MatchSpan {
        MatchSpan { start, end }
    }

    fn small() -> DfaConfig {
        DfaConfig::default().with_capacity(1 << 12)
    }

    #[test]
    fn example_sentence() {
        let dfa = build_dfa_with_config(["bad", "eval", "你好"], small()).unwrap();
        let text = "This is a example, 你好.";
        let result = dfa.scan(text, 20);
        assert!(result.found);
        assert_eq!(
            result.display(text.as_bytes()).to_string(),
            "sensitive word: 你好, offsets: 19 -> 25\n"
        );
    }

    #[test]
    fn repeated_text_is_capped() {
        let dfa = build_dfa_with_config(["你好"], small()).unwrap();
        let text = "你好".repeat(1000);
        let result = dfa.scan(&text, 20);
        assert_eq!(result.matches.len(), 20);
        assert_eq!(result.matches[19], span(19 * 6, 19 * 6 + 5));
    }

    #[test]
    fn capacity_exhaustion_yields_no_automaton() {
        let words = ["alpha", "bravo", "charlie", "delta"];
        let needed = 1 + words.iter().map(|w| w.len()).sum::<usize>();
        let config = DfaConfig::default().with_capacity(needed);
        assert!(build_dfa_with_config(words, config).is_ok());

        let config = DfaConfig::default().with_capacity(needed - 1);
        assert_eq!(
            build_dfa_with_config(words, config).unwrap_err(),
            BuildError::CapacityExceeded {
                capacity: needed - 1
            }
        );
    }

    /// Every `(i, j)` whose bytes are a storable word, in scan order.
    fn naive_matches(words: &[Vec<u8>], text: &[u8]) -> Vec<MatchSpan> {
        let stored = |w: &[u8]| w.len() >= 2 && !w.contains(&0xFF);
        let mut spans = Vec::new();
        for i in 0..text.len() {
            for j in i..text.len() {
                let candidate = &text[i..=j];
                if stored(candidate) && words.iter().any(|w| w.as_slice() == candidate) {
                    spans.push(span(i, j));
                }
            }
        }
        spans
    }

    fn small_alphabet_word() -> impl Strategy<Value = Vec<u8>> {
        vec(prop_oneof![Just(b'a'), Just(b'b'), Just(0xFEu8), Just(0xFFu8)], 0..6)
    }

    proptest! {
        #[test]
        fn single_word_matches_itself(word in vec(0u8..=254, 2..24)) {
            let dfa = build_dfa_with_config([&word], small()).unwrap();
            let result = dfa.scan(&word, 10);
            prop_assert!(result.found);
            prop_assert_eq!(result.matches, vec![span(0, word.len() - 1)]);
        }

        #[test]
        fn scan_agrees_with_naive_search(
            words in vec(small_alphabet_word(), 0..8),
            text in vec(prop_oneof![Just(b'a'), Just(b'b'), Just(0xFEu8), Just(0xFFu8)], 0..40),
            cap in 0u16..50,
        ) {
            let dfa = build_dfa_with_config(&words, small()).unwrap();
            let mut expected = naive_matches(&words, &text);
            expected.truncate(usize::from(cap));
            let result = dfa.scan(&text, cap);
            prop_assert_eq!(result.found, !expected.is_empty());
            prop_assert_eq!(result.matches, expected);
        }

        #[test]
        fn duplicate_insertion_changes_nothing(
            words in vec(small_alphabet_word(), 0..8),
            text in vec(prop_oneof![Just(b'a'), Just(b'b')], 0..40),
        ) {
            let once = build_dfa_with_config(&words, small()).unwrap();
            let twice = build_dfa_with_config(words.iter().chain(&words), small()).unwrap();
            prop_assert_eq!(once.node_count(), twice.node_count());
            prop_assert_eq!(once.scan(&text, u16::MAX), twice.scan(&text, u16::MAX));
        }
    }
}
