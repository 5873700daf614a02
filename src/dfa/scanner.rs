use std::fmt;
use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use hashbrown::HashSet;

use super::automaton::Dfa;
use super::node::NodeIndex;

/// One occurrence of a stored word in scanned text.
///
/// Both offsets are inclusive byte positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSpan {
    /// Offset of the first byte of the occurrence.
    pub start: usize,
    /// Offset of the last byte of the occurrence.
    pub end: usize,
}

impl MatchSpan {
    /// Returns the length of the occurrence in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false: a span covers at least one byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the inclusive byte range of the occurrence.
    #[inline]
    pub fn range(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Returns the matched bytes of `text`.
    ///
    /// # Panics
    ///
    /// Panics if `text` is not the buffer this span was found in (or one at
    /// least as long).
    #[inline]
    pub fn slice<'t>(&self, text: &'t [u8]) -> &'t [u8] {
        &text[self.range()]
    }
}

/// Outcome of [`Dfa::scan`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult {
    /// True if at least one occurrence was recorded.
    pub found: bool,
    /// Occurrences ordered by start offset, then by end offset.
    pub matches: Vec<MatchSpan>,
}

impl ScanResult {
    /// Returns the spans as a flat `[start, end, start, end, ...]` list.
    pub fn offsets(&self) -> Vec<usize> {
        self.matches.iter().flat_map(|m| [m.start, m.end]).collect()
    }

    /// Returns the distinct matched words of `text`.
    pub fn words<'t>(&self, text: &'t [u8]) -> HashSet<&'t [u8]> {
        self.matches.iter().map(|m| m.slice(text)).collect()
    }

    /// Returns a printable report listing each matched word with its offsets.
    ///
    /// Matched bytes that are not valid UTF-8 are shown lossily.
    pub fn display<'a>(&'a self, text: &'a [u8]) -> ScanReport<'a> {
        ScanReport { result: self, text }
    }
}

/// Human-readable listing of a [`ScanResult`], one line per occurrence.
///
/// The end offset is printed exclusive so that `start -> end` reads as a
/// slice range.
pub struct ScanReport<'a> {
    result: &'a ScanResult,
    text: &'a [u8],
}

impl fmt::Display for ScanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.result.matches {
            writeln!(
                f,
                "sensitive word: {}, offsets: {} -> {}",
                String::from_utf8_lossy(m.slice(self.text)),
                m.start,
                m.end + 1
            )?;
        }
        Ok(())
    }
}

/// Lazy iterator over every occurrence of a stored word in a text.
///
/// Created by [`Dfa::find_iter`]. A walk is started from the root at every
/// text position; a walk continues past a match so that a shorter word and a
/// longer word sharing its prefix are both reported.
#[derive(Clone)]
pub struct Matches<'d, 't> {
    dfa: &'d Dfa,
    text: &'t [u8],
    start: usize,
    pos: usize,
    state: NodeIndex,
}

impl<'d, 't> Matches<'d, 't> {
    fn new(dfa: &'d Dfa, text: &'t [u8]) -> Self {
        Matches {
            dfa,
            text,
            start: 0,
            pos: 0,
            state: NodeIndex::ROOT,
        }
    }

    fn restart_at_next_position(&mut self) {
        self.start += 1;
        self.pos = self.start;
        self.state = NodeIndex::ROOT;
    }
}

impl Iterator for Matches<'_, '_> {
    type Item = MatchSpan;

    fn next(&mut self) -> Option<MatchSpan> {
        while self.start < self.text.len() {
            let Some(&byte) = self.text.get(self.pos) else {
                self.restart_at_next_position();
                continue;
            };
            let node = self.dfa.node(self.state);
            let Some(child) = node.get(byte) else {
                self.restart_at_next_position();
                continue;
            };
            let hit = node.is_end(byte);
            self.state = child;
            self.pos += 1;
            if hit {
                return Some(MatchSpan {
                    start: self.start,
                    end: self.pos - 1,
                });
            }
        }
        None
    }
}

impl FusedIterator for Matches<'_, '_> {}

impl Dfa {
    /// Returns an iterator over every occurrence of a stored word in `text`,
    /// ordered by start offset, then by end offset.
    ///
    /// ```
    /// use libsensitive::dfa::{build_dfa, MatchSpan};
    ///
    /// let dfa = build_dfa(["bad"]).unwrap();
    /// let spans: Vec<_> = dfa.find_iter("bad bad").collect();
    /// assert_eq!(
    ///     spans,
    ///     [MatchSpan { start: 0, end: 2 }, MatchSpan { start: 4, end: 6 }]
    /// );
    /// ```
    pub fn find_iter<'d, 't, T>(&'d self, text: &'t T) -> Matches<'d, 't>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        Matches::new(self, text.as_ref())
    }

    /// Scans `text` and records at most `max_matches` occurrences.
    ///
    /// The cap is global: once it is reached scanning stops and later
    /// occurrences are dropped. A cap of zero always yields an empty,
    /// not-found result.
    ///
    /// ```
    /// use libsensitive::dfa::build_dfa;
    ///
    /// let dfa = build_dfa(["aa"]).unwrap();
    /// assert_eq!(dfa.scan("aaaa", 10).matches.len(), 3);
    /// assert_eq!(dfa.scan("aaaa", 1).matches.len(), 1);
    /// assert!(!dfa.scan("aaaa", 0).found);
    /// ```
    pub fn scan(&self, text: impl AsRef<[u8]>, max_matches: u16) -> ScanResult {
        let matches: Vec<MatchSpan> = self
            .find_iter(text.as_ref())
            .take(usize::from(max_matches))
            .collect();
        ScanResult {
            found: !matches.is_empty(),
            matches,
        }
    }

    /// True if any stored word occurs in `text`.
    pub fn is_match(&self, text: impl AsRef<[u8]>) -> bool {
        self.find_iter(text.as_ref()).next().is_some()
    }
}
