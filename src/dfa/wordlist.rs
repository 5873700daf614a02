//! Loading vocabularies from files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
#[cfg(feature = "serde")]
use std::io::Read;
use std::path::Path;

use super::automaton::Dfa;
use super::builder::{BuildError, Builder};
use super::config::DfaConfig;

/// Errors that can occur when building an automaton from a word file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The word list could not be read.
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),

    /// The word list is not a JSON array of strings.
    #[cfg(feature = "serde")]
    #[error("failed to parse word list: {0}")]
    Json(#[from] serde_json::Error),

    /// The words were read but the automaton could not be built.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Reads one word per line.
///
/// Trailing `\n` and `\r\n` are removed. Empty lines and lines whose first
/// non-blank byte is `#` are skipped. Lines are kept as raw bytes, so the
/// input does not need to be valid UTF-8.
pub fn read_words(reader: impl BufRead) -> io::Result<Vec<Vec<u8>>> {
    let mut words = Vec::new();
    for_each_word(reader, |word| {
        words.push(word.to_vec());
        Ok::<_, io::Error>(())
    })?;
    Ok(words)
}

/// Reads one word per line from the file at `path`. See [`read_words`].
pub fn read_words_from_file(path: impl AsRef<Path>) -> io::Result<Vec<Vec<u8>>> {
    read_words(BufReader::new(File::open(path)?))
}

/// Reads a JSON array of strings, e.g. `["bad", "eval"]`.
#[cfg(feature = "serde")]
pub fn read_words_json(reader: impl Read) -> Result<Vec<String>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Reads a JSON array of strings from the file at `path`.
#[cfg(feature = "serde")]
pub fn read_words_json_from_file(path: impl AsRef<Path>) -> Result<Vec<String>, LoadError> {
    read_words_json(BufReader::new(File::open(path)?))
}

/// Builds an automaton from a word file with one word per line.
///
/// Words are inserted while the file is read, without collecting the whole
/// list first.
///
/// # Examples
///
/// ```no_run
/// use libsensitive::dfa::{build_dfa_from_file, DfaConfig};
///
/// let dfa = build_dfa_from_file("sensitive_words.txt", DfaConfig::default()).unwrap();
/// ```
pub fn build_dfa_from_file(path: impl AsRef<Path>, config: DfaConfig) -> Result<Dfa, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    build_dfa_from_reader(reader, config)
}

/// Builds an automaton from a reader with one word per line.
pub fn build_dfa_from_reader(reader: impl BufRead, config: DfaConfig) -> Result<Dfa, LoadError> {
    let mut builder = Builder::with_config(config)?;
    for_each_word(reader, |word| {
        builder.insert_word(word)?;
        Ok::<_, LoadError>(())
    })?;
    Ok(builder.build()?)
}

fn for_each_word<E: From<io::Error>>(
    mut reader: impl BufRead,
    mut f: impl FnMut(&[u8]) -> Result<(), E>,
) -> Result<(), E> {
    // Reuse one buffer for every line instead of allocating per line.
    let mut buf = Vec::with_capacity(80);
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let word = trim_line_end(&buf);
        if !word.is_empty() && !is_comment(word) {
            f(word)?;
        }
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Returns true if this line is a comment.
pub(crate) fn is_comment(line: &[u8]) -> bool {
    line.trim_ascii_start().starts_with(b"#")
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn comment_that_starts_with_pound() {
        assert!(is_comment(b"# This is a comment"));
    }

    #[test]
    fn comment_with_whitespace_before_pound() {
        assert!(is_comment(b"        # This is a comment with whitespace"));
    }

    #[test]
    fn non_comment() {
        assert!(!is_comment(b"REVERBERATE"));
        assert!(!is_comment(b" REVERBERATE"));
    }

    #[test]
    fn reads_lines_skipping_blanks_and_comments() {
        let input = "bad\r\n# comment\n\neval\n  spaced  \n你好";
        let words = read_words(Cursor::new(input)).unwrap();
        assert_eq!(
            words,
            vec![
                b"bad".to_vec(),
                b"eval".to_vec(),
                b"  spaced  ".to_vec(),
                "你好".as_bytes().to_vec(),
            ]
        );
    }

    #[test]
    fn lines_need_not_be_utf8() {
        let words = read_words(Cursor::new(&b"\x80\x81\nok\n"[..])).unwrap();
        assert_eq!(words, vec![vec![0x80, 0x81], b"ok".to_vec()]);
    }

    #[test]
    fn build_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# vocabulary").unwrap();
        writeln!(file, "bad").unwrap();
        writeln!(file, "badger").unwrap();
        writeln!(file, "x").unwrap();
        file.flush().unwrap();

        let dfa = build_dfa_from_file(file.path(), DfaConfig::default()).unwrap();
        assert_eq!(dfa.word_count(), 2);
        assert!(dfa.contains("bad"));
        assert!(dfa.contains("badger"));
        assert!(!dfa.contains("x"));

        assert_eq!(read_words_from_file(file.path()).unwrap().len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = build_dfa_from_file(dir.path().join("missing.txt"), DfaConfig::default());
        assert!(matches!(res, Err(LoadError::Io(_))));
    }

    #[test]
    fn capacity_error_stops_reading() {
        let config = DfaConfig::default().with_capacity(3);
        let res = build_dfa_from_reader(Cursor::new("abc\nde\n"), config);
        assert!(matches!(
            res,
            Err(LoadError::Build(BuildError::CapacityExceeded { capacity: 3 }))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn reads_json_array() {
        let words = read_words_json(Cursor::new(r#"["bad", "eval", "你好"]"#)).unwrap();
        assert_eq!(words, vec!["bad", "eval", "你好"]);

        let res = read_words_json(Cursor::new(r#"{"bad": 1}"#));
        assert!(matches!(res, Err(LoadError::Json(_))));
    }
}
