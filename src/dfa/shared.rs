use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use super::automaton::Dfa;
use super::builder::{build_dfa_with_config, BuildError, IntoWord};
use super::config::DfaConfig;
use super::scanner::ScanResult;

/// A sensitive-word automaton whose vocabulary can be replaced while it is
/// being scanned.
///
/// Scans run against a snapshot (`Arc<Dfa>`) taken under a short read lock.
/// [`update`](SharedDfa::update) builds a complete new automaton without
/// holding that lock, then swaps it in; the previous automaton is freed once
/// the last scan still using it finishes.
///
/// # Examples
///
/// ```
/// use libsensitive::dfa::{DfaConfig, SharedDfa};
///
/// let words = SharedDfa::new(["bad", "eval"], DfaConfig::default()).unwrap();
/// assert!(words.check("no eval here", 20).found);
///
/// assert!(words.update(["worse"]).unwrap());
/// assert!(!words.check("no eval here", 20).found);
/// assert!(words.check("even worse", 20).found);
/// ```
pub struct SharedDfa {
    config: DfaConfig,
    current: RwLock<Arc<Dfa>>,
    updating: Mutex<()>,
}

impl SharedDfa {
    /// Builds the initial automaton.
    ///
    /// # Errors
    ///
    /// Fails like [`build_dfa_with_config`].
    pub fn new<W: IntoWord>(
        words: impl IntoIterator<Item = W>,
        config: DfaConfig,
    ) -> Result<Self, BuildError> {
        Ok(SharedDfa {
            config,
            current: RwLock::new(Arc::new(build_dfa_with_config(words, config)?)),
            updating: Mutex::new(()),
        })
    }

    /// Wraps an already built automaton. Later updates reuse its configuration.
    pub fn from_dfa(dfa: Dfa) -> Self {
        SharedDfa {
            config: *dfa.config(),
            current: RwLock::new(Arc::new(dfa)),
            updating: Mutex::new(()),
        }
    }

    /// Replaces the whole vocabulary.
    ///
    /// Returns `Ok(false)` without building anything if another update is
    /// already in progress, and `Ok(true)` once the new vocabulary is live.
    ///
    /// # Errors
    ///
    /// Fails like [`build_dfa_with_config`]; the previous vocabulary stays in
    /// place.
    pub fn update<W: IntoWord>(&self, words: impl IntoIterator<Item = W>) -> Result<bool, BuildError> {
        let _guard = match self.updating.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                tracing::debug!("vocabulary update already in progress, skipping");
                return Ok(false);
            }
        };
        let dfa = Arc::new(build_dfa_with_config(words, self.config)?);
        let (nodes, words) = (dfa.node_count(), dfa.word_count());
        // The old automaton is dropped outside the lock, or later by its last reader.
        let _old = std::mem::replace(
            &mut *self.current.write().unwrap_or_else(PoisonError::into_inner),
            dfa,
        );
        tracing::info!(nodes, words, "sensitive-word vocabulary replaced");
        Ok(true)
    }

    /// Returns the automaton currently in use.
    pub fn snapshot(&self) -> Arc<Dfa> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Scans `text` against the current vocabulary. See [`Dfa::scan`].
    pub fn check(&self, text: impl AsRef<[u8]>, max_matches: u16) -> ScanResult {
        self.snapshot().scan(text, max_matches)
    }

    /// True if any word of the current vocabulary occurs in `text`.
    pub fn is_match(&self, text: impl AsRef<[u8]>) -> bool {
        self.snapshot().is_match(text)
    }

    /// Returns the configuration used for every build.
    pub fn config(&self) -> &DfaConfig {
        &self.config
    }
}

impl std::fmt::Debug for SharedDfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDfa")
            .field("current", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dfa::build_dfa;

    fn small() -> DfaConfig {
        DfaConfig::default().with_capacity(64)
    }

    #[test]
    fn update_replaces_vocabulary() {
        let shared = SharedDfa::new(["bad"], small()).unwrap();
        assert!(shared.is_match("so bad"));

        assert_eq!(shared.update(["eval"]), Ok(true));
        assert!(!shared.is_match("so bad"));
        assert!(shared.is_match("eval()"));
    }

    #[test]
    fn failed_update_keeps_previous_vocabulary() {
        let shared = SharedDfa::new(["bad"], DfaConfig::default().with_capacity(4)).unwrap();
        let err = shared.update(["much too long"]).unwrap_err();
        assert_eq!(err, BuildError::CapacityExceeded { capacity: 4 });
        assert!(shared.is_match("bad"));
    }

    #[test]
    fn snapshot_outlives_update() {
        let shared = SharedDfa::new(["bad"], small()).unwrap();
        let before = shared.snapshot();
        shared.update(["good"]).unwrap();
        assert!(before.is_match("bad"));
        assert!(!before.is_match("good"));
        assert!(shared.snapshot().is_match("good"));
    }

    #[test]
    fn concurrent_update_is_skipped() {
        let shared = SharedDfa::new(["bad"], small()).unwrap();
        let _busy = shared.updating.lock().unwrap();
        assert_eq!(shared.update(["good"]), Ok(false));
        assert!(shared.is_match("bad"));
    }

    #[test]
    fn from_dfa_keeps_config() {
        let dfa = build_dfa(["ab"]).unwrap();
        let shared = SharedDfa::from_dfa(dfa);
        assert_eq!(shared.config(), &DfaConfig::default());
        assert_eq!(shared.check("xab", 5).offsets(), vec![1, 2]);
    }

    #[test]
    fn readers_and_updater_in_parallel() {
        let shared = SharedDfa::new(["alpha"], small()).unwrap();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let result = shared.check("alpha beta", 4);
                        // Either vocabulary is live, never a mix.
                        assert!(result.matches.len() == 1, "{result:?}");
                    }
                });
            }
            s.spawn(|| {
                for i in 0..20 {
                    let word = if i % 2 == 0 { "beta" } else { "alpha" };
                    shared.update([word]).unwrap();
                }
            });
        });
    }
}
