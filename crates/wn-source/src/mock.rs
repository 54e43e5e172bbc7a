//! Mock fragment source for testing.
//!
//! Provides [`MockSource`] for unit testing without filesystem access.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::source::{FragmentSource, SourceError, SourceErrorKind};

type Key = (String, String);

/// Mock fragment source for testing.
///
/// Stores fragment bodies in memory and records every fetch, so tests can
/// assert how many times (and in which order) fragments were requested.
///
/// # Example
///
/// ```ignore
/// use wn_source::{FragmentSource, MockSource};
///
/// let source = MockSource::new()
///     .with_fragment("ns", "x", "X!")
///     .with_fragment("ns", "y", "Y!");
///
/// assert_eq!(source.fetch("ns", "x").unwrap(), Some("X!".to_owned()));
/// assert_eq!(source.fetch_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSource {
    fragments: RwLock<HashMap<Key, String>>,
    failures: RwLock<HashMap<Key, SourceErrorKind>>,
    fetches: Mutex<Vec<Key>>,
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_fragment(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.fragments
            .write()
            .unwrap()
            .insert((namespace.into(), name.into()), body.into());
        self
    }

    /// Make fetches of a fragment fail with a hard error of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(
        self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        kind: SourceErrorKind,
    ) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert((namespace.into(), name.into()), kind);
        self
    }

    /// Total number of fetch calls so far, including misses and failures.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    /// Number of fetch calls for one fragment.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fetch_count_of(&self, namespace: &str, name: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|(ns, n)| ns == namespace && n == name)
            .count()
    }

    /// Fetched fragment names in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }
}

impl FragmentSource for MockSource {
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError> {
        let key = (namespace.to_owned(), name.to_owned());
        self.fetches.lock().unwrap().push(key.clone());

        if let Some(kind) = self.failures.read().unwrap().get(&key) {
            return Err(SourceError::new(*kind)
                .with_fragment(namespace, name)
                .with_backend("Mock"));
        }

        Ok(self.fragments.read().unwrap().get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_source_is_send_sync() {
        assert_send_sync::<MockSource>();
    }

    #[test]
    fn test_new_empty() {
        let source = MockSource::new();

        assert_eq!(source.fetch("ns", "x").unwrap(), None);
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_with_fragment() {
        let source = MockSource::new()
            .with_fragment("ns", "x", "X!")
            .with_fragment("other", "x", "other X");

        assert_eq!(source.fetch("ns", "x").unwrap(), Some("X!".to_owned()));
        assert_eq!(
            source.fetch("other", "x").unwrap(),
            Some("other X".to_owned())
        );
    }

    #[test]
    fn test_with_failure() {
        let source = MockSource::new()
            .with_fragment("ns", "x", "X!")
            .with_failure("ns", "x", SourceErrorKind::Timeout);

        let err = source.fetch("ns", "x").unwrap_err();

        assert_eq!(err.kind, SourceErrorKind::Timeout);
        assert_eq!(err.backend, Some("Mock"));
        assert_eq!(err.fragment, Some(("ns".to_owned(), "x".to_owned())));
    }

    #[test]
    fn test_fetch_log() {
        let source = MockSource::new().with_fragment("ns", "a", "A");

        source.fetch("ns", "a").unwrap();
        source.fetch("ns", "b").unwrap();
        source.fetch("ns", "a").unwrap();

        assert_eq!(source.fetch_count(), 3);
        assert_eq!(source.fetch_count_of("ns", "a"), 2);
        assert_eq!(source.fetch_count_of("ns", "b"), 1);
        assert_eq!(source.fetches(), vec!["a", "b", "a"]);
    }
}
