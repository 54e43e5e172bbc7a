//! Filesystem fragment source.
//!
//! Provides [`FsSource`] for reading fragments from a directory tree laid out
//! as `<root>/<namespace>/<name>.<ext>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::source::{FragmentSource, SourceError, SourceErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Default fragment file extension.
const DEFAULT_EXTENSION: &str = "txt";

/// Filesystem fragment source.
///
/// Each namespace is a subdirectory of the root and each fragment is a file
/// named after the fragment. Fragment names may contain spaces and
/// apostrophes, which are valid in file names on every supported platform.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use wn_source::{FragmentSource, FsSource};
///
/// // fragments/ops/Daily checks.txt
/// let source = FsSource::new(PathBuf::from("fragments"));
/// let body = source.fetch("ops", "Daily checks")?;
/// ```
#[derive(Debug, Clone)]
pub struct FsSource {
    /// Root directory holding one subdirectory per namespace.
    root: PathBuf,
    /// File extension without the leading dot.
    extension: String,
}

impl FsSource {
    /// Create a new filesystem source with the default `txt` extension.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }

    /// Use a different fragment file extension (without the leading dot).
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Root directory of this source.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a namespace or name maps to exactly one path component.
    ///
    /// Rejects empty segments, separators and `.`/`..` to prevent path
    /// traversal outside the root (e.g., `../../etc/passwd`).
    fn validate_segment(segment: &str) -> bool {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && !segment.contains(['/', '\\', '\0'])
    }

    /// Map `(namespace, name)` to the fragment file path.
    fn fragment_path(&self, namespace: &str, name: &str) -> Result<PathBuf, SourceError> {
        if !Self::validate_segment(namespace) || !Self::validate_segment(name) {
            return Err(SourceError::new(SourceErrorKind::InvalidName)
                .with_fragment(namespace, name)
                .with_backend(BACKEND));
        }
        Ok(self
            .root
            .join(namespace)
            .join(format!("{name}.{}", self.extension)))
    }
}

impl FragmentSource for FsSource {
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError> {
        let path = self.fragment_path(namespace, name)?;
        match fs::read_to_string(&path) {
            Ok(body) => {
                tracing::debug!(path = %path.display(), bytes = body.len(), "Read fragment");
                Ok(Some(body))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Fragment file not found");
                Ok(None)
            }
            Err(err) => Err(SourceError::io(err)
                .with_fragment(namespace, name)
                .with_backend(BACKEND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write_fragment(dir: &Path, namespace: &str, file: &str, body: &str) {
        let ns_dir = dir.join(namespace);
        fs::create_dir_all(&ns_dir).unwrap();
        fs::write(ns_dir.join(file), body).unwrap();
    }

    #[test]
    fn test_fetch_existing_fragment() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "ops", "Daily checks.txt", "Check backups.\n");

        let source = FsSource::new(temp.path().to_path_buf());

        assert_eq!(
            source.fetch("ops", "Daily checks").unwrap(),
            Some("Check backups.\n".to_owned())
        );
    }

    #[test]
    fn test_fetch_name_with_apostrophe_and_hyphen() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "ops", "Admin's run-book.txt", "steps");

        let source = FsSource::new(temp.path().to_path_buf());

        assert_eq!(
            source.fetch("ops", "Admin's run-book").unwrap(),
            Some("steps".to_owned())
        );
    }

    #[test]
    fn test_fetch_missing_fragment_is_none() {
        let temp = TempDir::new().unwrap();
        let source = FsSource::new(temp.path().to_path_buf());

        assert_eq!(source.fetch("ops", "missing").unwrap(), None);
    }

    #[test]
    fn test_fetch_is_scoped_by_namespace() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "other", "shared.txt", "other body");

        let source = FsSource::new(temp.path().to_path_buf());

        assert_eq!(source.fetch("ops", "shared").unwrap(), None);
        assert_eq!(
            source.fetch("other", "shared").unwrap(),
            Some("other body".to_owned())
        );
    }

    #[test]
    fn test_custom_extension() {
        let temp = TempDir::new().unwrap();
        write_fragment(temp.path(), "ops", "intro.textile", "h1. Intro");

        let source = FsSource::new(temp.path().to_path_buf()).with_extension("textile");

        assert_eq!(
            source.fetch("ops", "intro").unwrap(),
            Some("h1. Intro".to_owned())
        );
    }

    #[test]
    fn test_path_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let source = FsSource::new(temp.path().to_path_buf());

        for (namespace, name) in [("..", "x"), ("ops", "../secret"), ("", "x"), ("ops", "")] {
            let err = source.fetch(namespace, name).unwrap_err();
            assert_eq!(err.kind, SourceErrorKind::InvalidName);
            assert_eq!(err.backend, Some("Fs"));
        }
    }

    #[test]
    fn test_directory_in_place_of_file_is_hard_error() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("ops").join("weird.txt")).unwrap();

        let source = FsSource::new(temp.path().to_path_buf());
        let err = source.fetch("ops", "weird").unwrap_err();

        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(
            err.fragment,
            Some(("ops".to_owned(), "weird".to_owned()))
        );
    }
}
