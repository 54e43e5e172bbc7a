//! Fragment source trait and error types.
//!
//! Provides the core [`FragmentSource`] trait for fetching fragment bodies,
//! along with [`SourceError`] for unified error handling across backends.
//!
//! # Found vs. failed
//!
//! A fetch has three outcomes, and callers treat them very differently:
//! - `Ok(Some(body))` - the fragment exists
//! - `Ok(None)` - no such fragment; recoverable, the caller substitutes a placeholder
//! - `Err(SourceError)` - the backend failed; the caller aborts

use std::sync::Arc;

/// Semantic error categories for hard fetch failures.
///
/// There is no `NotFound` variant: a missing fragment is
/// reported as `Ok(None)`, not as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceErrorKind {
    /// Permission denied.
    PermissionDenied,
    /// Namespace or name cannot be mapped to the backend.
    InvalidName,
    /// Backend is temporarily unavailable (connection refused, reset).
    Unavailable,
    /// Operation timed out.
    Timeout,
    /// Operation was cancelled by the caller.
    Cancelled,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance for callers that want to retry a whole resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (permission denied, invalid name).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (service unavailable).
    Persistent,
}

/// Fragment source error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct SourceError {
    /// Semantic error category.
    pub kind: SourceErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Fragment context as `(namespace, name)`, if applicable.
    pub fragment: Option<(String, String)>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Create a new source error.
    #[must_use]
    pub fn new(kind: SourceErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            fragment: None,
            backend: None,
            source: None,
        }
    }

    /// Attach fragment context.
    #[must_use]
    pub fn with_fragment(mut self, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        self.fragment = Some((namespace.into(), name.into()));
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a source error from an I/O error.
    ///
    /// `NotFound` is not expected here; backends translate it to `Ok(None)`
    /// before reaching this constructor.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => SourceErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => SourceErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::NotConnected => SourceErrorKind::Unavailable,
            std::io::ErrorKind::Interrupted => SourceErrorKind::Cancelled,
            _ => SourceErrorKind::Other,
        };
        let status = match kind {
            SourceErrorKind::Timeout => ErrorStatus::Temporary,
            SourceErrorKind::Unavailable => ErrorStatus::Persistent,
            _ => ErrorStatus::Permanent,
        };
        Self::new(kind).with_status(status).with_source(err)
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (fragment: ns:name)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            SourceErrorKind::PermissionDenied => "Permission denied",
            SourceErrorKind::InvalidName => "Invalid name",
            SourceErrorKind::Unavailable => "Unavailable",
            SourceErrorKind::Timeout => "Timeout",
            SourceErrorKind::Cancelled => "Cancelled",
            SourceErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some((namespace, name)) = &self.fragment {
            write!(f, " (fragment: {namespace}:{name})")?;
        }

        Ok(())
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Keyed lookup of fragment bodies.
///
/// Implementations must be safe to call repeatedly and concurrently: callers
/// may resolve several independent documents in parallel against one source.
/// Timeouts and cancellation belong here, at the fetch boundary; report them
/// as [`SourceErrorKind::Timeout`] or [`SourceErrorKind::Cancelled`].
pub trait FragmentSource: Send + Sync {
    /// Fetch the raw body of a fragment.
    ///
    /// # Arguments
    ///
    /// * `namespace` - Scope the name is resolved within (e.g., a project shortname)
    /// * `name` - Fragment name within the namespace
    ///
    /// # Returns
    ///
    /// - `Ok(Some(body))` - Fragment exists
    /// - `Ok(None)` - No fragment with this name in this namespace
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the backend failed (I/O, connectivity, timeout).
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError>;
}

impl<T: FragmentSource + ?Sized> FragmentSource for &T {
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError> {
        (**self).fetch(namespace, name)
    }
}

impl<T: FragmentSource + ?Sized> FragmentSource for Box<T> {
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError> {
        (**self).fetch(namespace, name)
    }
}

impl<T: FragmentSource + ?Sized> FragmentSource for Arc<T> {
    fn fetch(&self, namespace: &str, name: &str) -> Result<Option<String>, SourceError> {
        (**self).fetch(namespace, name)
    }
}
