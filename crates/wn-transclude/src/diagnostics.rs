//! Warnings collected during a resolution.
//!
//! Recoverable problems never abort a resolution. They are substituted with a
//! visible placeholder in the text and recorded here, so the caller can still
//! deliver the document and report what is incomplete.

use std::fmt;

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Referenced fragment does not exist in the source.
    NotFound,
    /// Fragment was referenced again after it had already been expanded.
    ///
    /// Covers real cycles (`a` includes `b` includes `a`) as well as repeated
    /// references such as a diamond, where `a` and `b` both include `c`. Every
    /// occurrence after the first expansion gets the already-included
    /// placeholder, so each fragment body appears in the document at most once.
    CycleDetected,
    /// Resolution stopped at an explicit pass limit.
    PassLimit,
}

/// A single recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Namespace of the resolution.
    pub namespace: String,
    /// Fragment name involved. Empty for [`DiagnosticKind::PassLimit`].
    pub name: String,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, namespace: &str, name: &str) -> Self {
        Self {
            kind,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::NotFound => write!(
                f,
                "Fragment not found: {}:{}",
                self.namespace, self.name
            ),
            DiagnosticKind::CycleDetected => write!(
                f,
                "Fragment already included, skipped: {}:{}",
                self.namespace, self.name
            ),
            DiagnosticKind::PassLimit => write!(
                f,
                "Pass limit reached in namespace '{}'; unresolved directives left in place",
                self.namespace
            ),
        }
    }
}

/// Ordered collection of diagnostics for one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Iterate in the order the problems were encountered.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the resolution was clean.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when content is missing from the document.
    ///
    /// A fragment was not found, or directives were left in place at the pass
    /// limit. Already-included skips do not count: their content is present
    /// elsewhere in the document.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.entries
            .iter()
            .any(|d| matches!(d.kind, DiagnosticKind::NotFound | DiagnosticKind::PassLimit))
    }

    /// Names of fragments that could not be found.
    pub fn not_found(&self) -> impl Iterator<Item = &str> {
        self.names_of(DiagnosticKind::NotFound)
    }

    /// Names of fragments skipped because they were already included
    /// (cycle or repeated reference).
    pub fn cycles(&self) -> impl Iterator<Item = &str> {
        self.names_of(DiagnosticKind::CycleDetected)
    }

    fn names_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |d| d.kind == kind)
            .map(|d| d.name.as_str())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
