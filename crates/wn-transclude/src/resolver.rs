//! Transclusion resolution.
//!
//! Drives scan/fetch/substitute passes over a document until no directive for
//! the namespace remains:
//!
//! 1. Scan the document for directives.
//! 2. For each distinct name, in order of first appearance: fetch it (once
//!    per resolution), mark it visited, then replace every occurrence of its
//!    exact directive literal with the body.
//! 3. Rescan, since inserted bodies may contain further directives.
//!
//! A name that was already expanded is never fetched again. Meeting its
//! directive a second time means the document references it circularly (or
//! from two different depths), so the directive is replaced with a terminal
//! "already included" placeholder. This bounds the number of fetches by the
//! number of distinct names and guarantees termination on cyclic input.

use std::collections::{HashMap, HashSet};

use wn_source::{FragmentSource, SourceError};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::scanner::{DirectiveScanner, ScanError, directive_for};

/// Placeholder substituted for a fragment that does not exist.
#[must_use]
pub fn missing_placeholder(namespace: &str, name: &str) -> String {
    format!("Unable to retrieve content from {namespace}:{name}")
}

/// Placeholder substituted for a fragment that was already expanded.
#[must_use]
pub fn cycle_placeholder(namespace: &str, name: &str) -> String {
    format!("[already included: {namespace}:{name}]")
}

/// Resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Expand directives at all. When `false`, the root text is returned as-is.
    pub expand: bool,
    /// Optional upper bound on scan/substitute passes. When reached, remaining
    /// directives are left in place and a [`DiagnosticKind::PassLimit`]
    /// diagnostic is recorded.
    ///
    /// `None` runs until no directive remains. The visited set already bounds
    /// the pass count by the number of distinct names plus two.
    pub max_passes: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            expand: true,
            max_passes: None,
        }
    }
}

/// Fully expanded document with its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Expanded text.
    pub text: String,
    /// Recoverable problems, in the order they were met.
    pub diagnostics: Diagnostics,
    /// Fragment names fetched from the source, in fetch order.
    pub fetched: Vec<String>,
}

/// Fatal resolution error. No partial document is returned.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The fragment source failed (I/O, connectivity, timeout, cancellation).
    #[error("Fragment source failed on {namespace}:{name}: {source}")]
    SourceUnavailable {
        /// Namespace being resolved.
        namespace: String,
        /// Fragment whose fetch failed.
        name: String,
        /// Backend error.
        #[source]
        source: SourceError,
    },
    /// The directive pattern for the namespace could not be built.
    #[error(transparent)]
    Pattern(#[from] ScanError),
}

/// Outcome of the first (and only) fetch of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Expanded,
    Missing,
}

/// Per-resolution bookkeeping. Discarded when the resolution ends.
struct Expansion<'a> {
    namespace: &'a str,
    visited: HashMap<String, Visit>,
    diagnostics: Diagnostics,
    fetched: Vec<String>,
}

impl<'a> Expansion<'a> {
    fn new(namespace: &'a str) -> Self {
        Self {
            namespace,
            visited: HashMap::new(),
            diagnostics: Diagnostics::new(),
            fetched: Vec::new(),
        }
    }

    /// Fetch a name that has not been visited yet and mark it visited.
    ///
    /// Returns the text to substitute: the body, or the missing placeholder.
    fn fetch_new<S: FragmentSource>(
        &mut self,
        source: &S,
        name: &str,
    ) -> Result<String, ResolveError> {
        tracing::debug!(namespace = self.namespace, name, "Fetching fragment");
        let body = source
            .fetch(self.namespace, name)
            .map_err(|source| ResolveError::SourceUnavailable {
                namespace: self.namespace.to_owned(),
                name: name.to_owned(),
                source,
            })?;
        self.fetched.push(name.to_owned());

        if let Some(body) = body {
            self.visited.insert(name.to_owned(), Visit::Expanded);
            Ok(body)
        } else {
            tracing::warn!(namespace = self.namespace, name, "Fragment not found");
            self.visited.insert(name.to_owned(), Visit::Missing);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::NotFound,
                self.namespace,
                name,
            ));
            Ok(missing_placeholder(self.namespace, name))
        }
    }

    /// Text to substitute for one directive name.
    fn replacement<S: FragmentSource>(
        &mut self,
        source: &S,
        name: &str,
    ) -> Result<String, ResolveError> {
        match self.visited.get(name).copied() {
            None => self.fetch_new(source, name),
            // Already reported when first met
            Some(Visit::Missing) => Ok(missing_placeholder(self.namespace, name)),
            Some(Visit::Expanded) => {
                tracing::warn!(
                    namespace = self.namespace,
                    name,
                    "Fragment already included, skipping"
                );
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::CycleDetected,
                    self.namespace,
                    name,
                ));
                Ok(cycle_placeholder(self.namespace, name))
            }
        }
    }

    fn finish(self, text: String) -> Resolution {
        Resolution {
            text,
            diagnostics: self.diagnostics,
            fetched: self.fetched,
        }
    }
}

/// Distinct directive names in order of first appearance.
fn distinct_names(scanner: &DirectiveScanner, doc: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scanner
        .find(doc)
        .into_iter()
        .filter(|d| seen.insert(d.name))
        .map(|d| d.name.to_owned())
        .collect()
}

/// Transclusion resolver bound to a fragment source.
///
/// Holds no per-document state, so one resolver can serve any number of
/// resolutions, including concurrent ones when the source allows it.
///
/// # Example
///
/// ```ignore
/// use wn_source::FsSource;
/// use wn_transclude::{ResolveOptions, Resolver};
///
/// let source = FsSource::new("fragments".into());
/// let resolver = Resolver::new(&source).with_options(ResolveOptions::default());
/// let resolution = resolver.resolve_page("ops", "Daily checks")?;
/// for warning in &resolution.diagnostics {
///     eprintln!("{warning}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<S> {
    source: S,
    options: ResolveOptions,
}

impl<S: FragmentSource> Resolver<S> {
    /// Create a resolver with default options.
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: ResolveOptions::default(),
        }
    }

    /// Replace the resolution options.
    #[must_use]
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Expand all directives for `namespace` in `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::SourceUnavailable`] on the first hard fetch
    /// failure. Missing fragments and repeated includes are not errors; they
    /// are reported in [`Resolution::diagnostics`].
    pub fn resolve(&self, root: &str, namespace: &str) -> Result<Resolution, ResolveError> {
        let mut expansion = Expansion::new(namespace);
        let text = self.expand(root.to_owned(), &mut expansion)?;
        Ok(expansion.finish(text))
    }

    /// Fetch the root fragment `name` and expand it.
    ///
    /// A missing root is handled like any missing fragment: the result is the
    /// missing placeholder with a [`DiagnosticKind::NotFound`] diagnostic.
    /// The root counts as visited, so a page that includes itself is not
    /// fetched twice.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::SourceUnavailable`] on the first hard fetch
    /// failure, including the root fetch.
    pub fn resolve_page(&self, namespace: &str, name: &str) -> Result<Resolution, ResolveError> {
        let mut expansion = Expansion::new(namespace);
        let root = expansion.fetch_new(&self.source, name)?;
        let text = self.expand(root, &mut expansion)?;
        Ok(expansion.finish(text))
    }

    fn expand(
        &self,
        mut doc: String,
        expansion: &mut Expansion<'_>,
    ) -> Result<String, ResolveError> {
        if !self.options.expand {
            return Ok(doc);
        }

        let scanner = DirectiveScanner::new(expansion.namespace)?;

        let mut pass = 0;
        loop {
            let names = distinct_names(&scanner, &doc);
            if names.is_empty() {
                tracing::debug!(
                    namespace = expansion.namespace,
                    passes = pass,
                    fetched = expansion.fetched.len(),
                    "Resolution complete"
                );
                return Ok(doc);
            }

            if let Some(max_passes) = self.options.max_passes
                && pass >= max_passes
            {
                tracing::warn!(
                    namespace = expansion.namespace,
                    max_passes,
                    "Pass limit reached with directives left"
                );
                expansion.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::PassLimit,
                    expansion.namespace,
                    "",
                ));
                return Ok(doc);
            }
            pass += 1;

            tracing::debug!(
                namespace = expansion.namespace,
                pass,
                directives = names.len(),
                "Expanding directives"
            );

            for name in names {
                let replacement = expansion.replacement(&self.source, &name)?;
                doc = doc.replace(&directive_for(expansion.namespace, &name), &replacement);
            }
        }
    }
}

/// Expand all directives for `namespace` in `root` with default options.
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve<S: FragmentSource>(
    root: &str,
    namespace: &str,
    source: S,
) -> Result<Resolution, ResolveError> {
    Resolver::new(source).resolve(root, namespace)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wn_source::{MockSource, SourceErrorKind};

    use super::*;

    #[test]
    fn test_exact_substitution() {
        let source = MockSource::new().with_fragment("ns", "x", "X!");

        let resolution = resolve("A {{include(ns:x)}}B", "ns", &source).unwrap();

        assert_eq!(resolution.text, "A X!B");
        assert!(resolution.diagnostics.is_empty());
        assert_eq!(resolution.fetched, vec!["x"]);
    }

    #[test]
    fn test_directive_free_text_unchanged() {
        let source = MockSource::new();
        let text = "No macros here. {{include(other:x)}} {{include(ns:bad.name)}}";

        let resolution = resolve(text, "ns", &source).unwrap();

        assert_eq!(resolution.text, text);
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_nested_expansion() {
        let source = MockSource::new()
            .with_fragment("ns", "x", "before {{include(ns:y)}} after")
            .with_fragment("ns", "y", "Y!");

        let resolution = resolve("[{{include(ns:x)}}]", "ns", &source).unwrap();

        assert_eq!(resolution.text, "[before Y! after]");
        assert_eq!(resolution.fetched, vec!["x", "y"]);
    }

    #[test]
    fn test_duplicate_directive_single_fetch() {
        let source = MockSource::new().with_fragment("ns", "x", "X");

        let resolution =
            resolve("{{include(ns:x)}} and {{include(ns:x)}}", "ns", &source).unwrap();

        assert_eq!(resolution.text, "X and X");
        assert_eq!(source.fetch_count_of("ns", "x"), 1);
    }

    #[test]
    fn test_fetch_order_is_first_appearance() {
        let source = MockSource::new()
            .with_fragment("ns", "b", "B")
            .with_fragment("ns", "a", "A")
            .with_fragment("ns", "c", "C");

        resolve(
            "{{include(ns:b)}}{{include(ns:a)}}{{include(ns:b)}}{{include(ns:c)}}",
            "ns",
            &source,
        )
        .unwrap();

        assert_eq!(source.fetches(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_fragment_placeholder() {
        let source = MockSource::new();

        let resolution = resolve("x {{include(ns:missing)}} y", "ns", &source).unwrap();

        assert_eq!(
            resolution.text,
            "x Unable to retrieve content from ns:missing y"
        );
        assert_eq!(
            resolution.diagnostics.not_found().collect::<Vec<_>>(),
            vec!["missing"]
        );
    }

    #[test]
    fn test_missing_fragment_met_again_not_refetched() {
        let source = MockSource::new().with_fragment("ns", "a", "a:{{include(ns:gone)}}");

        let resolution =
            resolve("{{include(ns:gone)}} {{include(ns:a)}}", "ns", &source).unwrap();

        let placeholder = missing_placeholder("ns", "gone");
        assert_eq!(resolution.text, format!("{placeholder} a:{placeholder}"));
        assert_eq!(source.fetch_count_of("ns", "gone"), 1);
        assert_eq!(resolution.diagnostics.len(), 1);
    }

    #[test]
    fn test_self_reference_terminates() {
        let source = MockSource::new().with_fragment("ns", "a", "{{include(ns:a)}}");

        let resolution = resolve("{{include(ns:a)}}", "ns", &source).unwrap();

        let placeholder = cycle_placeholder("ns", "a");
        assert_eq!(resolution.text, placeholder);
        assert_eq!(resolution.text.matches(&placeholder).count(), 1);
        assert_eq!(source.fetch_count_of("ns", "a"), 1);
        assert_eq!(resolution.diagnostics.cycles().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let source = MockSource::new()
            .with_fragment("ns", "a", "A({{include(ns:b)}})")
            .with_fragment("ns", "b", "B({{include(ns:a)}})");

        let resolution = resolve("{{include(ns:a)}}", "ns", &source).unwrap();

        assert_eq!(resolution.text, "A(B([already included: ns:a]))");
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn test_source_failure_aborts() {
        let source = MockSource::new()
            .with_fragment("ns", "ok", "fine")
            .with_failure("ns", "bad", SourceErrorKind::Unavailable);

        let err = resolve("{{include(ns:ok)}} {{include(ns:bad)}}", "ns", &source).unwrap_err();

        let ResolveError::SourceUnavailable {
            namespace,
            name,
            source,
        } = err
        else {
            panic!("expected SourceUnavailable");
        };
        assert_eq!(namespace, "ns");
        assert_eq!(name, "bad");
        assert_eq!(source.kind, SourceErrorKind::Unavailable);
    }

    #[test]
    fn test_timeout_aborts_without_retry() {
        let source = MockSource::new().with_failure("ns", "slow", SourceErrorKind::Timeout);

        let result = resolve("{{include(ns:slow)}}", "ns", &source);

        assert!(matches!(
            result,
            Err(ResolveError::SourceUnavailable { .. })
        ));
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_expand_disabled_returns_root() {
        let source = MockSource::new().with_fragment("ns", "x", "X");
        let resolver = Resolver::new(&source).with_options(ResolveOptions {
            expand: false,
            ..ResolveOptions::default()
        });

        let resolution = resolver.resolve("{{include(ns:x)}}", "ns").unwrap();

        assert_eq!(resolution.text, "{{include(ns:x)}}");
        assert_eq!(source.fetch_count(), 0);
    }

    #[test]
    fn test_pass_limit_leaves_directives_and_warns() {
        let source = MockSource::new()
            .with_fragment("ns", "a", "{{include(ns:b)}}")
            .with_fragment("ns", "b", "{{include(ns:c)}}")
            .with_fragment("ns", "c", "C");
        let resolver = Resolver::new(&source).with_options(ResolveOptions {
            max_passes: Some(2),
            ..ResolveOptions::default()
        });

        let resolution = resolver.resolve("{{include(ns:a)}}", "ns").unwrap();

        assert_eq!(resolution.text, "{{include(ns:c)}}");
        assert_eq!(
            resolution.diagnostics.iter().map(|d| d.kind).collect::<Vec<_>>(),
            vec![DiagnosticKind::PassLimit]
        );
    }

    #[test]
    fn test_deep_acyclic_chain_expands_fully() {
        let depth = 100;
        let mut source = MockSource::new().with_fragment("ns", format!("f{depth}"), "end");
        for i in 0..depth {
            let body = format!("{i} {{{{include(ns:f{})}}}}", i + 1);
            source = source.with_fragment("ns", format!("f{i}"), body);
        }

        let resolution = resolve("{{include(ns:f0)}}", "ns", &source).unwrap();

        let expected: String = (0..depth).map(|i| format!("{i} ")).collect::<String>() + "end";
        assert_eq!(resolution.text, expected);
        assert!(resolution.diagnostics.is_empty());
        assert_eq!(source.fetch_count(), depth + 1);
    }

    #[test]
    fn test_diamond_reference_gets_already_included_placeholder() {
        // leaf is reached through left at depth 3 and through right/mid at depth 4
        let source = MockSource::new()
            .with_fragment("ns", "top", "T[{{include(ns:left)}}|{{include(ns:right)}}]")
            .with_fragment("ns", "left", "L{{include(ns:leaf)}}")
            .with_fragment("ns", "right", "R{{include(ns:mid)}}")
            .with_fragment("ns", "mid", "M{{include(ns:leaf)}}")
            .with_fragment("ns", "leaf", "X");

        let resolution = resolve("{{include(ns:top)}}", "ns", &source).unwrap();

        assert_eq!(resolution.text, "T[LX|RM[already included: ns:leaf]]");
        assert_eq!(source.fetch_count_of("ns", "leaf"), 1);
        assert_eq!(
            resolution.diagnostics.cycles().collect::<Vec<_>>(),
            vec!["leaf"]
        );
        assert!(!resolution.diagnostics.is_incomplete());
    }

    #[test]
    fn test_resolve_page_fetches_root() {
        let source = MockSource::new()
            .with_fragment("ns", "page", "Intro\n{{include(ns:part)}}")
            .with_fragment("ns", "part", "Part");

        let resolution = Resolver::new(&source).resolve_page("ns", "page").unwrap();

        assert_eq!(resolution.text, "Intro\nPart");
        assert_eq!(resolution.fetched, vec!["page", "part"]);
    }

    #[test]
    fn test_resolve_page_missing_root() {
        let source = MockSource::new();

        let resolution = Resolver::new(&source).resolve_page("ns", "page").unwrap();

        assert_eq!(resolution.text, "Unable to retrieve content from ns:page");
        assert_eq!(
            resolution.diagnostics.not_found().collect::<Vec<_>>(),
            vec!["page"]
        );
    }

    #[test]
    fn test_resolve_page_self_include_not_refetched() {
        let source = MockSource::new().with_fragment("ns", "page", "top {{include(ns:page)}}");

        let resolution = Resolver::new(&source).resolve_page("ns", "page").unwrap();

        assert_eq!(resolution.text, "top [already included: ns:page]");
        assert_eq!(source.fetch_count(), 1);
    }

    #[test]
    fn test_placeholders_are_not_directives() {
        let scanner = DirectiveScanner::new("ns").unwrap();

        assert!(!scanner.contains_directive(&missing_placeholder("ns", "x")));
        assert!(!scanner.contains_directive(&cycle_placeholder("ns", "x")));
    }
}
