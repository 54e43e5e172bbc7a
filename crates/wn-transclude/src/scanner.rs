//! Directive scanning.
//!
//! Finds `{{include(<namespace>:<name>)}}` directives in text. The grammar is
//! bit-exact for compatibility with existing documents:
//!
//! - No whitespace inside the parentheses or around the colon
//! - `<namespace>` is matched literally
//! - `<name>` is one or more of `[A-Za-z0-9 _'-]`
//! - Braces are literal `{{` and `}}`, never nested or escaped
//!
//! Anything that does not satisfy the grammar exactly is not a directive and
//! passes through untouched.

use regex::Regex;

/// Character class allowed in fragment names.
const NAME_CLASS: &str = r"[A-Za-z0-9 _'\-]+";

/// Error building a scanner for a namespace.
#[derive(Debug, thiserror::Error)]
#[error("Cannot build directive pattern for namespace '{namespace}': {source}")]
pub struct ScanError {
    /// Namespace the pattern was built for.
    pub namespace: String,
    #[source]
    source: regex::Error,
}

/// A directive occurrence in a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'t> {
    /// Literal matched text, e.g. `{{include(ns:x)}}`.
    pub text: &'t str,
    /// Referenced fragment name, e.g. `x`.
    pub name: &'t str,
    /// Byte offset of the directive in the scanned text.
    pub start: usize,
}

/// Directive matcher compiled for one namespace.
#[derive(Debug, Clone)]
pub struct DirectiveScanner {
    namespace: String,
    pattern: Regex,
}

impl DirectiveScanner {
    /// Compile the directive grammar for `namespace`.
    ///
    /// The namespace is escaped, so regex metacharacters in it are matched
    /// literally.
    pub fn new(namespace: &str) -> Result<Self, ScanError> {
        let pattern = format!(
            r"\{{\{{include\({}:({NAME_CLASS})\)\}}\}}",
            regex::escape(namespace)
        );
        let pattern = Regex::new(&pattern).map_err(|source| ScanError {
            namespace: namespace.to_owned(),
            source,
        })?;
        Ok(Self {
            namespace: namespace.to_owned(),
            pattern,
        })
    }

    /// Namespace this scanner matches.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Find every directive in `text`, left to right, duplicates included.
    pub fn find<'t>(&self, text: &'t str) -> Vec<Directive<'t>> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?;
                Some(Directive {
                    text: whole.as_str(),
                    name: name.as_str(),
                    start: whole.start(),
                })
            })
            .collect()
    }

    /// Check whether `text` contains at least one directive.
    #[must_use]
    pub fn contains_directive(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Find every directive for `namespace` in `text`.
///
/// Convenience wrapper that compiles a [`DirectiveScanner`] for a single
/// scan. Zero matches is an empty vector, not an error.
pub fn find_directives<'t>(
    text: &'t str,
    namespace: &str,
) -> Result<Vec<Directive<'t>>, ScanError> {
    Ok(DirectiveScanner::new(namespace)?.find(text))
}

/// Render the directive literal for a fragment.
#[must_use]
pub fn directive_for(namespace: &str, name: &str) -> String {
    format!("{{{{include({namespace}:{name})}}}}")
}

/// Check whether `name` can appear inside a directive.
#[must_use]
pub fn is_valid_fragment_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '\'' | '-'))
}
