//! Parallel resolution of independent root pages.
//!
//! Every page gets its own document and visited set, so pages never share
//! mutable state. Only the fragment source is shared, which is why
//! [`FragmentSource`] requires `Send + Sync`.

use rayon::prelude::*;
use wn_source::FragmentSource;

use crate::resolver::{Resolution, ResolveError, ResolveOptions, Resolver};

/// Result of resolving one root page.
#[derive(Debug)]
pub struct PageResolution {
    /// Root page name, as requested.
    pub name: String,
    /// Expanded page, or the hard failure that aborted it.
    pub result: Result<Resolution, ResolveError>,
}

/// Resolve several root pages concurrently.
///
/// Uses the global rayon thread pool. Results are returned in the order of
/// `names`. A hard failure on one page does not affect the others.
///
/// # Arguments
///
/// * `source` - Fragment source shared by all pages
/// * `namespace` - Namespace every page is resolved in
/// * `names` - Root page names
/// * `options` - Options applied to every page
pub fn resolve_pages<S: FragmentSource>(
    source: &S,
    namespace: &str,
    names: &[String],
    options: &ResolveOptions,
) -> Vec<PageResolution> {
    if names.is_empty() {
        return Vec::new();
    }

    let resolver = Resolver::new(source).with_options(options.clone());

    names
        .par_iter()
        .map(|name| PageResolution {
            name: name.clone(),
            result: resolver.resolve_page(namespace, name),
        })
        .collect()
}
