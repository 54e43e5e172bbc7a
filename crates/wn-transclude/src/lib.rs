//! Include-directive transclusion for wn.
//!
//! Expands `{{include(<namespace>:<name>)}}` directives in a root text by
//! fetching the named fragments from a [`FragmentSource`] and splicing their
//! bodies in place, repeatedly, until no directive for the namespace remains.
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`scanner`]: Directive grammar and `DirectiveScanner`
//! - [`resolver`]: Fixed-point `Resolver` with a visited set
//! - [`diagnostics`]: Warnings reported alongside the expanded text
//! - [`batch`]: Parallel resolution of independent root pages
//! - [`notice`]: Composition of the final notification message
//! - [`schedule`]: Schedule keywords and their date labels
//!
//! # Example
//!
//! ```ignore
//! use wn_source::MockSource;
//! use wn_transclude::resolve;
//!
//! let source = MockSource::new().with_fragment("ns", "x", "X!");
//! let resolution = resolve("A {{include(ns:x)}}B", "ns", &source)?;
//! assert_eq!(resolution.text, "A X!B");
//! ```
//!
//! [`FragmentSource`]: wn_source::FragmentSource

pub mod batch;
pub mod diagnostics;
pub mod notice;
pub mod resolver;
pub mod scanner;
pub mod schedule;

pub use batch::{PageResolution, resolve_pages};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use notice::{Notice, NoticeError, TicketFields};
pub use resolver::{
    Resolution, ResolveError, ResolveOptions, Resolver, cycle_placeholder, missing_placeholder,
    resolve,
};
pub use scanner::{
    Directive, DirectiveScanner, ScanError, directive_for, find_directives,
    is_valid_fragment_name,
};
pub use schedule::{ParseScheduleError, Schedule};
