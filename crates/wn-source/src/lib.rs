//! Fragment source abstraction for wn.
//!
//! This crate provides a [`FragmentSource`] trait for fetching named text
//! fragments by `(namespace, name)` from whatever backend holds them. The
//! transclusion resolver consumes it and never touches storage directly.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`FragmentSource`] trait with a single `fetch()` method
//! - [`SourceError`] with a semantic [`SourceErrorKind`] and retry guidance
//! - [`FsSource`] reading fragments from `<root>/<namespace>/<name>.<ext>`
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wn_source::{FragmentSource, FsSource};
//!
//! let source = FsSource::new(PathBuf::from("fragments"));
//! match source.fetch("ops", "Daily checks")? {
//!     Some(body) => println!("{body}"),
//!     None => println!("no such fragment"),
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{ErrorStatus, FragmentSource, SourceError, SourceErrorKind};
