//! CLI error types.

use wn_config::ConfigError;
use wn_transclude::{NoticeError, ResolveError, ScanError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{page}: {source}")]
    Resolve {
        page: String,
        #[source]
        source: ResolveError,
    },

    #[error("{0} page(s) failed to resolve")]
    PagesFailed(usize),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    Notice(#[from] NoticeError),

    #[error("{0}")]
    Validation(String),
}
