//! CLI command implementations.

pub(crate) mod notice;
pub(crate) mod resolve;
pub(crate) mod scan;

pub(crate) use notice::NoticeArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use scan::ScanArgs;

use std::path::PathBuf;

use clap::Args;
use wn_config::{CliSettings, Config};
use wn_source::FsSource;
use wn_transclude::ResolveOptions;

use crate::error::CliError;

/// Arguments shared by commands that read fragments.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Namespace to resolve directives in (overrides config).
    #[arg(short, long, env = "WN_NAMESPACE")]
    namespace: Option<String>,

    /// Path to configuration file (default: auto-discover wn.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fragment source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Enable verbose output (show fetch and pass logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Loaded configuration with the fragment source it describes.
pub(crate) struct Session {
    pub config: Config,
    pub source: FsSource,
}

impl Session {
    /// Namespace every page is resolved in.
    pub(crate) fn namespace(&self) -> Result<&str, CliError> {
        Ok(self.config.require_namespace()?)
    }

    /// Resolution options derived from the `[expansion]` section.
    pub(crate) fn options(&self) -> ResolveOptions {
        resolve_options(&self.config)
    }
}

impl SourceArgs {
    /// Load config with CLI overrides and open the filesystem source.
    pub(crate) fn open(self, expand: Option<bool>) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            namespace: self.namespace,
            expand,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = FsSource::new(config.source_resolved.dir.clone())
            .with_extension(config.source_resolved.extension.clone());
        tracing::info!(
            dir = %config.source_resolved.dir.display(),
            extension = %config.source_resolved.extension,
            "Opened fragment source"
        );

        Ok(Session { config, source })
    }
}

fn resolve_options(config: &Config) -> ResolveOptions {
    ResolveOptions {
        expand: config.expansion.enabled,
        max_passes: config.expansion.max_passes,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_options_from_config() {
        let mut config = Config::default();
        config.expansion.enabled = false;
        config.expansion.max_passes = Some(3);

        assert_eq!(
            resolve_options(&config),
            ResolveOptions {
                expand: false,
                max_passes: Some(3),
            }
        );
    }
}
