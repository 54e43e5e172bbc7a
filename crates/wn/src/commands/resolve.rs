//! `wn resolve` command implementation.

use std::io::Write;

use clap::Args;
use wn_transclude::{PageResolution, resolve_pages};

use super::SourceArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Root page names.
    #[arg(required = true)]
    pages: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Print pages without expanding include directives.
    #[arg(long)]
    no_expand: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// Every page is printed in the order given, even when another page failed.
    ///
    /// # Errors
    ///
    /// Returns an error if any page hit a hard failure, configuration fails,
    /// or stdout cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let session = self.source.open(self.no_expand.then_some(false))?;
        let namespace = session.namespace()?;

        let results = resolve_pages(&session.source, namespace, &self.pages, &session.options());
        let labelled = results.len() > 1;

        let mut stdout = std::io::stdout().lock();
        let mut failed = 0;

        for PageResolution { name, result } in results {
            match result {
                Ok(resolution) => {
                    if labelled {
                        output.highlight(&format!("==> {name} <=="));
                    }
                    for diagnostic in &resolution.diagnostics {
                        output.warning(&format!("Warning: {name}: {diagnostic}"));
                    }
                    stdout.write_all(resolution.text.as_bytes())?;
                    if !resolution.text.ends_with('\n') {
                        stdout.write_all(b"\n")?;
                    }
                }
                Err(source) => {
                    output.error(&format!("Failed: {name}: {source}"));
                    failed += 1;
                }
            }
        }
        stdout.flush()?;

        if failed > 0 {
            return Err(CliError::PagesFailed(failed));
        }
        Ok(())
    }
}
