//! `wn scan` command implementation.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use wn_transclude::{Directive, DirectiveScanner};

use crate::error::CliError;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// File to scan.
    file: PathBuf,

    /// Namespace to match directives against.
    #[arg(short, long, env = "WN_NAMESPACE")]
    namespace: String,
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the namespace is empty.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        if self.namespace.is_empty() {
            return Err(CliError::Validation("--namespace cannot be empty".to_owned()));
        }
        let text = std::fs::read_to_string(&self.file)?;
        let scanner = DirectiveScanner::new(&self.namespace)?;

        let listing = format_directives(&text, &scanner.find(&text));

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(listing.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// One `line:column<TAB>name` row per directive, columns 1-based in characters.
fn format_directives(text: &str, directives: &[Directive<'_>]) -> String {
    let mut listing = String::new();
    for directive in directives {
        let before = &text[..directive.start];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |nl| nl + 1);
        let column = before[line_start..].chars().count() + 1;
        let _ = writeln!(listing, "{line}:{column}\t{}", directive.name);
    }
    listing
}
