//! WN CLI - Work notice generator.
//!
//! Provides commands for:
//! - `resolve`: Expand include directives in one or more pages
//! - `scan`: List the include directives found in a file
//! - `notice`: Expand a page and compose the notification message

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NoticeArgs, ResolveArgs, ScanArgs};
use output::Output;

/// WN - Work notice generator.
#[derive(Parser)]
#[command(name = "wn", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand include directives in pages and print the result.
    Resolve(ResolveArgs),
    /// List include directives found in a file.
    Scan(ScanArgs),
    /// Expand a page and print the composed notification.
    Notice(NoticeArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Resolve(args) => args.source.verbose,
            Self::Notice(args) => args.source.verbose,
            Self::Scan(_) => false,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(),
        Commands::Scan(args) => args.execute(),
        Commands::Notice(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
