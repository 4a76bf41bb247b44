//! navdex CLI - Markdown content index builder.
//!
//! Provides commands for:
//! - `build`: Build the content index and write it as JSON
//! - `check`: Validate the source tree without writing anything

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs};
use error::CliError;
use output::Output;

/// navdex - Markdown content index builder.
#[derive(Parser)]
#[command(name = "navdex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the content index.
    Build(BuildArgs),
    /// Validate sources without writing the index.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.source.verbose,
            Self::Check(args) => args.source.verbose,
        }
    }

    fn execute(self) -> Result<(), CliError> {
        let rt = tokio::runtime::Builder::new_current_thread().build()?;
        match self {
            Self::Build(args) => rt.block_on(args.execute()),
            Self::Check(args) => rt.block_on(args.execute()),
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
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.command.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
