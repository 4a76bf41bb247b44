//! `navdex build` command implementation.

use std::path::PathBuf;

use clap::Args;
use navdex_config::CliSettings;

use super::{SourceArgs, build_index};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Index file to write (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the index cannot be built,
    /// or the output file cannot be written.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.source.load_config(CliSettings {
            output_path: self.output,
            pretty: self.pretty.then_some(true),
            ..CliSettings::default()
        })?;

        let index = build_index(&config, &output).await?;
        let json = index.to_json(config.output_resolved.pretty)?;

        let path = &config.output_resolved.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await?;

        output.success(&format!(
            "Index written to {} ({} pages, {} assets)",
            path.display(),
            index.pages.len(),
            index.assets.len()
        ));
        Ok(())
    }
}
