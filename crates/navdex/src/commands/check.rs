//! `navdex check` command implementation.

use clap::Args;
use navdex_config::CliSettings;

use super::{SourceArgs, build_index};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

impl CheckArgs {
    /// Execute the check command: build the index without writing it.
    ///
    /// # Errors
    ///
    /// Returns the first error found in the configuration or the source tree.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.source.load_config(CliSettings::default())?;
        let index = build_index(&config, &output).await?;

        output.highlight(&format!(
            "{} pages, {} assets",
            index.pages.len(),
            index.assets.len()
        ));
        output.success("No problems found");
        Ok(())
    }
}
