//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;

use std::path::PathBuf;

use clap::Args;
use navdex_config::{CliSettings, Config};
use navdex_index::{Index, IndexBuilder};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;

/// Source and configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover navdex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Root identifier used in generated URLs (overrides config).
    #[arg(long)]
    root: Option<String>,

    /// Base URL for page source and asset URLs (overrides config).
    #[arg(long, env = "NAVDEX_CDN_BASE")]
    cdn_base: Option<String>,

    /// Enable verbose output (show timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Load configuration with these arguments and `extra` applied on top.
    fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            root: self.root.clone(),
            cdn_base: self.cdn_base.clone(),
            ..extra
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build the resolved index described by `config`.
async fn build_index(config: &Config, output: &Output) -> Result<Index, CliError> {
    output.info(&format!(
        "Source: {}",
        config.source_resolved.dir.display()
    ));
    let index = IndexBuilder::new(config.index_config()).build().await?;
    Ok(index)
}
