//! CLI error types.

use navdex_config::ConfigError;
use navdex_index::IndexError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("Failed to serialize index: {0}")]
    Json(#[from] serde_json::Error),
}
