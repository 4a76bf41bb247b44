//! Configuration management for navdex.
//!
//! Parses `navdex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.root`
//! - `urls.cdn_base`

mod expand;

use std::path::{Path, PathBuf};

use navdex_index::{
    DEFAULT_EXEMPT_DIRS, IndexConfig, MetadataSchema, RESERVED_KEYS, StructureRules,
};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override source directory.
    pub source_dir: Option<PathBuf>,
    /// Override root identifier.
    pub root: Option<String>,
    /// Override CDN base URL.
    pub cdn_base: Option<String>,
    /// Override output file.
    pub output_path: Option<PathBuf>,
    /// Override pretty-printing.
    pub pretty: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "navdex.toml";

const DEFAULT_SOURCE_DIR: &str = "content";
const DEFAULT_ROOT: &str = "docs";
const DEFAULT_CDN_BASE: &str = "https://cdn.navdex.dev";
const DEFAULT_OUTPUT: &str = "index.json";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// URL configuration.
    pub urls: UrlsConfig,
    /// Directory structure rules.
    pub structure: StructureConfig,
    /// Metadata schema configuration.
    pub metadata: MetadataConfig,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw source configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    dir: Option<String>,
    root: Option<String>,
}

/// Resolved source configuration.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// Directory containing the markdown sources.
    pub dir: PathBuf,
    /// Root identifier used in generated URLs.
    pub root: String,
}

/// URL configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UrlsConfig {
    /// Base URL for page source and asset URLs.
    pub cdn_base: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_CDN_BASE.to_owned(),
        }
    }
}

/// Directory structure configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Directory names exempt from the overview-file rule.
    pub exempt_dirs: Vec<String>,
    /// Skip files and directories starting with `.`.
    pub ignore_hidden: bool,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            exempt_dirs: DEFAULT_EXEMPT_DIRS.iter().map(|&d| d.to_owned()).collect(),
            ignore_hidden: false,
        }
    }
}

/// Metadata schema configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Keys allowed in addition to the built-in ones.
    pub extra_keys: Vec<String>,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    path: Option<String>,
    pretty: Option<bool>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Index file to write.
    pub path: PathBuf,
    /// Pretty-print the JSON.
    pub pretty: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`urls.cdn_base`").
        field: String,
        /// Error message (e.g., "${`NAVDEX_CDN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a value to be a single path segment.
fn require_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains('/') || value.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain path separators: {value}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `navdex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Settings for the index builder.
    #[must_use]
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            source_dir: self.source_resolved.dir.clone(),
            root: self.source_resolved.root.clone(),
            cdn_base: self.urls.cdn_base.clone(),
            schema: MetadataSchema::default().with_extra_keys(self.metadata.extra_keys.clone()),
            structure: StructureRules {
                exempt_dirs: self.structure.exempt_dirs.clone(),
                ignore_hidden: self.structure.ignore_hidden,
            },
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.source_resolved.dir.clone_from(source_dir);
        }
        if let Some(root) = &settings.root {
            self.source_resolved.root.clone_from(root);
        }
        if let Some(cdn_base) = &settings.cdn_base {
            self.urls.cdn_base.clone_from(cdn_base);
        }
        if let Some(output_path) = &settings.output_path {
            self.output_resolved.path.clone_from(output_path);
        }
        if let Some(pretty) = settings.pretty {
            self.output_resolved.pretty = pretty;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfigRaw::default(),
            urls: UrlsConfig::default(),
            structure: StructureConfig::default(),
            metadata: MetadataConfig::default(),
            output: OutputConfigRaw::default(),
            source_resolved: SourceConfig {
                dir: base.join(DEFAULT_SOURCE_DIR),
                root: DEFAULT_ROOT.to_owned(),
            },
            output_resolved: OutputConfig {
                path: base.join(DEFAULT_OUTPUT),
                pretty: false,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called by [`load`](Self::load) after CLI settings are applied.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_segment(&self.source_resolved.root, "source.root")?;
        require_non_empty(&self.urls.cdn_base, "urls.cdn_base")?;
        require_http_url(&self.urls.cdn_base, "urls.cdn_base")?;
        for dir in &self.structure.exempt_dirs {
            require_segment(dir, "structure.exempt_dirs")?;
        }
        self.validate_metadata()?;
        Ok(())
    }

    /// Validate metadata configuration.
    fn validate_metadata(&self) -> Result<(), ConfigError> {
        for key in &self.metadata.extra_keys {
            require_non_empty(key, "metadata.extra_keys")?;
            if RESERVED_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "metadata.extra_keys cannot contain reserved key `{key}`"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.urls.cdn_base = expand::expand_env(&self.urls.cdn_base, "urls.cdn_base")?;
        if let Some(ref root) = self.source.root {
            self.source.root = Some(expand::expand_env(root, "source.root")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.source_resolved = SourceConfig {
            dir: resolve(self.source.dir.as_deref(), DEFAULT_SOURCE_DIR),
            root: self
                .source
                .root
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT.to_owned()),
        };

        self.output_resolved = OutputConfig {
            path: resolve(self.output.path.as_deref(), DEFAULT_OUTPUT),
            pretty: self.output.pretty.unwrap_or(false),
        };
    }
}
