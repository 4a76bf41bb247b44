//! Two-phase index build.
//!
//! Phase 1 walks the source tree and builds every page and asset entry.
//! Phase 2 resolves placeholders against the finished index. A page may link
//! to a page discovered later in the walk, so phase 2 never starts before
//! phase 1 has completed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::classify::StructureRules;
use crate::error::IndexError;
use crate::frontmatter::{FrontMatter, YamlFrontMatter};
use crate::index::Index;
use crate::metadata::{MetadataSchema, MetadataValidator};
use crate::page::PageBuilder;
use crate::resolve::resolve_references;
use crate::traverse::Traverser;
use crate::urls::{CdnUrls, UrlScheme};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Settings for an [`IndexBuilder`].
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Root directory of the markdown sources.
    pub source_dir: PathBuf,
    /// Root identifier used in source and asset URLs.
    pub root: String,
    /// Base URL for source and asset URLs.
    pub cdn_base: String,
    /// Metadata allow-list and soft constraints.
    pub schema: MetadataSchema,
    /// Directory structure rules.
    pub structure: StructureRules,
}

/// Builds a resolved [`Index`] from a source tree.
///
/// # Example
///
/// ```ignore
/// let config = IndexConfig {
///     source_dir: PathBuf::from("content"),
///     root: "docs".to_owned(),
///     cdn_base: "https://cdn.example.com".to_owned(),
///     schema: MetadataSchema::default(),
///     structure: StructureRules::default(),
/// };
/// let index = IndexBuilder::new(config).build().await?;
/// ```
pub struct IndexBuilder {
    source_dir: PathBuf,
    structure: StructureRules,
    pages: PageBuilder,
}

impl IndexBuilder {
    /// Create a builder using YAML front-matter and CDN URLs.
    #[must_use]
    pub fn new(config: IndexConfig) -> Self {
        let urls = Arc::new(CdnUrls::new(config.cdn_base.clone()));
        Self::with_services(config, Arc::new(YamlFrontMatter), urls)
    }

    /// Create a builder with custom front-matter and URL services.
    #[must_use]
    pub fn with_services(
        config: IndexConfig,
        front_matter: Arc<dyn FrontMatter>,
        urls: Arc<dyn UrlScheme>,
    ) -> Self {
        let validator = MetadataValidator::new(config.schema);
        Self {
            source_dir: config.source_dir,
            structure: config.structure,
            pages: PageBuilder::new(front_matter, validator, urls, config.root),
        }
    }

    /// Run phase 1 only: walk the tree without resolving placeholders.
    ///
    /// # Errors
    ///
    /// Returns the first error raised anywhere in the tree.
    pub async fn collect(&self) -> Result<Index, IndexError> {
        let start = Instant::now();
        let index = Traverser::new(&self.source_dir, &self.structure, &self.pages)
            .run()
            .await?;
        tracing::info!(
            source_dir = %self.source_dir.display(),
            pages = index.pages.len(),
            assets = index.assets.len(),
            elapsed_ms = elapsed_ms(start),
            "Collected source tree"
        );
        Ok(index)
    }

    /// Build the fully resolved index.
    ///
    /// # Errors
    ///
    /// Returns the first traversal, route or reference error.
    pub async fn build(&self) -> Result<Index, IndexError> {
        let mut index = self.collect().await?;
        index.check_routes()?;

        let start = Instant::now();
        resolve_references(&mut index)?;
        tracing::info!(elapsed_ms = elapsed_ms(start), "Resolved references");
        Ok(index)
    }
}
