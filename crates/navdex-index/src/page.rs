//! Page records and the builder that produces them from source files.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::frontmatter::{FrontMatter, MetadataMap};
use crate::hash::content_hash;
use crate::metadata::MetadataValidator;
use crate::urls::UrlScheme;

/// One markdown source file in the index.
///
/// Serializes as a flat JSON object: the record fields in camelCase with the
/// passthrough metadata (`description`, `menuWeight`, ...) alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Canonical route, unique across the index.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Navigation title.
    pub menu_title: String,
    /// Whitelisted metadata passed through verbatim.
    #[serde(flatten)]
    pub fields: MetadataMap,
    /// Body without front-matter. Placeholders are rewritten after the build.
    pub content: String,
    /// Fingerprint of the body as read, before placeholder resolution.
    pub content_hash: String,
    /// URL of the raw source file.
    pub source_url: String,
    /// Alternate routes that redirect to `path`.
    pub redirect_paths: Vec<String>,
}

/// Turns markdown files into [`Page`] records.
pub struct PageBuilder {
    front_matter: Arc<dyn FrontMatter>,
    validator: MetadataValidator,
    urls: Arc<dyn UrlScheme>,
    root: String,
}

impl PageBuilder {
    /// Create a builder.
    ///
    /// # Arguments
    ///
    /// * `front_matter` - Splits raw files into body and metadata
    /// * `validator` - Metadata schema checks
    /// * `urls` - Source URL templates
    /// * `root` - Root identifier used in source URLs
    pub fn new(
        front_matter: Arc<dyn FrontMatter>,
        validator: MetadataValidator,
        urls: Arc<dyn UrlScheme>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            front_matter,
            validator,
            urls,
            root: root.into(),
        }
    }

    /// Root identifier used in URLs.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// URL scheme used for sources and assets.
    pub fn urls(&self) -> &dyn UrlScheme {
        self.urls.as_ref()
    }

    /// Read and build the page at `full_path`, known as `relative` in the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`] if the file can't be read,
    /// [`IndexError::Encoding`] if it isn't UTF-8, and any error from
    /// [`build_from_source`](Self::build_from_source).
    pub async fn build(&self, full_path: &Path, relative: &str) -> Result<Page, IndexError> {
        let bytes = tokio::fs::read(full_path)
            .await
            .map_err(|e| IndexError::io(full_path, e))?;
        let raw = String::from_utf8(bytes).map_err(|source| IndexError::Encoding {
            file: relative.to_owned(),
            source,
        })?;
        self.build_from_source(&raw, relative)
    }

    /// Build a page from already-decoded text.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FrontMatter`] or [`IndexError::Schema`].
    pub fn build_from_source(&self, raw: &str, relative: &str) -> Result<Page, IndexError> {
        let document = self
            .front_matter
            .parse(raw)
            .map_err(|source| IndexError::FrontMatter {
                file: relative.to_owned(),
                source,
            })?;

        let meta = self
            .validator
            .validate(document.metadata, relative)
            .map_err(|source| IndexError::Schema {
                file: relative.to_owned(),
                source,
            })?;

        for warning in &meta.warnings {
            tracing::warn!(file = %relative, "{warning}");
        }

        Ok(Page {
            path: meta.path,
            title: meta.title,
            menu_title: meta.menu_title,
            fields: meta.fields,
            content_hash: content_hash(&document.content),
            content: document.content,
            source_url: self.urls.page_url(&self.root, relative),
            redirect_paths: meta.redirect_paths,
        })
    }
}
