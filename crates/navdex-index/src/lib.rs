//! Content index building for navdex.
//!
//! This crate turns a directory of markdown pages and binary assets into an
//! [`Index`]:
//!
//! - Recursive concurrent traversal with the overview-file rule
//!   (every `name/` directory needs a sibling `name.md`)
//! - Front-matter validation against a metadata allow-list
//! - Canonical paths and redirects derived from file locations
//! - Content fingerprints and source URLs
//! - `{{@link ...}}` / `{{@asset ...}}` placeholder resolution
//!
//! # Example
//!
//! ```ignore
//! use navdex_index::{IndexBuilder, IndexConfig};
//!
//! let index = IndexBuilder::new(config).build().await?;
//! std::fs::write("index.json", index.to_json(true)?)?;
//! ```

mod builder;
mod classify;
mod error;
mod frontmatter;
mod hash;
mod index;
mod metadata;
mod page;
mod resolve;
mod traverse;
mod urls;

/// Extension of page files. Everything else is an asset.
pub const PAGE_EXTENSION: &str = "md";

pub use builder::{IndexBuilder, IndexConfig};
pub use classify::{DEFAULT_EXEMPT_DIRS, StructureRules};
pub use error::{FrontMatterError, IndexError, ReferenceKind, SchemaError};
pub use frontmatter::{FrontMatter, MetadataMap, ParsedDocument, YamlFrontMatter};
pub use hash::content_hash;
pub use index::Index;
pub use metadata::{
    DEFAULT_ALLOWED_KEYS, DESCRIPTION_LENGTH, MetadataSchema, MetadataValidator, MetadataWarning,
    RESERVED_KEYS, ValidatedMetadata, filename_path,
};
pub use page::{Page, PageBuilder};
pub use resolve::resolve_references;
pub use urls::{CdnUrls, UrlScheme};
