//! Recursive source tree traversal.
//!
//! Each directory level lists its entries, classifies them, then fans out:
//! one future per file and one recursive walk per subdirectory. The level
//! joins all of them before merging into a fresh [`Index`], so no state is
//! shared between branches and the first error aborts the whole walk.

use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt, try_join, try_join_all};

use crate::PAGE_EXTENSION;
use crate::classify::{StructureRules, classify, list_entries};
use crate::error::IndexError;
use crate::index::Index;
use crate::page::{Page, PageBuilder};

/// A processed file, ready to be inserted into the level's index.
enum FileEntry {
    Page(String, Page),
    Asset(String, String),
}

/// Walks a source tree and builds an unresolved [`Index`].
pub(crate) struct Traverser<'a> {
    root: &'a Path,
    rules: &'a StructureRules,
    pages: &'a PageBuilder,
}

impl<'a> Traverser<'a> {
    pub fn new(root: &'a Path, rules: &'a StructureRules, pages: &'a PageBuilder) -> Self {
        Self { root, rules, pages }
    }

    /// Walk the whole tree.
    pub async fn run(&self) -> Result<Index, IndexError> {
        self.walk(String::new(), false).await
    }

    /// Walk the directory at `relative` (`""` for the root). `opaque` is set
    /// below exempt directories.
    fn walk(&self, relative: String, opaque: bool) -> BoxFuture<'_, Result<Index, IndexError>> {
        async move {
            let dir = self.full_path(&relative);
            let entries = list_entries(&dir).await?;
            let classified = classify(&entries, &relative, self.root, self.rules, opaque).await?;

            let files = try_join_all(classified.files.into_iter().map(|f| self.visit_file(f)));
            let dirs = try_join_all(classified.dirs.into_iter().map(|d| {
                let opaque = opaque || self.rules.is_exempt(file_name(&d));
                self.walk(d, opaque)
            }));
            let (files, subtrees) = try_join(files, dirs).await?;

            let mut index = Index::default();
            for entry in files {
                match entry {
                    FileEntry::Page(key, page) => index.insert_page(key, page)?,
                    FileEntry::Asset(key, url) => index.insert_asset(key, url)?,
                }
            }
            for subtree in subtrees {
                index.merge(subtree)?;
            }

            tracing::debug!(
                dir = %relative,
                pages = index.pages.len(),
                assets = index.assets.len(),
                "Merged directory"
            );
            Ok(index)
        }
        .boxed()
    }

    async fn visit_file(&self, relative: String) -> Result<FileEntry, IndexError> {
        if is_page(&relative) {
            let page = self.pages.build(&self.full_path(&relative), &relative).await?;
            Ok(FileEntry::Page(relative, page))
        } else {
            let url = self.pages.urls().asset_url(self.pages.root(), &relative);
            Ok(FileEntry::Asset(relative, url))
        }
    }

    fn full_path(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }
}

fn file_name(relative: &str) -> &str {
    relative.rsplit_once('/').map_or(relative, |(_, name)| name)
}

fn is_page(relative: &str) -> bool {
    Path::new(relative)
        .extension()
        .is_some_and(|ext| ext == PAGE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::frontmatter::YamlFrontMatter;
    use crate::metadata::MetadataValidator;
    use crate::urls::CdnUrls;

    fn page_builder() -> PageBuilder {
        PageBuilder::new(
            Arc::new(YamlFrontMatter),
            MetadataValidator::default(),
            Arc::new(CdnUrls::new("https://cdn.test")),
            "docs",
        )
    }

    fn write_page(root: &Path, relative: &str, path: &str) {
        let full = root.join(relative);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(
            full,
            format!("---\ntitle: {path}\npaths:\n  - {path}\n---\nBody of {path}\n"),
        )
        .unwrap();
    }

    async fn traverse(root: &Path) -> Result<Index, IndexError> {
        let builder = page_builder();
        let rules = StructureRules::default();
        Traverser::new(root, &rules, &builder).run().await
    }

    #[test]
    fn test_is_page() {
        assert!(is_page("a.md"));
        assert!(is_page("guides/a.md"));
        assert!(!is_page("images/a.png"));
        assert!(!is_page("notes.markdown"));
        assert!(!is_page("README"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("images"), "images");
        assert_eq!(file_name("guides/images"), "images");
    }

    #[tokio::test]
    async fn test_collects_pages_and_assets_recursively() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_page(root, "home.md", "home");
        write_page(root, "guides.md", "guides");
        write_page(root, "guides/setup.md", "guides/setup");
        write_page(root, "guides/advanced.md", "guides/advanced");
        write_page(root, "guides/advanced/tuning.md", "guides/advanced/tuning");
        fs::create_dir_all(root.join("images/icons")).unwrap();
        fs::write(root.join("images/pic.png"), [0u8, 1, 2]).unwrap();
        fs::write(root.join("images/icons/x.svg"), "<svg/>").unwrap();

        let index = traverse(root).await.unwrap();

        let page_keys: Vec<_> = index.pages.keys().map(String::as_str).collect();
        assert_eq!(
            page_keys,
            vec![
                "guides.md",
                "guides/advanced.md",
                "guides/advanced/tuning.md",
                "guides/setup.md",
                "home.md",
            ]
        );
        assert_eq!(
            index.assets.get("images/pic.png").map(String::as_str),
            Some("https://cdn.test/docs/assets/images/pic.png")
        );
        assert!(index.assets.contains_key("images/icons/x.svg"));
        assert_eq!(
            index.pages["guides/advanced/tuning.md"].source_url,
            "https://cdn.test/docs/pages/guides/advanced/tuning.md"
        );
    }

    #[tokio::test]
    async fn test_non_page_files_outside_exempt_dirs_are_assets() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_page(root, "guides.md", "guides");
        fs::create_dir(root.join("guides")).unwrap();
        fs::write(root.join("guides/diagram.svg"), "<svg/>").unwrap();

        let index = traverse(root).await.unwrap();

        assert!(index.assets.contains_key("guides/diagram.svg"));
        assert_eq!(index.pages.len(), 1);
    }

    #[tokio::test]
    async fn test_deep_structure_error_aborts_walk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_page(root, "guides.md", "guides");
        fs::create_dir_all(root.join("guides/orphan")).unwrap();

        let err = traverse(root).await.unwrap_err();

        assert!(matches!(
            err,
            IndexError::Structure { ref missing, .. } if missing == "guides/orphan.md"
        ));
    }

    #[tokio::test]
    async fn test_schema_error_in_subtree_aborts_walk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_page(root, "guides.md", "guides");
        write_page(root, "guides/setup.md", "wrong");

        let err = traverse(root).await.unwrap_err();

        assert!(matches!(err, IndexError::Schema { ref file, .. } if file == "guides/setup.md"));
    }

    #[tokio::test]
    async fn test_missing_root_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();

        let err = traverse(&temp_dir.path().join("nope")).await.unwrap_err();

        assert!(matches!(err, IndexError::Io { .. }));
    }

    #[tokio::test]
    async fn test_empty_root() {
        let temp_dir = tempfile::tempdir().unwrap();

        let index = traverse(temp_dir.path()).await.unwrap();

        assert_eq!(index, Index::default());
    }
}
