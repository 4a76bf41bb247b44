//! The aggregate build result.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::page::Page;

/// Pages and assets discovered under a source root.
///
/// Keys are `/`-separated paths relative to the source root, including the
/// file extension (`guides/setup.md`, `images/pic.png`). Ordered maps keep the
/// serialized form independent of the order in which subtrees finished.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Pages by relative file path.
    pub pages: BTreeMap<String, Page>,
    /// Asset URLs by relative file path.
    pub assets: BTreeMap<String, String>,
}

impl Index {
    /// Insert a page under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateKey`] if `key` is already present.
    pub fn insert_page(&mut self, key: String, page: Page) -> Result<(), IndexError> {
        insert_unique(&mut self.pages, key, page)
    }

    /// Insert an asset URL under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateKey`] if `key` is already present.
    pub fn insert_asset(&mut self, key: String, url: String) -> Result<(), IndexError> {
        insert_unique(&mut self.assets, key, url)
    }

    /// Move every page and asset of `other` into `self`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateKey`] on the first colliding key.
    pub fn merge(&mut self, other: Self) -> Result<(), IndexError> {
        for (key, page) in other.pages {
            self.insert_page(key, page)?;
        }
        for (key, url) in other.assets {
            self.insert_asset(key, url)?;
        }
        Ok(())
    }

    /// Check that no two pages share a canonical path.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateRoute`] naming both files.
    pub fn check_routes(&self) -> Result<(), IndexError> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for (key, page) in &self.pages {
            if let Some(first) = seen.insert(&page.path, key) {
                return Err(IndexError::DuplicateRoute {
                    path: page.path.clone(),
                    first: first.to_owned(),
                    second: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Find the page whose canonical path is `path`.
    #[must_use]
    pub fn page_by_path(&self, path: &str) -> Option<&Page> {
        self.pages.values().find(|p| p.path == path)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a metadata value can't be represented.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

fn insert_unique<V>(map: &mut BTreeMap<String, V>, key: String, value: V) -> Result<(), IndexError> {
    match map.entry(key) {
        Entry::Occupied(entry) => Err(IndexError::DuplicateKey {
            key: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::frontmatter::MetadataMap;

    fn page(path: &str) -> Page {
        Page {
            path: path.to_owned(),
            title: path.to_owned(),
            menu_title: path.to_owned(),
            fields: MetadataMap::new(),
            content: String::new(),
            content_hash: String::new(),
            source_url: String::new(),
            redirect_paths: Vec::new(),
        }
    }

    #[test]
    fn test_merge_disjoint() {
        let mut left = Index::default();
        left.insert_page("a.md".to_owned(), page("a")).unwrap();
        let mut right = Index::default();
        right.insert_page("b/c.md".to_owned(), page("b/c")).unwrap();
        right
            .insert_asset("b/x.png".to_owned(), "https://cdn/x.png".to_owned())
            .unwrap();

        left.merge(right).unwrap();

        assert_eq!(left.pages.len(), 2);
        assert_eq!(left.assets.len(), 1);
    }

    #[test]
    fn test_merge_collision_is_error() {
        let mut left = Index::default();
        left.insert_page("a.md".to_owned(), page("a")).unwrap();
        let mut right = Index::default();
        right.insert_page("a.md".to_owned(), page("other")).unwrap();

        let err = left.merge(right).unwrap_err();

        assert!(matches!(err, IndexError::DuplicateKey { ref key } if key == "a.md"));
        assert_eq!(left.pages["a.md"].path, "a");
    }

    #[test]
    fn test_merge_order_does_not_change_json() {
        let mut first = Index::default();
        first.insert_page("a.md".to_owned(), page("a")).unwrap();
        let mut second = Index::default();
        second.insert_page("b.md".to_owned(), page("b")).unwrap();
        second
            .insert_asset("img/b.png".to_owned(), "u".to_owned())
            .unwrap();

        let mut forward = Index::default();
        forward.merge(first.clone()).unwrap();
        forward.merge(second.clone()).unwrap();
        let mut backward = Index::default();
        backward.merge(second).unwrap();
        backward.merge(first).unwrap();

        assert_eq!(forward.to_json(false).unwrap(), backward.to_json(false).unwrap());
    }

    #[test]
    fn test_check_routes_detects_duplicates() {
        let mut index = Index::default();
        index.insert_page("a.md".to_owned(), page("a")).unwrap();
        index.insert_page("a/home.md".to_owned(), page("a")).unwrap();

        let err = index.check_routes().unwrap_err();

        assert_eq!(
            err.to_string(),
            "pages `a.md` and `a/home.md` both resolve to path `a`"
        );
    }

    #[test]
    fn test_page_by_path() {
        let mut index = Index::default();
        index.insert_page("first_steps.md".to_owned(), page("first-steps")).unwrap();

        assert!(index.page_by_path("first-steps").is_some());
        assert!(index.page_by_path("first_steps").is_none());
    }
}
