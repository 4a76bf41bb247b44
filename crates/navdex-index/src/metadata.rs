//! Front-matter validation and canonical path derivation.
//!
//! [`MetadataValidator`] checks a parsed metadata map against a
//! [`MetadataSchema`] and derives the page's canonical path from its file
//! location. It does no I/O: the same metadata and relative path always give
//! the same result.
//!
//! # Path derivation
//!
//! - `guides/home.md` -> `guides`
//! - `guides/first_steps.md` -> `guides/first-steps`
//! - `home.md` -> `home`
//!
//! The derived path must be listed in the page's `paths`; every other entry
//! becomes a redirect to it.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde_json::Value;

use crate::error::SchemaError;
use crate::frontmatter::MetadataMap;

/// Keys every page may declare.
pub const DEFAULT_ALLOWED_KEYS: &[&str] = &[
    "description",
    "hideInMenu",
    "hideToc",
    "menuTitle",
    "menuWeight",
    "paths",
    "tags",
    "title",
];

/// Keys that name fields of the page record itself and can never be metadata.
pub const RESERVED_KEYS: &[&str] = &["content", "contentHash", "path", "redirectPaths", "sourceUrl"];

/// Recommended description length in characters.
pub const DESCRIPTION_LENGTH: RangeInclusive<usize> = 120..=160;

const TITLE: &str = "title";
const MENU_TITLE: &str = "menuTitle";
const PATHS: &str = "paths";
const DESCRIPTION: &str = "description";

/// Allowed metadata keys and soft constraints.
#[derive(Debug, Clone)]
pub struct MetadataSchema {
    allowed: BTreeSet<String>,
    description_length: RangeInclusive<usize>,
}

impl Default for MetadataSchema {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ALLOWED_KEYS.iter().map(|&k| k.to_owned()).collect(),
            description_length: DESCRIPTION_LENGTH,
        }
    }
}

impl MetadataSchema {
    /// Extend the allow-list. Reserved page field names are skipped.
    #[must_use]
    pub fn with_extra_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if RESERVED_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "Ignoring reserved metadata key");
                continue;
            }
            self.allowed.insert(key);
        }
        self
    }

    /// Whether `key` is in the allow-list.
    #[must_use]
    pub fn allows(&self, key: &str) -> bool {
        self.allowed.contains(key)
    }
}

/// Non-fatal metadata finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataWarning {
    /// `description` is shorter than recommended.
    DescriptionTooShort { length: usize, min: usize },
    /// `description` is longer than recommended.
    DescriptionTooLong { length: usize, max: usize },
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DescriptionTooShort { length, min } => write!(
                f,
                "description is too short ({length} characters, recommended at least {min})"
            ),
            Self::DescriptionTooLong { length, max } => write!(
                f,
                "description is too long ({length} characters, recommended at most {max})"
            ),
        }
    }
}

/// Metadata that passed validation, with derived routing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMetadata {
    /// Canonical path derived from the file name.
    pub path: String,
    /// Declared `paths` other than `path`, in declaration order.
    pub redirect_paths: Vec<String>,
    /// Page title.
    pub title: String,
    /// Navigation title, `title` unless overridden.
    pub menu_title: String,
    /// Remaining metadata (without `title`, `menuTitle` and `paths`).
    pub fields: MetadataMap,
    /// Soft constraint violations.
    pub warnings: Vec<MetadataWarning>,
}

/// Validates page metadata against a [`MetadataSchema`].
#[derive(Debug, Clone, Default)]
pub struct MetadataValidator {
    schema: MetadataSchema,
}

impl MetadataValidator {
    /// Create a validator for `schema`.
    #[must_use]
    pub fn new(schema: MetadataSchema) -> Self {
        Self { schema }
    }

    /// Validate `metadata` for the page at `relative` (a `/`-separated path
    /// from the source root).
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for unknown keys, a missing title, missing or
    /// malformed `paths`, or when the derived path is not declared.
    pub fn validate(
        &self,
        mut metadata: MetadataMap,
        relative: &str,
    ) -> Result<ValidatedMetadata, SchemaError> {
        self.check_keys(&metadata)?;

        let title = match metadata.remove(TITLE) {
            Some(Value::String(title)) if !title.is_empty() => title,
            _ => return Err(SchemaError::MissingTitle),
        };

        let declared = match metadata.remove(PATHS) {
            None => return Err(SchemaError::MissingPaths),
            Some(Value::Array(entries)) => string_entries(entries)?,
            Some(_) => return Err(SchemaError::PathsNotArray),
        };

        let path = filename_path(relative);
        if !declared.contains(&path) {
            return Err(SchemaError::PathNotDeclared {
                expected: path,
                declared,
            });
        }
        let redirect_paths = declared.into_iter().filter(|p| *p != path).collect();

        let menu_title = match metadata.remove(MENU_TITLE) {
            Some(Value::String(menu_title)) if !menu_title.is_empty() => menu_title,
            _ => title.clone(),
        };

        let warnings = self.check_description(&metadata);

        Ok(ValidatedMetadata {
            path,
            redirect_paths,
            title,
            menu_title,
            fields: metadata,
            warnings,
        })
    }

    fn check_keys(&self, metadata: &MetadataMap) -> Result<(), SchemaError> {
        let keys: Vec<String> = metadata
            .keys()
            .filter(|k| !self.schema.allows(k))
            .cloned()
            .collect();
        if keys.is_empty() {
            return Ok(());
        }
        Err(SchemaError::UnknownKeys {
            keys,
            allowed: self.schema.allowed.iter().cloned().collect(),
        })
    }

    fn check_description(&self, metadata: &MetadataMap) -> Vec<MetadataWarning> {
        let Some(Value::String(description)) = metadata.get(DESCRIPTION) else {
            return Vec::new();
        };
        let length = description.chars().count();
        let range = &self.schema.description_length;
        if length < *range.start() {
            vec![MetadataWarning::DescriptionTooShort {
                length,
                min: *range.start(),
            }]
        } else if length > *range.end() {
            vec![MetadataWarning::DescriptionTooLong {
                length,
                max: *range.end(),
            }]
        } else {
            Vec::new()
        }
    }
}

/// Derive the canonical path for a page file.
///
/// Strips a trailing `/home.md` (or else `.md`), then replaces every `_`
/// with `-`.
#[must_use]
pub fn filename_path(relative: &str) -> String {
    let stem = relative
        .strip_suffix("/home.md")
        .or_else(|| relative.strip_suffix(".md"))
        .unwrap_or(relative);
    stem.replace('_', "-")
}

fn string_entries(entries: Vec<Value>) -> Result<Vec<String>, SchemaError> {
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::String(s) => Ok(s),
            _ => Err(SchemaError::InvalidPathEntry { index }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn meta(value: Value) -> MetadataMap {
        serde_json::from_value(value).unwrap()
    }

    fn validate(value: Value, relative: &str) -> Result<ValidatedMetadata, SchemaError> {
        MetadataValidator::default().validate(meta(value), relative)
    }

    fn description(len: usize) -> String {
        "d".repeat(len)
    }

    #[test]
    fn test_filename_path() {
        assert_eq!(filename_path("setup.md"), "setup");
        assert_eq!(filename_path("guides/setup.md"), "guides/setup");
        assert_eq!(filename_path("guides/home.md"), "guides");
        assert_eq!(filename_path("home.md"), "home");
        assert_eq!(filename_path("first_steps/read_me.md"), "first-steps/read-me");
        assert_eq!(filename_path("a/b/home.md"), "a/b");
    }

    #[test]
    fn test_valid_metadata() {
        let result = validate(
            json!({
                "title": "Setup",
                "paths": ["old-setup", "guides/setup", "install"],
                "menuWeight": 2,
            }),
            "guides/setup.md",
        )
        .unwrap();

        assert_eq!(result.path, "guides/setup");
        assert_eq!(result.redirect_paths, vec!["old-setup", "install"]);
        assert_eq!(result.title, "Setup");
        assert_eq!(result.menu_title, "Setup");
        assert_eq!(result.fields, meta(json!({"menuWeight": 2})));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_menu_title_overrides_title() {
        let result = validate(
            json!({"title": "Installing navdex", "menuTitle": "Install", "paths": ["install"]}),
            "install.md",
        )
        .unwrap();

        assert_eq!(result.menu_title, "Install");
        assert!(!result.fields.contains_key("menuTitle"));
    }

    #[test]
    fn test_redirects_drop_every_copy_of_own_path() {
        let result = validate(
            json!({"title": "T", "paths": ["a", "b", "a", "b", "a"]}),
            "a.md",
        )
        .unwrap();

        assert_eq!(result.redirect_paths, vec!["b", "b"]);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = validate(
            json!({"title": "T", "paths": ["a"], "layout": "wide", "author": "me"}),
            "a.md",
        )
        .unwrap_err();

        let SchemaError::UnknownKeys { keys, allowed } = err else {
            panic!("expected UnknownKeys, got {err:?}");
        };
        assert_eq!(keys, vec!["author", "layout"]);
        assert!(allowed.contains(&"title".to_owned()));
        assert!(allowed.contains(&"paths".to_owned()));
    }

    #[test]
    fn test_extra_keys_extend_schema() {
        let schema = MetadataSchema::default().with_extra_keys(["layout"]);
        let result = MetadataValidator::new(schema)
            .validate(meta(json!({"title": "T", "paths": ["a"], "layout": "wide"})), "a.md")
            .unwrap();

        assert_eq!(result.fields.get("layout"), Some(&json!("wide")));
    }

    #[test]
    fn test_reserved_extra_keys_ignored() {
        let schema = MetadataSchema::default().with_extra_keys(["content", "sourceUrl"]);

        assert!(!schema.allows("content"));
        assert!(!schema.allows("sourceUrl"));
    }

    #[test]
    fn test_missing_title() {
        assert_eq!(
            validate(json!({"paths": ["a"]}), "a.md"),
            Err(SchemaError::MissingTitle)
        );
        assert_eq!(
            validate(json!({"title": "", "paths": ["a"]}), "a.md"),
            Err(SchemaError::MissingTitle)
        );
        assert_eq!(
            validate(json!({"title": 5, "paths": ["a"]}), "a.md"),
            Err(SchemaError::MissingTitle)
        );
    }

    #[test]
    fn test_missing_paths() {
        assert_eq!(
            validate(json!({"title": "T"}), "a.md"),
            Err(SchemaError::MissingPaths)
        );
    }

    #[test]
    fn test_paths_not_array() {
        assert_eq!(
            validate(json!({"title": "T", "paths": "a"}), "a.md"),
            Err(SchemaError::PathsNotArray)
        );
    }

    #[test]
    fn test_non_string_path_entry() {
        assert_eq!(
            validate(json!({"title": "T", "paths": ["a", 7]}), "a.md"),
            Err(SchemaError::InvalidPathEntry { index: 1 })
        );
    }

    #[test]
    fn test_path_must_be_declared() {
        assert_eq!(
            validate(json!({"title": "T", "paths": ["first_steps"]}), "first_steps.md"),
            Err(SchemaError::PathNotDeclared {
                expected: "first-steps".to_owned(),
                declared: vec!["first_steps".to_owned()],
            })
        );
    }

    #[test]
    fn test_home_page_path() {
        let result = validate(json!({"title": "Guides", "paths": ["guides"]}), "guides/home.md")
            .unwrap();

        assert_eq!(result.path, "guides");
        assert!(result.redirect_paths.is_empty());
    }

    #[test]
    fn test_description_boundaries() {
        for len in [120, 160] {
            let result = validate(
                json!({"title": "T", "paths": ["a"], "description": description(len)}),
                "a.md",
            )
            .unwrap();
            assert!(result.warnings.is_empty(), "length {len} should not warn");
            assert!(result.fields.contains_key("description"));
        }
    }

    #[test]
    fn test_description_too_short() {
        let result = validate(
            json!({"title": "T", "paths": ["a"], "description": description(119)}),
            "a.md",
        )
        .unwrap();

        assert_eq!(
            result.warnings,
            vec![MetadataWarning::DescriptionTooShort {
                length: 119,
                min: 120
            }]
        );
    }

    #[test]
    fn test_description_too_long() {
        let result = validate(
            json!({"title": "T", "paths": ["a"], "description": description(161)}),
            "a.md",
        )
        .unwrap();

        assert_eq!(
            result.warnings,
            vec![MetadataWarning::DescriptionTooLong {
                length: 161,
                max: 160
            }]
        );
        assert_eq!(
            result.warnings[0].to_string(),
            "description is too long (161 characters, recommended at most 160)"
        );
    }

    #[test]
    fn test_description_counts_characters_not_bytes() {
        let result = validate(
            json!({"title": "T", "paths": ["a"], "description": "é".repeat(120)}),
            "a.md",
        )
        .unwrap();

        assert!(result.warnings.is_empty());
    }
}
