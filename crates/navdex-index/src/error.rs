//! Error types for index building.
//!
//! [`IndexError`] is the single error returned by a build. Every variant is
//! fatal: the first one raised anywhere in the tree aborts the whole build.
//! [`SchemaError`] is the pure validation error produced by
//! [`MetadataValidator`](crate::MetadataValidator) before a file name is attached.

use std::fmt;
use std::path::PathBuf;

/// Metadata failed validation against the schema.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Metadata contains keys outside the allow-list.
    #[error("invalid metadata keys [{}], allowed keys are [{}]", .keys.join(", "), .allowed.join(", "))]
    UnknownKeys {
        /// Offending keys, sorted.
        keys: Vec<String>,
        /// The full allow-list, sorted.
        allowed: Vec<String>,
    },

    /// `title` is absent, empty, or not a string.
    #[error("missing required metadata field `title`")]
    MissingTitle,

    /// `paths` is absent.
    #[error("missing required metadata field `paths`")]
    MissingPaths,

    /// `paths` is present but not an array.
    #[error("metadata field `paths` must be an array")]
    PathsNotArray,

    /// An entry of `paths` is not a string.
    #[error("metadata field `paths` entry {index} must be a string")]
    InvalidPathEntry {
        /// Zero-based position of the entry.
        index: usize,
    },

    /// The path derived from the file name is not listed in `paths`.
    #[error("path `{expected}` derived from the file name is not listed in `paths` [{}]", .declared.join(", "))]
    PathNotDeclared {
        /// Path derived from the file name.
        expected: String,
        /// Declared `paths` entries.
        declared: Vec<String>,
    },
}

/// Front-matter block could not be split or parsed.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// Opening `---` delimiter without a closing one.
    #[error("unterminated front-matter block")]
    Unterminated,

    /// The block is not valid YAML or not a mapping.
    #[error("invalid front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Which placeholder grammar a broken reference used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `{{@link target[#anchor]}}`
    Link,
    /// `{{@asset key}}`
    Asset,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => f.write_str("link"),
            Self::Asset => f.write_str("asset"),
        }
    }
}

/// Error returned by an index build.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Invalid or missing metadata in a page.
    #[error("{file}: {source}")]
    Schema {
        /// Page file, relative to the source root.
        file: String,
        #[source]
        source: SchemaError,
    },

    /// A directory lacks its overview page.
    #[error("directory `{dir}` is missing its overview file `{missing}`")]
    Structure {
        /// Directory, relative to the source root.
        dir: String,
        /// Expected overview file, relative to the source root.
        missing: String,
    },

    /// A placeholder points at a page or asset that does not exist.
    #[error("{page}: invalid {kind} reference `{token}`")]
    Reference {
        /// Page containing the placeholder.
        page: String,
        /// Token inside the placeholder.
        token: String,
        /// Placeholder grammar.
        kind: ReferenceKind,
    },

    /// Front-matter could not be parsed.
    #[error("{file}: {source}")]
    FrontMatter {
        /// Page file, relative to the source root.
        file: String,
        #[source]
        source: FrontMatterError,
    },

    /// Page file is not valid UTF-8.
    #[error("{file}: file is not valid UTF-8")]
    Encoding {
        /// Page file, relative to the source root.
        file: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Two subtrees produced the same relative key.
    #[error("duplicate index key `{key}`")]
    DuplicateKey {
        /// Colliding key.
        key: String,
    },

    /// Two pages derive the same canonical path.
    #[error("pages `{first}` and `{second}` both resolve to path `{path}`")]
    DuplicateRoute {
        /// Canonical path.
        path: String,
        /// First page file.
        first: String,
        /// Second page file.
        second: String,
    },

    /// Filesystem error.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    /// Create an I/O error with path context.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
