//! Directory entry classification.
//!
//! Splits one directory level into files and subdirectories and enforces the
//! overview-file rule: every subdirectory `name/` needs a sibling `name.md`,
//! except for the exempt asset containers. Exempt directories are opaque: the
//! rule is not enforced anywhere beneath them.

use std::path::Path;

use futures::future::try_join_all;

use crate::PAGE_EXTENSION;
use crate::error::IndexError;

/// Structural rules applied at every directory level.
#[derive(Debug, Clone)]
pub struct StructureRules {
    /// Directory names that need no overview file.
    pub exempt_dirs: Vec<String>,
    /// Skip entries whose name starts with `.`.
    pub ignore_hidden: bool,
}

/// Default exempt directory names.
pub const DEFAULT_EXEMPT_DIRS: [&str; 2] = ["images", "assets"];

impl Default for StructureRules {
    fn default() -> Self {
        Self {
            exempt_dirs: DEFAULT_EXEMPT_DIRS.iter().map(|&d| d.to_owned()).collect(),
            ignore_hidden: false,
        }
    }
}

impl StructureRules {
    pub(crate) fn is_exempt(&self, name: &str) -> bool {
        self.exempt_dirs.iter().any(|d| d == name)
    }
}

/// One directory level split into relative file and directory paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Classified {
    pub files: Vec<String>,
    pub dirs: Vec<String>,
}

/// Join a relative directory and an entry name with `/`.
pub(crate) fn join_relative(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// List entry names of `dir`, sorted.
pub(crate) async fn list_entries(dir: &Path) -> Result<Vec<String>, IndexError> {
    let mut reader = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| IndexError::io(dir, e))?;
    let mut names = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| IndexError::io(dir, e))?
    {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Classify `entries` of the directory at `relative` under `root`.
///
/// Entries are stat-ed concurrently. Buckets keep the order of `entries`.
/// Inside an `opaque` directory subdirectories need no overview file.
pub(crate) async fn classify(
    entries: &[String],
    relative: &str,
    root: &Path,
    rules: &StructureRules,
    opaque: bool,
) -> Result<Classified, IndexError> {
    let entries: Vec<&String> = entries
        .iter()
        .filter(|name| !(rules.ignore_hidden && name.starts_with('.')))
        .collect();

    let stats = try_join_all(entries.iter().map(|name| async move {
        let full = root.join(relative).join(name.as_str());
        tokio::fs::metadata(&full)
            .await
            .map(|m| m.is_dir())
            .map_err(|e| IndexError::io(full, e))
    }))
    .await?;

    let mut classified = Classified::default();
    for (name, is_dir) in entries.iter().zip(stats) {
        let path = join_relative(relative, name);
        if !is_dir {
            classified.files.push(path);
            continue;
        }
        if !opaque && !rules.is_exempt(name) {
            let overview = format!("{name}.{PAGE_EXTENSION}");
            if !entries.iter().any(|e| **e == overview) {
                return Err(IndexError::Structure {
                    missing: join_relative(relative, &overview),
                    dir: path,
                });
            }
        }
        classified.dirs.push(path);
    }

    tracing::debug!(
        dir = %relative,
        files = classified.files.len(),
        dirs = classified.dirs.len(),
        "Classified directory"
    );
    Ok(classified)
}
