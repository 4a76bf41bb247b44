//! Front-matter splitting.
//!
//! The [`FrontMatter`] trait is the boundary between the index builder and
//! whatever syntax a page uses for its metadata block. [`YamlFrontMatter`]
//! handles the usual `---` delimited YAML block.

use std::collections::BTreeMap;

use crate::error::FrontMatterError;

/// Parsed front-matter keys and values.
pub type MetadataMap = BTreeMap<String, serde_json::Value>;

/// A raw document split into body text and metadata.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedDocument {
    /// Body with the front-matter block removed.
    pub content: String,
    /// Front-matter keys and values.
    pub metadata: MetadataMap,
}

/// Splits a raw page into body and metadata.
pub trait FrontMatter: Send + Sync {
    /// Split `raw` into body text and a key/value metadata map.
    ///
    /// # Errors
    ///
    /// Returns [`FrontMatterError`] if the metadata block is malformed.
    fn parse(&self, raw: &str) -> Result<ParsedDocument, FrontMatterError>;
}

/// YAML front-matter delimited by `---` lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFrontMatter;

const DELIMITER: &str = "---";

impl FrontMatter for YamlFrontMatter {
    fn parse(&self, raw: &str) -> Result<ParsedDocument, FrontMatterError> {
        let Some(rest) = strip_opening(raw) else {
            return Ok(ParsedDocument {
                content: raw.to_owned(),
                metadata: MetadataMap::new(),
            });
        };

        let (yaml, body) = split_closing(rest).ok_or(FrontMatterError::Unterminated)?;

        let metadata = if yaml.trim().is_empty() {
            MetadataMap::new()
        } else {
            serde_yaml::from_str(yaml)?
        };

        Ok(ParsedDocument {
            content: body.to_owned(),
            metadata,
        })
    }
}

/// Strip the opening delimiter line, returning the rest of the document.
fn strip_opening(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let rest = rest.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Find the closing delimiter line, returning `(yaml, body)`.
fn split_closing(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
