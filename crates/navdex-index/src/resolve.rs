//! Placeholder resolution.
//!
//! Runs once over a complete [`Index`], rewriting every placeholder in every
//! page body:
//!
//! - `{{@link guides/setup}}` -> `/guides/setup` (the target page's canonical path)
//! - `{{@link guides/setup#install}}` -> `/guides/setup#install`
//! - `{{@asset images/pic.png}}` -> `/images/pic.png`
//!
//! Lookups only use page keys, canonical paths and asset keys, none of which
//! change here, so pages can be processed in any order. Anchors are not
//! checked against the target page.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::PAGE_EXTENSION;
use crate::error::{IndexError, ReferenceKind};
use crate::index::Index;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{@(link|asset) ([^}]*)\}\}").unwrap());

/// Rewrite all placeholders in `index` in place.
///
/// # Errors
///
/// Returns [`IndexError::Reference`] for the first placeholder whose target
/// page or asset does not exist. Pages are left untouched in that case.
pub fn resolve_references(index: &mut Index) -> Result<(), IndexError> {
    let routes: HashMap<&str, &str> = index
        .pages
        .iter()
        .map(|(key, page)| (key.as_str(), page.path.as_str()))
        .collect();

    let mut resolved = Vec::new();
    for (key, page) in &index.pages {
        if let Some(content) = resolve_content(&page.content, key, &routes, &index.assets)? {
            resolved.push((key.clone(), content));
        }
    }

    let count = resolved.len();
    for (key, content) in resolved {
        if let Some(page) = index.pages.get_mut(&key) {
            page.content = content;
        }
    }
    tracing::debug!(pages = count, "Resolved references");
    Ok(())
}

/// Resolve the placeholders of one page body.
///
/// Returns `None` when the body has no placeholders.
fn resolve_content(
    content: &str,
    page: &str,
    routes: &HashMap<&str, &str>,
    assets: &BTreeMap<String, String>,
) -> Result<Option<String>, IndexError> {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(content) {
        let (span, replacement) = resolve_placeholder(&caps, page, routes, assets)?;
        out.push_str(&content[last..span.start]);
        out.push_str(&replacement);
        last = span.end;
    }
    if last == 0 {
        return Ok(None);
    }
    out.push_str(&content[last..]);
    Ok(Some(out))
}

fn resolve_placeholder(
    caps: &Captures<'_>,
    page: &str,
    routes: &HashMap<&str, &str>,
    assets: &BTreeMap<String, String>,
) -> Result<(std::ops::Range<usize>, String), IndexError> {
    let span = caps.get(0).map_or(0..0, |m| m.range());
    let token = caps.get(2).map_or("", |m| m.as_str());
    let invalid = |kind| IndexError::Reference {
        page: page.to_owned(),
        token: token.to_owned(),
        kind,
    };

    let replacement = if &caps[1] == "link" {
        let (target, anchor) = match token.split_once('#') {
            Some((target, anchor)) => (target, Some(anchor)),
            None => (token, None),
        };
        let path = routes
            .get(page_key(target).as_str())
            .ok_or_else(|| invalid(ReferenceKind::Link))?;
        match anchor {
            Some(anchor) => format!("/{path}#{anchor}"),
            None => format!("/{path}"),
        }
    } else {
        if !assets.contains_key(token) {
            return Err(invalid(ReferenceKind::Asset));
        }
        format!("/{token}")
    };

    Ok((span, replacement))
}

/// Index key of the page a link target names.
fn page_key(target: &str) -> String {
    let suffix = format!(".{PAGE_EXTENSION}");
    if target.ends_with(&suffix) {
        target.to_owned()
    } else {
        format!("{target}{suffix}")
    }
}
