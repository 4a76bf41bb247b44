//! URL templates for page sources and assets.

/// Builds fully-qualified URLs for source files.
pub trait UrlScheme: Send + Sync {
    /// URL of the raw page file at `relative` under `root`.
    fn page_url(&self, root: &str, relative: &str) -> String;

    /// URL of the asset at `relative` under `root`.
    fn asset_url(&self, root: &str, relative: &str) -> String;
}

/// CDN layout: `{base}/{root}/pages/{relative}` and `{base}/{root}/assets/{relative}`.
#[derive(Debug, Clone)]
pub struct CdnUrls {
    base: String,
}

impl CdnUrls {
    /// Create a scheme rooted at `base`. A trailing `/` is ignored.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }

    fn url(&self, root: &str, segment: &str, relative: &str) -> String {
        format!("{}/{root}/{segment}/{relative}", self.base)
    }
}

impl UrlScheme for CdnUrls {
    fn page_url(&self, root: &str, relative: &str) -> String {
        self.url(root, "pages", relative)
    }

    fn asset_url(&self, root: &str, relative: &str) -> String {
        self.url(root, "assets", relative)
    }
}
