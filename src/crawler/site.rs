//! URL layout of the crawled site

use crate::crawler::FetchError;
use url::Url;

/// Resolves listing and thread URLs against the site root
#[derive(Debug, Clone)]
pub struct SiteLayout {
    base: Url,
    listing_path: String,
}

impl SiteLayout {
    /// Creates a layout rooted at `base_url`
    ///
    /// The base is treated as a directory: a missing trailing slash is added
    /// so relative paths are appended to it rather than replacing its last
    /// segment.
    pub fn new(base_url: &str, listing_path: impl Into<String>) -> Result<Self, FetchError> {
        let mut base =
            Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            listing_path: listing_path.into(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL of listing page `page` of forum `category`
    ///
    /// # Example
    ///
    /// ```
    /// use forum_feed::crawler::SiteLayout;
    ///
    /// let site = SiteLayout::new("https://4k2.com/", "forum-{category}-{page}.htm?orderby=tid").unwrap();
    /// let url = site.listing_url(3, 2).unwrap();
    /// assert_eq!(url.as_str(), "https://4k2.com/forum-3-2.htm?orderby=tid");
    /// ```
    pub fn listing_url(&self, category: u32, page: u32) -> Result<Url, FetchError> {
        let path = self
            .listing_path
            .replace("{category}", &category.to_string())
            .replace("{page}", &page.to_string());
        self.resolve(&path)
    }

    /// Resolves a link found on the site to an absolute URL
    ///
    /// An empty reference resolves to the base itself.
    pub fn resolve(&self, reference: &str) -> Result<Url, FetchError> {
        self.base
            .join(reference.trim())
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", reference, e)))
    }
}
