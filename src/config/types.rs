use serde::Deserialize;

/// Default site root used when neither the config nor `BASE_URL` names one
pub const DEFAULT_BASE_URL: &str = "https://4k2.com/";

/// Main configuration structure for Forum-Feed
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default, rename = "forum")]
    pub forums: Vec<ForumSpec>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Root URL every listing and thread path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of listing pages crawled per forum, starting at page 1
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Seconds to sleep between cycles; 0 runs a single cycle
    #[serde(default)]
    pub interval: u64,

    /// Skip crawling and publishing while still honouring the repeat loop
    #[serde(default)]
    pub dry_run: bool,

    /// Maximum forums crawled at once (unbounded when absent)
    #[serde(default)]
    pub max_concurrent_forums: Option<usize>,

    /// Maximum listing-page fetches in flight at once (unbounded when absent)
    #[serde(default)]
    pub max_concurrent_pages: Option<usize>,

    /// Maximum thread-page fetches in flight at once (unbounded when absent)
    #[serde(default)]
    pub max_concurrent_threads: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pages: default_pages(),
            interval: 0,
            dry_run: false,
            max_concurrent_forums: None,
            max_concurrent_pages: None,
            max_concurrent_threads: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Immediate retries after a non-success status (attempts = retries + 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Skip TLS certificate validation for every request
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Overall per-request timeout in seconds (transport default when absent)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            accept_invalid_certs: true,
            timeout_secs: None,
        }
    }
}

/// Structural queries and URL layout of the crawled site
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Listing path relative to the base URL, with `{category}` and `{page}` placeholders
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// Anchors on a listing page that point at threads
    #[serde(default = "default_thread_link")]
    pub thread_link: String,

    /// Element holding the thread title
    #[serde(default = "default_title")]
    pub title: String,

    /// Element holding the thread body text
    #[serde(default = "default_body")]
    pub body: String,

    /// Anchor pointing at the thread attachment
    #[serde(default = "default_attachment")]
    pub attachment: String,

    /// MIME type advertised on every enclosure
    #[serde(default = "default_enclosure_type")]
    pub enclosure_type: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_path: default_listing_path(),
            thread_link: default_thread_link(),
            title: default_title(),
            body: default_body(),
            attachment: default_attachment(),
            enclosure_type: default_enclosure_type(),
        }
    }
}

/// Where finished feeds are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishTarget {
    S3,
    Local,
}

/// Publishing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PublishConfig {
    #[serde(default = "default_target")]
    pub target: PublishTarget,

    /// Bucket receiving every feed
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Region override for the S3 client
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override for S3-compatible stores
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Directory receiving feeds when the target is `local`
    #[serde(default)]
    pub local_dir: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            bucket: default_bucket(),
            region: None,
            endpoint: None,
            local_dir: None,
        }
    }
}

/// One forum category to crawl and publish
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForumSpec {
    /// Numeric category identifier used in listing URLs
    pub category_id: u32,

    /// Feed channel title
    pub title: String,

    /// Object key the feed is published under
    pub output_path: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_pages() -> u32 {
    3
}

fn default_max_retries() -> u32 {
    crate::crawler::MAX_RETRIES
}

fn default_true() -> bool {
    true
}

fn default_listing_path() -> String {
    "forum-{category}-{page}.htm?orderby=tid".to_string()
}

fn default_thread_link() -> String {
    "ul.threadlist li.thread div.media-body div.style3_subject a[href^='thread-']".to_string()
}

fn default_title() -> String {
    "title".to_string()
}

fn default_body() -> String {
    "div.message".to_string()
}

fn default_attachment() -> String {
    "ul.attachlist a[href^='attach-download']".to_string()
}

fn default_enclosure_type() -> String {
    "application/x-bittorrent".to_string()
}

fn default_target() -> PublishTarget {
    PublishTarget::S3
}

fn default_bucket() -> String {
    "libredmm".to_string()
}
