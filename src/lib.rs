//! Forum-Feed: a forum-to-RSS publisher
//!
//! This crate periodically crawls the paginated thread listings of one or more
//! forum categories, extracts per-thread metadata, aggregates it into an RSS
//! feed per category and publishes each feed to an object store.

pub mod config;
pub mod crawler;
pub mod feed;
pub mod publish;

use thiserror::Error;

pub use crawler::FetchError;
pub use feed::FeedError;
pub use publish::PublishError;

/// Main error type for Forum-Feed operations
#[derive(Debug, Error)]
pub enum ForumFeedError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Crawl of forum {forum} failed: {source}")]
    Crawl {
        forum: String,
        #[source]
        source: Box<ForumFeedError>,
    },

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ForumFeedError {
    /// Wraps this error with the forum whose crawl produced it
    pub fn in_forum(self, forum: impl Into<String>) -> Self {
        ForumFeedError::Crawl {
            forum: forum.into(),
            source: Box::new(self),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Result type alias for Forum-Feed operations
pub type Result<T> = std::result::Result<T, ForumFeedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, ForumSpec};
pub use crawler::{crawl_forum, CycleReport, Scheduler};
pub use feed::{Feed, ThreadRecord};
pub use publish::Publisher;
