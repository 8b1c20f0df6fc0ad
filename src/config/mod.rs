//! Configuration module for Forum-Feed
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use forum_feed::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("forum-feed.toml")).unwrap();
//! println!("Crawling {} forums", config.forums.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ForumSpec, HttpConfig, PublishConfig, PublishTarget, SelectorConfig,
    DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{
    apply_base_url_override, compute_config_hash, load_config, load_config_with_hash,
    parse_config, BASE_URL_ENV,
};
pub use validation::{validate_selector, MAX_RETRIES_LIMIT};

impl Config {
    /// Re-runs validation, e.g. after command-line overrides were applied
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        validation::validate(self)
    }
}
