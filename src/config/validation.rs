use crate::config::types::{
    Config, CrawlerConfig, ForumSpec, HttpConfig, PublishConfig, PublishTarget, SelectorConfig,
};
use crate::ConfigError;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_selector_config(&config.selectors)?;
    validate_publish_config(&config.publish)?;
    validate_forums(&config.forums)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;

    if config.pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be >= 1, got {}",
            config.pages
        )));
    }

    let limits = [
        ("max_concurrent_forums", config.max_concurrent_forums),
        ("max_concurrent_pages", config.max_concurrent_pages),
        ("max_concurrent_threads", config.max_concurrent_threads),
    ];
    for (name, limit) in limits {
        if limit == Some(0) {
            return Err(ConfigError::Validation(format!(
                "{} must be >= 1 when set",
                name
            )));
        }
    }

    Ok(())
}

/// Upper bound for `http.max-retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the base URL is an absolute http(s) URL
pub fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            base_url
        )));
    }

    Ok(())
}

/// Validates the site adapter: listing template and every structural query
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for placeholder in ["{category}", "{page}"] {
        if !config.listing_path.contains(placeholder) {
            return Err(ConfigError::Validation(format!(
                "listing_path '{}' must contain {}",
                config.listing_path, placeholder
            )));
        }
    }

    for selector in [
        &config.thread_link,
        &config.title,
        &config.body,
        &config.attachment,
    ] {
        validate_selector(selector)?;
    }

    if config.enclosure_type.trim().is_empty() {
        return Err(ConfigError::Validation(
            "enclosure_type cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses a CSS selector, mapping failure to a config error
pub fn validate_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Validates publishing configuration
fn validate_publish_config(config: &PublishConfig) -> Result<(), ConfigError> {
    match config.target {
        PublishTarget::S3 => {
            if config.bucket.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "bucket cannot be empty".to_string(),
                ));
            }
            if let Some(endpoint) = &config.endpoint {
                Url::parse(endpoint).map_err(|e| {
                    ConfigError::InvalidUrl(format!("Invalid endpoint '{}': {}", endpoint, e))
                })?;
            }
        }
        PublishTarget::Local => {
            let missing = config
                .local_dir
                .as_deref()
                .map(|dir| dir.trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "local_dir is required when target is 'local'".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// Validates forum entries
fn validate_forums(forums: &[ForumSpec]) -> Result<(), ConfigError> {
    if forums.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[forum]] entry is required".to_string(),
        ));
    }

    let mut paths = HashSet::new();
    for forum in forums {
        if forum.title.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Forum {} must have a title",
                forum.category_id
            )));
        }

        if forum.output_path.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Forum {} must have an output_path",
                forum.category_id
            )));
        }

        if !paths.insert(forum.output_path.as_str()) {
            return Err(ConfigError::Validation(format!(
                "output_path '{}' is used by more than one forum",
                forum.output_path
            )));
        }
    }

    Ok(())
}
