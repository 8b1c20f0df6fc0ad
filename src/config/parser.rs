use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that overrides `crawler.base-url`
pub const BASE_URL_ENV: &str = "BASE_URL";

/// Loads and parses a configuration file from the given path
///
/// The `BASE_URL` environment variable, when set and non-empty, replaces the
/// configured base URL before validation.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use forum_feed::config::load_config;
///
/// let config = load_config(Path::new("forum-feed.toml")).unwrap();
/// println!("Pages per forum: {}", config.crawler.pages);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_base_url_override(&mut config, std::env::var(BASE_URL_ENV).ok());
    validate(&config)?;
    Ok(config)
}

/// Parses configuration content without validating it
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Replaces the base URL with `value` unless it is absent or blank
pub fn apply_base_url_override(config: &mut Config, value: Option<String>) {
    if let Some(base_url) = value.filter(|v| !v.trim().is_empty()) {
        tracing::debug!("Base URL overridden from environment: {}", base_url);
        config.crawler.base_url = base_url;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so each published feed can be traced back to the
/// configuration that produced it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
