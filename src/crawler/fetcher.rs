//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client
//! - GET requests with immediate retries on non-success status codes
//! - Error classification into transport and exhaustion failures
//!
//! # TLS posture
//!
//! The forum this crawler was written for serves an unreliable certificate
//! chain, so certificate validation is disabled unless
//! `http.accept-invalid-certs = false` is configured. Only public pages are
//! fetched and nothing is sent but plain GET requests.

use crate::config::HttpConfig;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Retries after the first attempt before a fetch is abandoned
pub const MAX_RETRIES: u32 = 3;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("Transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Every attempt answered with a non-success status
    #[error("Giving up on {url} after {attempts} attempts (last status {status})")]
    Exhausted {
        url: String,
        attempts: u32,
        status: u16,
    },

    /// The response body could not be read as text
    #[error("Failed to parse response body of {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A URL being fetched and the attempt currently in flight (1-based)
#[derive(Debug, Clone)]
pub struct FetchTarget {
    pub url: Url,
    pub attempt: u32,
}

impl FetchTarget {
    pub fn new(url: Url) -> Self {
        Self { url, attempt: 1 }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,

    /// Number of requests issued, including the successful one
    pub attempts: u32,
}

/// Builds the HTTP client shared by every fetch
///
/// Environment proxies are honoured.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(concat!("forum-feed/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches pages with a bounded, immediate retry policy
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return the body |
/// | Any other status | Retry immediately, up to `max_retries` times |
/// | Budget spent | `FetchError::Exhausted` |
/// | No response at all | `FetchError::Transport`, no retry |
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
}

impl Fetcher {
    pub fn new(client: Client, max_retries: u32) -> Self {
        Self {
            client,
            max_retries,
        }
    }

    /// Builds a fetcher with its own client from the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, config.max_retries))
    }

    /// Total attempts allowed per URL
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Fetches `url`, retrying non-success responses
    ///
    /// # Example
    ///
    /// ```no_run
    /// use forum_feed::config::HttpConfig;
    /// use forum_feed::crawler::Fetcher;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let fetcher = Fetcher::from_config(&HttpConfig::default())?;
    /// let page = fetcher.fetch(&"https://4k2.com/".parse()?).await?;
    /// println!("{} bytes", page.body.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut target = FetchTarget::new(url.clone());

        loop {
            tracing::info!(url = %target.url, attempt = target.attempt, "GET");

            let response = self
                .client
                .get(target.url.clone())
                .send()
                .await
                .map_err(|source| FetchError::Transport {
                    url: target.url.to_string(),
                    source,
                })?;

            let status = response.status();
            if status.is_success() {
                return read_body(target, status, response).await;
            }

            if target.attempt > self.max_retries {
                tracing::error!(
                    url = %target.url,
                    attempt = target.attempt,
                    status = status.as_u16(),
                    "Retry budget exhausted"
                );
                return Err(FetchError::Exhausted {
                    url: target.url.to_string(),
                    attempts: target.attempt,
                    status: status.as_u16(),
                });
            }

            tracing::warn!(
                url = %target.url,
                attempt = target.attempt,
                status = status.as_u16(),
                "Non-success status, retrying"
            );
            target.attempt = target.attempt.saturating_add(1);
        }
    }
}

async fn read_body(
    target: FetchTarget,
    status: StatusCode,
    response: reqwest::Response,
) -> Result<FetchedPage, FetchError> {
    let body = response.text().await.map_err(|e| FetchError::Parse {
        url: target.url.to_string(),
        message: e.to_string(),
    })?;

    Ok(FetchedPage {
        url: target.url,
        status_code: status.as_u16(),
        body,
        attempts: target.attempt,
    })
}
