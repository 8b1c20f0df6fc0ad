//! Publisher trait and error types

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while publishing a feed
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to upload {path}: {message}")]
    Upload { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Destination for finished feed documents
///
/// Implementations write `content` under `path` so that it is publicly
/// readable with the given content type. A failure is not retried.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, path: &str, content: Vec<u8>, content_type: &str)
        -> PublishResult<()>;
}
