//! Feed publishing
//!
//! Finished feeds are handed to a [`Publisher`] together with the forum's
//! output path. The production target is an S3 bucket; a local directory
//! and an in-memory store are available for self-hosting and tests.

mod local;
mod s3;
mod traits;

pub use local::{LocalPublisher, MemoryPublisher, PublishedDocument};
pub use s3::S3Publisher;
pub use traits::{PublishError, PublishResult, Publisher};

use crate::config::{PublishConfig, PublishTarget};
use std::sync::Arc;

/// Builds the publisher selected by the configuration
pub async fn build_publisher(config: &PublishConfig) -> Arc<dyn Publisher> {
    match config.target {
        PublishTarget::S3 => {
            tracing::info!("Publishing to S3 bucket {}", config.bucket);
            Arc::new(S3Publisher::from_config(config).await)
        }
        PublishTarget::Local => {
            let dir = config.local_dir.clone().unwrap_or_default();
            tracing::info!("Publishing to local directory {}", dir);
            Arc::new(LocalPublisher::new(dir))
        }
    }
}
