//! Feed aggregation and serialization
//!
//! This module holds the records produced by thread extraction, the
//! per-forum feed they are aggregated into, and its RSS rendering.

mod render;
mod types;

pub use render::{render_rss, RSS_CONTENT_TYPE};
pub use types::{Feed, ThreadRecord, ENCLOSURE_LENGTH};

use thiserror::Error;

/// Errors that can occur while producing a feed document
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to serialize feed: {0}")]
    Serialize(String),
}
