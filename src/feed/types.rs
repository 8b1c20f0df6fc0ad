//! Feed record and channel types

use chrono::{DateTime, Utc};

/// Length advertised on every enclosure; the real size is never known
pub const ENCLOSURE_LENGTH: &str = "0";

/// Metadata extracted from one thread page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    /// Thread title
    pub title: String,

    /// Absolute URL of the thread page
    pub link: String,

    /// Body text of the thread
    pub description: String,

    /// Absolute URL of the attachment
    pub enclosure_url: String,

    /// MIME type of the attachment
    pub enclosure_type: String,
}

impl ThreadRecord {
    /// Enclosure length, always the `"0"` placeholder
    pub fn enclosure_length(&self) -> &'static str {
        ENCLOSURE_LENGTH
    }
}

/// Aggregated feed for one forum
///
/// Built by a single forum crawl, which appends records as they arrive and
/// sorts once after every producer has finished.
#[derive(Debug, Clone)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<ThreadRecord>,
}

impl Feed {
    /// Creates an empty feed whose description mirrors its title
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            description: title.clone(),
            title,
            link: link.into(),
            created: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Appends a record, refusing one without a title
    ///
    /// Returns whether the record was added.
    pub fn push(&mut self, record: ThreadRecord) -> bool {
        if record.title.is_empty() {
            tracing::debug!("Refusing untitled record for {}", record.link);
            return false;
        }
        self.items.push(record);
        true
    }

    /// Orders items by link, lexicographically greatest first
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| b.link.cmp(&a.link));
    }

    /// Number of items in the feed
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
