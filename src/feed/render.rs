//! RSS 2.0 rendering of a finished feed

use crate::feed::types::{Feed, ThreadRecord};
use crate::feed::FeedError;
use rss::{Channel, Enclosure, Guid, Item};

/// MIME type of the rendered document
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

/// Renders the feed as an RSS 2.0 document
///
/// Items are written in their current order; callers sort first.
pub fn render_rss(feed: &Feed) -> Result<Vec<u8>, FeedError> {
    let channel = Channel {
        title: feed.title.clone(),
        link: feed.link.clone(),
        description: feed.description.clone(),
        pub_date: Some(feed.created.to_rfc2822()),
        items: feed.items.iter().map(to_item).collect(),
        ..Default::default()
    };

    channel
        .write_to(Vec::new())
        .map_err(|e| FeedError::Serialize(e.to_string()))
}

fn to_item(record: &ThreadRecord) -> Item {
    Item {
        title: Some(record.title.clone()),
        link: Some(record.link.clone()),
        description: Some(record.description.clone()),
        guid: Some(Guid {
            value: record.link.clone(),
            permalink: true,
        }),
        enclosure: Some(Enclosure {
            url: record.enclosure_url.clone(),
            length: record.enclosure_length().to_string(),
            mime_type: record.enclosure_type.clone(),
        }),
        ..Default::default()
    }
}
