//! Forum crawl - aggregation of one forum into a feed
//!
//! One page task per listing page produces onto a single queue. A
//! supervisor task joins the page tasks while this task drains the queue
//! into the feed. The queue closes once the last producer is gone, after
//! which the feed is sorted and, if every page succeeded, published.

use crate::config::ForumSpec;
use crate::crawler::extractor::Extraction;
use crate::crawler::fanout::join_all;
use crate::crawler::tasks::{run_page_task, CrawlContext};
use crate::feed::{render_rss, Feed, RSS_CONTENT_TYPE};
use crate::publish::Publisher;
use crate::ForumFeedError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Capacity of a forum's result queue
const QUEUE_CAPACITY: usize = 64;

/// Crawls listing pages `1..=pages` of `forum` and returns the sorted feed
///
/// Fails if any page or thread fetch fails; no partial feed is returned.
pub async fn crawl_forum(
    ctx: Arc<CrawlContext>,
    forum: &ForumSpec,
    pages: u32,
) -> Result<Feed, ForumFeedError> {
    let feed_link = ctx.site().listing_url(forum.category_id, 1)?;
    let (sender, mut receiver) = mpsc::channel::<Extraction>(QUEUE_CAPACITY);

    let mut page_tasks = JoinSet::new();
    for page in 1..=pages {
        page_tasks.spawn(run_page_task(
            ctx.clone(),
            forum.category_id,
            page,
            sender.clone(),
        ));
    }
    // Only producers hold senders from here on
    drop(sender);

    let supervisor = tokio::spawn(join_all(page_tasks));

    let mut feed = Feed::new(forum.title.clone(), feed_link.to_string());
    let mut dropped = 0usize;
    while let Some(extraction) = receiver.recv().await {
        match extraction {
            Extraction::Record(record) => {
                feed.push(record);
            }
            Extraction::Dropped { .. } => dropped += 1,
        }
    }

    let pages_done = supervisor.await??;
    feed.sort();

    tracing::info!(
        category = forum.category_id,
        pages = pages_done,
        items = feed.len(),
        dropped = dropped,
        "Feed assembled"
    );
    Ok(feed)
}

/// Crawls `forum`, renders its feed and publishes it under the forum's output path
///
/// Returns the number of items published.
pub async fn crawl_and_publish(
    ctx: Arc<CrawlContext>,
    forum: &ForumSpec,
    pages: u32,
    publisher: &dyn Publisher,
) -> Result<usize, ForumFeedError> {
    let feed = crawl_forum(ctx, forum, pages).await?;
    let content = render_rss(&feed)?;

    tracing::info!(
        "RSS generated, category: {}, items#: {}",
        forum.category_id,
        feed.len()
    );

    publisher
        .publish(&forum.output_path, content, RSS_CONTENT_TYPE)
        .await?;

    tracing::info!("Published {}", forum.output_path);
    Ok(feed.len())
}
