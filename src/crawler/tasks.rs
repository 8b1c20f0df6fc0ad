//! Page and thread tasks
//!
//! A page task fetches one listing page and spawns one thread task per
//! thread link found on it. Thread tasks push their extraction onto the
//! forum-wide queue. A page task returns only after all of its thread tasks
//! have finished.

use crate::config::Config;
use crate::crawler::extractor::{Extraction, Extractor, ParsedDocument, SelectorStrategy};
use crate::crawler::fanout::{join_all, CrawlLimits};
use crate::crawler::{FetchError, Fetcher, SiteLayout};
use crate::ForumFeedError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Producer side of a forum's result queue
pub type ResultSender = mpsc::Sender<Extraction>;

/// Everything a crawl task needs, shared by every task of a cycle
pub struct CrawlContext {
    pub fetcher: Fetcher,
    pub extractor: Extractor,
    pub limits: CrawlLimits,
}

impl CrawlContext {
    pub fn new(fetcher: Fetcher, extractor: Extractor, limits: CrawlLimits) -> Self {
        Self {
            fetcher,
            extractor,
            limits,
        }
    }

    /// Builds the fetcher, selector strategy and limits from the configuration
    pub fn from_config(config: &Config) -> Result<Self, ForumFeedError> {
        let fetcher = Fetcher::from_config(&config.http)?;
        let site = SiteLayout::new(&config.crawler.base_url, config.selectors.listing_path.clone())?;
        let strategy = SelectorStrategy::from_config(&config.selectors)?;
        let extractor = Extractor::new(
            Arc::new(strategy),
            site,
            config.selectors.enclosure_type.clone(),
        );
        Ok(Self::new(
            fetcher,
            extractor,
            CrawlLimits::from_config(&config.crawler),
        ))
    }

    pub fn site(&self) -> &SiteLayout {
        self.extractor.site()
    }
}

/// Fetches one thread page and queues its extraction
pub async fn run_thread_task(
    ctx: Arc<CrawlContext>,
    reference: String,
    results: ResultSender,
) -> Result<(), FetchError> {
    let url = ctx.site().resolve(&reference)?;

    let page = {
        let _permit = ctx.limits.threads.acquire().await;
        ctx.fetcher.fetch(&url).await?
    };

    let extraction = {
        let doc = ParsedDocument::parse(&page.body);
        ctx.extractor.extract_thread_record(&doc, &url)
    };

    match &extraction {
        Extraction::Record(record) => tracing::debug!("Item: {}", record.title),
        Extraction::Dropped { url, reason } => {
            tracing::debug!("Thread dropped ({}): {}", reason, url)
        }
    }

    // The receiver outlives every producer of its forum
    if results.send(extraction).await.is_err() {
        tracing::warn!("Result queue closed before {} was queued", url);
    }
    Ok(())
}

/// Fetches listing page `page` of `category` and crawls every thread on it
///
/// Any thread failure fails the page, but only after every thread task has
/// finished.
pub async fn run_page_task(
    ctx: Arc<CrawlContext>,
    category: u32,
    page: u32,
    results: ResultSender,
) -> Result<(), ForumFeedError> {
    let url = ctx.site().listing_url(category, page)?;

    let listing = {
        let _permit = ctx.limits.pages.acquire().await;
        ctx.fetcher.fetch(&url).await?
    };

    let references = {
        let doc = ParsedDocument::parse(&listing.body);
        ctx.extractor.extract_thread_refs(&doc)
    };

    if references.is_empty() {
        tracing::warn!("No threads found on {}", url);
    }

    let mut threads = JoinSet::new();
    for reference in references {
        threads.spawn(run_thread_task(ctx.clone(), reference, results.clone()));
    }
    drop(results);

    let crawled = join_all(threads).await?;
    tracing::debug!(
        category = category,
        page = page,
        threads = crawled,
        "Listing page done"
    );
    Ok(())
}
