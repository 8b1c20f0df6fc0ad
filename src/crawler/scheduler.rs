//! Scheduler for repeated crawl cycles
//!
//! This module handles:
//! - Crawling every configured forum concurrently in one cycle
//! - Isolating forum failures so one broken forum does not stop the others
//! - Repeating cycles after a fixed sleep until shut down

use crate::config::{Config, ForumSpec};
use crate::crawler::forum::crawl_and_publish;
use crate::crawler::tasks::CrawlContext;
use crate::publish::Publisher;
use crate::ForumFeedError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A forum whose feed was published in a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedForum {
    pub category_id: u32,
    pub output_path: String,
    pub items: usize,
}

/// Outcome of one cycle over every configured forum
#[derive(Debug, Default)]
pub struct CycleReport {
    pub published: Vec<PublishedForum>,
    pub failed: Vec<(ForumSpec, ForumFeedError)>,
    pub dry_run: bool,
}

impl CycleReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Converts the report into an error carrying the first forum failure
    pub fn into_result(self) -> Result<(), ForumFeedError> {
        match self.failed.into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(()),
        }
    }
}

/// Runs forum crawls, once or on a fixed interval
///
/// The interval is measured from the end of one cycle to the start of the
/// next, so cycle start times drift by the duration of each crawl.
pub struct Scheduler {
    ctx: Arc<CrawlContext>,
    publisher: Arc<dyn Publisher>,
    forums: Vec<ForumSpec>,
    pages: u32,
    interval: Duration,
    dry_run: bool,
}

impl Scheduler {
    /// Creates a scheduler from a validated configuration
    pub fn new(config: &Config, publisher: Arc<dyn Publisher>) -> Result<Self, ForumFeedError> {
        let ctx = Arc::new(CrawlContext::from_config(config)?);
        Ok(Self::with_context(ctx, publisher, config))
    }

    /// Creates a scheduler around an existing crawl context
    pub fn with_context(
        ctx: Arc<CrawlContext>,
        publisher: Arc<dyn Publisher>,
        config: &Config,
    ) -> Self {
        Self {
            ctx,
            publisher,
            forums: config.forums.clone(),
            pages: config.crawler.pages,
            interval: Duration::from_secs(config.crawler.interval),
            dry_run: config.crawler.dry_run,
        }
    }

    /// Overrides the sleep between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Crawls and publishes every forum concurrently
    ///
    /// Each forum succeeds or fails on its own; the report lists both.
    pub async fn run_cycle(&self) -> CycleReport {
        if self.dry_run {
            self.log_dry_run();
            return CycleReport {
                dry_run: true,
                ..CycleReport::default()
            };
        }

        let mut handles = Vec::with_capacity(self.forums.len());
        for forum in &self.forums {
            let ctx = self.ctx.clone();
            let publisher = self.publisher.clone();
            let spec = forum.clone();
            let pages = self.pages;
            let handle = tokio::spawn(async move {
                let _permit = ctx.limits.forums.acquire().await;
                crawl_and_publish(ctx.clone(), &spec, pages, publisher.as_ref()).await
            });
            handles.push((forum.clone(), handle));
        }

        let mut report = CycleReport::default();
        for (forum, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(ForumFeedError::Task(join_error)),
            };
            match outcome {
                Ok(items) => report.published.push(PublishedForum {
                    category_id: forum.category_id,
                    output_path: forum.output_path.clone(),
                    items,
                }),
                Err(error) => {
                    let error = error.in_forum(forum.title.clone());
                    tracing::error!("{}", error);
                    report.failed.push((forum, error));
                }
            }
        }

        tracing::info!(
            published = report.published.len(),
            failed = report.failed.len(),
            "Cycle complete"
        );
        report
    }

    /// Runs cycles until done, stopping early on Ctrl-C
    ///
    /// With a zero interval a single cycle runs and any forum failure is
    /// returned as an error. Otherwise failures are logged and the loop
    /// carries on.
    pub async fn run(&self) -> Result<u64, ForumFeedError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Runs cycles until `shutdown` resolves; returns the number of finished cycles
    pub async fn run_until<F>(&self, shutdown: F) -> Result<u64, ForumFeedError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;

        loop {
            let report = tokio::select! {
                report = self.run_cycle() => report,
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, abandoning current cycle");
                    return Ok(cycles);
                }
            };
            cycles += 1;
            if report.dry_run {
                tracing::info!("Dry run cycle {} finished", cycles);
            }

            if self.interval.is_zero() {
                return report.into_result().map(|()| cycles);
            }

            if !report.is_success() {
                tracing::warn!(
                    "{} forum(s) failed this cycle; retrying next cycle",
                    report.failed.len()
                );
            }

            tracing::info!(
                "Sleeping for {} seconds before next run",
                self.interval.as_secs_f64()
            );
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested");
                    return Ok(cycles);
                }
            }
        }
    }

    fn log_dry_run(&self) {
        tracing::info!("Dry run");
        for forum in &self.forums {
            let listings: Vec<String> = (1..=self.pages)
                .filter_map(|page| self.ctx.site().listing_url(forum.category_id, page).ok())
                .map(|url| url.to_string())
                .collect();
            tracing::info!(
                category = forum.category_id,
                output = %forum.output_path,
                "Would crawl {}",
                listings.join(", ")
            );
        }
    }
}
