//! Fan-out helpers shared by the forum, page and thread levels
//!
//! Each level spawns its children into a `JoinSet`, optionally gated by a
//! semaphore, and waits for every child before reporting.

use crate::config::CrawlerConfig;
use crate::ForumFeedError;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Optional cap on simultaneous work at one level
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyLimit {
    semaphore: Option<Arc<Semaphore>>,
}

impl ConcurrencyLimit {
    /// `None` leaves the level unbounded
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            semaphore: limit.map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Waits for a slot; the slot is released when the permit is dropped
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        match &self.semaphore {
            // The semaphore is never closed
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.semaphore.is_some()
    }
}

/// Caps for the three fan-out levels
#[derive(Debug, Clone, Default)]
pub struct CrawlLimits {
    pub forums: ConcurrencyLimit,
    pub pages: ConcurrencyLimit,
    pub threads: ConcurrencyLimit,
}

impl CrawlLimits {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            forums: ConcurrencyLimit::new(config.max_concurrent_forums),
            pages: ConcurrencyLimit::new(config.max_concurrent_pages),
            threads: ConcurrencyLimit::new(config.max_concurrent_threads),
        }
    }
}

/// Waits for every task in `tasks`, then reports the first failure
///
/// Siblings of a failed task are not cancelled; they run to completion so
/// the join is a full barrier. Returns the number of tasks joined.
pub async fn join_all<E>(mut tasks: JoinSet<Result<(), E>>) -> Result<usize, ForumFeedError>
where
    E: Into<ForumFeedError> + 'static,
{
    let mut joined = 0;
    let mut first_error: Option<ForumFeedError> = None;

    while let Some(outcome) = tasks.join_next().await {
        joined += 1;
        let error = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e.into(),
            Err(join_error) => ForumFeedError::Task(join_error),
        };
        if first_error.is_none() {
            first_error = Some(error);
        } else {
            tracing::debug!("Additional task failure: {}", error);
        }
    }

    match first_error {
        Some(error) => Err(error),
        None => Ok(joined),
    }
}
