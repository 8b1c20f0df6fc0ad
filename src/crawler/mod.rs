//! Crawler module for forum fetching and feed aggregation
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Pluggable extraction of thread links and thread fields
//! - Page and thread fan-out onto a per-forum result queue
//! - Forum aggregation and repeated scheduling

mod extractor;
mod fanout;
mod fetcher;
mod forum;
mod scheduler;
mod site;
mod tasks;

pub use extractor::{
    DropReason, Extraction, ExtractionStrategy, Extractor, ParsedDocument, SelectorStrategy,
    ThreadFields,
};
pub use fanout::{join_all, ConcurrencyLimit, CrawlLimits};
pub use fetcher::{build_http_client, FetchError, FetchTarget, FetchedPage, Fetcher, MAX_RETRIES};
pub use forum::{crawl_and_publish, crawl_forum};
pub use scheduler::{CycleReport, PublishedForum, Scheduler};
pub use site::SiteLayout;
pub use tasks::{run_page_task, run_thread_task, CrawlContext, ResultSender};
