//! Thread extraction from parsed HTML
//!
//! Extraction is split in two:
//! - An [`ExtractionStrategy`] knows where fields live in one site's markup.
//! - The [`Extractor`] turns what the strategy finds into thread references
//!   and [`Extraction`] outcomes, independent of the markup.
//!
//! Neither performs I/O.

use crate::config::{validate_selector, SelectorConfig};
use crate::crawler::SiteLayout;
use crate::feed::ThreadRecord;
use crate::ConfigError;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// A parsed HTML document
///
/// Not `Send`: parse, extract and drop it between two awaits.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Text content of the first element matching `selector`, trimmed
    pub fn first_text(&self, selector: &Selector) -> String {
        self.html
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Attribute `attr` of the first element matching `selector`
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> String {
        self.html
            .select(selector)
            .next()
            .and_then(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// Attribute `attr` of every element matching `selector`, in document order
    pub fn all_attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.html
            .select(selector)
            .filter_map(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Raw field values found on a thread page; missing fields are empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadFields {
    pub title: String,
    pub body: String,
    pub attachment: String,
}

/// Locates fields in one site's markup
pub trait ExtractionStrategy: Send + Sync {
    /// Relative links to threads on a listing page
    fn thread_refs(&self, doc: &ParsedDocument) -> Vec<String>;

    /// Title, body text and attachment link of a thread page
    fn thread_fields(&self, doc: &ParsedDocument) -> ThreadFields;
}

/// Strategy driven by CSS selectors from the configuration
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    thread_link: Selector,
    title: Selector,
    body: Selector,
    attachment: Selector,
}

impl SelectorStrategy {
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            thread_link: validate_selector(&config.thread_link)?,
            title: validate_selector(&config.title)?,
            body: validate_selector(&config.body)?,
            attachment: validate_selector(&config.attachment)?,
        })
    }
}

impl ExtractionStrategy for SelectorStrategy {
    fn thread_refs(&self, doc: &ParsedDocument) -> Vec<String> {
        doc.all_attrs(&self.thread_link, "href")
    }

    fn thread_fields(&self, doc: &ParsedDocument) -> ThreadFields {
        ThreadFields {
            title: doc.first_text(&self.title),
            body: doc.first_text(&self.body),
            attachment: doc.first_attr(&self.attachment, "href"),
        }
    }
}

/// Outcome of extracting one thread page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A complete record for the feed
    Record(ThreadRecord),

    /// The thread is left out of the feed
    Dropped { url: String, reason: DropReason },
}

/// Why a thread page produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    EmptyTitle,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::EmptyTitle => write!(f, "empty title"),
        }
    }
}

impl Extraction {
    pub fn record(&self) -> Option<&ThreadRecord> {
        match self {
            Extraction::Record(record) => Some(record),
            Extraction::Dropped { .. } => None,
        }
    }
}

/// Turns parsed pages into thread references and records
#[derive(Clone)]
pub struct Extractor {
    strategy: Arc<dyn ExtractionStrategy>,
    site: SiteLayout,
    enclosure_type: String,
}

impl Extractor {
    pub fn new(
        strategy: Arc<dyn ExtractionStrategy>,
        site: SiteLayout,
        enclosure_type: impl Into<String>,
    ) -> Self {
        Self {
            strategy,
            site,
            enclosure_type: enclosure_type.into(),
        }
    }

    pub fn site(&self) -> &SiteLayout {
        &self.site
    }

    /// Thread links on a listing page; empty when none match
    pub fn extract_thread_refs(&self, doc: &ParsedDocument) -> Vec<String> {
        self.strategy.thread_refs(doc)
    }

    /// Builds the record for the thread page fetched from `url`
    ///
    /// A missing body becomes an empty description. A missing or unusable
    /// attachment link resolves to the site root. A missing title drops the
    /// thread.
    pub fn extract_thread_record(&self, doc: &ParsedDocument, url: &Url) -> Extraction {
        let fields = self.strategy.thread_fields(doc);

        if fields.title.is_empty() {
            return Extraction::Dropped {
                url: url.to_string(),
                reason: DropReason::EmptyTitle,
            };
        }

        let enclosure_url = self
            .site
            .resolve(&fields.attachment)
            .unwrap_or_else(|_| self.site.base().clone());

        Extraction::Record(ThreadRecord {
            title: fields.title,
            link: url.to_string(),
            description: fields.body,
            enclosure_url: enclosure_url.to_string(),
            enclosure_type: self.enclosure_type.clone(),
        })
    }
}
