//! Test utilities: mock implementations of the crawl seams.
//!
//! Handwritten mocks for dependency injection in unit tests, so crawl
//! behavior can be exercised without a network, a browser, or an HTML
//! parser. All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::CrawlError;
use crate::reporter::{CrawlEvent, CrawlReporter};
use crate::traits::{Cleaner, Fetcher, LinkExtractor};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Fetcher scripted with a URL → response map.
///
/// URLs without a scripted response fail with [`CrawlError::Fetch`], which
/// doubles as the "network error" case. Every fetch is appended to a log
/// so tests can assert on fetch counts and dedup behavior.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Script a successful fetch for `url`.
    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(html.into()));
        self
    }

    /// Script a failing fetch for `url`.
    pub fn failing(self, url: &str, error: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(error.to_string()));
        self
    }

    /// Shared log of every URL fetched, in call order.
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.log)
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        self.log.lock().unwrap().push(url.to_string());
        match self.pages.lock().unwrap().get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(error)) => Err(CrawlError::Fetch(error.clone())),
            None => Err(CrawlError::Fetch(format!("no response scripted for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MockCleaner
// ---------------------------------------------------------------------------

/// Cleaner that passes HTML through unchanged, or always fails.
#[derive(Clone)]
pub struct MockCleaner {
    error: Arc<Mutex<Option<CrawlError>>>,
}

impl MockCleaner {
    pub fn passthrough() -> Self {
        Self {
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_error(error: CrawlError) -> Self {
        Self {
            error: Arc::new(Mutex::new(Some(error))),
        }
    }
}

impl Cleaner for MockCleaner {
    fn clean(&self, html: &str) -> Result<String, CrawlError> {
        let mut err = self.error.lock().unwrap();
        if let Some(e) = err.take() {
            return Err(e);
        }
        Ok(html.to_string())
    }
}

// ---------------------------------------------------------------------------
// MockLinkExtractor
// ---------------------------------------------------------------------------

/// Link extractor that scans for `href="…"` substrings in order.
///
/// Good enough for the synthetic pages built with [`page_with_links`];
/// real HTML parsing lives behind the same trait in the client crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockLinkExtractor;

impl MockLinkExtractor {
    pub fn from_html() -> Self {
        Self
    }
}

impl LinkExtractor for MockLinkExtractor {
    fn extract_hrefs(&self, html: &str) -> Vec<String> {
        let mut hrefs = Vec::new();
        let mut rest = html;
        while let Some(start) = rest.find("href=\"") {
            rest = &rest[start + "href=\"".len()..];
            let Some(end) = rest.find('"') else { break };
            hrefs.push(rest[..end].to_string());
            rest = &rest[end + 1..];
        }
        hrefs
    }
}

/// Build a minimal HTML page whose body is a list of anchors.
pub fn page_with_links(urls: &[&str]) -> String {
    let anchors: String = urls
        .iter()
        .map(|u| format!("<a href=\"{u}\">{u}</a>"))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}

// ---------------------------------------------------------------------------
// Reporters
// ---------------------------------------------------------------------------

/// Reporter that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl CrawlReporter for NullReporter {}

/// Reporter that records event names in order.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: Arc<Mutex<Vec<String>>>,
}

impl CrawlReporter for RecordingReporter {
    fn report(&self, event: CrawlEvent<'_>) {
        let label = match &event {
            CrawlEvent::Started { .. } => "Started",
            CrawlEvent::PageFetched { .. } => "PageFetched",
            CrawlEvent::FetchFailed { .. } => "FetchFailed",
            CrawlEvent::LinksAdmitted { .. } => "LinksAdmitted",
            CrawlEvent::CapReached { .. } => "CapReached",
            CrawlEvent::Cancelled => "Cancelled",
            CrawlEvent::Finished { .. } => "Finished",
        };
        self.events.lock().unwrap().push(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_fetcher_scripts_and_logs() {
        let fetcher = MockFetcher::default()
            .page("https://a.test/", "<html></html>")
            .failing("https://a.test/broken", "boom");

        assert!(fetcher.fetch("https://a.test/").await.is_ok());
        assert!(fetcher.fetch("https://a.test/broken").await.is_err());
        assert!(fetcher.fetch("https://a.test/unknown").await.is_err());
        assert_eq!(fetcher.log().lock().unwrap().len(), 3);
    }

    #[test]
    fn mock_link_extractor_preserves_order() {
        let html = page_with_links(&["/a", "/b", "/c"]);
        let hrefs = MockLinkExtractor::from_html().extract_hrefs(&html);
        assert_eq!(hrefs, ["/a", "/b", "/c"]);
    }
}
