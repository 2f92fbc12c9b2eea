use std::collections::HashSet;
use std::time::Duration;

use url::Url;

use crate::error::CrawlError;

/// Default corpus size cap when none is given.
pub const DEFAULT_MAX_PAGES: usize = 30;

/// User agent attached to every fetch.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.99 Safari/537.36";

/// One crawl request: seed, scope inputs, and resource bounds.
///
/// A config describes a single run; the orchestrator builds fresh
/// frontier/visited/corpus state from it every time.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Starting point; its authority defines the crawl scope.
    pub seed_url: String,
    /// URLs that must never be fetched or enqueued.
    pub exclude: HashSet<String>,
    /// Hard cap on corpus entries.
    pub max_pages: usize,
    /// Number of fetches allowed in flight at once. 1 = strict BFS.
    pub concurrency: usize,
    /// Per-fetch navigation timeout.
    pub fetch_timeout: Duration,
    /// User agent attached to every fetch.
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            exclude: HashSet::new(),
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: 1,
            fetch_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_exclude(mut self, exclude: HashSet<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Check bounds and parse the seed URL.
    ///
    /// Runs before any state transition, so a bad request never reaches
    /// `Running`.
    pub fn validate(&self) -> Result<Url, CrawlError> {
        if self.max_pages == 0 {
            return Err(CrawlError::InvalidConfig(
                "max_pages must be at least 1".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(CrawlError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        Url::parse(&self.seed_url)
            .map_err(|e| CrawlError::MalformedUrl(format!("seed URL {:?}: {e}", self.seed_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::new("https://example.test/");
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.concurrency, 1);
        assert!(config.exclude.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_max_pages() {
        let config = CrawlConfig::new("https://example.test/").with_max_pages(0);
        assert!(matches!(
            config.validate(),
            Err(CrawlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        let config = CrawlConfig::new("https://example.test/").with_concurrency(0);
        assert!(matches!(
            config.validate(),
            Err(CrawlError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_seed() {
        let config = CrawlConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(CrawlError::MalformedUrl(_))
        ));
    }
}
