use thiserror::Error;

/// Error taxonomy for a crawl.
///
/// Per-URL failures (`Fetch`, `Timeout`) are recovered inside the crawl
/// loop: the URL stays in the visited set, no corpus entry is written, and
/// the crawl continues. Everything else aborts the operation it occurs in.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Fetching a page failed (network error, navigation failure, renderer crash).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Navigation/request timed out.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Headless browser could not be configured or launched.
    #[error("browser error: {0}")]
    Browser(String),

    /// HTML-to-text conversion failed for one page.
    #[error("clean error: {0}")]
    Clean(String),

    /// URL could not be parsed. Fatal for the seed, silently dropped for hrefs.
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// Crawl configuration rejected before the crawl started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization of the corpus failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Corpus destination unwritable (permissions, disk full, missing directory).
    #[error("storage error: {0}")]
    Storage(String),
}

impl CrawlError {
    /// True for failures scoped to a single page fetch.
    ///
    /// These never abort a running crawl; the orchestrator logs them and
    /// moves on to the next frontier entry.
    pub fn is_page_failure(&self) -> bool {
        matches!(
            self,
            CrawlError::Fetch(_) | CrawlError::Timeout(_) | CrawlError::Clean(_)
        )
    }
}

impl From<std::io::Error> for CrawlError {
    fn from(e: std::io::Error) -> Self {
        CrawlError::Storage(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_failures() {
        assert!(CrawlError::Fetch("connection reset".into()).is_page_failure());
        assert!(CrawlError::Timeout(30).is_page_failure());
    }

    #[test]
    fn test_fatal_failures() {
        assert!(!CrawlError::Storage("disk full".into()).is_page_failure());
        assert!(!CrawlError::MalformedUrl("not a url".into()).is_page_failure());
        assert!(!CrawlError::InvalidConfig("max_pages must be > 0".into()).is_page_failure());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CrawlError = io.into();
        assert!(matches!(err, CrawlError::Storage(_)));
    }
}
