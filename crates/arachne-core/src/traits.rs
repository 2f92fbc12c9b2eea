use std::future::Future;

use crate::error::CrawlError;

/// Fetches the rendered HTML of one URL.
///
/// A failed fetch must not leak resources: implementations release
/// whatever they acquired (connections, browser tabs) on both paths.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, CrawlError>> + Send;
}

/// Converts raw HTML into the plain text stored in the corpus.
pub trait Cleaner: Send + Sync + Clone {
    fn clean(&self, html: &str) -> Result<String, CrawlError>;
}

/// Pulls the raw `href` values of `<a>` elements out of HTML, in DOM order.
///
/// Implementations do no filtering; resolution and admission happen in
/// [`crate::frontier::admit_links`].
pub trait LinkExtractor: Send + Sync + Clone {
    fn extract_hrefs(&self, html: &str) -> Vec<String>;
}
