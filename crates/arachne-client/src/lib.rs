//! Concrete I/O implementations for the Arachne crawler's seams:
//! a headless-browser fetcher, a plain HTTP fetcher, an HTML-to-text
//! cleaner, and an HTML link extractor.

pub mod browser_fetcher;
pub mod cleaner;
pub mod fetcher;
pub mod links;

pub use browser_fetcher::BrowserFetcher;
pub use cleaner::HtmlTextCleaner;
pub use fetcher::ReqwestFetcher;
pub use links::ScraperLinkExtractor;
