//! Core of the Arachne single-domain crawler: URL classification, the
//! BFS frontier, the URL → text corpus, and the crawl orchestrator.
//!
//! I/O (browser, HTTP, HTML parsing) lives behind the [`traits`] seams;
//! concrete implementations are in the `arachne-client` crate.

pub mod classifier;
pub mod config;
pub mod corpus;
pub mod crawl;
pub mod error;
pub mod frontier;
pub mod reporter;
pub mod testutil;
pub mod traits;

pub use classifier::CrawlScope;
pub use config::CrawlConfig;
pub use corpus::Corpus;
pub use crawl::{CrawlReport, CrawlState, Crawler};
pub use error::CrawlError;
pub use reporter::{CrawlReporter, TracingCrawlReporter};
pub use traits::{Cleaner, Fetcher, LinkExtractor};
