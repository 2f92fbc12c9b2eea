use uuid::Uuid;

/// Progress events emitted while a crawl runs.
#[derive(Debug, Clone)]
pub enum CrawlEvent<'a> {
    Started {
        crawl_id: Uuid,
        seed: &'a str,
        max_pages: usize,
    },
    PageFetched {
        url: &'a str,
        html_bytes: usize,
    },
    FetchFailed {
        url: &'a str,
        error: &'a str,
    },
    LinksAdmitted {
        url: &'a str,
        count: usize,
    },
    CapReached {
        max_pages: usize,
    },
    Cancelled,
    Finished {
        crawl_id: Uuid,
        pages: usize,
        failures: usize,
    },
}

/// Receives crawl events (decoupled logging).
pub trait CrawlReporter: Send + Sync {
    fn report(&self, event: CrawlEvent<'_>) {
        let _ = event;
    }
}

/// Reporter that uses the `tracing` crate.
///
/// Per-URL fetch failures are warnings; they never abort the crawl.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingCrawlReporter;

impl CrawlReporter for TracingCrawlReporter {
    fn report(&self, event: CrawlEvent<'_>) {
        match event {
            CrawlEvent::Started {
                crawl_id,
                seed,
                max_pages,
            } => {
                tracing::info!(%crawl_id, %seed, %max_pages, "Crawl started");
            }
            CrawlEvent::PageFetched { url, html_bytes } => {
                tracing::info!(%url, %html_bytes, "Fetched page");
            }
            CrawlEvent::FetchFailed { url, error } => {
                tracing::warn!(%url, %error, "Fetch failed, skipping URL");
            }
            CrawlEvent::LinksAdmitted { url, count } => {
                tracing::debug!(%url, %count, "Links admitted to frontier");
            }
            CrawlEvent::CapReached { max_pages } => {
                tracing::info!(%max_pages, "Corpus cap reached, draining in-flight fetches");
            }
            CrawlEvent::Cancelled => {
                tracing::info!("Crawl cancelled, no further fetches will launch");
            }
            CrawlEvent::Finished {
                crawl_id,
                pages,
                failures,
            } => {
                tracing::info!(%crawl_id, %pages, %failures, "Crawl finished");
            }
        }
    }
}
