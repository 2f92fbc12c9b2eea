use std::path::Path;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::classifier::{self, CrawlScope};
use crate::config::CrawlConfig;
use crate::corpus::Corpus;
use crate::error::CrawlError;
use crate::frontier::{self, Frontier};
use crate::reporter::{CrawlEvent, CrawlReporter};
use crate::traits::{Cleaner, Fetcher, LinkExtractor};

/// Lifecycle of one crawl request.
///
/// `Idle → Running → {Completed, Failed}`; terminal states have no
/// outgoing transitions. `Failed` is reached only through an unrecoverable
/// condition (storage unwritable at flush time), never through per-URL
/// fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// A fetch that failed and was skipped. The URL stays visited.
#[derive(Debug, Clone)]
pub struct FailedFetch {
    pub url: String,
    pub error: String,
}

/// Outcome of a completed crawl.
#[derive(Debug)]
pub struct CrawlReport {
    pub crawl_id: Uuid,
    pub seed_url: String,
    /// URL → extracted text, in fetch completion order.
    pub corpus: Corpus,
    /// Per-URL soft failures, in the order they occurred.
    pub failures: Vec<FailedFetch>,
    /// URLs still queued when the crawl stopped (cap hit or cancelled).
    pub pending_links: usize,
    /// URLs for which a fetch was attempted.
    pub urls_visited: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Drives one crawl: pop frontier, fetch, extract text and links, record.
///
/// Generic over its I/O seams via traits, enabling dependency injection
/// and testability without a network or a browser. Each instance serves a
/// single crawl request; frontier, visited set, and corpus are created
/// fresh in [`Crawler::run`] and never shared across crawls.
pub struct Crawler<F, C, L>
where
    F: Fetcher,
    C: Cleaner,
    L: LinkExtractor,
{
    fetcher: F,
    cleaner: C,
    links: L,
    config: CrawlConfig,
    state: CrawlState,
}

impl<F, C, L> Crawler<F, C, L>
where
    F: Fetcher,
    C: Cleaner,
    L: LinkExtractor,
{
    pub fn new(fetcher: F, cleaner: C, links: L, config: CrawlConfig) -> Self {
        Self {
            fetcher,
            cleaner,
            links,
            config,
            state: CrawlState::Idle,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Run the crawl to completion and return the report.
    ///
    /// Per-URL fetch failures are recorded in the report, not raised; an
    /// unfetchable seed yields `Completed` with an empty corpus. The caller
    /// owns persistence (see [`Corpus::write_json`] / [`Corpus::write_text`]).
    pub async fn run<R: CrawlReporter>(
        &mut self,
        reporter: &R,
    ) -> Result<CrawlReport, CrawlError> {
        self.run_with_cancel(reporter, CancellationToken::new())
            .await
    }

    /// Like [`Crawler::run`], but stops launching fetches once `cancel`
    /// fires. In-flight fetches are drained, not aborted.
    pub async fn run_with_cancel<R: CrawlReporter>(
        &mut self,
        reporter: &R,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        if self.state != CrawlState::Idle {
            return Err(CrawlError::InvalidConfig(format!(
                "crawler already ran (state {:?}); build a new one per crawl request",
                self.state
            )));
        }
        let seed = self.config.validate()?;
        let scope = CrawlScope::from_seed(&seed)?;
        self.state = CrawlState::Running;

        let report = self.crawl_loop(seed, scope, reporter, cancel).await?;
        self.state = CrawlState::Completed;
        Ok(report)
    }

    /// Run the crawl and flush both corpus renderings.
    ///
    /// A storage failure at flush time is the one unrecoverable condition:
    /// the crawler transitions to `Failed` and the error is surfaced.
    pub async fn run_and_persist<R: CrawlReporter>(
        &mut self,
        reporter: &R,
        cancel: CancellationToken,
        json_path: &Path,
        text_path: &Path,
    ) -> Result<CrawlReport, CrawlError> {
        if self.state != CrawlState::Idle {
            return Err(CrawlError::InvalidConfig(format!(
                "crawler already ran (state {:?}); build a new one per crawl request",
                self.state
            )));
        }
        let seed = self.config.validate()?;
        let scope = CrawlScope::from_seed(&seed)?;
        self.state = CrawlState::Running;

        let report = self.crawl_loop(seed, scope, reporter, cancel).await?;

        let flushed = report
            .corpus
            .write_json(json_path)
            .and_then(|()| report.corpus.write_text(text_path));
        if let Err(e) = flushed {
            self.state = CrawlState::Failed;
            return Err(e);
        }

        self.state = CrawlState::Completed;
        Ok(report)
    }

    async fn crawl_loop<R: CrawlReporter>(
        &self,
        seed: Url,
        scope: CrawlScope,
        reporter: &R,
        cancel: CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let crawl_id = Uuid::new_v4();
        let started_at = Utc::now();
        let max_pages = self.config.max_pages;

        let mut queue = Frontier::new(self.config.exclude.clone());
        let mut corpus = Corpus::new();
        let mut failures: Vec<FailedFetch> = Vec::new();

        reporter.report(CrawlEvent::Started {
            crawl_id,
            seed: seed.as_str(),
            max_pages,
        });

        // The seed goes through the same normalization as discovered links
        // so later self-references dedup against it.
        let normalized_seed = classifier::normalize_for_frontier(seed.as_str())
            .ok_or_else(|| CrawlError::MalformedUrl(seed.to_string()))?;
        queue.enqueue(normalized_seed);

        let mut in_flight = FuturesUnordered::new();
        let mut cap_reported = false;
        let mut cancel_reported = false;

        loop {
            if cancel.is_cancelled() && !cancel_reported {
                reporter.report(CrawlEvent::Cancelled);
                cancel_reported = true;
            }

            // Launch fetches up to the concurrency bound, never past the
            // corpus cap counting work already in flight. All frontier and
            // corpus mutation stays on this task; workers only fetch.
            while !cancel.is_cancelled()
                && in_flight.len() < self.config.concurrency
                && corpus.len() + in_flight.len() < max_pages
            {
                let Some(url) = queue.dequeue() else { break };
                in_flight.push(fetch_one(self.fetcher.clone(), url));
            }

            let Some((url, result)) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(html) => {
                    reporter.report(CrawlEvent::PageFetched {
                        url: &url,
                        html_bytes: html.len(),
                    });

                    // Budget measured before this page is recorded, so even
                    // a cap-1 crawl leaves its discoveries in the frontier.
                    let budget = max_pages.saturating_sub(corpus.len());
                    if budget > 0 {
                        if let Ok(page_url) = Url::parse(&url) {
                            let hrefs = self.links.extract_hrefs(&html);
                            let admitted = frontier::admit_links(
                                hrefs.iter().map(String::as_str),
                                &page_url,
                                &scope,
                                &mut queue,
                                budget,
                            );
                            reporter.report(CrawlEvent::LinksAdmitted {
                                url: &url,
                                count: admitted,
                            });
                        }
                    }

                    match self.cleaner.clean(&html) {
                        Ok(text) => corpus.record(url, text),
                        Err(e) => {
                            tracing::warn!(%url, error = %e, "Text extraction failed, skipping URL");
                            failures.push(FailedFetch {
                                url,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                Err(e) => {
                    let error = e.to_string();
                    reporter.report(CrawlEvent::FetchFailed {
                        url: &url,
                        error: &error,
                    });
                    failures.push(FailedFetch { url, error });
                }
            }

            if corpus.len() >= max_pages && !cap_reported {
                reporter.report(CrawlEvent::CapReached { max_pages });
                cap_reported = true;
            }
        }

        reporter.report(CrawlEvent::Finished {
            crawl_id,
            pages: corpus.len(),
            failures: failures.len(),
        });

        Ok(CrawlReport {
            crawl_id,
            seed_url: seed.into(),
            pending_links: queue.pending(),
            urls_visited: queue.visited_count(),
            corpus,
            failures,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// One unit of fetch work; the owner task interprets the result.
async fn fetch_one<F: Fetcher>(fetcher: F, url: String) -> (String, Result<String, CrawlError>) {
    let result = fetcher.fetch(&url).await;
    (url, result)
}
