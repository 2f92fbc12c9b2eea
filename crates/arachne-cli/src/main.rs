use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use arachne_client::{BrowserFetcher, HtmlTextCleaner, ReqwestFetcher, ScraperLinkExtractor};
use arachne_core::config::DEFAULT_USER_AGENT;
use arachne_core::reporter::TracingCrawlReporter;
use arachne_core::traits::Fetcher;
use arachne_core::{CrawlConfig, CrawlReport, Crawler};

#[derive(Parser)]
#[command(name = "arachne", version, about = "Single-domain web crawler producing a URL → text corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl one site breadth-first and write the corpus files
    Crawl {
        /// Seed URL; its host scopes the whole crawl
        #[arg(short, long)]
        url: String,

        /// Maximum number of pages in the corpus
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=1000))]
        max_pages: u32,

        /// URL that must never be fetched (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,

        /// Concurrent fetches; 1 gives strict breadth-first order
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=16))]
        concurrency: u32,

        /// Render pages in headless Chromium instead of plain HTTP
        #[arg(long, default_value_t = false)]
        browser: bool,

        /// Per-fetch navigation timeout in seconds
        #[arg(long, default_value_t = 30, env = "ARACHNE_TIMEOUT_SECS")]
        timeout_secs: u64,

        /// Destination for the JSON corpus (URL → text mapping)
        #[arg(long, default_value = "data/output.json")]
        out_json: PathBuf,

        /// Destination for the flattened plain-text corpus
        #[arg(long, default_value = "data/output.txt")]
        out_text: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("arachne_core=info".parse()?)
                .add_directive("arachne_client=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            max_pages,
            exclude,
            concurrency,
            browser,
            timeout_secs,
            out_json,
            out_text,
        } => {
            let timeout = Duration::from_secs(timeout_secs);
            let config = CrawlConfig::new(url)
                .with_max_pages(max_pages as usize)
                .with_exclude(exclude.into_iter().collect::<HashSet<_>>())
                .with_concurrency(concurrency as usize);

            let report = if browser {
                let fetcher = BrowserFetcher::launch_with(timeout, DEFAULT_USER_AGENT)
                    .await
                    .context("Failed to launch headless browser")?;
                run_crawl(fetcher, config, &out_json, &out_text).await?
            } else {
                let fetcher = ReqwestFetcher::with_timeout(timeout, DEFAULT_USER_AGENT)
                    .context("Failed to create HTTP client")?;
                run_crawl(fetcher, config, &out_json, &out_text).await?
            };

            println!("Scraped {} pages:", report.corpus.len());
            for url in report.corpus.urls() {
                println!("  {url}");
            }
            if !report.failures.is_empty() {
                println!("{} URL(s) failed and were skipped", report.failures.len());
            }
            println!(
                "Corpus written to {} and {}",
                out_json.display(),
                out_text.display()
            );
        }
    }

    Ok(())
}

/// Run one crawl and flush both corpus renderings.
///
/// Per-URL fetch failures surface as warnings during the run; only an
/// unwritable destination (or an invalid request) errors out here.
async fn run_crawl<F: Fetcher>(
    fetcher: F,
    config: CrawlConfig,
    out_json: &std::path::Path,
    out_text: &std::path::Path,
) -> Result<CrawlReport> {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, finishing in-flight fetches");
            ctrl_c.cancel();
        }
    });

    let mut crawler = Crawler::new(
        fetcher,
        HtmlTextCleaner::new(),
        ScraperLinkExtractor::new(),
        config,
    );

    crawler
        .run_and_persist(&TracingCrawlReporter, cancel, out_json, out_text)
        .await
        .context("Crawl failed")
}
