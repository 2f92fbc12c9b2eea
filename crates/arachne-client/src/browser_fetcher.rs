use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use arachne_core::config::DEFAULT_USER_AGENT;
use arachne_core::error::CrawlError;
use arachne_core::traits::Fetcher;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;

/// Headless-browser fetcher using Chromium via the Chrome DevTools Protocol.
///
/// Returns the page's HTML *after* JavaScript has run, which is what a
/// crawl of an SPA or lazy-loading site needs. A single Chromium process
/// is shared across all clones of this struct; every [`Fetcher::fetch`]
/// call opens a fresh tab, applies the crawl's user agent, navigates, and
/// closes the tab again — on failure paths too, so one page's state never
/// lingers into the next fetch.
#[derive(Clone)]
pub struct BrowserFetcher {
    browser: Arc<Browser>,
    timeout: Duration,
    user_agent: String,
}

impl BrowserFetcher {
    /// Launches a headless Chromium with a **30 s** navigation timeout and
    /// the crawler's default user agent.
    ///
    /// Requires a Chromium / Chrome binary reachable via `$PATH`, the
    /// default locations checked by `chromiumoxide`, or `$CHROME_BIN`.
    pub async fn launch() -> Result<Self, CrawlError> {
        Self::launch_with(Duration::from_secs(30), DEFAULT_USER_AGENT).await
    }

    /// Launches a headless Chromium with a custom timeout and user agent.
    pub async fn launch_with(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let mut builder = BrowserConfig::builder();
        builder = builder.no_sandbox().disable_default_args();

        if let Some(bin) = Self::find_chrome_binary() {
            tracing::info!("Using Chrome binary: {}", bin.display());
            builder = builder.chrome_executable(bin);
        }

        let config = builder
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-popup-blocking")
            .arg("--no-first-run")
            .build()
            .map_err(|e| CrawlError::Browser(format!("browser config error: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::Browser(format!("failed to launch browser: {e}")))?;

        // The CDP handler must be polled continuously for the connection to work.
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    tracing::warn!("Browser CDP handler error: {event:?}");
                    break;
                }
            }
        });

        Ok(Self {
            browser: Arc::new(browser),
            timeout,
            user_agent: user_agent.to_string(),
        })
    }

    /// Locate a Chrome/Chromium binary, preferring an explicit `$CHROME_BIN`.
    ///
    /// Snap-packaged Chromium hides the real binary behind a wrapper that
    /// rejects standard CLI flags, so the snap-internal path comes before
    /// the usual system locations. `None` lets `chromiumoxide` run its own
    /// lookup.
    fn find_chrome_binary() -> Option<PathBuf> {
        if let Ok(p) = std::env::var("CHROME_BIN") {
            let path = PathBuf::from(&p);
            if path.exists() {
                return Some(path);
            }
        }

        let candidates: &[&str] = &[
            "/snap/chromium/current/usr/lib/chromium-browser/chrome",
            "/var/lib/flatpak/exports/bin/org.chromium.Chromium",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
        ];
        candidates.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Navigate the tab and read the rendered DOM.
    async fn render(&self, page: &Page, url: &str) -> Result<String, CrawlError> {
        page.set_user_agent(SetUserAgentOverrideParams::new(self.user_agent.clone()))
            .await
            .map_err(|e| CrawlError::Fetch(format!("failed to set user agent: {e}")))?;

        page.goto(url)
            .await
            .map_err(|e| CrawlError::Fetch(format!("failed to navigate to {url}: {e}")))?;

        // <body> appearing is the minimal signal that the page rendered.
        page.find_element("body")
            .await
            .map_err(|e| CrawlError::Fetch(format!("page did not render body: {e}")))?;

        page.content()
            .await
            .map_err(|e| CrawlError::Fetch(format!("failed to read page content: {e}")))
    }
}

impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CrawlError::Fetch(format!("failed to open tab: {e}")))?;

        let outcome = match tokio::time::timeout(self.timeout, self.render(&page, url)).await {
            Ok(inner) => inner,
            Err(_) => Err(CrawlError::Timeout(self.timeout.as_secs())),
        };

        // Close the tab on success and failure alike.
        let _ = page.close().await;

        outcome
    }
}
