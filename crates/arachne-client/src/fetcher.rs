use std::time::Duration;

use arachne_core::config::DEFAULT_USER_AGENT;
use arachne_core::error::CrawlError;
use arachne_core::traits::Fetcher;
use reqwest::Client;

/// Plain HTTP fetcher using reqwest.
///
/// No JavaScript execution: suitable for static sites and cheaper than a
/// browser tab per page. Carries the same fixed user agent as
/// [`crate::BrowserFetcher`] so a site sees one consistent client.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self, CrawlError> {
        Self::with_timeout(Duration::from_secs(30), DEFAULT_USER_AGENT)
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| CrawlError::Fetch(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                CrawlError::Timeout(self.timeout_secs)
            } else {
                CrawlError::Fetch(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Fetch(format!(
                "HTTP {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| CrawlError::Fetch(format!("failed to read response body: {e}")))
    }
}
