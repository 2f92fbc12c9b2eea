use url::Url;

use crate::error::CrawlError;

/// File suffixes that never yield further links or useful page text.
///
/// Matches are case-insensitive on the URL path.
const NON_CONTENT_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".pdf", ".txt"];

/// Anchor placeholders some CMSes emit for "empty" links.
const PLACEHOLDER_HREFS: &[&str] = &["http://", "https://"];

/// The authority (host + effective port) a crawl is confined to.
///
/// Captured once from the seed URL and immutable for the crawl's lifetime.
/// Scheme is deliberately ignored so that `http://` and `https://` pages of
/// the same site fall into one scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    host: String,
    port: Option<u16>,
}

impl CrawlScope {
    /// Derive the scope from a seed URL.
    pub fn from_seed(seed: &Url) -> Result<Self, CrawlError> {
        let host = seed
            .host_str()
            .ok_or_else(|| CrawlError::MalformedUrl(format!("seed URL has no host: {seed}")))?;
        Ok(Self {
            host: host.to_ascii_lowercase(),
            port: seed.port_or_known_default(),
        })
    }

    /// True if `candidate` points at the same host and effective port.
    ///
    /// Scheme-relative links that resolve to a different host fail here
    /// like any other cross-origin URL.
    pub fn contains(&self, candidate: &Url) -> bool {
        match candidate.host_str() {
            Some(host) => {
                host.eq_ignore_ascii_case(&self.host)
                    && candidate.port_or_known_default() == self.port
            }
            None => false,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// True if the URL's path ends in a binary/non-HTML suffix.
pub fn is_non_content_asset(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    NON_CONTENT_SUFFIXES.iter().any(|ext| path.ends_with(ext))
}

/// True for `href` values that carry no destination at all.
pub fn is_placeholder_href(href: &str) -> bool {
    href.is_empty() || PLACEHOLDER_HREFS.contains(&href)
}

/// Canonicalize a URL string for frontier/visited-set membership checks.
///
/// Parsing and reserializing percent-encodes literal spaces and normalizes
/// the authority, so equal pages compare equal as strings. Idempotent:
/// normalizing an already-normalized URL returns the identical string.
/// Malformed input yields `None`; such candidates are never enqueued.
pub fn normalize_for_frontier(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    Some(url.into())
}

/// Resolve an href against the page it appeared on.
///
/// Placeholder and malformed hrefs resolve to `None`.
pub fn resolve_href(page_url: &Url, href: &str) -> Option<Url> {
    if is_placeholder_href(href) {
        return None;
    }
    page_url.join(href).ok()
}
