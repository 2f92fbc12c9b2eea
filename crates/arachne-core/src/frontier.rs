use std::collections::{HashSet, VecDeque};

use url::Url;

use crate::classifier::{self, CrawlScope};

/// FIFO frontier of discovered-but-not-yet-fetched URLs.
///
/// The frontier is the single authority for "has this URL been seen":
/// the queue, the visited set, and the caller-supplied exclusion set all
/// live here, and every membership decision routes through
/// [`Frontier::enqueue`] / [`Frontier::dequeue`]. URLs are expected
/// to be normalized (see [`classifier::normalize_for_frontier`]) before
/// they get here, so membership checks are plain string comparisons.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    excluded: HashSet<String>,
}

impl Frontier {
    /// Create an empty frontier with a caller-supplied exclusion set.
    ///
    /// Excluded URLs are never enqueued and therefore never fetched.
    /// Each entry goes through the same normalization as candidate URLs,
    /// so a literal-space or mixed-case spelling still matches; entries
    /// that do not parse as URLs can never match and are dropped.
    pub fn new(excluded: HashSet<String>) -> Self {
        let excluded = excluded
            .iter()
            .filter_map(|url| classifier::normalize_for_frontier(url))
            .collect();
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            excluded,
        }
    }

    /// Append a URL unless it was already visited, queued, or excluded.
    ///
    /// Returns true if the URL was accepted.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) || self.excluded.contains(&url)
        {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Remove and return the head of the queue, marking it visited.
    ///
    /// Visited marking happens here, at dequeue time, so a URL is never
    /// simultaneously queued and visited.
    pub fn dequeue(&mut self) -> Option<String> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        self.visited.insert(url.clone());
        Some(url)
    }

    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs waiting to be fetched.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn was_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs for which a fetch has been attempted.
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Resolve, filter, and enqueue the hrefs found on one page.
///
/// Each href is resolved against `page_url`, then has to pass every gate:
/// not a placeholder, parseable, inside `scope`, not a non-content asset,
/// and new to the frontier (not visited, queued, or excluded). At most
/// `budget` URLs are admitted, in DOM order, first link wins. Returns the
/// number of URLs actually enqueued.
///
/// This is the one place where link extraction mutates shared crawl state.
pub fn admit_links<'a, I>(
    hrefs: I,
    page_url: &Url,
    scope: &CrawlScope,
    frontier: &mut Frontier,
    budget: usize,
) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut admitted = 0;
    for href in hrefs {
        if admitted >= budget {
            break;
        }
        let Some(resolved) = classifier::resolve_href(page_url, href) else {
            continue;
        };
        if !scope.contains(&resolved) {
            continue;
        }
        if classifier::is_non_content_asset(&resolved) {
            continue;
        }
        let Some(normalized) = classifier::normalize_for_frontier(resolved.as_str()) else {
            continue;
        };
        if frontier.enqueue(normalized) {
            admitted += 1;
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier() -> Frontier {
        Frontier::new(HashSet::new())
    }

    #[test]
    fn test_fifo_order() {
        let mut f = frontier();
        assert!(f.enqueue("https://example.test/a".into()));
        assert!(f.enqueue("https://example.test/b".into()));
        assert_eq!(f.dequeue().as_deref(), Some("https://example.test/a"));
        assert_eq!(f.dequeue().as_deref(), Some("https://example.test/b"));
        assert!(f.is_exhausted());
        assert!(f.dequeue().is_none());
    }

    #[test]
    fn test_duplicate_enqueue_rejected() {
        let mut f = frontier();
        assert!(f.enqueue("https://example.test/a".into()));
        assert!(!f.enqueue("https://example.test/a".into()));
        assert_eq!(f.pending(), 1);
    }

    #[test]
    fn test_visited_never_requeued() {
        let mut f = frontier();
        f.enqueue("https://example.test/a".into());
        let url = f.dequeue().unwrap();
        assert!(f.was_visited(&url));
        assert!(!f.enqueue(url));
        assert!(f.is_exhausted());
    }

    #[test]
    fn test_excluded_never_enqueued() {
        let mut excluded = HashSet::new();
        excluded.insert("https://example.test/private".to_string());
        let mut f = Frontier::new(excluded);
        assert!(!f.enqueue("https://example.test/private".into()));
        assert!(f.is_exhausted());
    }

    #[test]
    fn test_excluded_matches_any_spelling() {
        let mut excluded = HashSet::new();
        excluded.insert("https://Example.test/a page".to_string());
        excluded.insert("not a url".to_string());
        let mut f = Frontier::new(excluded);
        assert!(!f.enqueue("https://example.test/a%20page".into()));
        assert!(f.is_exhausted());
    }

    #[test]
    fn test_admit_links_filters_and_caps() {
        let page = Url::parse("https://example.test/start").unwrap();
        let scope = CrawlScope::from_seed(&page).unwrap();
        let mut f = frontier();

        let hrefs = [
            "/a",
            "https://other.test/elsewhere", // cross-origin
            "/doc.pdf",                     // non-content asset
            "http://",                      // placeholder
            "/b",
            "/c",
        ];
        let admitted = admit_links(hrefs, &page, &scope, &mut f, 2);

        assert_eq!(admitted, 2);
        assert_eq!(f.dequeue().as_deref(), Some("https://example.test/a"));
        assert_eq!(f.dequeue().as_deref(), Some("https://example.test/b"));
        assert!(f.is_exhausted());
    }

    #[test]
    fn test_admit_links_skips_already_seen() {
        let page = Url::parse("https://example.test/").unwrap();
        let scope = CrawlScope::from_seed(&page).unwrap();
        let mut f = frontier();
        f.enqueue("https://example.test/visited".into());
        f.dequeue(); // fetch attempt for /visited
        f.enqueue("https://example.test/queued".into());

        let admitted = admit_links(
            ["/visited", "/queued", "/fresh"],
            &page,
            &scope,
            &mut f,
            usize::MAX,
        );
        assert_eq!(admitted, 1);
    }

    #[test]
    fn test_admit_links_normalizes_spaces() {
        let page = Url::parse("https://example.test/").unwrap();
        let scope = CrawlScope::from_seed(&page).unwrap();
        let mut f = frontier();

        admit_links(["/a page"], &page, &scope, &mut f, usize::MAX);
        assert_eq!(f.dequeue().as_deref(), Some("https://example.test/a%20page"));
    }
}
