use arachne_core::traits::LinkExtractor;
use scraper::{Html, Selector};

/// Link extractor backed by the `scraper` crate.
///
/// Yields the raw `href` attribute of every `<a href>` element in DOM
/// order. No resolution or filtering happens here; admission into the
/// frontier is the core crate's job.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScraperLinkExtractor;

impl ScraperLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for ScraperLinkExtractor {
    fn extract_hrefs(&self, html: &str) -> Vec<String> {
        let selector = match Selector::parse("a[href]") {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };
        let document = Html::parse_document(html);
        document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hrefs_in_dom_order() {
        let html = r#"<html><body>
            <a href="/first">one</a>
            <p><a href="https://example.test/second">two</a></p>
            <a href="../third">three</a>
        </body></html>"#;
        let hrefs = ScraperLinkExtractor::new().extract_hrefs(html);
        assert_eq!(hrefs, ["/first", "https://example.test/second", "../third"]);
    }

    #[test]
    fn test_anchors_without_href_skipped() {
        let html = r#"<a name="top">anchor</a><a href="/real">link</a>"#;
        let hrefs = ScraperLinkExtractor::new().extract_hrefs(html);
        assert_eq!(hrefs, ["/real"]);
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<div><a href="/a">unclosed<a href="/b">"#;
        let hrefs = ScraperLinkExtractor::new().extract_hrefs(html);
        assert_eq!(hrefs, ["/a", "/b"]);
    }

    #[test]
    fn test_placeholder_hrefs_pass_through() {
        // Filtering placeholders is admission's job, not extraction's.
        let html = r#"<a href="http://">dead</a>"#;
        let hrefs = ScraperLinkExtractor::new().extract_hrefs(html);
        assert_eq!(hrefs, ["http://"]);
    }
}
