use std::sync::Arc;

use arachne_core::error::CrawlError;
use arachne_core::traits::Cleaner;
use htmd::HtmlToMarkdown;

/// HTML-to-text cleaner using htmd.
///
/// Produces the plain text stored in the corpus: chrome elements that
/// carry navigation rather than content (script, style, nav, ...) are
/// stripped so downstream consumers see page prose, not boilerplate.
pub struct HtmlTextCleaner {
    converter: Arc<HtmlToMarkdown>,
}

impl Clone for HtmlTextCleaner {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
        }
    }
}

impl HtmlTextCleaner {
    pub fn new() -> Self {
        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec![
                "script", "style", "nav", "footer", "header", "aside", "noscript", "iframe", "svg",
                "form",
            ])
            .build();

        Self {
            converter: Arc::new(converter),
        }
    }
}

impl Default for HtmlTextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner for HtmlTextCleaner {
    fn clean(&self, html: &str) -> Result<String, CrawlError> {
        let text = self
            .converter
            .convert(html)
            .map_err(|e| CrawlError::Clean(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_page_prose() {
        let cleaner = HtmlTextCleaner::new();
        let html = "<h1>Welcome</h1><p>Course catalogue for 2026.</p>";
        let text = cleaner.clean(html).unwrap();
        assert!(text.contains("Welcome"));
        assert!(text.contains("Course catalogue"));
    }

    #[test]
    fn test_strips_non_content_elements() {
        let cleaner = HtmlTextCleaner::new();
        let html = "<p>Content</p><script>alert('x')</script><nav>Home | About</nav>";
        let text = cleaner.clean(html).unwrap();
        assert!(text.contains("Content"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("Home | About"));
    }

    #[test]
    fn test_output_is_trimmed() {
        let cleaner = HtmlTextCleaner::new();
        let text = cleaner.clean("<div>\n\n<p>hello</p>\n\n</div>").unwrap();
        assert_eq!(text, "hello");
    }
}
