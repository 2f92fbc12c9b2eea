use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CrawlError;

/// Separator written after each entry in the flattened text rendering.
const TEXT_SEPARATOR: &str =
    "================================================================================";

/// The crawl's durable output: a URL → extracted-text mapping.
///
/// Entries keep their insertion order (fetch completion order). Recording
/// the same URL twice overwrites the text in place, last write wins; the
/// visited-set discipline upstream means that should not happen, but it is
/// tolerated here rather than turned into an error.
#[derive(Debug, Default)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
    index: HashMap<String, usize>,
}

/// One (URL, extracted text) pair.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub url: String,
    pub text: String,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store one entry, overwriting any previous text for the same URL.
    pub fn record(&mut self, url: String, text: String) {
        match self.index.get(&url) {
            Some(&pos) => self.entries[pos].text = text,
            None => {
                self.index.insert(url.clone(), self.entries.len());
                self.entries.push(CorpusEntry { url, text });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.index
            .get(url)
            .map(|&pos| self.entries[pos].text.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CorpusEntry> {
        self.entries.iter()
    }

    /// Corpus URLs in insertion order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.url.as_str())
    }

    /// The corpus as a JSON object, keys in insertion order.
    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            map.insert(entry.url.clone(), Value::String(entry.text.clone()));
        }
        Value::Object(map)
    }

    /// Write the corpus as indented JSON (`{url: text, ...}`) to `path`.
    ///
    /// Atomic: the JSON is written to a sibling temp file first and renamed
    /// into place, so the destination is either fully written or untouched.
    pub fn write_json(&self, path: &Path) -> Result<(), CrawlError> {
        let json = serde_json::to_string_pretty(&self.to_json())?;
        write_atomic(path, &json)
    }

    /// Write the flattened plain-text rendering to `path`.
    ///
    /// Each entry, in insertion order, becomes
    /// `Content:\n<text>\n` followed by an 80-character `=` line.
    pub fn write_text(&self, path: &Path) -> Result<(), CrawlError> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str("Content:\n");
            out.push_str(&entry.text);
            out.push('\n');
            out.push_str(TEXT_SEPARATOR);
            out.push('\n');
        }
        write_atomic(path, &out)
    }
}

/// Write-to-temp-then-rename so readers never observe a half-written file.
fn write_atomic(path: &Path, contents: &str) -> Result<(), CrawlError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }
    let file_name = path
        .file_name()
        .ok_or_else(|| CrawlError::Storage(format!("not a file path: {}", path.display())))?;
    let mut tmp = path.to_path_buf();
    tmp.set_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.record("https://example.test/".into(), "home page".into());
        corpus.record("https://example.test/a".into(), "page a".into());
        corpus
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let corpus = sample();
        let urls: Vec<_> = corpus.urls().collect();
        assert_eq!(urls, ["https://example.test/", "https://example.test/a"]);
    }

    #[test]
    fn test_record_overwrites_last_write_wins() {
        let mut corpus = sample();
        corpus.record("https://example.test/".into(), "updated".into());
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("https://example.test/"), Some("updated"));
        // Overwriting keeps the original position.
        assert_eq!(corpus.urls().next(), Some("https://example.test/"));
    }

    #[test]
    fn test_json_round_trip() {
        let corpus = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        corpus.write_json(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let read_back: HashMap<String, String> = serde_json::from_str(&raw).unwrap();

        let expected: HashMap<String, String> = corpus
            .iter()
            .map(|e| (e.url.clone(), e.text.clone()))
            .collect();
        assert_eq!(read_back, expected);
    }

    #[test]
    fn test_text_rendering_format() {
        let corpus = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        corpus.write_text(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let separator = "=".repeat(80);
        assert_eq!(
            raw,
            format!("Content:\nhome page\n{separator}\nContent:\npage a\n{separator}\n")
        );
    }

    #[test]
    fn test_flush_unwritable_destination_is_storage_error() {
        let corpus = sample();
        let err = corpus.write_json(Path::new("/")).unwrap_err();
        assert!(matches!(err, CrawlError::Storage(_)));
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let corpus = sample();
        let dir = tempfile::tempdir().unwrap();
        corpus.write_json(&dir.path().join("output.json")).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
