use std::collections::HashMap;
use std::path::PathBuf;

/// Poster URL -> cached file, for the posters this session knows about.
///
/// An entry is `None` only while its download is in flight. A failed
/// download leaves no entry behind, so the next listing that shows the
/// poster asks for it again.
#[derive(Debug, Default)]
pub struct PosterIndex {
    entries: HashMap<String, Option<PathBuf>>,
}

impl PosterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as downloading. Returns false if it is already cached or
    /// on its way, in which case no new download should start.
    pub fn begin(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), None);
        true
    }

    /// Record the outcome of a download started with [`begin`](Self::begin)
    pub fn finish(&mut self, url: String, path: Option<PathBuf>) {
        match path {
            Some(path) => {
                self.entries.insert(url, Some(path));
            }
            None => {
                self.entries.remove(&url);
            }
        }
    }

    /// Cached file for `url`, if the download has completed
    pub fn get(&self, url: &str) -> Option<&PathBuf> {
        self.entries.get(url).and_then(Option::as_ref)
    }
}
