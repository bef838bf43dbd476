//! Daily-post history: downloaded image URLs already featured once.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{create_document, read_document, write_document};
use super::error::StorageError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(rename = "IMAGE_URLS", default)]
    posted: BTreeSet<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug)]
pub struct PostHistory {
    path: PathBuf,
    posted: BTreeSet<String>,
}

impl PostHistory {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let doc: HistoryDocument = read_document(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            posted: doc.posted,
        })
    }

    pub fn init(path: &Path) -> Result<bool, StorageError> {
        create_document(path, &HistoryDocument::default())
    }

    pub fn len(&self) -> usize {
        self.posted.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.posted.contains(url)
    }

    /// Pick a random candidate that has not been posted yet, or `None` when
    /// every candidate already appears in the history.
    pub fn pick_unposted<'a, I, R>(&self, candidates: I, rng: &mut R) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
        R: rand::Rng + ?Sized,
    {
        let mut fresh: Vec<&str> = candidates
            .into_iter()
            .map(String::as_str)
            .filter(|url| !self.contains(url))
            .collect();
        // HashSet iteration order is random; sort so a seeded rng is reproducible.
        fresh.sort_unstable();
        fresh.choose(rng).copied()
    }

    /// Add `url` to the history, merging with whatever is on disk.
    pub fn record(&mut self, url: &str) -> Result<(), StorageError> {
        let mut doc: HistoryDocument = match read_document(&self.path) {
            Ok(doc) => doc,
            Err(StorageError::Missing { .. }) => HistoryDocument::default(),
            Err(e) => return Err(e),
        };
        self.posted.insert(url.to_string());
        doc.posted.extend(self.posted.iter().cloned());
        self.posted.clone_from(&doc.posted);
        write_document(&self.path, &doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn history_in(dir: &Path) -> PostHistory {
        let path = dir.join("daily_post_history.json");
        PostHistory::init(&path).unwrap();
        PostHistory::open(&path).unwrap()
    }

    #[test]
    fn test_pick_skips_posted() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history_in(dir.path());
        history.record("a").unwrap();

        let candidates = vec!["a".to_string(), "b".to_string()];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(history.pick_unposted(&candidates, &mut rng), Some("b"));
        }
    }

    #[test]
    fn test_pick_none_when_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history_in(dir.path());
        history.record("a").unwrap();
        let candidates = vec!["a".to_string()];
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(history.pick_unposted(&candidates, &mut rng), None);
    }

    #[test]
    fn test_record_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history_in(dir.path());
        history.record("https://x/a.png").unwrap();
        let reopened = PostHistory::open(&dir.path().join("daily_post_history.json")).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.contains("https://x/a.png"));
    }
}
