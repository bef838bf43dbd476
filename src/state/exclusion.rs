//! Curated list of image basenames that must never be classified.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::document::{create_document, read_document};
use super::error::StorageError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ExclusionDocument {
    #[serde(rename = "EXCLUDED_IMGS")]
    excluded: Vec<String>,
}

/// Set of file stems (no extension) to skip. Owned by whoever curates
/// `image_exclusion.json`; this program only reads it.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    stems: HashSet<String>,
}

impl ExclusionSet {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let doc: ExclusionDocument = read_document(path)?;
        Ok(doc.excluded.into_iter().collect())
    }

    /// Create an empty exclusion document if none exists.
    pub fn init(path: &Path) -> Result<bool, StorageError> {
        create_document(path, &ExclusionDocument::default())
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.stems.contains(stem)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// File names (`<stem><ext>`) for every entry, one per extension.
    pub fn file_names(&self, extensions: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = self
            .stems
            .iter()
            .flat_map(|stem| extensions.iter().map(move |ext| format!("{stem}{ext}")))
            .collect();
        names.sort();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            stems: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reads_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_exclusion.json");
        std::fs::write(&path, r#"{"EXCLUDED_IMGS": ["ugly", "dup"]}"#).unwrap();

        let set = ExclusionSet::open(&path).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("ugly"));
        assert!(!set.contains("ugly.jpg"));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_exclusion.json");
        std::fs::write(&path, r#"{"EXCLUDED": []}"#).unwrap();
        assert!(matches!(
            ExclusionSet::open(&path).unwrap_err(),
            StorageError::Malformed { .. }
        ));
    }

    #[test]
    fn test_init_then_open_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image_exclusion.json");
        assert!(ExclusionSet::init(&path).unwrap());
        assert!(ExclusionSet::open(&path).unwrap().is_empty());
    }

    #[test]
    fn test_file_names_expand_per_extension() {
        let set: ExclusionSet = ["a"].into_iter().collect();
        assert_eq!(set.file_names(&[".jpg", ".jpeg"]), vec!["a.jpeg", "a.jpg"]);
    }
}
