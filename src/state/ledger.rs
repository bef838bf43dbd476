//! Download ledger: the persisted set of asset URLs already acquired.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document::{create_document, read_document, write_document};
use super::error::StorageError;
use crate::types::AssetClass;

/// On-disk shape of `download_history.json`.
///
/// Both sets default to empty when absent. Keys this program does not know
/// about are carried through every rewrite untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(rename = "IMG_DOWNLOADS", default)]
    images: BTreeSet<String>,
    #[serde(rename = "VID_DOWNLOADS", default)]
    videos: BTreeSet<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl LedgerDocument {
    fn set_mut(&mut self, class: AssetClass) -> &mut BTreeSet<String> {
        match class {
            AssetClass::Image => &mut self.images,
            AssetClass::Video => &mut self.videos,
        }
    }
}

/// In-memory view of the ledger, loaded once per run.
#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    images: HashSet<String>,
    videos: HashSet<String>,
}

impl Ledger {
    /// Load the ledger document at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let doc: LedgerDocument = read_document(path)?;
        tracing::debug!(
            path = %path.display(),
            images = doc.images.len(),
            videos = doc.videos.len(),
            "Loaded download ledger"
        );
        Ok(Self {
            path: path.to_path_buf(),
            images: doc.images.into_iter().collect(),
            videos: doc.videos.into_iter().collect(),
        })
    }

    /// Create an empty ledger document if none exists. Returns whether a
    /// document was created.
    pub fn init(path: &Path) -> Result<bool, StorageError> {
        create_document(path, &LedgerDocument::default())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifiers recorded for `class` as of the last load or persist.
    pub fn load(&self, class: AssetClass) -> &HashSet<String> {
        match class {
            AssetClass::Image => &self.images,
            AssetClass::Video => &self.videos,
        }
    }

    pub fn contains(&self, class: AssetClass, id: &str) -> bool {
        self.load(class).contains(id)
    }

    /// Union `new_ids` into `class` and persist the whole document.
    ///
    /// The document is re-read before writing, so entries added on disk by
    /// another run since [`Ledger::open`] survive. Returns the number of
    /// identifiers that were new to this ledger instance.
    pub fn merge_and_persist<I, S>(&mut self, class: AssetClass, new_ids: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc: LedgerDocument = match read_document(&self.path) {
            Ok(doc) => doc,
            Err(StorageError::Missing { .. }) => LedgerDocument::default(),
            Err(e) => return Err(e),
        };

        let new_ids: Vec<String> = new_ids.into_iter().map(Into::into).collect();
        let memory = match class {
            AssetClass::Image => &mut self.images,
            AssetClass::Video => &mut self.videos,
        };
        let added = new_ids
            .iter()
            .filter(|id| !memory.contains(id.as_str()))
            .collect::<HashSet<_>>()
            .len();

        let on_disk = doc.set_mut(class);
        on_disk.extend(memory.iter().cloned());
        on_disk.extend(new_ids);

        // Memory only learns the new ids once they are on disk.
        write_document(&self.path, &doc)?;
        memory.extend(doc.set_mut(class).iter().cloned());
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_in(dir: &Path) -> Ledger {
        let path = dir.join("download_history.json");
        Ledger::init(&path).unwrap();
        Ledger::open(&path).unwrap()
    }

    #[test]
    fn test_open_missing_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Ledger::open(&dir.path().join("download_history.json")).unwrap_err();
        assert!(matches!(err, StorageError::Missing { .. }));
    }

    #[test]
    fn test_open_malformed_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(&path, r#"{"IMG_DOWNLOADS": "not a list"}"#).unwrap();
        let err = Ledger::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_reads_legacy_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(
            &path,
            r#"{"IMG_DOWNLOADS": ["https://x/a.png", "https://x/a.png"]}"#,
        )
        .unwrap();
        let ledger = Ledger::open(&path).unwrap();
        assert_eq!(ledger.load(AssetClass::Image).len(), 1);
        assert!(ledger.load(AssetClass::Video).is_empty());
        assert!(ledger.contains(AssetClass::Image, "https://x/a.png"));
        assert!(!ledger.contains(AssetClass::Video, "https://x/a.png"));
    }

    #[test]
    fn test_merge_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger_in(dir.path());
        assert_eq!(ledger.merge_and_persist(AssetClass::Image, ["u1"]).unwrap(), 1);

        let reopened = Ledger::open(ledger.path()).unwrap();
        assert!(reopened.contains(AssetClass::Image, "u1"));
        assert!(!reopened.contains(AssetClass::Video, "u1"));
    }

    #[test]
    fn test_merge_is_idempotent_and_order_independent() {
        let one = tempfile::tempdir().unwrap();
        let mut a = ledger_in(one.path());
        a.merge_and_persist(AssetClass::Image, ["a"]).unwrap();
        a.merge_and_persist(AssetClass::Image, ["b"]).unwrap();
        assert_eq!(a.merge_and_persist(AssetClass::Image, ["a", "b"]).unwrap(), 0);

        let two = tempfile::tempdir().unwrap();
        let mut b = ledger_in(two.path());
        b.merge_and_persist(AssetClass::Image, ["b", "a"]).unwrap();

        let left = Ledger::open(a.path()).unwrap();
        let right = Ledger::open(b.path()).unwrap();
        assert_eq!(left.load(AssetClass::Image), right.load(AssetClass::Image));
        assert_eq!(
            std::fs::read_to_string(a.path()).unwrap(),
            std::fs::read_to_string(b.path()).unwrap()
        );
    }

    #[test]
    fn test_merge_keeps_entries_written_by_another_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = ledger_in(dir.path());
        let mut second = Ledger::open(first.path()).unwrap();

        first.merge_and_persist(AssetClass::Image, ["from-first"]).unwrap();
        second.merge_and_persist(AssetClass::Image, ["from-second"]).unwrap();

        let merged = Ledger::open(first.path()).unwrap();
        assert!(merged.contains(AssetClass::Image, "from-first"));
        assert!(merged.contains(AssetClass::Image, "from-second"));
        assert!(second.contains(AssetClass::Image, "from-first"));
    }

    #[test]
    fn test_merge_preserves_other_set_and_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("download_history.json");
        std::fs::write(
            &path,
            r#"{"VID_DOWNLOADS": ["v1"], "NOTES": {"owner": "me"}}"#,
        )
        .unwrap();

        let mut ledger = Ledger::open(&path).unwrap();
        ledger.merge_and_persist(AssetClass::Image, ["i1"]).unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["VID_DOWNLOADS"], serde_json::json!(["v1"]));
        assert_eq!(raw["IMG_DOWNLOADS"], serde_json::json!(["i1"]));
        assert_eq!(raw["NOTES"]["owner"], "me");
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let root = tempfile::tempdir().unwrap();
        let state_dir = root.path().join("state");
        let mut ledger = ledger_in(&state_dir);
        // Without its directory the temp file cannot be created.
        std::fs::remove_dir_all(&state_dir).unwrap();

        let err = ledger
            .merge_and_persist(AssetClass::Image, ["lost"])
            .unwrap_err();

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!ledger.contains(AssetClass::Image, "lost"));
    }
}
