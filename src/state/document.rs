//! Whole-document JSON persistence shared by the state files.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::StorageError;

/// Read and decode a JSON document. A missing file is reported as
/// [`StorageError::Missing`] so callers can tell it apart from corruption.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StorageError::Missing {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&contents).map_err(|source| StorageError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with the pretty-printed JSON of `value`.
///
/// The document is written to a temporary file in the same directory and
/// renamed over the target, so a crash leaves either the old or the new
/// document on disk, never a truncated one.
pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = parent_dir(path);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    serde_json::to_writer_pretty(&mut tmp, value).map_err(|e| write_err(e.into()))?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!(path = %path.display(), "Persisted state document");
    Ok(())
}

/// Write `value` only if nothing exists at `path` yet. Returns whether a new
/// document was created.
pub(crate) fn create_document<T: Serialize>(path: &Path, value: &T) -> Result<bool, StorageError> {
    if path.exists() {
        return Ok(false);
    }
    let dir = parent_dir(path);
    std::fs::create_dir_all(&dir).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_document(path, value)?;
    Ok(true)
}

/// `Path::parent` yields `""` for bare file names; treat that as the
/// current directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_read_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document::<BTreeMap<String, Vec<String>>>(&dir.path().join("nope.json"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Missing { .. }));
    }

    #[test]
    fn test_read_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_document::<BTreeMap<String, Vec<String>>>(&path).unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_write_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{\"old\": true}").unwrap();

        let mut value = BTreeMap::new();
        value.insert("new".to_string(), vec!["a".to_string()]);
        write_document(&path, &value).unwrap();

        let back: BTreeMap<String, Vec<String>> = read_document(&path).unwrap();
        assert_eq!(back, value);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temporary file must be renamed away");
    }

    #[test]
    fn test_create_document_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let first: BTreeMap<String, u32> = [("x".to_string(), 1)].into();
        let second: BTreeMap<String, u32> = [("x".to_string(), 2)].into();

        assert!(create_document(&path, &first).unwrap());
        assert!(!create_document(&path, &second).unwrap());

        let back: BTreeMap<String, u32> = read_document(&path).unwrap();
        assert_eq!(back, first);
    }
}
