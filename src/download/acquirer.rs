use std::path::{Path, PathBuf};

use super::error::DownloadError;
use super::file::download_file;
use super::paths::filename_from_url;
use crate::http::HttpFetch;
use crate::state::{Ledger, StorageError};
use crate::types::AssetClass;

/// Result of one acquisition attempt.
#[derive(Debug)]
pub enum Outcome {
    /// Bytes were written and the URL recorded in the ledger.
    Downloaded { path: PathBuf, bytes: u64 },
    /// The ledger already lists the URL; nothing was fetched.
    AlreadyPresent,
    /// Fetch or write failed; the ledger is unchanged.
    Failed(DownloadError),
}

/// Downloads assets at most once per URL, using the ledger as the record of
/// what has been fetched.
///
/// The ledger check and the later record are not atomic with respect to
/// another process. Two simultaneous runs may both fetch a URL; the union
/// merge still leaves a single ledger entry.
pub struct AssetAcquirer<'a> {
    http: &'a dyn HttpFetch,
    ledger: &'a mut Ledger,
}

impl<'a> AssetAcquirer<'a> {
    pub fn new(http: &'a dyn HttpFetch, ledger: &'a mut Ledger) -> Self {
        Self { http, ledger }
    }

    /// Acquire `url` into `output_dir`.
    ///
    /// Per-asset failures come back as [`Outcome::Failed`]. Only a ledger
    /// write failure after a successful download is returned as `Err`, since
    /// continuing would re-download everything fetched from then on.
    pub async fn acquire(
        &mut self,
        url: &str,
        class: AssetClass,
        output_dir: &Path,
    ) -> Result<Outcome, StorageError> {
        if self.ledger.contains(class, url) {
            tracing::debug!(%url, %class, "Already downloaded, skipping");
            return Ok(Outcome::AlreadyPresent);
        }

        let filename = match filename_from_url(url) {
            Ok(name) => name,
            Err(e) => return Ok(Outcome::Failed(e)),
        };
        let path = output_dir.join(filename);

        tracing::debug!(%url, path = %path.display(), "downloading");
        let bytes = match download_file(self.http, url, &path).await {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Outcome::Failed(e)),
        };

        self.ledger.merge_and_persist(class, [url])?;
        Ok(Outcome::Downloaded { path, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::fake::FakeHttp;

    const URL: &str = "https://cdn.test/wall/a_2560x1440.png";

    fn fresh_ledger(dir: &Path) -> Ledger {
        let path = dir.join("download_history.json");
        Ledger::init(&path).unwrap();
        Ledger::open(&path).unwrap()
    }

    #[tokio::test]
    async fn test_acquire_downloads_and_records() {
        let state = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut ledger = fresh_ledger(state.path());
        let http = FakeHttp::default().with_bytes(URL, b"png");

        let outcome = AssetAcquirer::new(&http, &mut ledger)
            .acquire(URL, AssetClass::Image, out.path())
            .await
            .unwrap();

        match outcome {
            Outcome::Downloaded { path, bytes } => {
                assert_eq!(path, out.path().join("a_2560x1440.png"));
                assert_eq!(bytes, 3);
            }
            other => panic!("expected Downloaded, got {other:?}"),
        }
        assert!(ledger.contains(AssetClass::Image, URL));
        assert!(!ledger.contains(AssetClass::Video, URL));
    }

    #[tokio::test]
    async fn test_second_run_makes_no_request() {
        let state = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        {
            let mut ledger = fresh_ledger(state.path());
            let http = FakeHttp::default().with_bytes(URL, b"png");
            AssetAcquirer::new(&http, &mut ledger)
                .acquire(URL, AssetClass::Image, out.path())
                .await
                .unwrap();
        }

        // Fresh process: reload the ledger from disk.
        let mut ledger = Ledger::open(&state.path().join("download_history.json")).unwrap();
        let http = FakeHttp::default().with_bytes(URL, b"changed");
        let outcome = AssetAcquirer::new(&http, &mut ledger)
            .acquire(URL, AssetClass::Image, out.path())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::AlreadyPresent));
        assert!(http.requests().is_empty());
        assert_eq!(std::fs::read(out.path().join("a_2560x1440.png")).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_failure_leaves_ledger_unchanged() {
        let state = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut ledger = fresh_ledger(state.path());
        let http = FakeHttp::default();

        let outcome = AssetAcquirer::new(&http, &mut ledger)
            .acquire(URL, AssetClass::Image, out.path())
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Failed(DownloadError::Network(_))));
        let reloaded = Ledger::open(ledger.path()).unwrap();
        assert!(!reloaded.contains(AssetClass::Image, URL));
    }

    #[tokio::test]
    async fn test_classes_are_independent() {
        let state = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut ledger = fresh_ledger(state.path());
        ledger.merge_and_persist(AssetClass::Image, [URL]).unwrap();
        let http = FakeHttp::default().with_bytes(URL, b"video?");

        let outcome = AssetAcquirer::new(&http, &mut ledger)
            .acquire(URL, AssetClass::Video, out.path())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Downloaded { .. }));
    }

    #[tokio::test]
    async fn test_url_without_filename_fails() {
        let state = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let mut ledger = fresh_ledger(state.path());
        let http = FakeHttp::default();

        let outcome = AssetAcquirer::new(&http, &mut ledger)
            .acquire("https://cdn.test/", AssetClass::Image, out.path())
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Failed(DownloadError::InvalidUrl { .. })));
        assert!(http.requests().is_empty());
    }
}
