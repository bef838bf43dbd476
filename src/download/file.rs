use std::path::Path;

use tokio::fs;

use super::error::DownloadError;
use super::paths::part_path;
use crate::http::HttpFetch;

/// Fetch `url` and store its body at `download_path`.
///
/// The body goes to a `.part` sibling first and is renamed into place once
/// fully written, so an interrupted run never leaves a truncated file under
/// the final name. An existing file at `download_path` is replaced.
pub async fn download_file(
    http: &dyn HttpFetch,
    url: &str,
    download_path: &Path,
) -> Result<u64, DownloadError> {
    let bytes = http.get_bytes(url).await?;

    let disk_err = |source: std::io::Error| DownloadError::Disk {
        path: download_path.display().to_string(),
        source,
    };

    let part = part_path(download_path);
    if let Err(e) = fs::write(&part, &bytes).await {
        let _ = fs::remove_file(&part).await;
        return Err(disk_err(e));
    }
    fs::rename(&part, download_path).await.map_err(disk_err)?;

    Ok(bytes.len() as u64)
}
