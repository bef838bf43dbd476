use std::path::{Path, PathBuf};

use url::Url;

use super::error::DownloadError;

/// Local file name for an asset URL: its final path segment, with characters
/// that are invalid on common filesystems removed.
///
/// Two different URLs ending in the same segment map to the same file; the
/// later download replaces the earlier one.
pub fn filename_from_url(url: &str) -> Result<String, DownloadError> {
    let parsed = Url::parse(url).map_err(|e| DownloadError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let name = clean_filename(segment);
    if name.is_empty() || name == "." || name == ".." {
        return Err(DownloadError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no file name".to_string(),
        });
    }
    Ok(name)
}

/// Clean a filename by removing characters that are invalid on common
/// filesystems: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`.
pub fn clean_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Sibling path used while a download is in flight.
pub fn part_path(download_path: &Path) -> PathBuf {
    let mut name = download_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    download_path.with_file_name(name)
}
