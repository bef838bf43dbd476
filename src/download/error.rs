use thiserror::Error;

use crate::http::NetworkError;

/// Why a single asset could not be acquired. None of these touch the ledger,
/// so the asset is tried again on the next run.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid asset URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Disk error writing {path}: {source}")]
    Disk {
        path: String,
        source: std::io::Error,
    },
}
