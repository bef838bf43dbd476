//! Error types for the persisted state documents.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting a state document.
///
/// Any of these is fatal for the current run: the ledger and the exclusion
/// list are the only guard against duplicate downloads and unwanted copies.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The document does not exist yet.
    #[error("State document not found at {path} (run `hoyowall-rs init` first)")]
    Missing { path: PathBuf },

    /// The document exists but could not be read.
    #[error("Failed to read state document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid JSON or lacks a required field.
    #[error("Malformed state document {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Writing or replacing the document failed.
    #[error("Failed to write state document {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
