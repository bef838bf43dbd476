use std::path::PathBuf;

use thiserror::Error;

/// Why a single file could not be classified, converted or copied. These are
/// absorbed into summary counters by the directory passes.
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Image codec error on {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No encoder for extension {extension:?}")]
    UnsupportedFormat { extension: String },

    #[error("{path} has unusable dimensions {width}x{height}")]
    InvalidDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl ImagingError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
