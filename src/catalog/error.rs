use thiserror::Error;

use crate::http::NetworkError;

/// Failure to obtain or understand one catalog page.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Unexpected response shape from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("Catalog API error {retcode} from {url}: {message}")]
    Api {
        url: String,
        retcode: i64,
        message: String,
    },
}
