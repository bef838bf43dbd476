//! HTTP transport used by the catalog crawler and the asset acquirer.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

const DEFAULT_USER_AGENT: &str = concat!("hoyowall-rs/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },
}

/// Minimal GET-only transport.
///
/// Implemented for [`reqwest::Client`]; tests substitute an in-memory fake so
/// the engine runs without network access.
#[async_trait::async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value, NetworkError>;

    /// GET `url` and return the raw body.
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

#[async_trait::async_trait]
impl HttpFetch for Client {
    async fn get_json(&self, url: &str) -> Result<Value, NetworkError> {
        let response = send(self, url).await?;
        response.json().await.map_err(|source| NetworkError::Body {
            url: url.to_string(),
            source,
        })
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        let response = send(self, url).await?;
        let body = response.bytes().await.map_err(|source| NetworkError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(body.to_vec())
    }
}

async fn send(client: &Client, url: &str) -> Result<reqwest::Response, NetworkError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| NetworkError::Request {
            url: url.to_string(),
            source,
        })?;
    if !response.status().is_success() {
        return Err(NetworkError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }
    Ok(response)
}

/// Build the shared client. The timeout applies to each whole request.
pub fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    let client = Client::builder()
        .default_headers(default_headers)
        .timeout(timeout)
        .build()?;
    Ok(client)
}
