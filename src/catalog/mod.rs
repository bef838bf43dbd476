//! Catalog client: reads the paginated wallpaper catalog and the launcher
//! background endpoints, decoding them into typed records.

pub mod error;
pub mod launcher;
pub mod types;

pub use error::CatalogError;
pub use launcher::LauncherClient;
pub use types::WallpaperPage;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::http::HttpFetch;
use crate::types::WallpaperKind;
use types::Envelope;

/// Where and how to query the wallpaper catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub page_size: u32,
    pub lang: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hk4e-api.mihoyo.com/event/contenthub/v1/wall_papers".to_string(),
            page_size: 100,
            lang: "en-us".to_string(),
        }
    }
}

/// Paginated reader over the wallpaper catalog. Pages are numbered from 1.
pub struct CatalogClient<'a> {
    http: &'a dyn HttpFetch,
    config: &'a CatalogConfig,
}

impl<'a> CatalogClient<'a> {
    pub fn new(http: &'a dyn HttpFetch, config: &'a CatalogConfig) -> Self {
        Self { http, config }
    }

    /// URL for one page of `kind` wallpapers.
    pub fn page_url(&self, page_number: u32, kind: WallpaperKind) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.config.base_url,
            &[
                ("page", page_number.to_string()),
                ("size", self.config.page_size.to_string()),
                ("type", kind.code().to_string()),
                ("lang", self.config.lang.clone()),
            ],
        )
    }

    /// Fetch and decode a single page.
    pub async fn fetch_page(
        &self,
        page_number: u32,
        kind: WallpaperKind,
    ) -> Result<WallpaperPage, CatalogError> {
        let url = self
            .page_url(page_number, kind)
            .map_err(|e| CatalogError::Api {
                url: self.config.base_url.clone(),
                retcode: -1,
                message: format!("invalid catalog URL: {e}"),
            })?;
        debug!(page = page_number, %url, "Fetching catalog page");
        let response = self.http.get_json(url.as_str()).await?;
        let page: WallpaperPage = decode_envelope(url.as_str(), response)?;
        debug!(
            page = page_number,
            wallpapers = page.wallpapers.len(),
            has_more = page.has_more,
            "Catalog page decoded"
        );
        Ok(page)
    }
}

/// Unwrap `{retcode, message, data}`, turning a non-zero code or a missing
/// `data` into [`CatalogError::Api`].
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    url: &str,
    response: Value,
) -> Result<T, CatalogError> {
    let envelope: Envelope<T> =
        serde_json::from_value(response).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })?;
    if envelope.retcode != 0 {
        return Err(CatalogError::Api {
            url: url.to_string(),
            retcode: envelope.retcode,
            message: envelope.message,
        });
    }
    envelope.data.ok_or_else(|| CatalogError::Api {
        url: url.to_string(),
        retcode: envelope.retcode,
        message: "response carried no data".to_string(),
    })
}
