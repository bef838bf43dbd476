//! Launcher background endpoints (`getGames`, `getAllGameBasicInfo`).

use url::Url;

use super::types::{GameInfoData, GamesData};
use super::{decode_envelope, CatalogError};
use crate::http::HttpFetch;
use crate::types::AssetClass;

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub base_url: String,
    pub launcher_id: String,
    pub lang: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sg-hyp-api.hoyoverse.com/hyp/hyp-connect/api".to_string(),
            launcher_id: "VYTpXlbWo8".to_string(),
            lang: "en-us".to_string(),
        }
    }
}

/// One downloadable launcher asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherAsset {
    pub url: String,
    pub class: AssetClass,
    /// Where the asset came from, for log lines.
    pub origin: String,
}

pub struct LauncherClient<'a> {
    http: &'a dyn HttpFetch,
    config: &'a LauncherConfig,
}

impl<'a> LauncherClient<'a> {
    pub fn new(http: &'a dyn HttpFetch, config: &'a LauncherConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, name: &str) -> Result<Url, CatalogError> {
        let base = format!("{}/{}", self.config.base_url.trim_end_matches('/'), name);
        Url::parse_with_params(
            &base,
            &[
                ("launcher_id", self.config.launcher_id.as_str()),
                ("language", self.config.lang.as_str()),
            ],
        )
        .map_err(|e| CatalogError::Api {
            url: base.clone(),
            retcode: -1,
            message: format!("invalid launcher URL: {e}"),
        })
    }

    /// Current key art of every game on the launcher.
    pub async fn game_backgrounds(&self) -> Result<Vec<LauncherAsset>, CatalogError> {
        let url = self.endpoint("getGames")?;
        let response = self.http.get_json(url.as_str()).await?;
        let data: GamesData = decode_envelope(url.as_str(), response)?;

        Ok(data
            .games
            .iter()
            .filter_map(|game| {
                let url = game.display.background.as_ref()?.url()?;
                Some(LauncherAsset {
                    url: url.to_string(),
                    class: AssetClass::Image,
                    origin: game.display.name.clone(),
                })
            })
            .collect())
    }

    /// Every background (and its live-wallpaper video) per game.
    pub async fn all_backgrounds(&self) -> Result<Vec<LauncherAsset>, CatalogError> {
        let url = self.endpoint("getAllGameBasicInfo")?;
        let response = self.http.get_json(url.as_str()).await?;
        let data: GameInfoData = decode_envelope(url.as_str(), response)?;

        let mut assets = Vec::new();
        for info in &data.game_info_list {
            for bg in &info.backgrounds {
                let origin = format!("game {} background {}", info.game.id, bg.id);
                if let Some(url) = bg.background.as_ref().and_then(|m| m.url()) {
                    assets.push(LauncherAsset {
                        url: url.to_string(),
                        class: AssetClass::Image,
                        origin: origin.clone(),
                    });
                }
                if let Some(url) = bg.video.as_ref().and_then(|m| m.url()) {
                    assets.push(LauncherAsset {
                        url: url.to_string(),
                        class: AssetClass::Video,
                        origin,
                    });
                }
            }
        }
        Ok(assets)
    }
}
