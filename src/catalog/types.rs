//! Typed records for the catalog and launcher JSON responses.
//!
//! Fields the pipeline cannot work without are required, so a response
//! missing them fails to decode instead of silently yielding nothing.

use serde::Deserialize;

use crate::types::Resolution;

/// Common envelope: `{retcode, message, data}`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub retcode: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub struct WallpaperPage {
    #[serde(default)]
    pub has_more: bool,
    pub wallpapers: Vec<Wallpaper>,
}

#[derive(Debug, Deserialize)]
pub struct Wallpaper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pic_list: Vec<PictureVariant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PictureVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// A resolution variant selected for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAsset {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Wallpaper {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("untitled")
    }

    /// Variants whose pixel size equals `resolution` exactly.
    pub fn candidates(&self, resolution: Resolution) -> impl Iterator<Item = CandidateAsset> + '_ {
        self.pic_list
            .iter()
            .filter(move |pic| resolution.matches(pic.width, pic.height))
            .map(|pic| CandidateAsset {
                url: pic.url.clone(),
                width: pic.width,
                height: pic.height,
                title: self.title().to_string(),
            })
    }
}

// ── Launcher endpoints ──

#[derive(Debug, Deserialize)]
pub struct GamesData {
    #[serde(default)]
    pub games: Vec<LauncherGame>,
}

#[derive(Debug, Deserialize)]
pub struct LauncherGame {
    pub display: GameDisplay,
}

#[derive(Debug, Deserialize)]
pub struct GameDisplay {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background: Option<MediaRef>,
}

/// `{url}` object; an empty string means "none".
#[derive(Debug, Default, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub url: String,
}

impl MediaRef {
    pub fn url(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}

#[derive(Debug, Deserialize)]
pub struct GameInfoData {
    #[serde(default)]
    pub game_info_list: Vec<GameInfo>,
}

#[derive(Debug, Deserialize)]
pub struct GameInfo {
    pub game: GameId,
    #[serde(default)]
    pub backgrounds: Vec<LauncherBackground>,
}

#[derive(Debug, Deserialize)]
pub struct GameId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct LauncherBackground {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub background: Option<MediaRef>,
    #[serde(default)]
    pub video: Option<MediaRef>,
}
