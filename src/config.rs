use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::launcher::LauncherConfig;
use crate::catalog::CatalogConfig;
use crate::cli::{Cli, DownloadArgs, LauncherArgs};
use crate::download::{CrawlConfig, LauncherTargets};

pub const LEDGER_FILE: &str = "download_history.json";
pub const EXCLUSION_FILE: &str = "image_exclusion.json";
pub const HISTORY_FILE: &str = "daily_post_history.json";

/// Application configuration shared by every subcommand.
///
/// All state document paths derive from `base_dir`; nothing else in the
/// program decides where state lives.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub ledger_path: PathBuf,
    pub exclusion_path: PathBuf,
    pub history_path: PathBuf,
    pub timeout: Duration,
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self::with_base_dir(expand_tilde(&cli.base_dir), Duration::from_secs(cli.timeout_secs))
    }

    fn with_base_dir(base_dir: PathBuf, timeout: Duration) -> Self {
        Self {
            ledger_path: base_dir.join(LEDGER_FILE),
            exclusion_path: base_dir.join(EXCLUSION_FILE),
            history_path: base_dir.join(HISTORY_FILE),
            base_dir,
            timeout,
        }
    }

    pub fn catalog(&self, args: &DownloadArgs) -> CatalogConfig {
        let defaults = CatalogConfig::default();
        CatalogConfig {
            base_url: args.catalog_url.clone().unwrap_or(defaults.base_url),
            page_size: args.page_size,
            lang: args.lang.clone(),
        }
    }

    pub fn crawl(&self, args: &DownloadArgs) -> CrawlConfig {
        CrawlConfig {
            output_dir: expand_tilde(&args.output),
            kind: args.kind,
            resolution: args.resolution,
            target_count: args.count,
            no_progress_bar: args.no_progress_bar,
        }
    }

    pub fn launcher(&self, args: &LauncherArgs) -> LauncherConfig {
        let defaults = LauncherConfig::default();
        LauncherConfig {
            base_url: args.launcher_url.clone().unwrap_or(defaults.base_url),
            launcher_id: args.launcher_id.clone().unwrap_or(defaults.launcher_id),
            lang: args.lang.clone(),
        }
    }

    pub fn launcher_targets(&self, args: &LauncherArgs) -> LauncherTargets {
        LauncherTargets {
            image_dir: expand_tilde(&args.output),
            video_dir: expand_tilde(&args.video_output),
        }
    }
}
