//! Download engine: walks the catalog page by page and hands every
//! resolution-matched candidate to the [`AssetAcquirer`], one at a time.

pub mod acquirer;
pub mod error;
pub mod file;
pub mod paths;

pub use acquirer::{AssetAcquirer, Outcome};

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::launcher::{LauncherAsset, LauncherConfig};
use crate::catalog::{CatalogClient, CatalogConfig, CatalogError, LauncherClient};
use crate::http::HttpFetch;
use crate::state::{Ledger, StorageError};
use crate::types::{AssetClass, Resolution, WallpaperKind};

/// Subset of application config consumed by the catalog crawl.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub output_dir: PathBuf,
    pub kind: WallpaperKind,
    pub resolution: Resolution,
    /// Stop once this many assets have been newly downloaded.
    pub target_count: usize,
    pub no_progress_bar: bool,
}

/// Why the crawl stopped.
#[derive(Debug)]
pub enum CrawlStop {
    /// The catalog reported no further pages.
    Exhausted,
    /// `target_count` new downloads were reached.
    TargetReached,
    /// A page could not be fetched or decoded; later pages were not tried.
    Failed { page: u32, error: CatalogError },
}

/// Per-outcome counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AcquireTally {
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl AcquireTally {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Downloaded { .. } => self.downloaded += 1,
            Outcome::AlreadyPresent => self.already_present += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.already_present + self.failed
    }
}

#[derive(Debug)]
pub struct CrawlReport {
    pub pages_fetched: u32,
    pub candidates: usize,
    pub tally: AcquireTally,
    pub stop: CrawlStop,
}

impl CrawlReport {
    /// True when the crawl ended on a page failure rather than running out of
    /// pages or reaching its target.
    pub fn stopped_early(&self) -> bool {
        matches!(self.stop, CrawlStop::Failed { .. })
    }
}

/// Create a progress bar with a consistent template.
///
/// Returns `ProgressBar::hidden()` when the user passed `--no-progress-bar` or
/// stdout is not a TTY.
fn create_progress_bar(no_progress_bar: bool, total: u64) -> ProgressBar {
    if no_progress_bar || !std::io::stdout().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total);
    match ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("=> ")),
        Err(e) => tracing::debug!("Invalid progress template: {}", e),
    }
    pb
}

/// Crawl the wallpaper catalog from page 1, downloading exact-resolution
/// variants until the catalog runs out, `target_count` new downloads are
/// reached, or a page fails.
///
/// A failed page ends the crawl without trying later pages; the report's
/// [`CrawlStop::Failed`] tells that apart from exhaustion. Only a ledger
/// write failure is returned as `Err`.
pub async fn crawl_catalog(
    http: &dyn HttpFetch,
    catalog: &CatalogConfig,
    ledger: &mut Ledger,
    config: &CrawlConfig,
) -> Result<CrawlReport, StorageError> {
    let started = Instant::now();
    let client = CatalogClient::new(http, catalog);
    let mut acquirer = AssetAcquirer::new(http, ledger);
    let pb = create_progress_bar(config.no_progress_bar, config.target_count as u64);

    let mut tally = AcquireTally::default();
    let mut candidates = 0usize;
    let mut pages_fetched = 0u32;
    let mut page_number = 1u32;

    let stop = 'pages: loop {
        if tally.downloaded >= config.target_count {
            break CrawlStop::TargetReached;
        }

        let page = match client.fetch_page(page_number, config.kind).await {
            Ok(page) => page,
            Err(error) => {
                pb.suspend(|| {
                    tracing::error!(page = page_number, "Catalog page failed, stopping crawl: {}", error)
                });
                break CrawlStop::Failed {
                    page: page_number,
                    error,
                };
            }
        };
        pages_fetched += 1;

        for wallpaper in &page.wallpapers {
            pb.set_message(wallpaper.title().to_string());
            for candidate in wallpaper.candidates(config.resolution) {
                candidates += 1;
                let outcome = acquirer
                    .acquire(&candidate.url, AssetClass::Image, &config.output_dir)
                    .await?;
                match &outcome {
                    Outcome::Downloaded { path, bytes } => {
                        pb.suspend(|| {
                            tracing::info!(
                                "Downloaded {} {}x{} ({}, {} bytes)",
                                candidate.title,
                                candidate.width,
                                candidate.height,
                                path.display(),
                                bytes
                            )
                        });
                        pb.inc(1);
                    }
                    Outcome::AlreadyPresent => {}
                    Outcome::Failed(e) => {
                        pb.suspend(|| tracing::error!("Download failed: {}: {}", candidate.url, e));
                    }
                }
                tally.record(&outcome);
                if tally.downloaded >= config.target_count {
                    break 'pages CrawlStop::TargetReached;
                }
            }
        }

        if !page.has_more {
            break CrawlStop::Exhausted;
        }
        page_number += 1;
    };

    pb.finish_and_clear();

    let report = CrawlReport {
        pages_fetched,
        candidates,
        tally,
        stop,
    };
    log_crawl_summary(&report, started.elapsed());
    Ok(report)
}

fn log_crawl_summary(report: &CrawlReport, elapsed: Duration) {
    tracing::info!("── Summary ──");
    tracing::info!(
        "  {} candidates handled: {} downloaded, {} already present, {} failed",
        report.tally.total(),
        report.tally.downloaded,
        report.tally.already_present,
        report.tally.failed
    );
    tracing::info!(
        "  {} pages, {} matching candidates",
        report.pages_fetched,
        report.candidates
    );
    match &report.stop {
        CrawlStop::Exhausted => tracing::info!("  catalog exhausted"),
        CrawlStop::TargetReached => tracing::info!("  target count reached"),
        CrawlStop::Failed { page, error } => {
            tracing::warn!("  stopped early at page {}: {}", page, error)
        }
    }
    tracing::info!("  elapsed: {}", format_duration(elapsed));
}

/// Output directories for launcher assets, per class.
#[derive(Debug, Clone)]
pub struct LauncherTargets {
    pub image_dir: PathBuf,
    pub video_dir: PathBuf,
}

impl LauncherTargets {
    fn dir_for(&self, class: AssetClass) -> &PathBuf {
        match class {
            AssetClass::Image => &self.image_dir,
            AssetClass::Video => &self.video_dir,
        }
    }
}

#[derive(Debug, Default)]
pub struct LauncherReport {
    pub images: AcquireTally,
    pub videos: AcquireTally,
    /// Endpoints that could not be read.
    pub endpoint_failures: usize,
}

/// Acquire every launcher background image and live-wallpaper video.
///
/// The two launcher endpoints are independent: if one fails the other is
/// still processed.
pub async fn download_launcher_backgrounds(
    http: &dyn HttpFetch,
    launcher: &LauncherConfig,
    ledger: &mut Ledger,
    targets: &LauncherTargets,
) -> Result<LauncherReport, StorageError> {
    let client = LauncherClient::new(http, launcher);
    let mut acquirer = AssetAcquirer::new(http, ledger);
    let mut report = LauncherReport::default();

    let listings = [
        ("getGames", client.game_backgrounds().await),
        ("getAllGameBasicInfo", client.all_backgrounds().await),
    ];

    for (endpoint, listing) in listings {
        let assets: Vec<LauncherAsset> = match listing {
            Ok(assets) => assets,
            Err(e) => {
                tracing::error!(endpoint, "Launcher listing failed: {}", e);
                report.endpoint_failures += 1;
                continue;
            }
        };
        for asset in assets {
            let outcome = acquirer
                .acquire(&asset.url, asset.class, targets.dir_for(asset.class))
                .await?;
            match &outcome {
                Outcome::Downloaded { path, .. } => {
                    tracing::info!("Downloaded {} from {} ({})", asset.class, asset.origin, path.display())
                }
                Outcome::AlreadyPresent => {}
                Outcome::Failed(e) => tracing::error!("Download failed: {}: {}", asset.url, e),
            }
            match asset.class {
                AssetClass::Image => report.images.record(&outcome),
                AssetClass::Video => report.videos.record(&outcome),
            }
        }
    }

    tracing::info!("── Summary ──");
    tracing::info!(
        "  images: {} downloaded, {} already present, {} failed",
        report.images.downloaded,
        report.images.already_present,
        report.images.failed
    );
    tracing::info!(
        "  videos: {} downloaded, {} already present, {} failed",
        report.videos.downloaded,
        report.videos.already_present,
        report.videos.failed
    );
    Ok(report)
}

fn format_duration(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {:02}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}
