//! hoyowall-rs: downloads HoYoverse wallpapers and launcher backgrounds,
//! then sorts, converts and prunes a local wallpaper library.
//!
//! Every download is recorded in a JSON ledger next to the other state
//! documents, so re-running any command never fetches the same asset twice.

#![warn(clippy::all)]

mod catalog;
mod cli;
mod config;
mod download;
mod http;
mod imaging;
mod state;
mod types;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Command;
use config::{expand_tilde, Config};
use imaging::normalize_ext;
use state::{ExclusionSet, Ledger, PostHistory, StorageError};
use types::AssetClass;

async fn run_init(config: &Config) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.base_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.base_dir.display()))?;

    let created = [
        (config.ledger_path.as_path(), Ledger::init(&config.ledger_path)?),
        (config.exclusion_path.as_path(), ExclusionSet::init(&config.exclusion_path)?),
        (config.history_path.as_path(), PostHistory::init(&config.history_path)?),
    ];
    for (path, was_created) in created {
        if was_created {
            println!("Created {}", path.display());
        } else {
            println!("Exists  {}", path.display());
        }
    }
    Ok(())
}

async fn run_download(config: &Config, args: cli::DownloadArgs) -> anyhow::Result<()> {
    let catalog = config.catalog(&args);
    let crawl = config.crawl(&args);
    let mut ledger = Ledger::open(&config.ledger_path)?;
    tracing::debug!("Using ledger {}", ledger.path().display());
    tokio::fs::create_dir_all(&crawl.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", crawl.output_dir.display()))?;

    tracing::info!(
        "Crawling {:?} wallpapers at {} into {}",
        args.kind,
        crawl.resolution,
        crawl.output_dir.display()
    );
    let client = http::build_client(config.timeout)?;
    let report = download::crawl_catalog(&client, &catalog, &mut ledger, &crawl).await?;

    if report.stopped_early() {
        anyhow::bail!("Catalog crawl stopped before the catalog was exhausted");
    }
    if report.tally.failed > 0 {
        anyhow::bail!("{} downloads failed", report.tally.failed);
    }
    Ok(())
}

async fn run_launcher(config: &Config, args: cli::LauncherArgs) -> anyhow::Result<()> {
    let launcher = config.launcher(&args);
    let targets = config.launcher_targets(&args);
    let mut ledger = Ledger::open(&config.ledger_path)?;
    for dir in [&targets.image_dir, &targets.video_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let client = http::build_client(config.timeout)?;
    let report =
        download::download_launcher_backgrounds(&client, &launcher, &mut ledger, &targets).await?;

    let failed = report.images.failed + report.videos.failed;
    if report.endpoint_failures > 0 || failed > 0 {
        anyhow::bail!(
            "{} launcher endpoints and {} downloads failed",
            report.endpoint_failures,
            failed
        );
    }
    Ok(())
}

/// Exclusion list for imaging commands; an absent document means no
/// exclusions, anything else wrong with it is fatal.
fn load_exclusions(config: &Config) -> Result<ExclusionSet, StorageError> {
    match ExclusionSet::open(&config.exclusion_path) {
        Ok(set) => Ok(set),
        Err(StorageError::Missing { path }) => {
            tracing::warn!("No exclusion list at {}, excluding nothing", path.display());
            Ok(ExclusionSet::default())
        }
        Err(e) => Err(e),
    }
}

fn normalized_exts(exts: &[String]) -> Vec<String> {
    exts.iter().map(|e| normalize_ext(e)).collect()
}

async fn run_classify(config: &Config, args: cli::ClassifyArgs) -> anyhow::Result<()> {
    let exclusions = if args.no_exclusions {
        ExclusionSet::default()
    } else {
        load_exclusions(config)?
    };
    let input = expand_tilde(&args.input);
    let output = expand_tilde(&args.output);
    let excluded_exts = normalized_exts(&args.exclude_exts);

    if exclusions.is_empty() {
        tracing::debug!("No exclusions in effect");
    }
    let summary = tokio::task::spawn_blocking(move || {
        imaging::classify(&input, &output, args.ratio, &excluded_exts, &exclusions)
    })
    .await??;

    println!(
        "copied = {} | excluded = {} | skipped = {} | mismatched = {}",
        summary.copied, summary.excluded, summary.skipped, summary.mismatched
    );
    Ok(())
}

async fn run_normalize(args: cli::NormalizeArgs) -> anyhow::Result<()> {
    let dir = expand_tilde(&args.dir);
    let from = normalized_exts(&args.from);
    let recursive = !args.no_recursive;

    let summary =
        tokio::task::spawn_blocking(move || imaging::normalize_dir(&dir, &from, &args.to, recursive))
            .await?;

    println!(
        "converted = {} | already normalized = {} | failed = {}",
        summary.converted, summary.already_normalized, summary.failed
    );
    if summary.failed > 0 {
        anyhow::bail!("{} conversions failed", summary.failed);
    }
    Ok(())
}

async fn run_sweep(config: &Config, args: cli::SweepArgs) -> anyhow::Result<()> {
    let mut names = args.names.clone();
    if args.excluded {
        names.extend(ExclusionSet::open(&config.exclusion_path)?.file_names(&[".jpg", ".jpeg"]));
    }
    let dir = expand_tilde(&args.dir);
    let exts = normalized_exts(&args.exts);

    let summary = tokio::task::spawn_blocking(move || imaging::sweep(&dir, &names, &exts)).await?;

    println!(
        "removed by name = {} | removed by extension = {} | removed = {}",
        summary.removed_by_name,
        summary.removed_by_ext,
        summary.total()
    );
    Ok(())
}

/// Classify every input into the output, then turn the `.webp` files that
/// landed there into `.jpeg` and drop the superseded originals.
async fn run_organize(config: &Config, args: cli::OrganizeArgs) -> anyhow::Result<()> {
    let exclusions = load_exclusions(config)?;
    let inputs: Vec<PathBuf> = args.inputs.iter().map(|i| expand_tilde(i)).collect();
    let output = expand_tilde(&args.output);
    let ratio = args.ratio;

    let summary = tokio::task::spawn_blocking(move || {
        imaging::organize(&inputs, &output, ratio, &exclusions)
    })
    .await??;

    println!(
        "copied = {} | converted = {} | conversion failures = {} | removed = {}",
        summary.copied, summary.converted, summary.conversion_failed, summary.removed
    );
    if summary.conversion_failed > 0 {
        anyhow::bail!(
            "{} conversions failed; their .webp files were kept",
            summary.conversion_failed
        );
    }
    Ok(())
}

async fn run_mirror(args: cli::MirrorArgs) -> anyhow::Result<()> {
    let input = expand_tilde(&args.input);
    let output = expand_tilde(&args.output);
    let exts = normalized_exts(&args.exts);
    let convert_exts = normalized_exts(&args.convert_exts);

    let summary = tokio::task::spawn_blocking(move || {
        imaging::mirror(&input, &output, &exts, &convert_exts, &args.convert_to)
    })
    .await??;

    println!(
        "copied = {} | converted = {} | skipped = {}",
        summary.copied, summary.converted, summary.skipped
    );
    Ok(())
}

fn run_status(config: &Config) -> anyhow::Result<()> {
    println!("State directory: {}", config.base_dir.display());
    println!();

    match Ledger::open(&config.ledger_path) {
        Ok(ledger) => {
            println!("Download ledger:");
            println!("  Images: {}", ledger.load(AssetClass::Image).len());
            println!("  Videos: {}", ledger.load(AssetClass::Video).len());
        }
        Err(StorageError::Missing { path }) => println!("No ledger at {}", path.display()),
        Err(e) => return Err(e.into()),
    }
    match ExclusionSet::open(&config.exclusion_path) {
        Ok(set) => println!("Excluded images: {}", set.len()),
        Err(StorageError::Missing { path }) => println!("No exclusion list at {}", path.display()),
        Err(e) => return Err(e.into()),
    }
    match PostHistory::open(&config.history_path) {
        Ok(history) => println!("Daily posts:     {}", history.len()),
        Err(StorageError::Missing { path }) => println!("No daily history at {}", path.display()),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn run_daily(config: &Config, args: cli::DailyArgs) -> anyhow::Result<()> {
    let ledger = Ledger::open(&config.ledger_path)?;
    let mut history = match PostHistory::open(&config.history_path) {
        Err(StorageError::Missing { .. }) => {
            PostHistory::init(&config.history_path)?;
            PostHistory::open(&config.history_path)?
        }
        other => other?,
    };

    let mut rng = rand::thread_rng();
    let Some(url) = history
        .pick_unposted(ledger.load(AssetClass::Image), &mut rng)
        .map(str::to_string)
    else {
        println!("Every downloaded image has already been posted.");
        return Ok(());
    };

    println!("{url}");
    if args.record {
        history.record(&url)?;
        tracing::info!("Recorded in {}", config.history_path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    let filter = match cli.log_level {
        types::LogLevel::Debug => "debug",
        types::LogLevel::Info => "info",
        types::LogLevel::Warn => "warn",
        types::LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = Config::from_cli(&cli);
    tracing::debug!(?config, "Resolved configuration");

    match cli.command {
        Command::Init => run_init(&config).await,
        Command::Download(args) => run_download(&config, args).await,
        Command::Launcher(args) => run_launcher(&config, args).await,
        Command::Classify(args) => run_classify(&config, args).await,
        Command::Normalize(args) => run_normalize(args).await,
        Command::Sweep(args) => run_sweep(&config, args).await,
        Command::Organize(args) => run_organize(&config, args).await,
        Command::Mirror(args) => run_mirror(args).await,
        Command::Status => run_status(&config),
        Command::Daily(args) => run_daily(&config, args),
    }
}
