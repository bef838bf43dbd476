use clap::{Args, Parser, Subcommand};

use crate::types::*;

#[derive(Parser, Debug)]
#[command(
    name = "hoyowall-rs",
    version,
    about = "Download HoYoverse wallpapers and keep a local wallpaper library tidy"
)]
pub struct Cli {
    /// Directory holding download_history.json, image_exclusion.json and
    /// daily_post_history.json
    #[arg(long, global = true, default_value = ".", env = "HOYOWALL_BASE_DIR")]
    pub base_dir: String,

    /// Log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Per-request network timeout in seconds
    #[arg(long, global = true, default_value_t = 60)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create missing state documents (never overwrites)
    Init,

    /// Crawl the wallpaper catalog and download new wallpapers
    Download(DownloadArgs),

    /// Download launcher backgrounds and live-wallpaper videos
    Launcher(LauncherArgs),

    /// Copy images of a given aspect ratio into another directory
    Classify(ClassifyArgs),

    /// Convert images to another format, writing beside the source
    Normalize(NormalizeArgs),

    /// Delete files by name or extension from a directory
    Sweep(SweepArgs),

    /// Classify, normalize and sweep in one go
    Organize(OrganizeArgs),

    /// Copy images into another directory, converting some formats
    Mirror(MirrorArgs),

    /// Show state document counts
    Status,

    /// Pick a random downloaded wallpaper that has not been posted yet
    Daily(DailyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Stop after this many new downloads
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: usize,

    /// Exact resolution to download
    #[arg(long, default_value = "2560x1440")]
    pub resolution: Resolution,

    /// Wallpaper category
    #[arg(long, value_enum, default_value = "patch")]
    pub kind: WallpaperKind,

    /// Output directory
    #[arg(short = 'o', long, default_value = "output")]
    pub output: String,

    /// Catalog page size
    #[arg(long, default_value_t = 100)]
    pub page_size: u32,

    /// Catalog language
    #[arg(long, default_value = "en-us")]
    pub lang: String,

    /// Catalog endpoint
    #[arg(long)]
    pub catalog_url: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress_bar: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LauncherArgs {
    /// Output directory for background images
    #[arg(short = 'o', long, default_value = "output")]
    pub output: String,

    /// Output directory for live-wallpaper videos
    #[arg(long, default_value = "video")]
    pub video_output: String,

    /// Launcher API base URL
    #[arg(long)]
    pub launcher_url: Option<String>,

    /// Launcher id
    #[arg(long)]
    pub launcher_id: Option<String>,

    /// Launcher language
    #[arg(long, default_value = "en-us")]
    pub lang: String,
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Directory to read images from
    #[arg(short = 'i', long)]
    pub input: String,

    /// Directory to copy matching images into
    #[arg(short = 'o', long)]
    pub output: String,

    /// Target aspect ratio
    #[arg(long, default_value = "16:9")]
    pub ratio: AspectRatio,

    /// Extension to leave out (repeatable)
    #[arg(long = "exclude-ext")]
    pub exclude_exts: Vec<String>,

    /// Ignore image_exclusion.json
    #[arg(long)]
    pub no_exclusions: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Directory to scan
    pub dir: String,

    /// Extension to convert from (repeatable)
    #[arg(long = "from", default_value = ".webp")]
    pub from: Vec<String>,

    /// Extension to convert to
    #[arg(long, default_value = ".jpeg")]
    pub to: String,

    /// Only scan the top level of the directory
    #[arg(long)]
    pub no_recursive: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Directory to sweep
    pub dir: String,

    /// File name to delete (repeatable)
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Extension to delete (repeatable)
    #[arg(long = "ext")]
    pub exts: Vec<String>,

    /// Also delete `<stem>.jpg` and `<stem>.jpeg` for every exclusion entry
    #[arg(long)]
    pub excluded: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OrganizeArgs {
    /// Source directory (repeatable, processed in order)
    #[arg(short = 'i', long = "input", required = true)]
    pub inputs: Vec<String>,

    /// Destination directory
    #[arg(short = 'o', long)]
    pub output: String,

    /// Target aspect ratio
    #[arg(long, default_value = "16:9")]
    pub ratio: AspectRatio,
}

#[derive(Args, Debug, Clone)]
pub struct MirrorArgs {
    #[arg(short = 'i', long)]
    pub input: String,

    #[arg(short = 'o', long)]
    pub output: String,

    /// Extension to copy (repeatable)
    #[arg(long = "ext", default_values = [".png", ".jpg", ".jpeg", ".webp"])]
    pub exts: Vec<String>,

    /// Extension to convert rather than copy (repeatable)
    #[arg(long = "convert", default_value = ".webp")]
    pub convert_exts: Vec<String>,

    /// Extension converted files get
    #[arg(long, default_value = ".jpeg")]
    pub convert_to: String,
}

#[derive(Args, Debug, Clone)]
pub struct DailyArgs {
    /// Record the pick in daily_post_history.json
    #[arg(long)]
    pub record: bool,
}
