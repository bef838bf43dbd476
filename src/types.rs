use std::fmt;
use std::str::FromStr;

/// Which ledger set an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Image,
    Video,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wallpaper category exposed by the catalog endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum WallpaperKind {
    Patch,
    Event,
    Character,
}

impl WallpaperKind {
    /// Numeric `type` code expected by the catalog.
    pub fn code(&self) -> u8 {
        match self {
            Self::Patch => 0,
            Self::Event => 1,
            Self::Character => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Exact pixel resolution, parsed from `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid width in '{s}'"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid height in '{s}'"))?;
        Ok(Self::new(width, height))
    }
}

/// Target aspect ratio, parsed from `W:H`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Absolute tolerance applied when comparing ratios.
    pub const TOLERANCE: f64 = 1e-2;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn value(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Whether an image of `width`x`height` pixels has this ratio within
    /// [`Self::TOLERANCE`]. A zero height never matches.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        if height == 0 {
            return false;
        }
        let ratio = f64::from(width) / f64::from(height);
        (ratio - self.value()).abs() < Self::TOLERANCE
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(':')
            .ok_or_else(|| format!("expected W:H, got '{s}'"))?;
        let width: u32 = w
            .trim()
            .parse()
            .map_err(|_| format!("invalid ratio width in '{s}'"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|_| format!("invalid ratio height in '{s}'"))?;
        if width == 0 || height == 0 {
            return Err(format!("ratio terms must be non-zero, got '{s}'"));
        }
        Ok(Self::new(width, height))
    }
}
