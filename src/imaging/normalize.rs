use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use super::{has_extension, normalize_ext, ImagingError};

/// Where `source` lands once converted to `target_ext` inside `output_dir`.
pub fn normalized_path(source: &Path, output_dir: &Path, target_ext: &str) -> Option<PathBuf> {
    let stem = source.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(normalize_ext(target_ext));
    Some(output_dir.join(name))
}

/// Decode `source`, drop any alpha channel, and write it as
/// `output_dir/<stem>.<target_ext>` with the encoder the extension names.
///
/// Every failure is logged and reported as `false`. An existing output is
/// overwritten; callers that want idempotence check [`normalized_path`] first.
pub fn normalize(source: &Path, output_dir: &Path, target_ext: &str) -> bool {
    match convert(source, output_dir, target_ext) {
        Ok(dest) => {
            tracing::debug!("Converted {} -> {}", source.display(), dest.display());
            true
        }
        Err(e) => {
            tracing::warn!("Conversion failed for {}: {}", source.display(), e);
            false
        }
    }
}

fn convert(source: &Path, output_dir: &Path, target_ext: &str) -> Result<PathBuf, ImagingError> {
    let ext = normalize_ext(target_ext);
    let format = ImageFormat::from_extension(&ext)
        .ok_or_else(|| ImagingError::UnsupportedFormat { extension: ext.clone() })?;
    let dest = normalized_path(source, output_dir, &ext)
        .ok_or_else(|| ImagingError::io(source, std::io::Error::other("no file stem")))?;

    let decoded = image::open(source).map_err(|e| ImagingError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;
    let opaque = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut tmp = NamedTempFile::new_in(output_dir).map_err(|e| ImagingError::io(output_dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        opaque
            .write_to(&mut writer, format)
            .map_err(|e| ImagingError::Decode {
                path: dest.clone(),
                source: e,
            })?;
        writer.flush().map_err(|e| ImagingError::io(&dest, e))?;
    }
    tmp.persist(&dest)
        .map_err(|e| ImagingError::io(&dest, e.error))?;
    Ok(dest)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub converted: usize,
    /// The converted sibling already existed.
    pub already_normalized: usize,
    pub failed: usize,
}

/// Convert every file under `dir` whose extension is in `from_exts` into a
/// `to_ext` sibling, skipping files whose sibling already exists.
///
/// Sources are left in place. A missing `dir` yields an empty summary.
pub fn normalize_dir(dir: &Path, from_exts: &[String], to_ext: &str, recursive: bool) -> NormalizeSummary {
    let mut summary = NormalizeSummary::default();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Directory does not exist, nothing to normalize");
        return summary;
    }

    let walker = if recursive {
        WalkDir::new(dir)
    } else {
        WalkDir::new(dir).max_depth(1)
    };
    for entry in walker.into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || !has_extension(path, from_exts) {
            continue;
        }
        let Some(parent) = path.parent() else { continue };
        match normalized_path(path, parent, to_ext) {
            Some(dest) if dest.exists() => {
                tracing::debug!("Already normalized: {}", path.display());
                summary.already_normalized += 1;
            }
            Some(_) if normalize(path, parent, to_ext) => summary.converted += 1,
            _ => summary.failed += 1,
        }
    }

    tracing::info!(
        "Normalized {}: {} converted, {} already normalized, {} failed",
        dir.display(),
        summary.converted,
        summary.already_normalized,
        summary.failed
    );
    summary
}
