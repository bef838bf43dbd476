use std::fs;
use std::path::Path;

use super::{extension_of, has_extension, is_image, ImagingError};
use crate::state::ExclusionSet;
use crate::types::AspectRatio;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassifySummary {
    pub copied: usize,
    pub excluded: usize,
    pub skipped: usize,
    /// Decoded fine but outside the ratio tolerance.
    pub mismatched: usize,
}

enum Decision {
    Copied,
    Excluded(&'static str),
    Skipped(String),
    Mismatched { width: u32, height: u32 },
}

/// Copy every image directly inside `input_dir` whose aspect ratio matches
/// `ratio` into `output_dir`, leaving the source untouched.
///
/// A missing `input_dir` yields an empty summary. `output_dir` is created if
/// needed. Only a failure to create `output_dir` or list `input_dir` is an
/// `Err`; everything per-file lands in a counter.
pub fn classify(
    input_dir: &Path,
    output_dir: &Path,
    ratio: AspectRatio,
    excluded_exts: &[String],
    exclusions: &ExclusionSet,
) -> Result<ClassifySummary, ImagingError> {
    let mut summary = ClassifySummary::default();
    if !input_dir.is_dir() {
        tracing::warn!(dir = %input_dir.display(), "Input directory does not exist, nothing to classify");
        return Ok(summary);
    }

    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| ImagingError::io(output_dir, e))?;
        tracing::info!("Created {}", output_dir.display());
    }

    tracing::info!(
        "Classifying {} into {} ({})",
        input_dir.display(),
        output_dir.display(),
        ratio
    );

    let entries = fs::read_dir(input_dir).map_err(|e| ImagingError::io(input_dir, e))?;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Unreadable entry in {}: {}", input_dir.display(), e);
                summary.skipped += 1;
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        match decide(&entry.path(), output_dir, ratio, excluded_exts, exclusions) {
            Decision::Copied => {
                tracing::debug!("Copied: {}", name);
                summary.copied += 1;
            }
            Decision::Excluded(why) => {
                tracing::debug!("Excluded ({}): {}", why, name);
                summary.excluded += 1;
            }
            Decision::Skipped(why) => {
                tracing::debug!("Skipped ({}): {}", why, name);
                summary.skipped += 1;
            }
            Decision::Mismatched { width, height } => {
                tracing::debug!("Ratio mismatch {}x{}: {}", width, height, name);
                summary.mismatched += 1;
            }
        }
    }

    tracing::info!(
        "Classified: {} copied, {} excluded, {} skipped, {} mismatched",
        summary.copied,
        summary.excluded,
        summary.skipped,
        summary.mismatched
    );
    Ok(summary)
}

fn decide(
    path: &Path,
    output_dir: &Path,
    ratio: AspectRatio,
    excluded_exts: &[String],
    exclusions: &ExclusionSet,
) -> Decision {
    if !path.is_file() || !is_image(path) {
        return Decision::Skipped("not an image file".to_string());
    }
    if has_extension(path, excluded_exts) {
        return Decision::Excluded("excluded extension");
    }
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if exclusions.contains(stem) {
        return Decision::Excluded("exclusion list");
    }
    let Some(file_name) = path.file_name() else {
        return Decision::Skipped("no file name".to_string());
    };
    let destination = output_dir.join(file_name);
    if destination.exists() {
        return Decision::Skipped("already in output directory".to_string());
    }

    let (width, height) = match dimensions(path) {
        Ok(dims) => dims,
        Err(e) => return Decision::Skipped(e.to_string()),
    };
    if !ratio.matches(width, height) {
        return Decision::Mismatched { width, height };
    }
    match fs::copy(path, &destination) {
        Ok(_) => Decision::Copied,
        Err(e) => Decision::Skipped(ImagingError::io(&destination, e).to_string()),
    }
}

/// Pixel dimensions read from the image header.
pub fn dimensions(path: &Path) -> Result<(u32, u32), ImagingError> {
    let (width, height) = image::image_dimensions(path).map_err(|source| ImagingError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if width == 0 || height == 0 {
        return Err(ImagingError::InvalidDimensions {
            path: path.to_path_buf(),
            width,
            height,
        });
    }
    tracing::trace!(ext = ?extension_of(path), width, height, "dimensions");
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::new(width, height).save(dir.join(name)).unwrap();
    }

    fn sixteen_nine() -> AspectRatio {
        AspectRatio::new(16, 9)
    }

    #[test]
    fn test_classify_sorts_by_ratio() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(input.path(), "wide.png", 160, 90);
        write_png(input.path(), "tall.png", 160, 100);
        std::fs::write(input.path().join("notes.txt"), b"hi").unwrap();

        let summary = classify(
            input.path(),
            output.path(),
            sixteen_nine(),
            &[],
            &ExclusionSet::default(),
        )
        .unwrap();

        assert_eq!(
            summary,
            ClassifySummary {
                copied: 1,
                excluded: 0,
                skipped: 1,
                mismatched: 1
            }
        );
        assert!(output.path().join("wide.png").exists());
        assert!(!output.path().join("tall.png").exists());
        assert!(input.path().join("wide.png").exists());
    }

    #[test]
    fn test_classify_rerun_copies_nothing() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(input.path(), "wide.png", 160, 90);
        let exclusions = ExclusionSet::default();

        classify(input.path(), output.path(), sixteen_nine(), &[], &exclusions).unwrap();
        let second =
            classify(input.path(), output.path(), sixteen_nine(), &[], &exclusions).unwrap();

        assert_eq!(second.copied, 0);
        assert_eq!(second.skipped, 1);
    }

    #[test]
    fn test_classify_exclusions() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(input.path(), "banned.png", 160, 90);
        // Excluded by extension before any decode is attempted.
        std::fs::write(input.path().join("raw.webp"), b"not really webp").unwrap();
        let exclusions: ExclusionSet = ["banned"].into_iter().collect();

        let summary = classify(
            input.path(),
            output.path(),
            sixteen_nine(),
            &["webp".to_string()],
            &exclusions,
        )
        .unwrap();

        assert_eq!(summary.excluded, 2);
        assert_eq!(summary.copied, 0);
    }

    #[test]
    fn test_dotted_excluded_extension() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(input.path(), "keep.png", 160, 90);
        RgbImage::new(160, 90).save(input.path().join("w.bmp")).unwrap();

        let summary = classify(
            input.path(),
            output.path(),
            sixteen_nine(),
            &[".bmp".to_string()],
            &ExclusionSet::default(),
        )
        .unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.excluded, 1);
        assert!(!output.path().join("w.bmp").exists());
    }

    #[test]
    fn test_sixteen_nine_wallpaper_sizes() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_png(input.path(), "qhd.png", 2560, 1440);
        write_png(input.path(), "wuxga.png", 1920, 1200);

        let summary = classify(
            input.path(),
            output.path(),
            sixteen_nine(),
            &[],
            &ExclusionSet::default(),
        )
        .unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.mismatched, 1);
        assert!(output.path().join("qhd.png").exists());
    }

    #[test]
    fn test_undecodable_image_is_skipped() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("broken.png"), b"garbage").unwrap();

        let summary = classify(
            input.path(),
            output.path(),
            sixteen_nine(),
            &[],
            &ExclusionSet::default(),
        )
        .unwrap();
        assert_eq!(summary.skipped, 1);
        assert!(!output.path().join("broken.png").exists());
    }

    #[test]
    fn test_missing_input_is_zero_summary() {
        let root = tempfile::tempdir().unwrap();
        let summary = classify(
            &root.path().join("absent"),
            &root.path().join("out"),
            sixteen_nine(),
            &[],
            &ExclusionSet::default(),
        )
        .unwrap();
        assert_eq!(summary, ClassifySummary::default());
    }

    #[test]
    fn test_output_dir_is_created() {
        let input = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_png(input.path(), "wide.png", 320, 180);
        let output = root.path().join("nested").join("out");

        let summary = classify(
            input.path(),
            &output,
            sixteen_nine(),
            &[],
            &ExclusionSet::default(),
        )
        .unwrap();
        assert_eq!(summary.copied, 1);
        assert!(output.join("wide.png").exists());
    }
}
