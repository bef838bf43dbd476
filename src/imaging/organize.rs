use std::fs;
use std::path::{Path, PathBuf};

use super::normalize::{normalize_dir, normalized_path};
use super::{classify, has_extension, sweep, ImagingError};
use crate::state::ExclusionSet;
use crate::types::AspectRatio;

const SOURCE_EXT: &str = "webp";
const TARGET_EXT: &str = "jpeg";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OrganizeSummary {
    pub copied: usize,
    pub converted: usize,
    pub conversion_failed: usize,
    /// `.webp` originals removed because their `.jpeg` now exists.
    pub removed: usize,
}

/// Classify every input into `output`, convert the `.webp` files there to
/// `.jpeg`, then delete only the `.webp` files that have a `.jpeg` sibling.
///
/// A `.webp` whose conversion failed stays in place.
pub fn organize(
    inputs: &[PathBuf],
    output: &Path,
    ratio: AspectRatio,
    exclusions: &ExclusionSet,
) -> Result<OrganizeSummary, ImagingError> {
    let mut summary = OrganizeSummary::default();
    for input in inputs {
        summary.copied += classify(input, output, ratio, &[], exclusions)?.copied;
    }

    let webp = vec![SOURCE_EXT.to_string()];
    let normalized = normalize_dir(output, &webp, TARGET_EXT, false);
    summary.converted = normalized.converted;
    summary.conversion_failed = normalized.failed;

    let superseded = superseded_names(output, &webp);
    summary.removed = sweep(output, &superseded, &[]).removed_by_name;
    Ok(summary)
}

/// File names directly in `dir` with a `from_exts` extension whose converted
/// sibling exists.
fn superseded_names(dir: &Path, from_exts: &[String]) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.is_file() && has_extension(path, from_exts))
        .filter(|path| normalized_path(path, dir, TARGET_EXT).is_some_and(|dest| dest.is_file()))
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_unconverted_webp_survives() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.webp"), b"not an image").unwrap();
        std::fs::write(dir.path().join("done.webp"), b"already converted").unwrap();
        RgbImage::new(16, 9).save(dir.path().join("done.jpeg")).unwrap();

        // Input and output are the same directory: classify copies nothing.
        let summary = organize(
            &[dir.path().to_path_buf()],
            dir.path(),
            AspectRatio::new(16, 9),
            &ExclusionSet::default(),
        )
        .unwrap();

        assert_eq!(summary.copied, 0);
        assert_eq!(summary.conversion_failed, 1);
        assert_eq!(summary.removed, 1);
        assert!(dir.path().join("bad.webp").exists());
        assert!(!dir.path().join("done.webp").exists());
        assert!(dir.path().join("done.jpeg").exists());
    }

    #[test]
    fn test_organize_copies_matching_inputs() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        RgbImage::new(160, 90).save(input.path().join("wide.png")).unwrap();
        RgbImage::new(90, 160).save(input.path().join("tall.png")).unwrap();

        let summary = organize(
            &[input.path().to_path_buf()],
            output.path(),
            AspectRatio::new(16, 9),
            &ExclusionSet::default(),
        )
        .unwrap();

        assert_eq!(summary.copied, 1);
        assert_eq!(summary.removed, 0);
        assert!(output.path().join("wide.png").exists());
    }
}
