use std::fs;
use std::path::Path;

use super::normalize::{normalize, normalized_path};
use super::{has_extension, ImagingError};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSummary {
    pub copied: usize,
    pub converted: usize,
    pub skipped: usize,
}

/// Copy images with an extension in `exts` from `input_dir` into
/// `output_dir`. Files whose extension is in `convert_exts` are re-encoded as
/// `convert_to` instead of copied. Anything whose destination already exists
/// is skipped.
pub fn mirror(
    input_dir: &Path,
    output_dir: &Path,
    exts: &[String],
    convert_exts: &[String],
    convert_to: &str,
) -> Result<MirrorSummary, ImagingError> {
    let mut summary = MirrorSummary::default();
    if !input_dir.is_dir() {
        tracing::warn!(dir = %input_dir.display(), "Input directory does not exist, nothing to mirror");
        return Ok(summary);
    }
    fs::create_dir_all(output_dir).map_err(|e| ImagingError::io(output_dir, e))?;

    let entries = fs::read_dir(input_dir).map_err(|e| ImagingError::io(input_dir, e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !has_extension(&path, exts) {
            continue;
        }

        if has_extension(&path, convert_exts) {
            match normalized_path(&path, output_dir, convert_to) {
                Some(dest) if dest.exists() => summary.skipped += 1,
                Some(_) if normalize(&path, output_dir, convert_to) => summary.converted += 1,
                _ => summary.skipped += 1,
            }
            continue;
        }

        let dest = output_dir.join(entry.file_name());
        if dest.exists() {
            summary.skipped += 1;
            continue;
        }
        match fs::copy(&path, &dest) {
            Ok(_) => summary.copied += 1,
            Err(e) => {
                tracing::warn!("{}", ImagingError::io(&dest, e));
                summary.skipped += 1;
            }
        }
    }

    tracing::info!(
        "Mirrored {} into {}: {} copied, {} converted, {} skipped",
        input_dir.display(),
        output_dir.display(),
        summary.copied,
        summary.converted,
        summary.skipped
    );
    Ok(summary)
}
