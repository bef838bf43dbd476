use std::fs;
use std::io;
use std::path::Path;

use super::has_extension;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub removed_by_name: usize,
    pub removed_by_ext: usize,
}

impl SweepSummary {
    pub fn total(&self) -> usize {
        self.removed_by_name + self.removed_by_ext
    }
}

/// Delete files directly inside `target_dir`: first every file named in
/// `names`, then every file whose extension is in `exts` (with or without
/// the dot, any case).
///
/// Directories are never removed. A missing `target_dir` yields an empty
/// summary; a file that cannot be deleted is logged and left behind.
pub fn sweep(target_dir: &Path, names: &[String], exts: &[String]) -> SweepSummary {
    sweep_with(target_dir, names, exts, |path| fs::remove_file(path))
}

fn sweep_with<F>(target_dir: &Path, names: &[String], exts: &[String], mut delete: F) -> SweepSummary
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut summary = SweepSummary::default();
    if !target_dir.is_dir() {
        tracing::warn!(dir = %target_dir.display(), "Target directory does not exist, nothing to sweep");
        return summary;
    }

    for name in names {
        let path = target_dir.join(name);
        if path.is_file() && remove(&path, &mut delete) {
            summary.removed_by_name += 1;
        }
    }

    if !exts.is_empty() {
        match fs::read_dir(target_dir) {
            Ok(entries) => {
                for entry in entries.filter_map(|e| e.ok()) {
                    let path = entry.path();
                    if path.is_file() && has_extension(&path, exts) && remove(&path, &mut delete) {
                        summary.removed_by_ext += 1;
                    }
                }
            }
            Err(e) => tracing::error!("Cannot list {}: {}", target_dir.display(), e),
        }
    }

    tracing::info!(
        "Swept {}: {} by name, {} by extension, {} total",
        target_dir.display(),
        summary.removed_by_name,
        summary.removed_by_ext,
        summary.total()
    );
    summary
}

fn remove<F>(path: &Path, delete: &mut F) -> bool
where
    F: FnMut(&Path) -> io::Result<()>,
{
    match delete(path) {
        Ok(()) => {
            tracing::debug!("Removed {}", path.display());
            true
        }
        Err(e) => {
            tracing::warn!("Failed to remove {}: {}", path.display(), e);
            false
        }
    }
}
