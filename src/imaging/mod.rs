//! Local image passes: aspect-ratio classification, format normalization,
//! retention sweeps, the mirror copy and the organize recipe.

pub mod classify;
pub mod error;
pub mod mirror;
pub mod normalize;
pub mod organize;
pub mod sweep;

pub use classify::classify;
pub use error::ImagingError;
pub use mirror::mirror;
pub use normalize::normalize_dir;
pub use organize::organize;
pub use sweep::sweep;

use std::path::Path;

/// Extensions treated as images, lowercase and without the dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "tiff", "bmp"];

/// Canonical form of a user-supplied extension: lowercase, no leading dot.
pub fn normalize_ext(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Lowercased extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_image(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// True when `path`'s extension appears in `exts`. Entries may carry a
/// leading dot and any case.
pub fn has_extension(path: &Path, exts: &[String]) -> bool {
    extension_of(path).is_some_and(|ext| exts.iter().any(|e| normalize_ext(e) == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ext() {
        assert_eq!(normalize_ext(".WebP"), "webp");
        assert_eq!(normalize_ext("jpeg"), "jpeg");
    }

    #[test]
    fn test_is_image_is_case_insensitive() {
        assert!(is_image(Path::new("a/B.PNG")));
        assert!(is_image(Path::new("c.jpeg")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("noext")));
    }

    #[test]
    fn test_has_extension() {
        let exts = vec!["webp".to_string()];
        assert!(has_extension(Path::new("x.WEBP"), &exts));
        assert!(!has_extension(Path::new("x.png"), &exts));

        let dotted = vec![".WebP".to_string()];
        assert!(has_extension(Path::new("x.webp"), &dotted));
    }
}
