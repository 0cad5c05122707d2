//! Output file naming for binarized results.
//!
//! `photo.jpg` thresholded at 97 becomes `photo_binarizada97.jpg` in the same
//! directory. With overwrite avoidance enabled, a numeric suffix is appended
//! until a free name is found.
use std::path::{Path, PathBuf};

pub const DEFAULT_SUFFIX: &str = "_binarizada";

/// `<dir>/<stem><suffix><threshold><.ext>` for `original`.
pub fn binarized_output_path(original: &Path, threshold: u8, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}{suffix}{threshold}");
    if let Some(ext) = original.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    original.with_file_name(name)
}

/// First of `candidate`, `<stem>_1<ext>`, `<stem>_2<ext>`, ... that does not exist.
pub fn next_free_path(candidate: &Path) -> PathBuf {
    if !candidate.exists() {
        return candidate.to_path_buf();
    }
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = candidate
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1u32;
    loop {
        let path = candidate.with_file_name(format!("{stem}_{n}{ext}"));
        if !path.exists() {
            return path;
        }
        n += 1;
    }
}

/// Whether `path` already looks like one of our binarized outputs.
pub fn is_binarized_output(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_stem()
            .map(|s| s.to_string_lossy().contains(suffix))
            .unwrap_or(false)
}
