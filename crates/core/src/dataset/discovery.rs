use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::shared::constants::{IMAGE_EXTENSIONS, LABEL_EXTENSION};

/// Source images directly inside `dir`, sorted by path.
pub fn discover_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    list_files(dir, IMAGE_EXTENSIONS)
}

/// Label files directly inside `dir`, sorted by path.
pub fn discover_labels(dir: &Path) -> io::Result<Vec<PathBuf>> {
    list_files(dir, &[LABEL_EXTENSION])
}

/// Regular files in `dir` (no recursion) whose extension matches one of
/// `extensions`, ignoring ASCII case.
pub fn list_files(dir: &Path, extensions: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
