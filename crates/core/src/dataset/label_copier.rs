use std::path::{Path, PathBuf};

use crate::dataset::directory_materializer::MaterializeError;
use crate::dataset::discovery::discover_labels;
use crate::dataset::domain::file_copier::FileCopier;

/// Copies every label file in the root of `source_dir` into `dest_dir`.
///
/// Returns the copied destination paths in source order. The first failed
/// copy aborts.
pub fn copy_labels(
    source_dir: &Path,
    dest_dir: &Path,
    copier: &dyn FileCopier,
) -> Result<Vec<PathBuf>, MaterializeError> {
    let labels = discover_labels(source_dir).map_err(|e| MaterializeError::LabelCopyFailed {
        from: source_dir.to_path_buf(),
        to: dest_dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut copied = Vec::with_capacity(labels.len());
    for from in labels {
        // discover_labels only yields paths with a file name
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = dest_dir.join(name);
        copier
            .copy(&from, &to)
            .map_err(|e| MaterializeError::LabelCopyFailed {
                from: from.clone(),
                to: to.clone(),
                message: e.to_string(),
            })?;
        log::debug!("Copied label {}", to.display());
        copied.push(to);
    }

    if !copied.is_empty() {
        log::info!("Copied {} label file(s)", copied.len());
    }
    Ok(copied)
}
