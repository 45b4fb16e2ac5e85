use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("permission denied preparing output directory {path}: {source}")]
    DirectoryCreationDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare output directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to copy label {from} to {to}: {message}")]
    LabelCopyFailed {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },
}

/// Recreates `dest` as an empty directory.
///
/// Anything already at `dest` is removed first. A missing `dest` is not an
/// error, and running this twice leaves the same empty directory.
pub fn materialize(dest: &Path) -> Result<(), MaterializeError> {
    match fs::remove_dir_all(dest) {
        Ok(()) => log::debug!("Removed existing output directory {}", dest.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(classify(dest, e)),
    }
    fs::create_dir_all(dest).map_err(|e| classify(dest, e))?;
    log::info!("Output directory: {}", dest.display());
    Ok(())
}

fn classify(path: &Path, source: io::Error) -> MaterializeError {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::PermissionDenied {
        MaterializeError::DirectoryCreationDenied { path, source }
    } else {
        MaterializeError::DirectoryCreationFailed { path, source }
    }
}
