use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("model file not found: {0}")]
    MissingOverride(PathBuf),
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// A downloadable model artifact.
#[derive(Clone, Copy, Debug)]
pub struct ModelSource<'a> {
    pub file_name: &'a str,
    pub url: &'a str,
}

/// Where to look for a model before falling back to a download.
#[derive(Clone, Debug, Default)]
pub struct ModelLocations {
    /// Explicit path supplied by the user; must exist when set.
    pub override_path: Option<PathBuf>,
    /// Cache directory; `None` means the platform default.
    pub cache_dir: Option<PathBuf>,
    /// Directory shipped alongside the binary, checked after the cache.
    pub bundled_dir: Option<PathBuf>,
}

/// Resolves a model file, checking local locations before downloading.
///
/// Order: explicit override, cache directory, bundled directory, download
/// into the cache.
pub fn resolve(
    source: ModelSource<'_>,
    locations: &ModelLocations,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    if let Some(path) = &locations.override_path {
        return if path.is_file() {
            Ok(path.clone())
        } else {
            Err(ModelResolveError::MissingOverride(path.clone()))
        };
    }

    let cache_dir = match &locations.cache_dir {
        Some(dir) => dir.clone(),
        None => model_cache_dir()?,
    };
    let cached_path = cache_dir.join(source.file_name);
    if cached_path.is_file() {
        log::debug!("Using cached model {}", cached_path.display());
        return Ok(cached_path);
    }

    if let Some(dir) = &locations.bundled_dir {
        let bundled_path = dir.join(source.file_name);
        if bundled_path.is_file() {
            log::debug!("Using bundled model {}", bundled_path.display());
            return Ok(bundled_path);
        }
    }

    fs::create_dir_all(&cache_dir).map_err(|e| ModelResolveError::CacheDir {
        path: cache_dir.clone(),
        source: e,
    })?;
    log::info!("Downloading {} to {}", source.url, cached_path.display());
    download(source.url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/squarecrop/models/`
/// - Linux: `$XDG_CACHE_HOME/squarecrop/models/` or `~/.cache/squarecrop/models/`
/// - Windows: `%LOCALAPPDATA%/squarecrop/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("squarecrop").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("squarecrop").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

/// Streams `url` into a temp file next to `dest`, renaming it into place
/// only once the body is complete. The temp file is removed on any error.
fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let write_err = |source: std::io::Error| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;
    let total = response.content_length().unwrap_or(0);

    let mut part = tempfile::Builder::new()
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(write_err)?;

    let mut downloaded: u64 = 0;
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        part.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }
    part.flush().map_err(write_err)?;

    part.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(())
}
