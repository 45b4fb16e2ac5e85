use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tempfile::TempPath;

use crate::shared::frame::{CanonicalMode, Frame};

/// A frame written to a temporary PNG for collaborators that only accept
/// file paths.
///
/// The file lives exactly as long as this value. It is removed on drop,
/// including when staging itself fails halfway. Removal failures are logged
/// and never propagated.
pub struct StagedImage {
    path: Option<TempPath>,
}

impl StagedImage {
    /// Stages `frame` in the system temp directory.
    pub fn stage(frame: &Frame) -> Result<Self, Box<dyn std::error::Error>> {
        Self::stage_in(&std::env::temp_dir(), frame)
    }

    pub fn stage_in(dir: &Path, frame: &Frame) -> Result<Self, Box<dyn std::error::Error>> {
        let (file, path) = tempfile::Builder::new()
            .prefix("squarecrop-")
            .suffix(".png")
            .tempfile_in(dir)?
            .into_parts();
        // From here on `path` deletes the file if encoding fails.
        encode_png(file, frame)?;
        log::debug!("Staged {}x{} frame at {}", frame.width(), frame.height(), path.display());
        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .expect("staged image path is present until drop")
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let display: PathBuf = path.to_path_buf();
            if let Err(e) = path.close() {
                log::warn!("Failed to remove staged image {}: {e}", display.display());
            }
        }
    }
}

fn encode_png(file: File, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
    let color = match frame.mode() {
        CanonicalMode::Rgb => ExtendedColorType::Rgb8,
        CanonicalMode::Rgba => ExtendedColorType::Rgba8,
    };
    let mut out = BufWriter::new(file);
    PngEncoder::new(&mut out).write_image(frame.data(), frame.width(), frame.height(), color)?;
    out.flush()?;
    Ok(())
}
