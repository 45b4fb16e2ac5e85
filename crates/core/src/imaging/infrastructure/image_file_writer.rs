use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::constants::DEFAULT_JPEG_QUALITY;
use crate::shared::crop_target::OutputFormat;
use crate::shared::frame::{CanonicalMode, Frame};

/// Writes a single frame to an image file using the `image` crate.
///
/// The destination directory must already exist. JPEG output cannot carry
/// alpha, so RGBA frames must be flattened before they reach this writer.
pub struct ImageFileWriter {
    jpeg_quality: u8,
}

impl ImageFileWriter {
    pub fn new() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// JPEG quality, clamped to 1-100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        format: OutputFormat,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let color = match frame.mode() {
            CanonicalMode::Rgb => ExtendedColorType::Rgb8,
            CanonicalMode::Rgba => ExtendedColorType::Rgba8,
        };
        if color == ExtendedColorType::Rgba8 && !format.supports_alpha() {
            return Err(format!("{format} output cannot store an alpha channel").into());
        }

        let mut out = BufWriter::new(File::create(path)?);
        match format {
            OutputFormat::Png => PngEncoder::new(&mut out).write_image(
                frame.data(),
                frame.width(),
                frame.height(),
                color,
            )?,
            OutputFormat::Jpg | OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut out, self.jpeg_quality).write_image(
                    frame.data(),
                    frame.width(),
                    frame.height(),
                    color,
                )?
            }
        }
        out.flush()?;
        Ok(())
    }
}
