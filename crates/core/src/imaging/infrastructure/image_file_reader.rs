use std::io::Cursor;
use std::path::Path;

use crate::imaging::domain::color_mode::ColorMode;
use crate::imaging::domain::image_reader::{ImageReader, SourceImage};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
/// Offset of the IHDR color-type byte in a PNG file.
const PNG_COLOR_TYPE_OFFSET: usize = 25;
const PNG_COLOR_TYPE_PALETTE: u8 = 3;
/// Offset of the DIB header size in a BMP file.
const BMP_DIB_SIZE_OFFSET: usize = 14;
const BMP_CORE_HEADER_SIZE: u32 = 12;

/// Decodes image files with the `image` crate.
///
/// The file is read fully into memory and released before decoding, so no
/// handle outlives the call. Palette-based PNG and BMP files are reported as
/// [`ColorMode::Indexed`] even though the decoder expands them to RGB(A).
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<SourceImage, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        let image = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .decode()?;

        let mode = if is_indexed(&bytes) {
            ColorMode::Indexed
        } else {
            ColorMode::from_color_type(image.color())
        };
        Ok(SourceImage { image, mode })
    }
}

/// Sniffs the file header for a palette-based pixel format.
fn is_indexed(bytes: &[u8]) -> bool {
    if bytes.starts_with(PNG_SIGNATURE) {
        return bytes.get(PNG_COLOR_TYPE_OFFSET) == Some(&PNG_COLOR_TYPE_PALETTE);
    }
    if bytes.starts_with(b"BM") {
        let Some(dib_size) = read_u32_le(bytes, BMP_DIB_SIZE_OFFSET) else {
            return false;
        };
        // OS/2 core headers store 16-bit dimensions, shifting the bit count.
        let bit_count_offset = if dib_size == BMP_CORE_HEADER_SIZE { 24 } else { 28 };
        return read_u16_le(bytes, bit_count_offset).is_some_and(|bits| bits > 0 && bits <= 8);
    }
    false
}

fn read_u16_le(bytes: &[u8], offset: usize) -> Option<u16> {
    let raw = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([raw[0], raw[1]]))
}

fn read_u32_le(bytes: &[u8], offset: usize) -> Option<u32> {
    let raw = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
