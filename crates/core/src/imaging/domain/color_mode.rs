use crate::shared::crop_target::OutputFormat;
use crate::shared::frame::CanonicalMode;

/// Pixel format of an image as stored in its source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Palette-based (PNG color type 3, BMP with 8 bits or fewer per pixel).
    Indexed,
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn from_color_type(color: image::ColorType) -> Self {
        use image::ColorType;
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::Gray,
            ColorType::La8 | ColorType::La16 => ColorMode::GrayAlpha,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            _ => ColorMode::Rgb,
        }
    }
}

/// Maps a source color mode to the layout every later stage works in.
///
/// Palette and alpha-bearing modes become `Rgba` when the output keeps
/// transparency; everything is flattened to `Rgb` otherwise.
pub fn normalize(mode: ColorMode, format: OutputFormat) -> CanonicalMode {
    if !format.supports_alpha() {
        return CanonicalMode::Rgb;
    }
    match mode {
        ColorMode::Indexed | ColorMode::GrayAlpha | ColorMode::Rgba => CanonicalMode::Rgba,
        ColorMode::Gray | ColorMode::Rgb => CanonicalMode::Rgb,
    }
}
