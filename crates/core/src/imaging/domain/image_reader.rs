use std::path::Path;

use image::DynamicImage;

use crate::imaging::domain::color_mode::ColorMode;

/// A decoded source image together with the color mode it was stored in.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub image: DynamicImage,
    pub mode: ColorMode,
}

/// Decodes a single image file.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<SourceImage, Box<dyn std::error::Error>>;
}
