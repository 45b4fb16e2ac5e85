use std::path::Path;

use crate::shared::crop_target::OutputFormat;
use crate::shared::frame::Frame;

/// Encodes a single frame to an image file.
pub trait ImageWriter: Send {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        format: OutputFormat,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
