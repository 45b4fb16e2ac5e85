use crate::imaging::domain::cropper::{Crop, Cropper, Placement};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Crop box for a resized image whose shorter side is `target`.
///
/// Landscape images are cropped horizontally centered. Portrait and square
/// images are anchored at the top-left corner, not centered vertically.
/// The box is clamped to the image for inputs smaller than `target`.
pub fn center_crop_box(width: u32, height: u32, target: u32) -> BoundingBox {
    let bbox = if width > height {
        let left = width.saturating_sub(target) / 2;
        BoundingBox::new(left, 0, left + target, target)
    } else {
        BoundingBox::new(0, 0, target, target)
    };
    bbox.clamp_to(width, height)
}

/// Geometric cropper: placement depends on image dimensions only.
#[derive(Clone, Copy, Debug, Default)]
pub struct CenterCropper;

impl CenterCropper {
    pub fn new() -> Self {
        Self
    }

    /// Infallible form of [`Cropper::crop`], also used as the face fallback.
    pub fn crop_frame(&self, resized: &Frame, target_size: u32) -> Crop {
        let bbox = center_crop_box(resized.width(), resized.height(), target_size);
        Crop {
            frame: resized.crop(&bbox),
            bbox,
            placement: Placement::Center,
        }
    }
}

impl Cropper for CenterCropper {
    fn crop(
        &mut self,
        resized: &Frame,
        target_size: u32,
    ) -> Result<Crop, Box<dyn std::error::Error>> {
        Ok(self.crop_frame(resized, target_size))
    }
}
