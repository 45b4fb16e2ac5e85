use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// How a crop box was placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Geometric rule from image dimensions only.
    Center,
    /// Centered on the first detected face.
    Face(BoundingBox),
    /// Face mode found no face and used the geometric rule.
    NoFaceFallback,
}

/// Result of cropping one resized image.
#[derive(Clone, Debug, PartialEq)]
pub struct Crop {
    pub frame: Frame,
    pub bbox: BoundingBox,
    pub placement: Placement,
}

/// Domain interface for turning a resized image into a square crop.
///
/// Implementations may call stateful collaborators (face detectors),
/// hence `&mut self`.
pub trait Cropper: Send {
    fn crop(&mut self, resized: &Frame, target_size: u32)
        -> Result<Crop, Box<dyn std::error::Error>>;
}
