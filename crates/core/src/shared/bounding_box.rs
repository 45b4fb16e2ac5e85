/// Axis-aligned box in the pixel space of one specific image.
///
/// Edges are half-open: `left..right` columns and `top..bottom` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a box from the `(top, right, bottom, left)` ordering used by
    /// dlib-style detectors.
    pub fn from_trbl(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self::new(left, top, right, bottom)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Integer centroid, rounding toward the top-left.
    pub fn center(&self) -> (u32, u32) {
        (
            (self.left + self.right) / 2,
            (self.top + self.bottom) / 2,
        )
    }

    /// True when the box is non-empty and fits inside a `width` × `height` image.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    /// Intersects the box with the image rectangle `[0, width) × [0, height)`.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        Self::new(
            self.left.min(width),
            self.top.min(height),
            self.right.min(width),
            self.bottom.min(height),
        )
    }
}
