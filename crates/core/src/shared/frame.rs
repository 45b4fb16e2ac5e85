use image::DynamicImage;
use ndarray::ArrayView3;

use crate::shared::bounding_box::BoundingBox;

/// Pixel layout a decoded image is held in once its color mode is normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanonicalMode {
    Rgb,
    Rgba,
}

impl CanonicalMode {
    pub fn channels(self) -> usize {
        match self {
            CanonicalMode::Rgb => 3,
            CanonicalMode::Rgba => 4,
        }
    }
}

/// A single decoded image: contiguous RGB or RGBA bytes in row-major order.
///
/// Codec conversion happens at I/O boundaries only; the domain layer
/// works on raw rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    mode: CanonicalMode,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, mode: CanonicalMode) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * mode.channels(),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            mode,
        }
    }

    /// Converts a decoded image into the given canonical layout.
    ///
    /// Converting to `Rgb` drops any alpha channel without compositing.
    pub fn from_dynamic_image(image: &DynamicImage, mode: CanonicalMode) -> Self {
        let (width, height) = (image.width(), image.height());
        let data = match mode {
            CanonicalMode::Rgb => image.to_rgb8().into_raw(),
            CanonicalMode::Rgba => image.to_rgba8().into_raw(),
        };
        Self::new(data, width, height, mode)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mode(&self) -> CanonicalMode {
        self.mode
    }

    pub fn channels(&self) -> usize {
        self.mode.channels()
    }

    /// Copies the pixels inside `bbox` into a new frame.
    ///
    /// The box must lie within the frame.
    pub fn crop(&self, bbox: &BoundingBox) -> Frame {
        debug_assert!(
            bbox.is_within(self.width, self.height),
            "crop box {bbox:?} exceeds {}x{}",
            self.width,
            self.height
        );
        let channels = self.channels();
        let stride = self.width as usize * channels;
        let (left, right) = (bbox.left as usize, bbox.right as usize);

        let mut data = Vec::with_capacity(bbox.width() as usize * bbox.height() as usize * channels);
        for row in bbox.top as usize..bbox.bottom as usize {
            let row_start = row * stride;
            data.extend_from_slice(&self.data[row_start + left * channels..row_start + right * channels]);
        }
        Frame::new(data, bbox.width(), bbox.height(), self.mode)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels(),
        )
    }
}
