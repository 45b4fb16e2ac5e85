use crate::detection::domain::face_detector::FaceDetector;
use crate::imaging::domain::center_cropper::CenterCropper;
use crate::imaging::domain::cropper::{Crop, Cropper, Placement};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Square crop box of side `target` centered on `face`, kept inside a
/// `width` × `height` image.
///
/// A box that would overflow the right or bottom edge is shifted back so it
/// ends on that edge; it only shrinks below `target` when the image itself
/// is smaller.
pub fn face_crop_box(face: &BoundingBox, target: u32, width: u32, height: u32) -> BoundingBox {
    let (cx, cy) = face.center();
    let (left, right) = place_span(cx, target, width);
    let (top, bottom) = place_span(cy, target, height);
    BoundingBox::new(left, top, right, bottom)
}

fn place_span(center: u32, target: u32, extent: u32) -> (u32, u32) {
    let start = center.saturating_sub(target / 2);
    let end = start.saturating_add(target);
    if end > extent {
        (extent.saturating_sub(target), extent)
    } else {
        (start, end)
    }
}

/// Crops around the first face the detector reports.
///
/// Falls back to [`CenterCropper`] on the same resized frame when no face is
/// found. The "first" face follows the detector's own ordering, which is not
/// guaranteed stable across detector backends or model versions.
pub struct FaceCenteredCropper {
    detector: Box<dyn FaceDetector>,
    fallback: CenterCropper,
}

impl FaceCenteredCropper {
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            fallback: CenterCropper::new(),
        }
    }
}

impl Cropper for FaceCenteredCropper {
    fn crop(
        &mut self,
        resized: &Frame,
        target_size: u32,
    ) -> Result<Crop, Box<dyn std::error::Error>> {
        let faces = self.detector.detect(resized)?;

        let Some(face) = faces.first() else {
            log::debug!("No face detected, using center crop");
            let crop = self.fallback.crop_frame(resized, target_size);
            return Ok(Crop {
                placement: Placement::NoFaceFallback,
                ..crop
            });
        };

        if faces.len() > 1 {
            log::debug!("{} faces detected, cropping around the first", faces.len());
        }

        let bbox = face_crop_box(face, target_size, resized.width(), resized.height());
        Ok(Crop {
            frame: resized.crop(&bbox),
            bbox,
            placement: Placement::Face(*face),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::CanonicalMode;
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    struct StubDetector {
        faces: Vec<BoundingBox>,
        seen: Arc<Mutex<Vec<(u32, u32)>>>,
    }

    impl StubDetector {
        fn new(faces: Vec<BoundingBox>) -> Self {
            Self {
                faces,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            frame: &Frame,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            self.seen
                .lock()
                .unwrap()
                .push((frame.width(), frame.height()));
            Ok(self.faces.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Err("model exploded".into())
        }
    }

    // --- Helpers ---

    fn make_frame(w: u32, h: u32) -> Frame {
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 0, 255]);
            }
        }
        Frame::new(data, w, h, CanonicalMode::Rgba)
    }

    fn face_at(cx: u32, cy: u32) -> BoundingBox {
        BoundingBox::new(cx.saturating_sub(10), cy.saturating_sub(10), cx + 10, cy + 10)
    }

    // --- Crop box geometry ---

    #[test]
    fn test_box_centered_on_face() {
        let bbox = face_crop_box(&BoundingBox::new(180, 180, 220, 220), 100, 400, 400);
        assert_eq!(bbox, BoundingBox::new(150, 150, 250, 250));
    }

    #[test]
    fn test_box_clamped_at_top_left() {
        let bbox = face_crop_box(&BoundingBox::new(0, 0, 20, 20), 100, 400, 400);
        assert_eq!(bbox, BoundingBox::new(0, 0, 100, 100));
    }

    #[test]
    fn test_box_shifted_back_from_bottom_right() {
        let bbox = face_crop_box(&BoundingBox::new(380, 380, 400, 400), 100, 400, 400);
        assert_eq!(bbox, BoundingBox::new(300, 300, 400, 400));
    }

    #[test]
    fn test_box_shrinks_only_when_image_is_smaller() {
        let bbox = face_crop_box(&BoundingBox::new(10, 10, 30, 30), 100, 60, 400);
        assert_eq!(bbox, BoundingBox::new(0, 0, 60, 100));
    }

    #[rstest]
    fn test_box_never_exceeds_bounds(
        #[values(0, 1, 49, 256, 462, 511, 767, 1023)] cx: u32,
        #[values(0, 3, 255, 509, 511)] cy: u32,
    ) {
        let (w, h) = (1024, 512);
        let bbox = face_crop_box(&face_at(cx, cy), 512, w, h);
        assert!(bbox.is_within(w, h), "{bbox:?} escapes {w}x{h}");
        assert_eq!(bbox.width(), 512);
        assert_eq!(bbox.height(), 512);
    }

    // --- Cropper ---

    #[test]
    fn test_no_face_matches_center_cropper() {
        let frame = make_frame(300, 100);
        let mut cropper = FaceCenteredCropper::new(Box::new(StubDetector::new(vec![])));

        let crop = cropper.crop(&frame, 100).unwrap();
        let expected = CenterCropper::new().crop_frame(&frame, 100);

        assert_eq!(crop.placement, Placement::NoFaceFallback);
        assert_eq!(crop.bbox, expected.bbox);
        assert_eq!(crop.frame, expected.frame);
    }

    #[test]
    fn test_detector_sees_resized_frame() {
        let detector = StubDetector::new(vec![]);
        let seen = detector.seen.clone();
        let mut cropper = FaceCenteredCropper::new(Box::new(detector));

        cropper.crop(&make_frame(150, 100), 100).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![(150, 100)]);
    }

    #[test]
    fn test_crops_around_first_face_only() {
        let first = BoundingBox::new(200, 40, 240, 80);
        let second = BoundingBox::new(10, 10, 30, 30);
        let mut cropper =
            FaceCenteredCropper::new(Box::new(StubDetector::new(vec![first, second])));

        let crop = cropper.crop(&make_frame(300, 120), 100).unwrap();

        assert_eq!(crop.placement, Placement::Face(first));
        assert_eq!(crop.bbox, BoundingBox::new(170, 10, 270, 110));
        assert_eq!((crop.frame.width(), crop.frame.height()), (100, 100));
        // Red channel of the first cropped pixel encodes column 170.
        assert_eq!(crop.frame.data()[0], 170);
    }

    #[test]
    fn test_detector_error_propagates() {
        let mut cropper = FaceCenteredCropper::new(Box::new(FailingDetector));
        let err = cropper.crop(&make_frame(100, 100), 50).unwrap_err();
        assert!(err.to_string().contains("model exploded"));
    }
}
