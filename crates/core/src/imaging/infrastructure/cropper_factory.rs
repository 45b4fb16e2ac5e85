use crate::detection::domain::face_detector::FaceDetector;
use crate::imaging::domain::center_cropper::CenterCropper;
use crate::imaging::domain::cropper::Cropper;
use crate::imaging::domain::face_centered_cropper::FaceCenteredCropper;
use crate::shared::crop_target::CropMode;

/// Creates the cropper for a batch's crop mode.
///
/// Face-centered mode needs a detector; a detector passed in geometric mode
/// is dropped unused.
pub fn create_cropper(
    mode: CropMode,
    detector: Option<Box<dyn FaceDetector>>,
) -> Result<Box<dyn Cropper>, Box<dyn std::error::Error>> {
    match (mode, detector) {
        (CropMode::Geometric, _) => {
            log::info!("Using geometric center crop");
            Ok(Box::new(CenterCropper::new()))
        }
        (CropMode::FaceCentered, Some(detector)) => {
            log::info!("Using face-centered crop");
            Ok(Box::new(FaceCenteredCropper::new(detector)))
        }
        (CropMode::FaceCentered, None) => {
            Err("Face-centered cropping requires a face detector".into())
        }
    }
}
