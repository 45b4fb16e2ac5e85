use image::imageops::{self, FilterType};
use thiserror::Error;

use crate::shared::frame::{CanonicalMode, Frame};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResizeError {
    #[error("cannot resize an image with zero dimensions ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("target size must be positive")]
    ZeroTarget,
    #[error("resized image would be too large ({width}x{height})")]
    TooLarge { width: u64, height: u64 },
}

/// Dimensions after scaling the shorter side to `target`.
///
/// The longer side scales by the same factor and is rounded down.
/// Square images count as portrait.
pub fn scaled_dimensions(width: u32, height: u32, target: u32) -> Result<(u32, u32), ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::ZeroDimension { width, height });
    }
    if target == 0 {
        return Err(ResizeError::ZeroTarget);
    }
    let scale = |long: u32, short: u32| u64::from(target) * u64::from(long) / u64::from(short);
    let (new_width, new_height) = if width > height {
        (scale(width, height), u64::from(target))
    } else {
        (u64::from(target), scale(height, width))
    };
    match (u32::try_from(new_width), u32::try_from(new_height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ResizeError::TooLarge {
            width: new_width,
            height: new_height,
        }),
    }
}

/// Resizes `frame` so its shorter side equals `target`, using Lanczos3.
pub fn resize_to_short_side(frame: &Frame, target: u32) -> Result<Frame, ResizeError> {
    let (new_width, new_height) = scaled_dimensions(frame.width(), frame.height(), target)?;
    if (new_width, new_height) == (frame.width(), frame.height()) {
        return Ok(frame.clone());
    }

    let data = match frame.mode() {
        CanonicalMode::Rgb => {
            let src = image::ImageBuffer::<image::Rgb<u8>, &[u8]>::from_raw(
                frame.width(),
                frame.height(),
                frame.data(),
            )
            .ok_or(ResizeError::ZeroDimension {
                width: frame.width(),
                height: frame.height(),
            })?;
            imageops::resize(&src, new_width, new_height, FilterType::Lanczos3).into_raw()
        }
        CanonicalMode::Rgba => {
            let src = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
                frame.width(),
                frame.height(),
                frame.data(),
            )
            .ok_or(ResizeError::ZeroDimension {
                width: frame.width(),
                height: frame.height(),
            })?;
            imageops::resize(&src, new_width, new_height, FilterType::Lanczos3).into_raw()
        }
    };

    Ok(Frame::new(data, new_width, new_height, frame.mode()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn make_frame(w: u32, h: u32, mode: CanonicalMode) -> Frame {
        Frame::new(vec![128; (w * h) as usize * mode.channels()], w, h, mode)
    }

    #[rstest]
    #[case::landscape(1000, 500, 512, (1024, 512))]
    #[case::landscape_rounds_down(640, 480, 512, (682, 512))]
    #[case::portrait(500, 1000, 512, (512, 1024))]
    #[case::portrait_rounds_down(480, 640, 512, (512, 682))]
    #[case::square(300, 300, 512, (512, 512))]
    #[case::downscale(2000, 1000, 100, (200, 100))]
    fn test_scaled_dimensions(
        #[case] w: u32,
        #[case] h: u32,
        #[case] target: u32,
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(scaled_dimensions(w, h, target).unwrap(), expected);
    }

    #[rstest]
    #[case::landscape(1000, 333)]
    #[case::wide(1920, 1080)]
    #[case::slightly_wide(513, 512)]
    fn test_landscape_height_equals_target(#[case] w: u32, #[case] h: u32) {
        let (nw, nh) = scaled_dimensions(w, h, 256).unwrap();
        assert_eq!(nh, 256);
        assert_eq!(nw, (256 * w as u64 / h as u64) as u32);
    }

    #[rstest]
    #[case::portrait(333, 1000)]
    #[case::tall(1080, 1920)]
    #[case::square(512, 512)]
    fn test_portrait_width_equals_target(#[case] w: u32, #[case] h: u32) {
        let (nw, _) = scaled_dimensions(w, h, 256).unwrap();
        assert_eq!(nw, 256);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            scaled_dimensions(0, 10, 512),
            Err(ResizeError::ZeroDimension {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_zero_target_rejected() {
        assert_eq!(scaled_dimensions(10, 10, 0), Err(ResizeError::ZeroTarget));
    }

    #[rstest]
    #[case::tall(1, 10_000_000, 512, 512, 5_120_000_000)]
    #[case::wide(10_000_000, 1, 512, 5_120_000_000, 512)]
    fn test_oversized_result_rejected(
        #[case] w: u32,
        #[case] h: u32,
        #[case] target: u32,
        #[case] width: u64,
        #[case] height: u64,
    ) {
        assert_eq!(
            scaled_dimensions(w, h, target),
            Err(ResizeError::TooLarge { width, height })
        );
    }

    #[test]
    fn test_largest_representable_side_accepted() {
        assert_eq!(scaled_dimensions(1, u32::MAX, 1), Ok((1, u32::MAX)));
    }

    #[test]
    fn test_resize_rgb_frame() {
        let frame = make_frame(100, 50, CanonicalMode::Rgb);
        let resized = resize_to_short_side(&frame, 32).unwrap();
        assert_eq!((resized.width(), resized.height()), (64, 32));
        assert_eq!(resized.mode(), CanonicalMode::Rgb);
        assert_eq!(resized.data().len(), 64 * 32 * 3);
    }

    #[test]
    fn test_resize_keeps_alpha_channel() {
        let frame = make_frame(40, 80, CanonicalMode::Rgba);
        let resized = resize_to_short_side(&frame, 20).unwrap();
        assert_eq!((resized.width(), resized.height()), (20, 40));
        assert_eq!(resized.mode(), CanonicalMode::Rgba);
    }

    #[test]
    fn test_resize_uniform_color_is_preserved() {
        let frame = make_frame(30, 60, CanonicalMode::Rgb);
        let resized = resize_to_short_side(&frame, 90).unwrap();
        assert!(resized.data().iter().all(|&v| v == 128));
    }

    #[test]
    fn test_already_sized_frame_is_unchanged() {
        let frame = make_frame(64, 100, CanonicalMode::Rgb);
        let resized = resize_to_short_side(&frame, 64).unwrap();
        assert_eq!(resized, frame);
    }
}
