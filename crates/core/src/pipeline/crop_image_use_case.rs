use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::imaging::domain::color_mode::normalize;
use crate::imaging::domain::cropper::{Cropper, Placement};
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::imaging::domain::resizer::{resize_to_short_side, ResizeError};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::crop_target::CropTarget;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("no usable file name in {0}")]
    InvalidFileName(PathBuf),
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to resize image: {0}")]
    Resize(#[from] ResizeError),
    #[error("face detection failed: {0}")]
    Detection(String),
    #[error("failed to write {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

/// What a successful job produced.
#[derive(Clone, Debug, PartialEq)]
pub struct CropOutcome {
    pub output: PathBuf,
    pub placement: Placement,
}

/// Single-image pipeline: read → normalize → resize → crop → write.
pub struct CropImageUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    cropper: Box<dyn Cropper>,
    target: CropTarget,
}

impl CropImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        cropper: Box<dyn Cropper>,
        target: CropTarget,
    ) -> Self {
        Self {
            reader,
            writer,
            cropper,
            target,
        }
    }

    /// Crops `source` into `output_dir`, reporting stage timings to `logger`.
    pub fn execute(
        &mut self,
        source: &Path,
        output_dir: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<CropOutcome, JobError> {
        let file_name = self
            .target
            .output_file_name(source)
            .ok_or_else(|| JobError::InvalidFileName(source.to_path_buf()))?;
        let output = output_dir.join(file_name);
        let format = self.target.format();
        let size = self.target.size();

        let started = Instant::now();
        let decoded = self
            .reader
            .read(source)
            .map_err(|e| JobError::Decode(e.to_string()))?;
        let frame = Frame::from_dynamic_image(&decoded.image, normalize(decoded.mode, format));
        drop(decoded);
        logger.timing("decode", elapsed_ms(started));

        let started = Instant::now();
        let resized = resize_to_short_side(&frame, size)?;
        logger.timing("resize", elapsed_ms(started));

        let started = Instant::now();
        let crop = self
            .cropper
            .crop(&resized, size)
            .map_err(|e| JobError::Detection(e.to_string()))?;
        logger.timing("crop", elapsed_ms(started));

        if crop.placement == Placement::NoFaceFallback {
            log::debug!("No face in {}, used center crop", source.display());
        }

        let started = Instant::now();
        self.writer
            .write(&output, &crop.frame, format)
            .map_err(|e| JobError::Encode {
                path: output.clone(),
                message: e.to_string(),
            })?;
        logger.timing("encode", elapsed_ms(started));

        Ok(CropOutcome {
            output,
            placement: crop.placement,
        })
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
