use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dataset::directory_materializer::{materialize, MaterializeError};
use crate::dataset::discovery::discover_images;
use crate::dataset::domain::file_copier::FileCopier;
use crate::dataset::label_copier::copy_labels;
use crate::imaging::domain::cropper::{Cropper, Placement};
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::crop_image_use_case::{CropImageUseCase, JobError};
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::crop_target::{CropMode, CropTarget};

/// Everything a batch run needs to know up front.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub source_dir: PathBuf,
    pub target: CropTarget,
    pub mode: CropMode,
    pub skip_labels: bool,
}

impl BatchConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.mode.output_dir(&self.source_dir)
    }
}

/// Errors that stop a batch before any image is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("failed to list images in {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

/// An image the batch skipped, and why.
#[derive(Debug)]
pub struct JobFailure {
    pub source: PathBuf,
    pub error: JobError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub total: usize,
    pub written: usize,
    /// Face-mode images with no detected face that got a center crop.
    pub fallbacks: usize,
    pub labels_copied: usize,
    pub failures: Vec<JobFailure>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Crops every image of a source folder into a freshly created output folder.
///
/// Order of work: discover images, recreate the output directory, copy
/// labels, then crop each image in path order. Setup errors abort the run.
/// A failing image is recorded in the report and the batch moves on.
pub struct CropDatasetUseCase {
    config: BatchConfig,
    job: CropImageUseCase,
    copier: Box<dyn FileCopier>,
    logger: Box<dyn PipelineLogger>,
}

impl CropDatasetUseCase {
    pub fn new(
        config: BatchConfig,
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        cropper: Box<dyn Cropper>,
        copier: Box<dyn FileCopier>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        let job = CropImageUseCase::new(reader, writer, cropper, config.target);
        Self {
            config,
            job,
            copier,
            logger,
        }
    }

    pub fn execute(&mut self) -> Result<BatchReport, BatchError> {
        let source_dir = self.config.source_dir.clone();
        let output_dir = self.config.output_dir();

        let images = discover_images(&source_dir).map_err(|e| BatchError::Discovery {
            path: source_dir.clone(),
            source: e,
        })?;

        materialize(&output_dir)?;

        let labels_copied = if self.config.skip_labels {
            log::info!("Skipping label files");
            0
        } else {
            copy_labels(&source_dir, &output_dir, self.copier.as_ref())?.len()
        };

        let total = images.len();
        self.logger.info(&format!(
            "Cropping {total} image(s) to {size}x{size} {format}",
            size = self.config.target.size(),
            format = self.config.target.format(),
        ));

        let mut report = BatchReport {
            output_dir: output_dir.clone(),
            total,
            labels_copied,
            ..Default::default()
        };

        for (i, source) in images.iter().enumerate() {
            match self.job.execute(source, &output_dir, self.logger.as_mut()) {
                Ok(outcome) => {
                    report.written += 1;
                    if outcome.placement == Placement::NoFaceFallback {
                        report.fallbacks += 1;
                    }
                }
                Err(error) => {
                    self.logger.failure(source, &error.to_string());
                    report.failures.push(JobFailure {
                        source: source.clone(),
                        error,
                    });
                }
            }
            self.logger.progress(i + 1, total);
        }

        if report.fallbacks > 0 {
            self.logger.info(&format!(
                "{} image(s) had no detectable face and were center-cropped",
                report.fallbacks
            ));
        }
        self.logger.summary(report.written, report.failures.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};

    use image::{DynamicImage, RgbImage};

    use crate::dataset::infrastructure::fs_file_copier::FsFileCopier;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::imaging::domain::center_cropper::CenterCropper;
    use crate::imaging::domain::color_mode::ColorMode;
    use crate::imaging::domain::face_centered_cropper::FaceCenteredCropper;
    use crate::imaging::domain::image_reader::SourceImage;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::crop_target::OutputFormat;
    use crate::shared::frame::Frame;

    // --- Stubs ---

    /// Decodes any file whose content is not `broken`.
    struct StubReader;

    impl ImageReader for StubReader {
        fn read(&self, path: &Path) -> Result<SourceImage, Box<dyn std::error::Error>> {
            if fs::read(path)? == b"broken" {
                return Err("unsupported image".into());
            }
            Ok(SourceImage {
                image: DynamicImage::ImageRgb8(RgbImage::new(60, 30)),
                mode: ColorMode::Rgb,
            })
        }
    }

    /// Writes a marker file so tests can see what landed on disk.
    struct MarkerWriter;

    impl ImageWriter for MarkerWriter {
        fn write(
            &self,
            path: &Path,
            frame: &Frame,
            _format: OutputFormat,
        ) -> Result<(), Box<dyn std::error::Error>> {
            fs::write(path, format!("{}x{}", frame.width(), frame.height()))?;
            Ok(())
        }
    }

    struct NoFaces;

    impl FaceDetector for NoFaces {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
            Ok(vec![])
        }
    }

    #[derive(Clone, Default)]
    struct RecordingLogger {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingLogger {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PipelineLogger for RecordingLogger {
        fn progress(&mut self, current: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("progress {current}/{total}"));
        }
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn failure(&mut self, source: &Path, _error: &str) {
            let name = source.file_name().unwrap().to_string_lossy().into_owned();
            self.events.lock().unwrap().push(format!("failure {name}"));
        }
        fn info(&mut self, _message: &str) {}
        fn summary(&self, written: usize, failed: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("summary {written}/{failed}"));
        }
    }

    // --- Helpers ---

    fn source_dir(root: &Path) -> PathBuf {
        let dir = root.join("photos");
        fs::create_dir(&dir).unwrap();
        dir
    }

    fn config(source_dir: &Path, mode: CropMode, skip_labels: bool) -> BatchConfig {
        BatchConfig {
            source_dir: source_dir.to_path_buf(),
            target: CropTarget::new(16, OutputFormat::Png).unwrap(),
            mode,
            skip_labels,
        }
    }

    fn use_case(
        config: BatchConfig,
        cropper: Box<dyn Cropper>,
        logger: RecordingLogger,
    ) -> CropDatasetUseCase {
        CropDatasetUseCase::new(
            config,
            Box::new(StubReader),
            Box::new(MarkerWriter),
            cropper,
            Box::new(FsFileCopier::new()),
            Box::new(logger),
        )
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    // --- Tests ---

    #[test]
    fn test_crops_images_and_copies_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        fs::write(src.join("a.jpg"), b"img").unwrap();
        fs::write(src.join("b.webp"), b"img").unwrap();
        fs::write(src.join("a.txt"), b"label").unwrap();
        fs::write(src.join("readme.md"), b"ignored").unwrap();

        let mut uc = use_case(
            config(&src, CropMode::Geometric, false),
            Box::new(CenterCropper::new()),
            RecordingLogger::default(),
        );
        let report = uc.execute().unwrap();

        let out = tmp.path().join("photos_cleaned");
        assert_eq!(report.output_dir, out);
        assert_eq!(report.total, 2);
        assert_eq!(report.written, 2);
        assert_eq!(report.labels_copied, 1);
        assert!(!report.has_failures());
        assert_eq!(listing(&out), ["a.png", "a.txt", "b.png"]);
        assert_eq!(fs::read_to_string(out.join("a.png")).unwrap(), "16x16");
    }

    #[test]
    fn test_skip_labels() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        fs::write(src.join("a.jpg"), b"img").unwrap();
        fs::write(src.join("a.txt"), b"label").unwrap();

        let mut uc = use_case(
            config(&src, CropMode::Geometric, true),
            Box::new(CenterCropper::new()),
            RecordingLogger::default(),
        );
        let report = uc.execute().unwrap();

        assert_eq!(report.labels_copied, 0);
        assert_eq!(listing(&report.output_dir), ["a.png"]);
    }

    #[test]
    fn test_failed_image_does_not_stop_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        fs::write(src.join("a.png"), b"img").unwrap();
        fs::write(src.join("b.png"), b"broken").unwrap();
        fs::write(src.join("c.png"), b"img").unwrap();
        let logger = RecordingLogger::default();

        let mut uc = use_case(
            config(&src, CropMode::Geometric, false),
            Box::new(CenterCropper::new()),
            logger.clone(),
        );
        let report = uc.execute().unwrap();

        assert_eq!(report.written, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, src.join("b.png"));
        assert!(matches!(report.failures[0].error, JobError::Decode(_)));
        assert_eq!(listing(&report.output_dir), ["a.png", "c.png"]);
        assert_eq!(
            logger.events(),
            [
                "progress 1/3",
                "failure b.png",
                "progress 2/3",
                "progress 3/3",
                "summary 2/1",
            ]
        );
    }

    #[test]
    fn test_recreates_output_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        fs::write(src.join("a.png"), b"img").unwrap();
        let out = tmp.path().join("photos_cleaned");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("stale.png"), b"old run").unwrap();

        let mut uc = use_case(
            config(&src, CropMode::Geometric, false),
            Box::new(CenterCropper::new()),
            RecordingLogger::default(),
        );
        uc.execute().unwrap();

        assert_eq!(listing(&out), ["a.png"]);
    }

    #[test]
    fn test_face_mode_uses_face_output_dir_and_counts_fallbacks() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        fs::write(src.join("a.png"), b"img").unwrap();

        let mut uc = use_case(
            config(&src, CropMode::FaceCentered, false),
            Box::new(FaceCenteredCropper::new(Box::new(NoFaces))),
            RecordingLogger::default(),
        );
        let report = uc.execute().unwrap();

        assert_eq!(
            report.output_dir,
            tmp.path().join("photos_cleaned_facial_recognition")
        );
        assert_eq!(report.written, 1);
        assert_eq!(report.fallbacks, 1);
    }

    #[test]
    fn test_empty_source_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let src = source_dir(tmp.path());
        let logger = RecordingLogger::default();

        let mut uc = use_case(
            config(&src, CropMode::Geometric, false),
            Box::new(CenterCropper::new()),
            logger.clone(),
        );
        let report = uc.execute().unwrap();

        assert_eq!(report.total, 0);
        assert!(report.output_dir.is_dir());
        assert_eq!(logger.events(), ["summary 0/0"]);
    }

    #[test]
    fn test_missing_source_is_discovery_error_and_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("absent");

        let mut uc = use_case(
            config(&src, CropMode::Geometric, false),
            Box::new(CenterCropper::new()),
            RecordingLogger::default(),
        );
        let err = uc.execute().unwrap_err();

        assert!(matches!(err, BatchError::Discovery { .. }));
        assert!(!tmp.path().join("absent_cleaned").exists());
    }

    #[test]
    fn test_config_output_dir_follows_mode() {
        let source = Path::new("/data/photos/");
        assert_eq!(
            config(source, CropMode::Geometric, false).output_dir(),
            PathBuf::from("/data/photos_cleaned")
        );
        assert_eq!(
            config(source, CropMode::FaceCentered, false).output_dir(),
            PathBuf::from("/data/photos_cleaned_facial_recognition")
        );
    }
}
