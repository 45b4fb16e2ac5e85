use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;

use squarecrop_core::dataset::infrastructure::fs_file_copier::FsFileCopier;
use squarecrop_core::detection::domain::face_detector::FaceDetector;
use squarecrop_core::detection::infrastructure::command_face_detector::CommandFaceDetector;
use squarecrop_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use squarecrop_core::imaging::infrastructure::cropper_factory::create_cropper;
use squarecrop_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use squarecrop_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use squarecrop_core::pipeline::crop_dataset_use_case::{
    BatchConfig, BatchReport, CropDatasetUseCase,
};
use squarecrop_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use squarecrop_core::shared::constants::{
    DEFAULT_CROP_SIZE, DEFAULT_DETECTOR_COMMAND, DEFAULT_JPEG_QUALITY, YOLO_MODEL_NAME,
    YOLO_MODEL_URL,
};
use squarecrop_core::shared::crop_target::{CropMode, CropTarget, OutputFormat};
use squarecrop_core::shared::model_resolver::{self, ModelLocations, ModelSource};

/// Exit code for a run that finished but could not process every image.
const EXIT_PARTIAL_FAILURE: i32 = 2;

/// Resize and square-crop every image in a folder for training datasets.
#[derive(Parser, Debug)]
#[command(name = "squarecrop")]
struct Cli {
    /// Input folder containing images (jpg, jpeg, png, webp, bmp) and .txt labels.
    input: PathBuf,

    /// Side length of the square output images, in pixels.
    #[arg(long, default_value_t = DEFAULT_CROP_SIZE)]
    crop_size: u32,

    /// Output image format: png, jpg or jpeg.
    #[arg(long, default_value = "png")]
    format: OutputFormat,

    /// Do not copy .txt label files to the output folder.
    #[arg(long)]
    skip_labels: bool,

    /// Center each crop on the first detected face instead of the image.
    #[arg(long)]
    facial_recognition: bool,

    /// Face detector backend for --facial-recognition: onnx or command.
    #[arg(long, default_value = "onnx")]
    detector: String,

    /// Face detection confidence threshold for the onnx detector (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// External detector for --detector command. Receives an image path as its
    /// last argument and prints `path,top,right,bottom,left` per face.
    #[arg(long, default_value = DEFAULT_DETECTOR_COMMAND)]
    detector_command: String,

    /// JPEG quality (1-100) for jpg/jpeg output.
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,

    /// Use this ONNX face model instead of the cached or downloaded one.
    #[arg(long)]
    model: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(report) if report.has_failures() => process::exit(EXIT_PARTIAL_FAILURE),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run() -> Result<BatchReport, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let started = Instant::now();
    let mode = if cli.facial_recognition {
        CropMode::FaceCentered
    } else {
        CropMode::Geometric
    };
    let detector = match mode {
        CropMode::FaceCentered => Some(build_detector(&cli)?),
        CropMode::Geometric => None,
    };
    let config = BatchConfig {
        source_dir: cli.input.clone(),
        target: CropTarget::new(cli.crop_size, cli.format)?,
        mode,
        skip_labels: cli.skip_labels,
    };

    let mut use_case = CropDatasetUseCase::new(
        config,
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new().with_jpeg_quality(cli.jpeg_quality)),
        create_cropper(mode, detector)?,
        Box::new(FsFileCopier::new()),
        Box::new(StdoutPipelineLogger::default()),
    );
    let report = use_case.execute()?;

    for failure in &report.failures {
        eprintln!("Failed: {}: {}", failure.source.display(), failure.error);
    }
    println!(
        "Done in {:.2}s: {} of {} image(s) written to {}",
        started.elapsed().as_secs_f64(),
        report.written,
        report.total,
        report.output_dir.display()
    );
    Ok(report)
}

fn build_detector(cli: &Cli) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if cli.detector == "command" {
        let (program, args) = command_parts(&cli.detector_command)
            .ok_or("--detector-command must name a program")?;
        log::info!("Using external face detector: {}", cli.detector_command);
        return Ok(Box::new(CommandFaceDetector::new(program).with_args(args)));
    }

    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let locations = ModelLocations {
        override_path: cli.model.clone(),
        cache_dir: None,
        bundled_dir: bundled_model_dir(),
    };
    let source = ModelSource {
        file_name: YOLO_MODEL_NAME,
        url: YOLO_MODEL_URL,
    };
    let model_path = model_resolver::resolve(source, &locations, Some(Box::new(download_progress)))?;
    eprintln!();

    Ok(Box::new(OnnxYoloDetector::new(&model_path, cli.confidence)?))
}

/// `models/` next to the executable, for packaged installs.
fn bundled_model_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("models"))
}

/// Splits a detector command line on whitespace into program and arguments.
fn command_parts(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input folder not found: {}", cli.input.display()).into());
    }
    if !cli.input.is_dir() {
        return Err(format!("Input must be a folder: {}", cli.input.display()).into());
    }
    if cli.crop_size == 0 {
        return Err("Crop size must be a positive integer, got 0".into());
    }
    if !(1..=100).contains(&cli.jpeg_quality) {
        return Err(format!(
            "JPEG quality must be between 1 and 100, got {}",
            cli.jpeg_quality
        )
        .into());
    }
    if cli.detector != "onnx" && cli.detector != "command" {
        return Err(format!(
            "Detector must be 'onnx' or 'command', got '{}'",
            cli.detector
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.detector == "command" && command_parts(&cli.detector_command).is_none() {
        return Err("--detector-command must name a program".into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
