use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::shared::constants::{DEFAULT_CROP_SIZE, FACE_OUTPUT_SUFFIX, GEOMETRIC_OUTPUT_SUFFIX};

/// Output encodings the pipeline can write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
}

impl OutputFormat {
    /// File extension written for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    pub fn supports_alpha(self) -> bool {
        matches!(self, OutputFormat::Png)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" => Ok(OutputFormat::Jpg),
            "jpeg" => Ok(OutputFormat::Jpeg),
            other => Err(format!(
                "Output format must be one of: png, jpg, jpeg, got '{other}'"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Side length and encoding of every output crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropTarget {
    size: u32,
    format: OutputFormat,
}

impl CropTarget {
    pub fn new(size: u32, format: OutputFormat) -> Result<Self, Box<dyn std::error::Error>> {
        if size == 0 {
            return Err("Crop size must be a positive integer, got 0".into());
        }
        Ok(Self { size, format })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output file name for a source image: same stem, configured extension.
    pub fn output_file_name(&self, source: &Path) -> Option<PathBuf> {
        let mut name = source.file_stem()?.to_os_string();
        name.push(".");
        name.push(self.format.extension());
        Some(PathBuf::from(name))
    }
}

impl Default for CropTarget {
    fn default() -> Self {
        Self {
            size: DEFAULT_CROP_SIZE,
            format: OutputFormat::default(),
        }
    }
}

/// How every image in a batch is cropped. Chosen once per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CropMode {
    #[default]
    Geometric,
    FaceCentered,
}

impl CropMode {
    /// Destination directory for a source folder: `<input>_cleaned` or
    /// `<input>_cleaned_facial_recognition`.
    pub fn output_dir(self, source_dir: &Path) -> PathBuf {
        let suffix = match self {
            CropMode::Geometric => GEOMETRIC_OUTPUT_SUFFIX,
            CropMode::FaceCentered => FACE_OUTPUT_SUFFIX,
        };
        // Components drops trailing separators so `faces/` maps like `faces`.
        let mut name = source_dir.components().as_path().as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }
}
