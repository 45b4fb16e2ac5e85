use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

use super::staged_image::StagedImage;

/// Face detector that shells out to an external program.
///
/// Each frame is staged to a temporary PNG whose path is appended to the
/// command line. The program must print one `path,top,right,bottom,left`
/// line per face, which is the output format of the `face_detection` CLI
/// from the Python `face_recognition` package. Faces keep the program's
/// output order.
pub struct CommandFaceDetector {
    program: OsString,
    args: Vec<OsString>,
    staging_dir: Option<PathBuf>,
}

impl CommandFaceDetector {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            staging_dir: None,
        }
    }

    /// Extra arguments placed before the staged image path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Directory for staged images; the system temp directory by default.
    pub fn with_staging_dir(mut self, dir: PathBuf) -> Self {
        self.staging_dir = Some(dir);
        self
    }
}

impl FaceDetector for CommandFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        let staged = match &self.staging_dir {
            Some(dir) => StagedImage::stage_in(dir, frame)?,
            None => StagedImage::stage(frame)?,
        };

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(staged.path())
            .output()
            .map_err(|e| {
                format!(
                    "failed to run face detector '{}': {e}",
                    self.program.to_string_lossy()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "face detector '{}' exited with {}: {}",
                self.program.to_string_lossy(),
                output.status,
                stderr.trim()
            )
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let faces = parse_detections(&stdout)?
            .into_iter()
            .map(|face| face.clamp_to(frame.width(), frame.height()))
            .filter(|face| face.is_within(frame.width(), frame.height()))
            .collect();
        Ok(faces)
    }
}

/// Parses `path,top,right,bottom,left` lines, ignoring blank lines.
///
/// Fields are taken from the end of the line so paths containing commas
/// still parse.
fn parse_detections(stdout: &str) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Result<BoundingBox, Box<dyn std::error::Error>> {
    let fields: Vec<&str> = line.rsplitn(5, ',').collect();
    if fields.len() != 5 {
        return Err(format!("malformed face detector output: '{line}'").into());
    }
    // rsplitn yields fields last-first: left, bottom, right, top, path
    let coord = |s: &str| -> Result<u32, Box<dyn std::error::Error>> {
        s.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid coordinate '{s}' in '{line}': {e}").into())
    };
    Ok(BoundingBox::from_trbl(
        coord(fields[3])?,
        coord(fields[2])?,
        coord(fields[1])?,
        coord(fields[0])?,
    ))
}
