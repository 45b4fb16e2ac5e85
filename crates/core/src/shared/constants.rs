pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const DEFAULT_CROP_SIZE: u32 = 512;

pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Source extensions picked up by discovery, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

pub const LABEL_EXTENSION: &str = "txt";

pub const GEOMETRIC_OUTPUT_SUFFIX: &str = "_cleaned";
pub const FACE_OUTPUT_SUFFIX: &str = "_cleaned_facial_recognition";

/// CLI shipped with the Python `face_recognition` package.
pub const DEFAULT_DETECTOR_COMMAND: &str = "face_detection";
