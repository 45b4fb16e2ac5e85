pub mod command_face_detector;
pub mod math;
pub mod onnx_yolo_detector;
pub mod staged_image;
