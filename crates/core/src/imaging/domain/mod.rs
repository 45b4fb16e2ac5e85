pub mod center_cropper;
pub mod color_mode;
pub mod cropper;
pub mod face_centered_cropper;
pub mod image_reader;
pub mod image_writer;
pub mod resizer;
