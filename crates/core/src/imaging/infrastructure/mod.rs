pub mod cropper_factory;
pub mod image_file_reader;
pub mod image_file_writer;
