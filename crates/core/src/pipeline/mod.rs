pub mod crop_dataset_use_case;
pub mod crop_image_use_case;
pub mod pipeline_logger;
