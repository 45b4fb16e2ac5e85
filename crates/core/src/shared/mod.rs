pub mod bounding_box;
pub mod constants;
pub mod crop_target;
pub mod frame;
pub mod model_resolver;
