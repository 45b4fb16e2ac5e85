pub mod directory_materializer;
pub mod discovery;
pub mod domain;
pub mod infrastructure;
pub mod label_copier;
