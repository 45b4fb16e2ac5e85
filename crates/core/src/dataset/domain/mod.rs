pub mod file_copier;
