pub mod fs_file_copier;
