pub mod clipboard;
pub mod file_size;
