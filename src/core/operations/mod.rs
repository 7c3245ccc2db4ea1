mod file_ops;

pub use file_ops::{copy_file, copy_files_into, ensure_dir};
