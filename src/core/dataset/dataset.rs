use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{PrepError, PrepResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetSplit {
    Train,
    Val,
    Test,
}

impl DatasetSplit {
    /// Directory name of the split
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
            DatasetSplit::Test => "test",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "Train",
            DatasetSplit::Val => "Validation",
            DatasetSplit::Test => "Test",
        }
    }

    pub fn all() -> [DatasetSplit; 3] {
        [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test]
    }
}

/// Whether `path` has one of `extensions` (lowercase, no dot), ignoring case
pub fn is_image_file(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.iter().any(|allowed| *allowed == ext)
        }
        None => false,
    }
}

/// List the class directories directly under `root`, sorted by name.
///
/// Plain files next to the class directories are ignored.
pub fn list_class_dirs(root: &Path) -> PrepResult<Vec<(String, PathBuf)>> {
    if !root.is_dir() {
        return Err(PrepError::PathNotFound(root.to_path_buf()));
    }

    let mut classes = Vec::new();
    for entry in fs::read_dir(root)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = entry.file_name().to_string_lossy().to_string();
            classes.push((name, path));
        }
    }
    classes.sort_by(|a, b| a.0.cmp(&b.0));

    info!("Found {} class directories in {:?}", classes.len(), root);
    Ok(classes)
}

/// List image files directly inside `dir`, sorted for consistent ordering
pub fn list_images(dir: &Path, extensions: &[String]) -> PrepResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_file() && is_image_file(&path, extensions) {
            images.push(path);
        }
    }
    images.sort();

    debug!("Found {} images in {:?}", images.len(), dir);
    Ok(images)
}

pub fn count_images(dir: &Path, extensions: &[String]) -> PrepResult<usize> {
    Ok(list_images(dir, extensions)?.len())
}

/// Count image files anywhere below `dir`. A missing directory counts as empty.
pub fn count_images_recursive(dir: &Path, extensions: &[String]) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && is_image_file(entry.path(), extensions))
        .count()
}
