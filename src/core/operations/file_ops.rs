use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::{PrepError, PrepResult};

/// Create `dir` and all missing parents
pub fn ensure_dir(dir: &Path) -> PrepResult<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Copy a single file, overwriting the destination if it exists.
///
/// # Arguments
/// * `src` - Source file path
/// * `dest` - Destination file path
///
/// # Returns
/// * `Ok(())` if successful
/// * `Err(PrepError::CopyFailed)` if the copy failed
pub fn copy_file(src: &Path, dest: &Path) -> PrepResult<()> {
    debug!("Copying file from {:?} to {:?}", src, dest);

    if let Err(e) = fs::copy(src, dest) {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        return Err(PrepError::CopyFailed(format!(
            "Failed to copy from {:?} to {:?}: {}",
            src, dest, e
        )));
    }

    Ok(())
}

/// Copy every file in `files` into `dest_dir`, keeping file names.
///
/// Returns the destination paths in the same order as `files`.
pub fn copy_files_into(files: &[PathBuf], dest_dir: &Path) -> PrepResult<Vec<PathBuf>> {
    let mut copied = Vec::with_capacity(files.len());
    for src in files {
        let file_name = src.file_name().ok_or_else(|| {
            PrepError::CopyFailed(format!("Failed to get file name of {:?}", src))
        })?;
        let dest = dest_dir.join(file_name);
        copy_file(src, &dest)?;
        copied.push(dest);
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_files_into_keeps_names() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let a = src_dir.path().join("a.jpg");
        let b = src_dir.path().join("b.png");
        fs::write(&a, b"first").unwrap();
        fs::write(&b, b"second").unwrap();

        let copied = copy_files_into(&[a.clone(), b.clone()], dest_dir.path()).unwrap();

        assert_eq!(copied.len(), 2);
        assert_eq!(fs::read(dest_dir.path().join("a.jpg")).unwrap(), b"first");
        assert_eq!(fs::read(dest_dir.path().join("b.png")).unwrap(), b"second");
        // Sources are left in place
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_file(&dir.path().join("missing.jpg"), &dir.path().join("out.jpg"));
        assert!(matches!(result, Err(PrepError::CopyFailed(_))));
    }
}
