//! Directory operations for creating, copying, and removing directories.

use crate::core::{ConfigError, FileOperation};
use std::path::Path;
use walkdir::WalkDir;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// Returns an error if the path exists but is not a directory.
pub async fn ensure_dir(path: &Path) -> Result<(), ConfigError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ConfigError::io(
            FileOperation::CreateDir,
            path,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "path exists but is not a directory",
            ),
        )),
        Err(_) => tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| ConfigError::io(FileOperation::CreateDir, path, e)),
    }
}

/// Recursively copies a directory tree.
///
/// Symbolic links are refused rather than followed. This is a blocking
/// function; async callers should run it through `spawn_blocking`.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<(), ConfigError> {
    std::fs::create_dir_all(dst).map_err(|e| ConfigError::io(FileOperation::CreateDir, dst, e))?;

    for entry in WalkDir::new(src).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            ConfigError::io(FileOperation::Copy, path, std::io::Error::other(e.to_string()))
        })?;

        let relative = entry.path().strip_prefix(src).map_err(|_| {
            ConfigError::security(format!(
                "Entry {} is outside {}",
                entry.path().display(),
                src.display()
            ))
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_symlink() {
            return Err(ConfigError::security(format!(
                "Refusing to copy symlink: {}",
                entry.path().display()
            )));
        } else if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|e| ConfigError::io(FileOperation::CreateDir, &target, e))?;
        } else {
            std::fs::copy(entry.path(), &target)
                .map_err(|e| ConfigError::io(FileOperation::Copy, entry.path(), e))?;
        }
    }

    Ok(())
}

/// Removes a directory and all its contents. A missing directory is not an error.
pub async fn remove_dir_all(path: &Path) -> Result<(), ConfigError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::io(FileOperation::Remove, path, e)),
    }
}
