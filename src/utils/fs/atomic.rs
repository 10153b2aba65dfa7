//! Atomic file write operations using temp-and-rename strategy.
//!
//! This module provides safe, atomic file writing that prevents readers from
//! ever observing a partially written file.

use crate::core::{ConfigError, FileOperation};
use crate::utils::fs::dirs::ensure_dir;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Returns the temporary sibling used while writing `path`: `<path>.tmp`.
///
/// The suffix is appended to the full file name, so `.mcp.json` becomes
/// `.mcp.json.tmp` rather than `.mcp.tmp`.
#[must_use]
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
pub async fn safe_write(path: &Path, content: &str) -> Result<(), ConfigError> {
    atomic_write(path, content.as_bytes()).await
}

/// Atomically writes bytes to a file using a write-then-rename strategy.
///
/// 1. Writes content to `<path>.tmp`
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over `path`
///
/// Parent directories are created when missing. If any step fails the
/// temporary file is removed and `path` keeps its previous content.
///
/// # Examples
///
/// ```rust,no_run
/// use agcm::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), agcm::core::ConfigError> {
/// atomic_write(Path::new(".mcp.json"), b"{\n  \"mcpServers\": {}\n}").await?;
/// # Ok(())
/// # }
/// ```
pub async fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent).await?;
    }

    let temp_path = temp_path_for(path);
    let result = write_then_rename(path, &temp_path, content).await;

    if result.is_err() {
        // The original is untouched at this point; only the temp file can be stale.
        if let Err(e) = fs::remove_file(&temp_path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!("Failed to remove temp file {}: {}", temp_path.display(), e);
        }
    }

    result
}

async fn write_then_rename(path: &Path, temp_path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    {
        let mut file = fs::File::create(temp_path)
            .await
            .map_err(|e| ConfigError::io(FileOperation::Write, temp_path, e))?;

        file.write_all(content)
            .await
            .map_err(|e| ConfigError::io(FileOperation::Write, temp_path, e))?;

        file.sync_all().await.map_err(|e| ConfigError::io(FileOperation::Write, temp_path, e))?;
    }

    fs::rename(temp_path, path).await.map_err(|e| ConfigError::io(FileOperation::Rename, path, e))
}
