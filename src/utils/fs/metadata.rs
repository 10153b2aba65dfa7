//! File metadata queries.

use crate::core::{ConfigError, FileOperation};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::Path;

/// Returns the modification time of a file or directory.
pub async fn get_modified_time(path: &Path) -> Result<DateTime<Utc>, ConfigError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| ConfigError::io(FileOperation::Metadata, path, e))?;
    let modified =
        metadata.modified().map_err(|e| ConfigError::io(FileOperation::Metadata, path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Modification time formatted as RFC 3339 with millisecond precision.
pub async fn modified_rfc3339(path: &Path) -> Result<String, ConfigError> {
    Ok(get_modified_time(path).await?.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Whether anything (file, directory, or dangling symlink) exists at `path`.
pub async fn path_exists(path: &Path) -> bool {
    tokio::fs::symlink_metadata(path).await.is_ok()
}
