//! Conflict detection and resolution strategies.
//!
//! A conflict exists when the target already holds an artifact with the same
//! identity. For file-based artifacts that means the target path exists; for
//! entries inside shared documents it means the identity key is already
//! present. The detector only reports. Choosing what to do is the caller's job,
//! expressed as a [`ConflictStrategy`].

use crate::core::{ArtifactIdentity, ConfigError};
use crate::document::JsonDocument;
use crate::hooks::{HookEvent, find_hook};
use crate::mcp::MCP_SERVERS_KEY;
use crate::utils::fs::{modified_rfc3339, path_exists};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How to proceed when the target already holds the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Leave the target alone and report the copy as cancelled
    Skip,
    /// Replace the existing artifact in place
    Overwrite,
    /// Write under the lowest free `-N` suffix
    Rename,
}

impl fmt::Display for ConflictStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Skip => "skip",
            Self::Overwrite => "overwrite",
            Self::Rename => "rename",
        })
    }
}

impl FromStr for ConflictStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "overwrite" => Ok(Self::Overwrite),
            "rename" => Ok(Self::Rename),
            other => Err(ConfigError::validation("Unknown conflict strategy")
                .with_details(vec![format!(
                    "'{other}' is not one of skip, overwrite, rename"
                )])),
        }
    }
}

/// What already exists at the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    /// Where the incoming artifact would be written
    pub target_path: PathBuf,
    /// Modification time of the incoming source (file-based artifacts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_modified: Option<String>,
    /// Modification time of the existing target (file-based artifacts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_modified: Option<String>,
    /// The stored entry (document-based artifacts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<Value>,
}

/// Stateless conflict checks.
pub struct ConflictDetector;

impl ConflictDetector {
    /// Check a file or directory target against an optional source.
    pub async fn detect_file(
        source: Option<&Path>,
        target: &Path,
    ) -> Result<Option<ConflictInfo>, ConfigError> {
        if !path_exists(target).await {
            return Ok(None);
        }

        let source_modified = match source {
            Some(source) => Some(modified_rfc3339(source).await?),
            None => None,
        };

        Ok(Some(ConflictInfo {
            target_path: target.to_path_buf(),
            source_modified,
            target_modified: Some(modified_rfc3339(target).await?),
            existing: None,
        }))
    }

    /// Check a loaded document for an entry with the same identity.
    pub fn detect_in_document(
        doc: &JsonDocument,
        identity: &ArtifactIdentity,
    ) -> Result<Option<ConflictInfo>, ConfigError> {
        let existing = match identity {
            ArtifactIdentity::Hook { event, matcher, command } => {
                let event: HookEvent = event.parse()?;
                find_hook(doc, event, matcher, command)?.cloned()
            }
            ArtifactIdentity::McpServer { name } => {
                doc.object(MCP_SERVERS_KEY)?.and_then(|servers| servers.get(name)).cloned()
            }
            ArtifactIdentity::File { .. } | ArtifactIdentity::Directory { .. } => {
                return Err(ConfigError::validation(
                    "File-based artifacts are not stored inside documents",
                ));
            }
        };

        Ok(existing.map(|existing| ConflictInfo {
            target_path: doc.path().to_path_buf(),
            source_modified: None,
            target_modified: None,
            existing: Some(existing),
        }))
    }

    /// Check `target` for an artifact with `identity`, loading documents as needed.
    pub async fn detect(
        target: &Path,
        identity: &ArtifactIdentity,
        source: Option<&Path>,
    ) -> Result<Option<ConflictInfo>, ConfigError> {
        match identity {
            ArtifactIdentity::File { .. } | ArtifactIdentity::Directory { .. } => {
                Self::detect_file(source, target).await
            }
            _ => match JsonDocument::load_existing(target).await? {
                Some(doc) => Self::detect_in_document(&doc, identity),
                None => Ok(None),
            },
        }
    }
}

/// Parse a strategy only once a conflict makes it matter.
pub fn parse_strategy(strategy: Option<&str>) -> Result<Option<ConflictStrategy>, ConfigError> {
    strategy.map(str::parse::<ConflictStrategy>).transpose()
}
