//! Uniform result shapes returned by every orchestrator operation.

use crate::conflict::ConflictInfo;
use crate::core::ConfigError;
use crate::mcp::Reference;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::PathBuf;

/// Message attached to a copy cancelled by the `skip` strategy.
pub const SKIPPED_MESSAGE: &str = "Copy cancelled by user";

/// Outcome of a copy, update, or merge.
///
/// Serializes to `{success, copiedPath | mergedInto | conflict | skipped | error}`.
#[derive(Debug)]
pub enum CopyResult {
    /// A file or directory was written
    Copied {
        /// Written path
        path: PathBuf,
    },
    /// An entry was merged into a shared document
    Merged {
        /// The document
        path: PathBuf,
        /// Non-fatal problems, such as an ignored matcher
        warnings: Vec<String>,
    },
    /// The target already holds the artifact and no strategy was given
    Conflict(ConflictInfo),
    /// The caller chose `skip`
    Skipped {
        /// Always [`SKIPPED_MESSAGE`]
        message: String,
    },
    /// The operation failed before or while writing
    Failed(ConfigError),
}

impl CopyResult {
    /// A copy cancelled by the `skip` strategy.
    #[must_use]
    pub fn skipped() -> Self {
        Self::Skipped {
            message: SKIPPED_MESSAGE.to_string(),
        }
    }

    /// Whether the artifact was written (or was already present, for merges).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Copied { .. } | Self::Merged { .. })
    }

    /// The written path, for successful results.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Copied { path } | Self::Merged { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The error, for failed results.
    #[must_use]
    pub const fn error(&self) -> Option<&ConfigError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Result<Self, ConfigError>> for CopyResult {
    fn from(result: Result<Self, ConfigError>) -> Self {
        result.unwrap_or_else(Self::Failed)
    }
}

fn serialize_error<M: SerializeMap>(map: &mut M, error: &ConfigError) -> Result<(), M::Error> {
    map.serialize_entry("error", &error.to_string())?;
    map.serialize_entry("errorKind", &error.kind())?;
    if !error.details().is_empty() {
        map.serialize_entry("details", error.details())?;
    }
    Ok(())
}

impl Serialize for CopyResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.is_success())?;
        match self {
            Self::Copied { path } => map.serialize_entry("copiedPath", path)?,
            Self::Merged { path, warnings } => {
                map.serialize_entry("mergedInto", path)?;
                if !warnings.is_empty() {
                    map.serialize_entry("warnings", warnings)?;
                }
            }
            Self::Conflict(info) => map.serialize_entry("conflict", info)?,
            Self::Skipped { message } => {
                map.serialize_entry("skipped", &true)?;
                map.serialize_entry("message", message)?;
            }
            Self::Failed(error) => serialize_error(&mut map, error)?,
        }
        map.end()
    }
}

/// Outcome of a deletion: `{success, message, filePath?, references?}`.
#[derive(Debug)]
pub struct DeleteResult {
    /// Whether the artifact was removed
    pub success: bool,
    /// What happened
    pub message: String,
    /// File that held the artifact
    pub file_path: Option<PathBuf>,
    /// Remaining mentions of a deleted MCP server
    pub references: Vec<Reference>,
    /// Why the deletion failed
    pub error: Option<ConfigError>,
}

impl DeleteResult {
    /// A successful deletion.
    pub fn deleted(message: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            success: true,
            message: message.into(),
            file_path: Some(file_path),
            references: Vec::new(),
            error: None,
        }
    }

    /// Attach reference-scan findings.
    #[must_use]
    pub fn with_references(mut self, references: Vec<Reference>) -> Self {
        self.references = references;
        self
    }
}

impl From<Result<Self, ConfigError>> for DeleteResult {
    fn from(result: Result<Self, ConfigError>) -> Self {
        result.unwrap_or_else(|error| Self {
            success: false,
            message: error.to_string(),
            file_path: None,
            references: Vec::new(),
            error: Some(error),
        })
    }
}

impl Serialize for DeleteResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.success)?;
        map.serialize_entry("message", &self.message)?;
        if let Some(path) = &self.file_path {
            map.serialize_entry("filePath", path)?;
        }
        if !self.references.is_empty() {
            map.serialize_entry("references", &self.references)?;
        }
        if let Some(error) = &self.error {
            serialize_error(&mut map, error)?;
        }
        map.end()
    }
}
