//! Where MCP servers are stored.
//!
//! Project scope has three candidate documents, searched in this order:
//!
//! 1. `<project>/.mcp.json` (canonical, the only file new servers are written to)
//! 2. `<project>/.claude/settings.json`
//! 3. `<project>/.claude/settings.local.json`
//!
//! User scope has exactly one: the root-level `mcpServers` of `~/.claude.json`.
//! `~/.claude/settings.json` is never used for MCP servers.

use super::MCP_SERVERS_KEY;
use crate::config::{CLAUDE_DIR, LOCAL_SETTINGS_FILE, MCP_FILE, SETTINGS_FILE};
use crate::core::{ArtifactKind, ConfigError, Scope};
use crate::document::JsonDocument;
use crate::resolver::PathResolver;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A server as found in one of a scope's documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServerEntry {
    /// Server name
    pub name: String,
    /// Stored configuration
    pub config: Value,
    /// Document holding it
    pub file: PathBuf,
}

/// Chooses which document holds, or should hold, a server.
#[derive(Debug, Clone)]
pub struct McpLocationReconciler {
    resolver: PathResolver,
}

impl McpLocationReconciler {
    /// Create a reconciler that resolves projects through `resolver`.
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
        }
    }

    /// The canonical document new servers are written to.
    pub fn locate(&self, scope: Scope, project_id: Option<&str>) -> Result<PathBuf, ConfigError> {
        self.resolver.resolve(ArtifactKind::Mcp, scope, project_id, None)
    }

    /// Every document that may hold servers for a scope, canonical first.
    pub fn candidates(
        &self,
        scope: Scope,
        project_id: Option<&str>,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        match scope {
            Scope::User => Ok(vec![self.resolver.paths().claude_json()]),
            Scope::Project => {
                let base = self.resolver.base_dir(scope, project_id)?;
                Ok(vec![
                    base.join(MCP_FILE),
                    base.join(CLAUDE_DIR).join(SETTINGS_FILE),
                    base.join(CLAUDE_DIR).join(LOCAL_SETTINGS_FILE),
                ])
            }
        }
    }

    /// Load a candidate document.
    ///
    /// Parse errors abort for the canonical document and are downgraded to a
    /// warning for the others.
    async fn load_candidate(
        path: &Path,
        canonical: bool,
    ) -> Result<Option<JsonDocument>, ConfigError> {
        match JsonDocument::load_existing(path).await {
            Ok(doc) => Ok(doc),
            Err(e @ ConfigError::Parse { .. }) if !canonical => {
                tracing::warn!("Skipping unreadable MCP location: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// The document currently holding server `name`, loaded and ready to mutate.
    pub async fn locate_existing(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> Result<Option<JsonDocument>, ConfigError> {
        for (index, path) in self.candidates(scope, project_id)?.iter().enumerate() {
            let Some(doc) = Self::load_candidate(path, index == 0).await? else {
                continue;
            };
            let servers = doc.object(MCP_SERVERS_KEY).ok().flatten();
            if servers.is_some_and(|servers| servers.contains_key(name)) {
                tracing::debug!("MCP server '{name}' found in {}", path.display());
                return Ok(Some(doc));
            }
        }
        Ok(None)
    }

    /// Every server visible in a scope, annotated with its document.
    ///
    /// When a name appears in several documents, the first in search order wins.
    pub async fn list(
        &self,
        scope: Scope,
        project_id: Option<&str>,
    ) -> Result<Vec<McpServerEntry>, ConfigError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (index, path) in self.candidates(scope, project_id)?.iter().enumerate() {
            let Some(doc) = Self::load_candidate(path, index == 0).await? else {
                continue;
            };
            let servers = match doc.object(MCP_SERVERS_KEY) {
                Ok(Some(servers)) => servers,
                Ok(None) => continue,
                Err(e) if index > 0 => {
                    tracing::warn!("Skipping unreadable MCP location: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };

            for (name, config) in servers {
                if seen.insert(name.clone()) {
                    entries.push(McpServerEntry {
                        name: name.clone(),
                        config: config.clone(),
                        file: path.clone(),
                    });
                } else {
                    tracing::debug!("MCP server '{name}' in {} is shadowed", path.display());
                }
            }
        }

        Ok(entries)
    }
}
