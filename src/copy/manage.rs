//! Update, listing, and deletion operations.

use super::{CopyOrchestrator, CopyResult, DeleteResult};
use crate::config::{CLAUDE_DIR, LOCAL_SETTINGS_FILE, SETTINGS_FILE};
use crate::core::{ArtifactKind, ConfigError, FileOperation, Scope};
use crate::document::JsonDocument;
use crate::hooks::{HookEvent, WILDCARD_MATCHER, remove_hook};
use crate::mcp::{
    McpServerEntry, Reference, ReferenceScanner, apply_patch, get_server, remove_server,
    rename_server,
};
use crate::utils::fs::{JsonObject, check_path_input, path_exists, remove_dir_all};
use std::path::{Path, PathBuf};

impl CopyOrchestrator {
    /// Patch an MCP server in the document that currently holds it, optionally renaming it.
    pub async fn update_mcp_server(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
        new_name: Option<&str>,
        patch: &JsonObject,
    ) -> CopyResult {
        self.try_update_mcp_server(scope, project_id, name, new_name, patch).await.into()
    }

    async fn try_update_mcp_server(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
        new_name: Option<&str>,
        patch: &JsonObject,
    ) -> Result<CopyResult, ConfigError> {
        let new_name = new_name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(name);
        if new_name.contains('\0') {
            return Err(ConfigError::security("MCP server name contains a null byte"));
        }

        let mut doc = self
            .mcp
            .locate_existing(scope, project_id, name)
            .await?
            .ok_or_else(|| ConfigError::not_found("MCP server", name))?;
        let existing = get_server(&doc, name)?
            .cloned()
            .ok_or_else(|| ConfigError::not_found("MCP server", name))?;

        let config = apply_patch(&existing, patch)?;
        rename_server(&mut doc, name, new_name, &config)?;
        doc.save().await?;

        if new_name == name {
            tracing::info!("Updated MCP server '{name}' in {}", doc.path().display());
        } else {
            tracing::info!("Renamed MCP server '{name}' to '{new_name}' in {}", doc.path().display());
        }
        Ok(CopyResult::Merged {
            path: doc.path().to_path_buf(),
            warnings: Vec::new(),
        })
    }

    /// Every MCP server visible in a scope.
    pub async fn list_mcp_servers(
        &self,
        scope: Scope,
        project_id: Option<&str>,
    ) -> Result<Vec<McpServerEntry>, ConfigError> {
        self.mcp.list(scope, project_id).await
    }

    /// Settings documents scanned for mentions of an MCP server.
    fn reference_paths(&self, scope: Scope, project_id: Option<&str>) -> Result<Vec<PathBuf>, ConfigError> {
        match scope {
            Scope::User => Ok(vec![self.resolver.paths().user_settings()]),
            Scope::Project => {
                let claude_dir = self.resolver.base_dir(scope, project_id)?.join(CLAUDE_DIR);
                Ok(vec![claude_dir.join(SETTINGS_FILE), claude_dir.join(LOCAL_SETTINGS_FILE)])
            }
        }
    }

    /// Hook commands and permission rules that mention an MCP server.
    pub async fn find_mcp_references(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> Result<Vec<Reference>, ConfigError> {
        let paths = self.reference_paths(scope, project_id)?;
        Ok(ReferenceScanner::find_references(name, &paths).await)
    }

    /// Delete an MCP server, reporting any remaining references to it.
    pub async fn delete_mcp_server(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> DeleteResult {
        self.try_delete_mcp_server(scope, project_id, name).await.into()
    }

    async fn try_delete_mcp_server(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> Result<DeleteResult, ConfigError> {
        let mut doc = self
            .mcp
            .locate_existing(scope, project_id, name)
            .await?
            .ok_or_else(|| ConfigError::not_found("MCP server", name))?;
        remove_server(&mut doc, name)?;
        doc.save().await?;
        tracing::info!("Deleted MCP server '{name}' from {}", doc.path().display());

        let references = self.find_mcp_references(scope, project_id, name).await?;
        if !references.is_empty() {
            tracing::warn!("MCP server '{name}' is still referenced {} time(s)", references.len());
        }
        Ok(DeleteResult::deleted(
            format!("MCP server '{name}' deleted"),
            doc.path().to_path_buf(),
        )
        .with_references(references))
    }

    /// Delete an agent file by name.
    pub async fn delete_agent(&self, scope: Scope, project_id: Option<&str>, name: &str) -> DeleteResult {
        self.delete_file(ArtifactKind::Agent, scope, project_id, Path::new(name)).await.into()
    }

    /// Delete a command file by its path below `commands/` (`git/commit.md`).
    pub async fn delete_command(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> DeleteResult {
        // Rooting at "commands" keeps nested subpaths intact through resolution.
        let source = Path::new("commands").join(name);
        self.delete_file(ArtifactKind::Command, scope, project_id, &source).await.into()
    }

    async fn delete_file(
        &self,
        kind: ArtifactKind,
        scope: Scope,
        project_id: Option<&str>,
        source: &Path,
    ) -> Result<DeleteResult, ConfigError> {
        check_path_input(&source.to_string_lossy())?;
        let target = self.resolver.resolve(kind, scope, project_id, Some(source))?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::not_found(capitalized(kind), target.display().to_string()));
            }
            Err(e) => return Err(ConfigError::io(FileOperation::Remove, &target, e)),
        }

        tracing::info!("Deleted {kind} {}", target.display());
        Ok(DeleteResult::deleted(format!("{} deleted", capitalized(kind)), target))
    }

    /// Delete a skill directory by name.
    pub async fn delete_skill(&self, scope: Scope, project_id: Option<&str>, name: &str) -> DeleteResult {
        self.try_delete_skill(scope, project_id, name).await.into()
    }

    async fn try_delete_skill(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        name: &str,
    ) -> Result<DeleteResult, ConfigError> {
        check_path_input(name)?;
        let target = self.resolver.resolve(ArtifactKind::Skill, scope, project_id, Some(Path::new(name)))?;
        if !path_exists(&target).await {
            return Err(ConfigError::not_found("Skill", name));
        }
        remove_dir_all(&target).await?;
        tracing::info!("Deleted skill {}", target.display());
        Ok(DeleteResult::deleted(format!("Skill '{name}' deleted"), target))
    }

    /// Delete one hook command, pruning groups and events it leaves empty.
    pub async fn delete_hook(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        event: &str,
        matcher: Option<&str>,
        command: &str,
    ) -> DeleteResult {
        self.try_delete_hook(scope, project_id, event, matcher, command).await.into()
    }

    async fn try_delete_hook(
        &self,
        scope: Scope,
        project_id: Option<&str>,
        event: &str,
        matcher: Option<&str>,
        command: &str,
    ) -> Result<DeleteResult, ConfigError> {
        let event: HookEvent = event.parse()?;
        // Hooks on non-tool events are always stored under the wildcard.
        let matcher = matcher
            .map(str::trim)
            .filter(|m| !m.is_empty() && event.supports_matcher())
            .unwrap_or(WILDCARD_MATCHER);
        let key = format!("{event}::{matcher}::{command}");

        let target = self.resolver.resolve(ArtifactKind::Hook, scope, project_id, None)?;
        let mut doc = JsonDocument::load_existing(&target)
            .await?
            .ok_or_else(|| ConfigError::not_found("Hook", &key))?;
        if !remove_hook(&mut doc, event, matcher, command)? {
            return Err(ConfigError::not_found("Hook", key));
        }
        doc.save().await?;

        tracing::info!("Deleted hook {key} from {}", target.display());
        Ok(DeleteResult::deleted("Hook deleted", target))
    }
}

fn capitalized(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Agent => "Agent",
        ArtifactKind::Command => "Command",
        ArtifactKind::Hook => "Hook",
        ArtifactKind::Mcp => "MCP server",
        ArtifactKind::Skill => "Skill",
    }
}
