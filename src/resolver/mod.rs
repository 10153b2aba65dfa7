//! Target path resolution for copy operations.
//!
//! [`PathResolver`] maps an artifact kind, a scope, and (for project scope) a
//! project id onto the absolute location the artifact should be written to:
//!
//! | Kind    | Target                                                   |
//! |---------|----------------------------------------------------------|
//! | agent   | `<base>/.claude/agents/<file name>`                      |
//! | command | `<base>/.claude/commands/<path below "commands/">`       |
//! | skill   | `<base>/.claude/skills/<directory name>`                 |
//! | hook    | `<base>/.claude/settings.json`                           |
//! | mcp     | `<project>/.mcp.json` or `~/.claude.json`                |
//!
//! `<base>` is the project directory for project scope and the home directory
//! for user scope. Resolution is pure computation: nothing is created, and the
//! final path is checked to stay inside `<base>`.

use crate::config::{CLAUDE_DIR, ClaudePaths, MCP_FILE, SETTINGS_FILE};
use crate::core::{ArtifactKind, ConfigError, Scope};
use crate::projects::ProjectRegistry;
use crate::utils::fs::{check_path_input, check_segment, ensure_within};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Name of a skill's definition file.
pub const SKILL_FILE: &str = "SKILL.md";

/// Resolves where artifacts live for a given scope.
#[derive(Clone)]
pub struct PathResolver {
    paths: ClaudePaths,
    registry: Arc<dyn ProjectRegistry>,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver").field("paths", &self.paths).finish_non_exhaustive()
    }
}

impl PathResolver {
    /// Create a resolver over the given user locations and project registry.
    pub fn new(paths: ClaudePaths, registry: Arc<dyn ProjectRegistry>) -> Self {
        Self {
            paths,
            registry,
        }
    }

    /// User-level locations.
    #[must_use]
    pub const fn paths(&self) -> &ClaudePaths {
        &self.paths
    }

    /// Compute the absolute target for an artifact.
    ///
    /// `source_path` is required for agents, commands, and skills, whose target
    /// name derives from the source.
    pub fn resolve(
        &self,
        kind: ArtifactKind,
        scope: Scope,
        project_id: Option<&str>,
        source_path: Option<&Path>,
    ) -> Result<PathBuf, ConfigError> {
        if let Some(source) = source_path {
            check_path_input(&source.to_string_lossy())?;
        }

        let base = self.base_dir(scope, project_id)?;
        let claude_dir = base.join(CLAUDE_DIR);

        let target = match kind {
            ArtifactKind::Agent => {
                let name = source_file_name(kind, source_path)?;
                claude_dir.join("agents").join(name)
            }
            ArtifactKind::Command => {
                let source = require_source(kind, source_path)?;
                claude_dir.join("commands").join(command_subpath(source)?)
            }
            ArtifactKind::Skill => {
                let source = require_source(kind, source_path)?;
                claude_dir.join("skills").join(skill_dir_name(source)?)
            }
            ArtifactKind::Hook => claude_dir.join(SETTINGS_FILE),
            ArtifactKind::Mcp => match scope {
                Scope::Project => base.join(MCP_FILE),
                Scope::User => self.paths.claude_json(),
            },
        };

        let target = ensure_within(&base, &target)?;
        tracing::debug!("Resolved {kind} target for {scope} scope: {}", target.display());
        Ok(target)
    }

    /// The directory a scope's artifacts are rooted at.
    pub fn base_dir(&self, scope: Scope, project_id: Option<&str>) -> Result<PathBuf, ConfigError> {
        match scope {
            Scope::User => Ok(self.paths.home().to_path_buf()),
            Scope::Project => {
                let project_id =
                    project_id.filter(|id| !id.trim().is_empty()).ok_or_else(|| {
                        ConfigError::validation(
                            "targetProjectId is required when targetScope is 'project'",
                        )
                    })?;
                self.project_dir(project_id)
            }
        }
    }

    /// Look up a registered project's directory, which must exist.
    pub fn project_dir(&self, project_id: &str) -> Result<PathBuf, ConfigError> {
        let entry = self
            .registry
            .find(project_id)
            .ok_or_else(|| ConfigError::not_found("Project", project_id))?;
        if !entry.exists {
            return Err(ConfigError::not_found(
                "Project directory",
                entry.path.display().to_string(),
            ));
        }
        Ok(entry.path)
    }
}

fn require_source(kind: ArtifactKind, source: Option<&Path>) -> Result<&Path, ConfigError> {
    source.ok_or_else(|| ConfigError::validation(format!("sourcePath is required for {kind}")))
}

fn source_file_name(kind: ArtifactKind, source: Option<&Path>) -> Result<String, ConfigError> {
    let source = require_source(kind, source)?;
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ConfigError::validation(format!("sourcePath has no file name: {}", source.display()))
        })?;
    check_segment(&name)?;
    Ok(name)
}

/// The part of a command's path below its last `commands` directory.
///
/// `/p/.claude/commands/git/commit.md` maps to `git/commit.md`; a source
/// outside any `commands` directory keeps only its file name.
fn command_subpath(source: &Path) -> Result<PathBuf, ConfigError> {
    let components: Vec<Component<'_>> = source.components().collect();
    let dir_count = components.len().saturating_sub(1);
    let start = components[..dir_count]
        .iter()
        .rposition(|c| c.as_os_str() == "commands")
        .map_or(dir_count, |i| i + 1);

    let mut subpath = PathBuf::new();
    for component in &components[start..] {
        let Component::Normal(segment) = component else {
            return Err(ConfigError::security(format!(
                "Invalid command path '{}'",
                source.display()
            )));
        };
        check_segment(&segment.to_string_lossy())?;
        subpath.push(segment);
    }

    if subpath.as_os_str().is_empty() {
        return Err(ConfigError::validation(format!(
            "sourcePath has no file name: {}",
            source.display()
        )));
    }
    Ok(subpath)
}

/// A skill's directory name; a path to its `SKILL.md` names the directory above it.
fn skill_dir_name(source: &Path) -> Result<String, ConfigError> {
    let dir = if source.file_name().is_some_and(|n| n == SKILL_FILE) {
        source.parent().unwrap_or(source)
    } else {
        source
    };
    let name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).ok_or_else(|| {
        ConfigError::validation(format!("sourcePath has no directory name: {}", source.display()))
    })?;
    check_segment(&name)?;
    Ok(name)
}
