//! Copy orchestration: the entry points that compose resolution, conflict
//! detection, merging, and atomic writes.
//!
//! Every copy follows the same pipeline:
//!
//! ```text
//! validate source ─► resolve target ─► detect conflict ─┬─ none ──────────► write
//!                                                       └─ conflict ─┬─ (no strategy) ► report
//!                                                                    ├─ skip ────────► cancelled
//!                                                                    ├─ overwrite ───► write
//!                                                                    └─ rename ──────► write as -N
//! ```
//!
//! Security checks run before validation, and both run before anything is
//! written. The strategy string is only parsed once a conflict exists, so a
//! bogus strategy on a conflict-free copy is ignored.
//!
//! Hooks and MCP servers are entries inside shared documents: an entry with the
//! same identity is the conflict, and "write" means merging into the document.
//! Renaming is not defined for them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use agcm::copy::{CopyOptions, CopyOrchestrator};
//! use agcm::core::Scope;
//! use std::path::Path;
//!
//! # async fn example(orchestrator: CopyOrchestrator) {
//! let options = CopyOptions::new(Scope::User, None);
//! let result = orchestrator.copy_agent(Path::new("/work/app/.claude/agents/reviewer.md"), &options).await;
//! println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
//! # }
//! ```

mod manage;
pub mod rename;
pub mod result;


pub use rename::next_available_path;
pub use result::{CopyResult, DeleteResult, SKIPPED_MESSAGE};

use crate::conflict::{ConflictDetector, ConflictStrategy, parse_strategy};
use crate::core::{ArtifactIdentity, ArtifactKind, ConfigError, FileOperation, Scope};
use crate::document::JsonDocument;
use crate::hooks::{HookDefaults, HookSpec, merge_hook, replace_hook};
use crate::markdown::require_frontmatter;
use crate::mcp::{McpLocationReconciler, McpServerConfig, upsert_server};
use crate::resolver::PathResolver;
use crate::skills::{copy_skill_dir, inspect_skill};
use crate::utils::fs::{check_path_input, safe_write};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where an artifact is copied from.
#[derive(Debug, Clone)]
pub enum CopySource {
    /// An agent Markdown file
    Agent {
        /// Source file
        path: PathBuf,
    },
    /// A slash-command Markdown file
    Command {
        /// Source file
        path: PathBuf,
    },
    /// A skill directory (or its `SKILL.md`)
    Skill {
        /// Source directory
        path: PathBuf,
    },
    /// A literal hook definition
    Hook(HookSpec),
    /// A named MCP server definition
    McpServer {
        /// Server name
        name: String,
        /// Server configuration
        config: Value,
    },
}

impl CopySource {
    /// The kind of artifact being copied.
    #[must_use]
    pub const fn kind(&self) -> ArtifactKind {
        match self {
            Self::Agent { .. } => ArtifactKind::Agent,
            Self::Command { .. } => ArtifactKind::Command,
            Self::Skill { .. } => ArtifactKind::Skill,
            Self::Hook(_) => ArtifactKind::Hook,
            Self::McpServer { .. } => ArtifactKind::Mcp,
        }
    }
}

/// Target and conflict handling for a copy.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Scope to copy into
    pub target_scope: Scope,
    /// Project to copy into; required for project scope
    pub target_project_id: Option<String>,
    /// `skip`, `overwrite`, or `rename`; only consulted on conflict
    pub conflict_strategy: Option<String>,
    /// Whether the caller accepted skill script warnings
    pub acknowledged_warnings: bool,
}

impl CopyOptions {
    /// Options with no strategy and no acknowledged warnings.
    pub fn new(target_scope: Scope, target_project_id: Option<String>) -> Self {
        Self {
            target_scope,
            target_project_id,
            conflict_strategy: None,
            acknowledged_warnings: false,
        }
    }

    /// Set the conflict strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.conflict_strategy = Some(strategy.into());
        self
    }

    /// Accept skill script warnings.
    #[must_use]
    pub const fn acknowledge_warnings(mut self) -> Self {
        self.acknowledged_warnings = true;
        self
    }

    fn project_id(&self) -> Option<&str> {
        self.target_project_id.as_deref()
    }

    fn strategy(&self) -> Result<Option<ConflictStrategy>, ConfigError> {
        parse_strategy(self.conflict_strategy.as_deref())
    }
}

/// A complete copy request.
#[derive(Debug, Clone)]
pub struct CopyRequest {
    /// What to copy
    pub source: CopySource,
    /// Where to and how
    pub options: CopyOptions,
}

/// What to do after a conflict was found.
enum Resolution {
    /// Write to this path
    Write(PathBuf),
    /// Stop with this result
    Stop(CopyResult),
}

/// The top-level copy & merge entry points.
#[derive(Debug, Clone)]
pub struct CopyOrchestrator {
    resolver: PathResolver,
    mcp: McpLocationReconciler,
    hook_defaults: HookDefaults,
}

impl CopyOrchestrator {
    /// Create an orchestrator; `hook_defaults` fill in `enabled`/`timeout` for new hooks.
    pub fn new(resolver: PathResolver, hook_defaults: HookDefaults) -> Self {
        Self {
            mcp: McpLocationReconciler::new(resolver.clone()),
            resolver,
            hook_defaults,
        }
    }

    /// The resolver used for target paths.
    #[must_use]
    pub const fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// The MCP location reconciler.
    #[must_use]
    pub const fn mcp(&self) -> &McpLocationReconciler {
        &self.mcp
    }

    /// Dispatch a request to the matching copy operation.
    pub async fn copy(&self, request: &CopyRequest) -> CopyResult {
        let options = &request.options;
        match &request.source {
            CopySource::Agent { path } => self.copy_agent(path, options).await,
            CopySource::Command { path } => self.copy_command(path, options).await,
            CopySource::Skill { path } => self.copy_skill(path, options).await,
            CopySource::Hook(hook) => self.copy_hook(hook, options).await,
            CopySource::McpServer { name, config } => {
                self.copy_mcp_server(name, config, options).await
            }
        }
    }

    /// Copy an agent definition file.
    pub async fn copy_agent(&self, source: &Path, options: &CopyOptions) -> CopyResult {
        self.copy_markdown(ArtifactKind::Agent, source, options).await.into()
    }

    /// Copy a slash-command file, keeping its path below `commands/`.
    pub async fn copy_command(&self, source: &Path, options: &CopyOptions) -> CopyResult {
        self.copy_markdown(ArtifactKind::Command, source, options).await.into()
    }

    /// Copy a skill directory.
    pub async fn copy_skill(&self, source: &Path, options: &CopyOptions) -> CopyResult {
        self.try_copy_skill(source, options).await.into()
    }

    /// Merge a hook into the target scope's settings.
    pub async fn copy_hook(&self, hook: &HookSpec, options: &CopyOptions) -> CopyResult {
        self.try_copy_hook(hook, options).await.into()
    }

    /// Add an MCP server to the target scope.
    pub async fn copy_mcp_server(
        &self,
        name: &str,
        config: &Value,
        options: &CopyOptions,
    ) -> CopyResult {
        self.try_copy_mcp_server(name, config, options).await.into()
    }

    /// Apply the conflict strategy to a file-based target.
    async fn resolve_file_conflict(
        &self,
        kind: ArtifactKind,
        source: &Path,
        target: PathBuf,
        options: &CopyOptions,
    ) -> Result<Resolution, ConfigError> {
        let identity = file_identity(kind, &target);
        let Some(conflict) = ConflictDetector::detect(&target, &identity, Some(source)).await? else {
            return Ok(Resolution::Write(target));
        };

        match options.strategy()? {
            None => {
                tracing::info!("{kind} already exists at {}", target.display());
                Ok(Resolution::Stop(CopyResult::Conflict(conflict)))
            }
            Some(ConflictStrategy::Skip) => Ok(Resolution::Stop(CopyResult::skipped())),
            Some(ConflictStrategy::Overwrite) => Ok(Resolution::Write(target)),
            Some(ConflictStrategy::Rename) => {
                let is_dir = kind == ArtifactKind::Skill;
                Ok(Resolution::Write(next_available_path(&target, is_dir).await))
            }
        }
    }

    async fn copy_markdown(
        &self,
        kind: ArtifactKind,
        source: &Path,
        options: &CopyOptions,
    ) -> Result<CopyResult, ConfigError> {
        check_path_input(&source.to_string_lossy())?;

        let content = match tokio::fs::read_to_string(source).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::not_found("Source file", source.display().to_string()));
            }
            Err(e) => return Err(ConfigError::io(FileOperation::Read, source, e)),
        };
        if content.trim().is_empty() {
            return Err(ConfigError::validation(format!(
                "Source file is empty: {}",
                source.display()
            )));
        }
        require_frontmatter(source, &content)?;

        let target =
            self.resolver.resolve(kind, options.target_scope, options.project_id(), Some(source))?;
        let target = match self.resolve_file_conflict(kind, source, target, options).await? {
            Resolution::Write(target) => target,
            Resolution::Stop(result) => return Ok(result),
        };

        safe_write(&target, &content).await?;
        tracing::info!("Copied {kind} {} to {}", source.display(), target.display());
        Ok(CopyResult::Copied {
            path: target,
        })
    }

    async fn try_copy_skill(
        &self,
        source: &Path,
        options: &CopyOptions,
    ) -> Result<CopyResult, ConfigError> {
        check_path_input(&source.to_string_lossy())?;

        let skill = inspect_skill(source).await?;
        skill.ensure_acknowledged(options.acknowledged_warnings)?;

        let target = self.resolver.resolve(
            ArtifactKind::Skill,
            options.target_scope,
            options.project_id(),
            Some(&skill.root),
        )?;
        let target = match self
            .resolve_file_conflict(ArtifactKind::Skill, &skill.root, target, options)
            .await?
        {
            Resolution::Write(target) => target,
            Resolution::Stop(result) => return Ok(result),
        };

        copy_skill_dir(&skill, &target).await?;
        Ok(CopyResult::Copied {
            path: target,
        })
    }

    async fn try_copy_hook(
        &self,
        hook: &HookSpec,
        options: &CopyOptions,
    ) -> Result<CopyResult, ConfigError> {
        if let Some(command) = &hook.command
            && command.contains('\0')
        {
            return Err(ConfigError::security("Hook command contains a null byte"));
        }
        let hook = hook.validate()?;

        let target =
            self.resolver.resolve(ArtifactKind::Hook, options.target_scope, options.project_id(), None)?;
        let mut doc = JsonDocument::load(&target).await?;

        let conflict = ConflictDetector::detect_in_document(&doc, &hook.identity())?;
        let strategy = if conflict.is_some() {
            options.strategy()?
        } else {
            None
        };

        let outcome = match (conflict, strategy) {
            (Some(conflict), None) => {
                tracing::info!("Hook {} already exists in {}", hook.identity().key(), target.display());
                return Ok(CopyResult::Conflict(conflict));
            }
            (_, Some(ConflictStrategy::Skip)) => return Ok(CopyResult::skipped()),
            (_, Some(ConflictStrategy::Rename)) => {
                return Err(ConfigError::validation("Rename is not supported for hooks"));
            }
            (_, Some(ConflictStrategy::Overwrite)) => {
                replace_hook(&mut doc, &hook, &self.hook_defaults)?
            }
            (None, None) => merge_hook(&mut doc, &hook, &self.hook_defaults)?,
        };

        if outcome.changed() {
            doc.save().await?;
            tracing::info!("Merged hook {} into {}", hook.identity().key(), target.display());
        }
        Ok(CopyResult::Merged {
            path: target,
            warnings: hook.warnings,
        })
    }

    async fn try_copy_mcp_server(
        &self,
        name: &str,
        config: &Value,
        options: &CopyOptions,
    ) -> Result<CopyResult, ConfigError> {
        if name.contains('\0') {
            return Err(ConfigError::security("MCP server name contains a null byte"));
        }
        if name.trim().is_empty() {
            return Err(ConfigError::validation("MCP server name is required"));
        }
        let config = McpServerConfig::from_value(config)?;
        config.validate()?;

        let (scope, project_id) = (options.target_scope, options.project_id());
        let canonical = self.mcp.locate(scope, project_id)?;

        // A server already stored in a legacy location stays there.
        let (mut doc, conflict) = match self.mcp.locate_existing(scope, project_id, name).await? {
            Some(doc) => {
                let identity = ArtifactIdentity::McpServer {
                    name: name.to_string(),
                };
                let conflict = ConflictDetector::detect_in_document(&doc, &identity)?;
                (doc, conflict)
            }
            None => (JsonDocument::load(&canonical).await?, None),
        };

        if let Some(conflict) = conflict {
            match options.strategy()? {
                None => return Ok(CopyResult::Conflict(conflict)),
                Some(ConflictStrategy::Skip) => return Ok(CopyResult::skipped()),
                Some(ConflictStrategy::Rename) => {
                    return Err(ConfigError::validation("Rename is not supported for MCP servers"));
                }
                Some(ConflictStrategy::Overwrite) => {}
            }
        }

        upsert_server(&mut doc, name, &config)?;
        doc.save().await?;
        tracing::info!("Stored MCP server '{name}' in {}", doc.path().display());
        Ok(CopyResult::Merged {
            path: doc.path().to_path_buf(),
            warnings: Vec::new(),
        })
    }
}

/// The identity a file-based target is conflict-checked under.
fn file_identity(kind: ArtifactKind, target: &Path) -> ArtifactIdentity {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    if kind == ArtifactKind::Skill {
        ArtifactIdentity::Directory { name }
    } else {
        ArtifactIdentity::File { name }
    }
}
