//! Shared argument groups and the per-invocation context.

use crate::config::{ClaudePaths, GlobalConfig};
use crate::copy::{CopyOptions, CopyOrchestrator};
use crate::core::Scope;
use crate::projects::ProjectIndex;
use crate::resolver::PathResolver;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where an operation applies.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Scope to operate on: `project` or `user`
    #[arg(long)]
    pub scope: Scope,

    /// Project id, required for project scope (see `agcm projects`)
    #[arg(long = "project", value_name = "PROJECT_ID")]
    pub project_id: Option<String>,
}

impl TargetArgs {
    /// The project id, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Copy options with the given conflict strategy.
    pub fn copy_options(&self, strategy: Option<String>) -> CopyOptions {
        CopyOptions {
            target_scope: self.scope,
            target_project_id: self.project_id.clone(),
            conflict_strategy: strategy,
            acknowledged_warnings: false,
        }
    }
}

/// Everything a command needs, built once per invocation.
pub struct CommandContext {
    /// Loaded global configuration
    pub config: GlobalConfig,
    /// Projects registered in `~/.claude.json`
    pub projects: ProjectIndex,
    /// The engine
    pub orchestrator: CopyOrchestrator,
}

impl CommandContext {
    /// Load configuration and the project registry, then build the orchestrator.
    pub async fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = GlobalConfig::load_with_optional(config_path).await?;
        let paths = ClaudePaths::from_config(&config)?;
        let projects = ProjectIndex::load(&paths).await?;
        tracing::debug!("Using home {} with {} projects", paths.home().display(), projects.len());

        let resolver = PathResolver::new(paths, Arc::new(projects.clone()));
        let orchestrator = CopyOrchestrator::new(resolver, config.hook_defaults());
        Ok(Self {
            config,
            projects,
            orchestrator,
        })
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a JSON argument.
pub fn parse_json_arg(flag: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{flag} must be valid JSON"))
}

/// Make a source path absolute without touching the filesystem.
pub fn absolute_source(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid source path {}", path.display()))
}
