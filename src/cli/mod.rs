//! Command-line interface for AGCM.
//!
//! The CLI is a thin shell over [`CopyOrchestrator`](crate::copy::CopyOrchestrator):
//! each subcommand parses its arguments, makes one call into the engine, and
//! prints the result as JSON on stdout. Logs go to stderr so the JSON can be
//! piped.
//!
//! # Available Commands
//!
//! - `copy {agent,command,skill,hook,mcp}` - copy an artifact into a scope
//! - `mcp {list,update,remove,references}` - manage MCP servers in place
//! - `hooks remove` - remove a single hook command
//! - `delete {agent,command,skill}` - delete file-based artifacts
//! - `projects` - list registered projects and their ids
//!
//! # Exit Status
//!
//! `0` when the printed result has `"success": true`, `1` otherwise (including
//! conflicts and skipped copies). Errors that prevent the engine from running
//! at all, such as an unreadable config file, are printed to stderr.
//!
//! # Examples
//!
//! ```bash
//! agcm projects
//! agcm copy agent ~/work/api/.claude/agents/reviewer.md --scope project --project -Users-me-work-web
//! agcm --verbose mcp list --scope user
//! ```

mod common;
pub mod copy;
pub mod delete;
pub mod hooks;
pub mod mcp;

pub use common::{CommandContext, TargetArgs};

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter; `None` disables logging unless `RUST_LOG` is set
    pub log_level: Option<String>,
    /// Global config file override
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the `tracing` subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by flags.
    pub fn init_logging(&self) {
        let filter = match (EnvFilter::try_from_default_env(), &self.log_level) {
            (Ok(filter), _) => filter,
            (Err(_), Some(level)) => EnvFilter::new(format!("agcm={level}")),
            (Err(_), None) => return,
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Configuration copy & merge tool for Claude Code projects.
#[derive(Parser, Debug)]
#[command(name = "agcm", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the global configuration file (default `~/.agcm/config.toml`)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy an artifact into a project or the user scope
    #[command(subcommand)]
    Copy(copy::CopyCommand),

    /// Manage MCP servers
    #[command(subcommand)]
    Mcp(mcp::McpCommand),

    /// Manage hooks
    #[command(subcommand)]
    Hooks(hooks::HooksCommand),

    /// Delete agents, commands, or skills
    #[command(subcommand)]
    Delete(delete::DeleteCommand),

    /// List registered projects and their ids
    Projects,
}

impl Cli {
    /// Build a [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Set up logging, then run the command.
    ///
    /// Returns whether the printed result reports success.
    pub async fn execute(self) -> Result<bool> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Run with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<bool> {
        let ctx = CommandContext::load(config.config_path).await?;

        match self.command {
            Commands::Copy(cmd) => cmd.execute(&ctx).await,
            Commands::Mcp(cmd) => cmd.execute(&ctx).await,
            Commands::Hooks(cmd) => cmd.execute(&ctx).await,
            Commands::Delete(cmd) => cmd.execute(&ctx).await,
            Commands::Projects => {
                let projects: Vec<_> = ctx.projects.entries().collect();
                common::print_json(&projects)?;
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["agcm", "--verbose", "projects"]);
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["agcm", "-q", "-c", "/tmp/agcm.toml", "projects"]);
        let config = cli.build_config();
        assert!(config.log_level.is_none());
        assert_eq!(config.config_path, Some(PathBuf::from("/tmp/agcm.toml")));

        assert!(Cli::try_parse_from(["agcm", "-v", "-q", "projects"]).is_err());
    }

    #[test]
    fn test_scope_is_validated_by_parser() {
        let ok = Cli::try_parse_from([
            "agcm", "copy", "agent", "a.md", "--scope", "user", "--strategy", "rename",
        ]);
        assert!(ok.is_ok());

        let bad = Cli::try_parse_from(["agcm", "copy", "agent", "a.md", "--scope", "global"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_hook_arguments() {
        let cli = Cli::try_parse_from([
            "agcm", "copy", "hook", "--event", "PreToolUse", "--matcher", "*.ts", "--command",
            "tsc --noEmit", "--timeout", "30", "--scope", "user",
        ]);
        assert!(cli.is_ok());
    }
}
