//! `agcm copy` - copy artifacts between projects and the user scope.
//!
//! ```bash
//! agcm copy agent ./.claude/agents/reviewer.md --scope user
//! agcm copy command ./.claude/commands/git/commit.md --scope project --project -work-api
//! agcm copy skill ./.claude/skills/pdf-tools --scope user --acknowledge-warnings
//! agcm copy hook --event PreToolUse --matcher '*.ts' --command 'tsc --noEmit' --scope user
//! agcm copy mcp github --json '{"command":"gh-mcp"}' --scope project --project -work-api
//! ```
//!
//! A conflict is reported as JSON; re-run with `--strategy skip|overwrite|rename`
//! to resolve it.

use super::common::{CommandContext, TargetArgs, absolute_source, parse_json_arg, print_json};
use crate::copy::CopyResult;
use crate::hooks::HookSpec;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Artifact kinds that can be copied.
#[derive(Subcommand, Debug)]
pub enum CopyCommand {
    /// Copy an agent definition file
    Agent(FileCopyArgs),
    /// Copy a slash-command file
    Command(FileCopyArgs),
    /// Copy a skill directory
    Skill(SkillCopyArgs),
    /// Merge a hook into the target settings
    Hook(HookCopyArgs),
    /// Add an MCP server definition
    Mcp(McpCopyArgs),
}

/// Arguments for copying a Markdown file.
#[derive(Args, Debug)]
pub struct FileCopyArgs {
    /// Source file
    pub source: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do if the target exists: skip, overwrite, or rename
    #[arg(long)]
    pub strategy: Option<String>,
}

/// Arguments for copying a skill.
#[derive(Args, Debug)]
pub struct SkillCopyArgs {
    /// Skill directory or its SKILL.md
    pub source: PathBuf,

    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do if the target exists: skip, overwrite, or rename
    #[arg(long)]
    pub strategy: Option<String>,

    /// Copy even though the skill ships executable scripts
    #[arg(long)]
    pub acknowledge_warnings: bool,
}

/// Arguments describing a hook.
#[derive(Args, Debug)]
pub struct HookCopyArgs {
    /// Hook event, e.g. PreToolUse
    #[arg(long)]
    pub event: String,

    /// Tool matcher (PreToolUse/PostToolUse only)
    #[arg(long)]
    pub matcher: Option<String>,

    /// Command line to run
    #[arg(long)]
    pub command: String,

    /// Timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Store the hook disabled
    #[arg(long)]
    pub disabled: bool,

    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do if the hook exists: skip or overwrite
    #[arg(long)]
    pub strategy: Option<String>,
}

/// Arguments for copying an MCP server.
#[derive(Args, Debug)]
pub struct McpCopyArgs {
    /// Server name
    pub name: String,

    /// Server configuration as JSON
    #[arg(long, value_name = "JSON")]
    pub json: String,

    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do if the server exists: skip or overwrite
    #[arg(long)]
    pub strategy: Option<String>,
}

impl CopyCommand {
    /// Run the copy and print its result. Returns whether it succeeded.
    pub async fn execute(self, ctx: &CommandContext) -> Result<bool> {
        let orchestrator = &ctx.orchestrator;
        let result = match self {
            Self::Agent(args) => {
                let source = absolute_source(&args.source)?;
                orchestrator.copy_agent(&source, &args.target.copy_options(args.strategy)).await
            }
            Self::Command(args) => {
                let source = absolute_source(&args.source)?;
                orchestrator.copy_command(&source, &args.target.copy_options(args.strategy)).await
            }
            Self::Skill(args) => {
                let source = absolute_source(&args.source)?;
                let mut options = args.target.copy_options(args.strategy);
                options.acknowledged_warnings = args.acknowledge_warnings;
                orchestrator.copy_skill(&source, &options).await
            }
            Self::Hook(args) => {
                let mut hook = HookSpec::new(args.event, args.matcher.as_deref(), args.command);
                hook.timeout = args.timeout;
                if args.disabled {
                    hook.enabled = Some(false);
                }
                orchestrator.copy_hook(&hook, &args.target.copy_options(args.strategy)).await
            }
            Self::Mcp(args) => {
                let config = parse_json_arg("--json", &args.json)?;
                let options = args.target.copy_options(args.strategy);
                orchestrator.copy_mcp_server(&args.name, &config, &options).await
            }
        };

        report(&result)?;
        Ok(result.is_success())
    }
}

fn report(result: &CopyResult) -> Result<()> {
    if let CopyResult::Failed(e) = result {
        tracing::debug!("Copy failed: {e}");
    }
    print_json(result)
}
