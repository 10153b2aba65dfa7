//! `agcm hooks` - remove individual hook commands.

use super::common::{CommandContext, TargetArgs, print_json};
use anyhow::Result;
use clap::{Args, Subcommand};

/// Hook management.
#[derive(Subcommand, Debug)]
pub enum HooksCommand {
    /// Remove one hook command, pruning groups and events it leaves empty
    Remove(HookRemoveArgs),
}

/// Identity of the hook to remove.
#[derive(Args, Debug)]
pub struct HookRemoveArgs {
    /// Hook event
    #[arg(long)]
    pub event: String,

    /// Group matcher (defaults to `*`)
    #[arg(long)]
    pub matcher: Option<String>,

    /// Command line of the hook
    #[arg(long)]
    pub command: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl HooksCommand {
    /// Run the command and print its result. Returns whether it succeeded.
    pub async fn execute(self, ctx: &CommandContext) -> Result<bool> {
        match self {
            Self::Remove(args) => {
                let result = ctx
                    .orchestrator
                    .delete_hook(
                        args.target.scope,
                        args.target.project_id(),
                        &args.event,
                        args.matcher.as_deref(),
                        &args.command,
                    )
                    .await;
                print_json(&result)?;
                Ok(result.success)
            }
        }
    }
}
