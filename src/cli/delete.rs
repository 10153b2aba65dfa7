//! `agcm delete` - delete agents, commands, and skills.

use super::common::{CommandContext, TargetArgs, print_json};
use anyhow::Result;
use clap::{Args, Subcommand};

/// File-based artifacts that can be deleted.
#[derive(Subcommand, Debug)]
pub enum DeleteCommand {
    /// Delete an agent by file name (`reviewer.md`)
    Agent(DeleteArgs),
    /// Delete a command by its path below `commands/` (`git/commit.md`)
    Command(DeleteArgs),
    /// Delete a skill directory by name
    Skill(DeleteArgs),
}

/// The artifact to delete.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Artifact name
    pub name: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl DeleteCommand {
    /// Run the deletion and print its result. Returns whether it succeeded.
    pub async fn execute(self, ctx: &CommandContext) -> Result<bool> {
        let orchestrator = &ctx.orchestrator;
        let result = match self {
            Self::Agent(args) => {
                orchestrator.delete_agent(args.target.scope, args.target.project_id(), &args.name).await
            }
            Self::Command(args) => {
                orchestrator.delete_command(args.target.scope, args.target.project_id(), &args.name).await
            }
            Self::Skill(args) => {
                orchestrator.delete_skill(args.target.scope, args.target.project_id(), &args.name).await
            }
        };
        print_json(&result)?;
        Ok(result.success)
    }
}
