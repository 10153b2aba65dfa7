//! `agcm mcp` - list, update, remove, and trace MCP servers.

use super::common::{CommandContext, TargetArgs, parse_json_arg, print_json};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use serde_json::json;

/// MCP server management.
#[derive(Subcommand, Debug)]
pub enum McpCommand {
    /// List servers visible in a scope, with the file holding each
    List(McpListArgs),
    /// Patch a server's configuration, optionally renaming it
    Update(McpUpdateArgs),
    /// Remove a server and report anything still referencing it
    Remove(McpNameArgs),
    /// Show hooks and permission rules that mention a server
    References(McpNameArgs),
}

/// Arguments for `mcp list`.
#[derive(Args, Debug)]
pub struct McpListArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments naming one server.
#[derive(Args, Debug)]
pub struct McpNameArgs {
    /// Server name
    pub name: String,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for `mcp update`.
#[derive(Args, Debug)]
pub struct McpUpdateArgs {
    /// Current server name
    pub name: String,

    /// Fields to change, as a JSON object
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub patch: String,

    /// New server name
    #[arg(long, value_name = "NAME")]
    pub rename: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,
}

impl McpCommand {
    /// Run the command and print its result. Returns whether it succeeded.
    pub async fn execute(self, ctx: &CommandContext) -> Result<bool> {
        let orchestrator = &ctx.orchestrator;
        match self {
            Self::List(args) => {
                let target = &args.target;
                let servers = orchestrator.list_mcp_servers(target.scope, target.project_id()).await?;
                print_json(&servers)?;
                Ok(true)
            }
            Self::Update(args) => {
                let patch = parse_json_arg("--patch", &args.patch)?;
                let Some(patch) = patch.as_object() else {
                    bail!("--patch must be a JSON object");
                };
                let target = &args.target;
                let result = orchestrator
                    .update_mcp_server(
                        target.scope,
                        target.project_id(),
                        &args.name,
                        args.rename.as_deref(),
                        patch,
                    )
                    .await;
                print_json(&result)?;
                Ok(result.is_success())
            }
            Self::Remove(args) => {
                let target = &args.target;
                let result =
                    orchestrator.delete_mcp_server(target.scope, target.project_id(), &args.name).await;
                print_json(&result)?;
                Ok(result.success)
            }
            Self::References(args) => {
                let target = &args.target;
                let references = orchestrator
                    .find_mcp_references(target.scope, target.project_id(), &args.name)
                    .await?;
                print_json(&json!({ "server": args.name, "references": references }))?;
                Ok(true)
            }
        }
    }
}
