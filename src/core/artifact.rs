//! Artifact kinds, scopes, and identities.
//!
//! An *artifact* is one configuration unit: an agent, a slash command, a hook,
//! an MCP server, or a skill. Agents and commands are single Markdown files,
//! skills are directories, and hooks and MCP servers are entries inside shared
//! JSON documents.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// The five artifact kinds the engine knows how to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// `.claude/agents/<name>.md`
    Agent,
    /// `.claude/commands/**/<name>.md`
    Command,
    /// Entry in `settings.json` under `hooks`
    Hook,
    /// Entry under `mcpServers` in `.mcp.json` or `~/.claude.json`
    Mcp,
    /// `.claude/skills/<name>/`
    Skill,
}

impl ArtifactKind {
    /// Lowercase name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Command => "command",
            Self::Hook => "hook",
            Self::Mcp => "mcp",
            Self::Skill => "skill",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an artifact lives: inside one project or in the user's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Stored under a registered project directory
    Project,
    /// Stored under the user's home directory
    User,
}

impl Scope {
    /// Lowercase name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" => Ok(Self::Project),
            "user" => Ok(Self::User),
            other => Err(ConfigError::validation(format!(
                "Invalid scope '{other}': expected 'project' or 'user'"
            ))),
        }
    }
}

/// The key that makes two artifacts "the same" for conflict detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ArtifactIdentity {
    /// Agents and commands: the file name (for commands, the path below `commands/`)
    File {
        /// Relative file name
        name: String,
    },
    /// Skills: the directory name
    Directory {
        /// Directory name
        name: String,
    },
    /// Hooks: the `(event, matcher, command)` triple
    Hook {
        /// Hook event
        event: String,
        /// Normalized matcher (`"*"` when absent)
        matcher: String,
        /// Command string
        command: String,
    },
    /// MCP servers: the server name
    McpServer {
        /// Server name
        name: String,
    },
}

impl ArtifactIdentity {
    /// The deduplication key for hooks (`event::matcher::command`), or the plain name otherwise.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::File { name } | Self::Directory { name } | Self::McpServer { name } => {
                name.clone()
            }
            Self::Hook { event, matcher, command } => format!("{event}::{matcher}::{command}"),
        }
    }
}
