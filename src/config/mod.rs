//! Configuration for AGCM.
//!
//! Two kinds of configuration live here:
//!
//! 1. **Global configuration** (`~/.agcm/config.toml`, see [`global`]) - the
//!    tool's own settings: home directory override and hook defaults.
//! 2. **Well-known locations** ([`ClaudePaths`]) - where the host tool keeps its
//!    user-level files. Everything is derived from one home directory so that
//!    tests can point the whole engine at a temporary directory.
//!
//! # Locations
//!
//! | Path                        | Contents                                      |
//! |-----------------------------|-----------------------------------------------|
//! | `~/.claude.json`            | project registry and user-scope `mcpServers`  |
//! | `~/.claude/settings.json`   | user-scope hooks and permissions              |
//! | `~/.claude/agents/`         | user-scope agents                             |
//! | `~/.claude/commands/`       | user-scope slash commands                     |
//! | `~/.claude/skills/`         | user-scope skills                             |

pub mod global;

pub use global::{CONFIG_PATH_ENV, GlobalConfig, HookSettings};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the per-project and per-user configuration directory.
pub const CLAUDE_DIR: &str = ".claude";
/// Shared settings document inside [`CLAUDE_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";
/// Personal, uncommitted settings document inside [`CLAUDE_DIR`].
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";
/// Project-scope MCP server document at the project root.
pub const MCP_FILE: &str = ".mcp.json";
/// User-level document at the home root.
pub const CLAUDE_JSON_FILE: &str = ".claude.json";

/// The host tool's user-level locations, rooted at one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaudePaths {
    home: PathBuf,
}

impl ClaudePaths {
    /// Root every user-level path at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
        }
    }

    /// Use the home directory configured in `config`.
    pub fn from_config(config: &GlobalConfig) -> Result<Self> {
        Ok(Self::new(config.resolve_home()?))
    }

    /// The home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// `~/.claude`
    #[must_use]
    pub fn claude_dir(&self) -> PathBuf {
        self.home.join(CLAUDE_DIR)
    }

    /// `~/.claude.json`
    #[must_use]
    pub fn claude_json(&self) -> PathBuf {
        self.home.join(CLAUDE_JSON_FILE)
    }

    /// `~/.claude/settings.json`
    #[must_use]
    pub fn user_settings(&self) -> PathBuf {
        self.claude_dir().join(SETTINGS_FILE)
    }
}
