//! MCP (Model Context Protocol) server configuration.
//!
//! MCP servers live under an `mcpServers` object in one of several JSON
//! documents. This module covers:
//!
//! - [`models`] - the server entry, its transports, and their invariants
//! - [`location`] - which document holds, or should hold, a server
//! - [`operations`] - insert, rename, and remove on a loaded document
//! - [`references`] - mentions of a server in hooks and permission rules
//!
//! # Transport invariants
//!
//! | Transport | Requires  | Forbids                    |
//! |-----------|-----------|----------------------------|
//! | `stdio`   | `command` | `url`, `headers`           |
//! | `http`    | `url`     | `command`, `args`, `env`   |
//! | `sse`     | `url`     | `command`, `args`, `env`   |
//!
//! Without a `type`, an entry with `command` is stdio and one with `url` is http.

pub mod location;
pub mod models;
pub mod operations;
pub mod references;

#[cfg(test)]
mod tests;

/// Top-level key holding MCP servers.
pub const MCP_SERVERS_KEY: &str = "mcpServers";

pub use location::{McpLocationReconciler, McpServerEntry};
pub use models::{McpServerConfig, Transport, apply_patch};
pub use operations::{get_server, remove_server, rename_server, server_names, upsert_server};
pub use references::{Reference, ReferenceKind, ReferenceScanner, permission_matches};
