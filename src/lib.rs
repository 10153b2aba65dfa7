//! AGCM - configuration copy & merge engine for Claude Code
//!
//! Claude Code keeps agents, slash commands, skills, hooks, and MCP server
//! definitions in Markdown files and JSON documents spread across each project
//! and the user's home directory. AGCM copies those artifacts between projects
//! and the user scope without damaging the documents they live in.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌────────────────────┐
//!   CopyRequest ──────► │  CopyOrchestrator  │ ──────► CopyResult / DeleteResult
//!                       └─────────┬──────────┘
//!        ┌───────────────┬────────┴──────┬──────────────────┬──────────────────┐
//!   PathResolver  ConflictDetector  HookMergeTree  McpLocationReconciler  ReferenceScanner
//!        │                                 └─────────┬────────┘
//!   ProjectRegistry                             JsonDocument (atomic writes)
//! ```
//!
//! Every operation re-reads its backing file, mutates it in memory, and writes
//! it back through a temp-file + rename. Keys the engine does not own are
//! preserved in their original order.
//!
//! # Core Modules
//!
//! - [`copy`] - the orchestrator and its uniform result shapes
//! - [`resolver`] - target path resolution with traversal protection
//! - [`conflict`] - conflict detection and the skip/overwrite/rename strategies
//! - [`document`] - order-preserving JSON documents with atomic save
//! - [`hooks`] - hook validation and the event → matcher → command merge
//! - [`mcp`] - MCP server models, locations, and reference scanning
//! - [`skills`] - skill directory inspection and copying
//!
//! # Supporting Modules
//!
//! - [`cli`] - the `agcm` command-line front end
//! - [`config`] - global configuration (`~/.agcm/config.toml`) and well-known paths
//! - [`core`] - error taxonomy and artifact types
//! - [`markdown`] - frontmatter parsing
//! - [`projects`] - project registry backed by `~/.claude.json`
//! - [`utils`] - atomic writes, path checks, and file helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use agcm::config::ClaudePaths;
//! use agcm::copy::{CopyOptions, CopyOrchestrator};
//! use agcm::core::Scope;
//! use agcm::hooks::{HookDefaults, HookSpec};
//! use agcm::projects::ProjectIndex;
//! use agcm::resolver::PathResolver;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), agcm::core::ConfigError> {
//! let paths = ClaudePaths::new("/home/me");
//! let projects = ProjectIndex::load(&paths).await?;
//! let orchestrator = CopyOrchestrator::new(
//!     PathResolver::new(paths, Arc::new(projects)),
//!     HookDefaults::default(),
//! );
//!
//! let hook = HookSpec::new("PreToolUse", Some("*.ts"), "tsc --noEmit");
//! let result = orchestrator.copy_hook(&hook, &CopyOptions::new(Scope::User, None)).await;
//! assert!(result.is_success());
//! # Ok(())
//! # }
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod conflict;
pub mod copy;
pub mod core;
pub mod resolver;

// Documents and artifact types
pub mod document;
pub mod hooks;
pub mod markdown;
pub mod mcp;
pub mod skills;

// Supporting modules
pub mod projects;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
