//! Integration test suite for AGCM
//!
//! End-to-end tests that drive the copy & merge engine against real temp
//! directories laid out like a user's machine, plus CLI tests that run the
//! `agcm` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **atomicity**: temp-file + rename guarantees on write failure
//! - **cli**: the `agcm` binary, its JSON output, and exit codes
//! - **copy_files**: agents, commands, and skills, with every conflict strategy
//! - **hooks**: the three-tier hook merge as seen in settings files
//! - **mcp**: MCP server placement, updates, deletion, and reference scanning

mod atomicity;
mod cli;
mod copy_files;
mod hooks;
mod mcp;
