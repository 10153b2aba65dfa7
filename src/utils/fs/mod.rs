//! File system utilities for the copy & merge engine.
//!
//! # Key Features
//!
//! - **Atomic operations**: files are written to `<path>.tmp` and renamed into place
//! - **Safety**: traversal and null-byte checks on every user-supplied path
//! - **Order-preserving JSON**: documents round-trip without reordering keys
//!
//! # Examples
//!
//! ```rust,no_run
//! use agcm::utils::fs::{atomic_write, check_path_input, ensure_within};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), agcm::core::ConfigError> {
//! check_path_input("/projects/app/.claude/agents/reviewer.md")?;
//! let target = ensure_within(Path::new("/home/me"), Path::new("/home/me/.claude/agents/reviewer.md"))?;
//! atomic_write(&target, b"---\nname: reviewer\n---\n").await?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod formats;
pub mod metadata;
pub mod paths;

// Atomic write operations
pub use atomic::{atomic_write, safe_write, temp_path_for};

// Directory operations
pub use dirs::{copy_dir, ensure_dir, remove_dir_all};

// Path utilities
pub use paths::{check_path_input, check_segment, ensure_within, is_safe_path, normalize_path};

// Metadata operations
pub use metadata::{get_modified_time, modified_rfc3339, path_exists};

// Format-specific I/O
pub use formats::{JsonObject, parse_json_object, to_pretty_json, write_text_file};
