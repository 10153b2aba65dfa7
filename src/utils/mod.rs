//! Utilities shared across the engine.
//!
//! - [`fs`] - atomic writes, path safety checks, and JSON/text I/O

pub mod fs;

pub use fs::{atomic_write, ensure_dir, normalize_path, safe_write};
