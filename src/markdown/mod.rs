//! Markdown handling for agent, command, and skill definitions.
//!
//! Only the frontmatter matters to the copy engine: a source file is copied
//! byte-for-byte once its frontmatter has been validated.

pub mod frontmatter;

pub use frontmatter::{ParsedFrontmatter, parse, require_frontmatter};
