//! YAML frontmatter extraction for agent, command, and skill Markdown files.
//!
//! Frontmatter is a YAML block at the very start of a file, opened and closed
//! by a line containing exactly `---`:
//!
//! ```markdown
//! ---
//! name: reviewer
//! description: Reviews pull requests
//! ---
//!
//! You are a meticulous reviewer...
//! ```
//!
//! Extraction is done by `gray_matter` with an engine that hands back the raw
//! frontmatter text, which is then parsed with `serde_yaml`. `gray_matter`
//! accepts an opening delimiter that is never closed, so [`parse`] checks the
//! block's boundaries first and reports that case as an error.
//!
//! [`parse`] never fails; malformed input is reported through
//! [`ParsedFrontmatter::has_error`]. [`require_frontmatter`] is the strict form
//! the copy engine uses before writing anything.

use crate::core::ConfigError;
use gray_matter::{Matter, Pod, engine::Engine};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const DELIMITER: &str = "---";

/// `gray_matter` engine that returns the frontmatter text unparsed.
///
/// YAML errors are reported by `serde_yaml` afterwards, with its own messages.
struct RawFrontmatter;

impl Engine for RawFrontmatter {
    fn parse(content: &str) -> Result<Pod, gray_matter::Error> {
        Ok(Pod::String(content.to_string()))
    }
}

/// Result of splitting a Markdown document into frontmatter and body.
#[derive(Debug, Clone, Default)]
pub struct ParsedFrontmatter {
    /// Parsed YAML mapping, when present and valid.
    pub frontmatter: Option<Mapping>,
    /// Everything after the closing delimiter (the whole input when there is no frontmatter).
    pub body: String,
    /// Whether a frontmatter block was opened but could not be used.
    pub has_error: bool,
    /// Why the frontmatter block could not be used.
    pub parse_error: Option<String>,
}

impl ParsedFrontmatter {
    /// Whether a valid frontmatter block was found.
    #[must_use]
    pub fn has_frontmatter(&self) -> bool {
        self.frontmatter.is_some()
    }

    fn error(body: String, reason: String) -> Self {
        Self {
            frontmatter: None,
            body,
            has_error: true,
            parse_error: Some(reason),
        }
    }
}

/// Where the frontmatter block sits, if the document opens one.
enum Block {
    /// The first line is not a delimiter.
    Absent,
    /// Opened but no closing delimiter line follows.
    Unterminated,
    /// Opened and closed.
    Closed,
}

fn block(content: &str) -> Block {
    let mut lines = content.trim_start_matches('\u{feff}').lines();
    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return Block::Absent,
    }

    if lines.any(|line| line.trim_end() == DELIMITER) {
        Block::Closed
    } else {
        Block::Unterminated
    }
}

/// Split `content` into frontmatter and body.
#[must_use]
pub fn parse(content: &str) -> ParsedFrontmatter {
    match block(content) {
        Block::Absent => {
            return ParsedFrontmatter {
                body: content.to_string(),
                ..Default::default()
            };
        }
        Block::Unterminated => {
            return ParsedFrontmatter::error(
                content.to_string(),
                "frontmatter is not terminated by a closing '---' line".to_string(),
            );
        }
        Block::Closed => {}
    }

    let matter = Matter::<RawFrontmatter>::new();
    let (raw, body) = match matter.parse::<String>(content) {
        // An empty block yields no data.
        Ok(entity) => (entity.data.unwrap_or_default(), entity.content),
        Err(e) => {
            return ParsedFrontmatter::error(content.to_string(), format!("invalid frontmatter: {e}"));
        }
    };

    match serde_yaml::from_str::<Value>(&raw) {
        Ok(Value::Mapping(mapping)) => ParsedFrontmatter {
            frontmatter: Some(mapping),
            body,
            ..Default::default()
        },
        Ok(Value::Null) => ParsedFrontmatter {
            frontmatter: Some(Mapping::new()),
            body,
            ..Default::default()
        },
        Ok(_) => ParsedFrontmatter::error(body, "frontmatter must be a YAML mapping".to_string()),
        Err(e) => ParsedFrontmatter::error(body, format!("invalid YAML: {e}")),
    }
}

/// Parse `content` and fail unless it carries well-formed frontmatter.
pub fn require_frontmatter(path: &Path, content: &str) -> Result<ParsedFrontmatter, ConfigError> {
    let parsed = parse(content);
    if let Some(reason) = &parsed.parse_error {
        return Err(ConfigError::frontmatter(path, reason.clone()));
    }
    if !parsed.has_frontmatter() {
        return Err(ConfigError::frontmatter(path, "missing YAML frontmatter"));
    }
    Ok(parsed)
}
