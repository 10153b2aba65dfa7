//! Markdown and JSON fixtures for tests.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A Markdown source file to be written under some root.
#[derive(Debug, Clone)]
pub struct MarkdownFixture {
    /// Path relative to the root it is written under
    pub path: String,
    /// Full file content
    pub content: String,
}

impl MarkdownFixture {
    /// Agent definition at `.claude/agents/<name>.md`.
    pub fn agent(name: &str) -> Self {
        Self {
            path: format!(".claude/agents/{name}.md"),
            content: format!(
                r#"---
name: {name}
description: "Test agent: {name}"
tools: Read, Grep
---

# {name}

You review code changes and point out problems.
"#
            ),
        }
    }

    /// Slash command at `.claude/commands/<subpath>`.
    pub fn command(subpath: &str) -> Self {
        Self {
            path: format!(".claude/commands/{subpath}"),
            content: format!(
                r#"---
description: "Test command {subpath}"
allowed-tools: Bash(git:*)
---

Run the {subpath} workflow for $ARGUMENTS.
"#
            ),
        }
    }

    /// A skill's `SKILL.md` at `.claude/skills/<name>/SKILL.md`.
    pub fn skill(name: &str) -> Self {
        Self {
            path: format!(".claude/skills/{name}/SKILL.md"),
            content: format!(
                r#"---
name: {name}
description: Test skill {name}
---

# {name}

Instructions for the skill.
"#
            ),
        }
    }

    /// Markdown without frontmatter.
    pub fn plain(path: &str) -> Self {
        Self {
            path: path.to_string(),
            content: "# Heading\n\nNo frontmatter here.\n".to_string(),
        }
    }

    /// Write the fixture under `root`, returning the absolute path.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}
