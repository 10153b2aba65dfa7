//! Test environment setup and management
//!
//! A [`TestEnvironment`] is a temp directory laid out like a user's machine:
//!
//! ```text
//! <temp>/home/                      user home (~/.claude, ~/.claude.json)
//! <temp>/work/source/               a registered source project
//! <temp>/work/target/               a registered target project
//! ```
//!
//! Both projects are registered in `~/.claude.json`, and the orchestrator is
//! wired to the same home, so tests exercise the real registry and resolver.

use crate::config::ClaudePaths;
use crate::copy::CopyOrchestrator;
use crate::hooks::HookDefaults;
use crate::projects::{ProjectIndex, encode_project_id};
use crate::resolver::PathResolver;
use anyhow::{Context, Result};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment with a home directory and two registered projects
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub home_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub source_id: String,
    pub target_id: String,
}

impl TestEnvironment {
    /// Create a new test environment
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let home_dir = temp_dir.path().join("home");
        let source_dir = temp_dir.path().join("work").join("source");
        let target_dir = temp_dir.path().join("work").join("target");

        for dir in [&home_dir, &source_dir, &target_dir] {
            fs::create_dir_all(dir)?;
        }

        let claude_json = json!({
            "numStartups": 3,
            "projects": {
                source_dir.to_string_lossy(): {"allowedTools": []},
                target_dir.to_string_lossy(): {"allowedTools": []},
            }
        });
        fs::write(home_dir.join(".claude.json"), serde_json::to_string_pretty(&claude_json)?)?;

        Ok(Self {
            source_id: encode_project_id(&source_dir),
            target_id: encode_project_id(&target_dir),
            temp_dir,
            home_dir,
            source_dir,
            target_dir,
        })
    }

    /// User-level locations rooted at the test home.
    pub fn paths(&self) -> ClaudePaths {
        ClaudePaths::new(&self.home_dir)
    }

    /// An orchestrator backed by the projects registered in `~/.claude.json`.
    pub async fn orchestrator(&self) -> Result<CopyOrchestrator> {
        let paths = self.paths();
        let index = ProjectIndex::load(&paths).await?;
        let resolver = PathResolver::new(paths, Arc::new(index));
        Ok(CopyOrchestrator::new(resolver, HookDefaults::default()))
    }

    /// Write a global `config.toml` pointing at the test home, for CLI runs.
    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("agcm").join("config.toml");
        let home = self.home_dir.to_string_lossy().replace('\\', "/");
        self.write(self.temp_dir.path(), "agcm/config.toml", &format!("home = \"{home}\"\n"))?;
        Ok(path)
    }

    /// Write a file relative to `root`, creating parent directories.
    pub fn write(&self, root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a JSON value relative to `root`.
    pub fn write_json(&self, root: &Path, relative: &str, value: &Value) -> Result<PathBuf> {
        self.write(root, relative, &serde_json::to_string_pretty(value)?)
    }

    /// Read and parse a JSON file.
    pub fn read_json(&self, path: &Path) -> Result<Value> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Whether `<path>.tmp` was left behind.
    pub fn has_temp_file(&self, path: &Path) -> bool {
        crate::utils::fs::temp_path_for(path).exists()
    }
}
