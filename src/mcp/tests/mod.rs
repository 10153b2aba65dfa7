use crate::config::ClaudePaths;
use crate::mcp::McpLocationReconciler;
use crate::projects::ProjectIndex;
use crate::resolver::PathResolver;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test helper: a home directory with one registered project that has a `.claude` directory.
pub(crate) struct McpFixture {
    pub temp: TempDir,
    pub project: PathBuf,
    pub project_id: String,
    pub reconciler: McpLocationReconciler,
}

pub(crate) fn setup_project() -> Result<McpFixture> {
    let temp = TempDir::new()?;
    let project = temp.path().join("projects").join("app");
    std::fs::create_dir_all(project.join(".claude"))?;

    let mut index = ProjectIndex::default();
    let project_id = index.insert(&project);
    let resolver = PathResolver::new(ClaudePaths::new(temp.path()), Arc::new(index));

    Ok(McpFixture {
        temp,
        project,
        project_id,
        reconciler: McpLocationReconciler::new(resolver),
    })
}
