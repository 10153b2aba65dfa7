//! Project registry lookups.
//!
//! The engine never discovers projects itself. It asks a [`ProjectRegistry`] to
//! turn a project id into a directory. [`ProjectIndex`] is the registry used by
//! the CLI: it reads the `projects` map of `~/.claude.json`, whose keys are the
//! absolute paths of every project the host tool has opened.
//!
//! A project id is the project's absolute path with every character that is
//! not ASCII alphanumeric replaced by `-`, so `/Users/me/app` becomes
//! `-Users-me-app`.
//!
//! The encoding is lossy: `/x/my-app` and `/x/my/app` share an id. Such an id
//! is ambiguous and [`ProjectIndex`] refuses to resolve it.

use crate::config::ClaudePaths;
use crate::core::ConfigError;
use crate::document::JsonDocument;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A registered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    /// Encoded project id
    pub id: String,
    /// Project root directory
    pub path: PathBuf,
    /// Whether the directory currently exists
    pub exists: bool,
}

/// Lookup of registered projects by id.
pub trait ProjectRegistry: Send + Sync {
    /// Find a project by id.
    fn find(&self, project_id: &str) -> Option<ProjectEntry>;
}

/// Encode a project path into its id.
#[must_use]
pub fn encode_project_id(path: &Path) -> String {
    path.to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// In-memory registry keyed by project id.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    projects: BTreeMap<String, PathBuf>,
    /// Ids shared by more than one distinct path.
    ambiguous: BTreeSet<String>,
}

impl ProjectIndex {
    /// Build an index from project root paths.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut index = Self::default();
        for path in paths {
            index.insert(path);
        }
        index
    }

    /// Build an index from the `projects` map of `~/.claude.json`.
    ///
    /// A missing file is an empty registry. An unreadable file is logged and
    /// treated the same way, since the registry is only used for lookups.
    pub async fn load(paths: &ClaudePaths) -> Result<Self, ConfigError> {
        let path = paths.claude_json();
        let doc = match JsonDocument::load_existing(&path).await {
            Ok(Some(doc)) => doc,
            Ok(None) => return Ok(Self::default()),
            Err(e @ ConfigError::Parse { .. }) => {
                tracing::warn!("Ignoring project registry: {e}");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let index = match doc.object("projects") {
            Ok(Some(projects)) => Self::from_paths(projects.keys().map(PathBuf::from)),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring project registry: {e}");
                Self::default()
            }
        };
        tracing::debug!("Loaded {} projects from {}", index.len(), path.display());
        Ok(index)
    }

    /// Register one more project path.
    ///
    /// Registering a second, different path under an existing id marks the id
    /// ambiguous; it is logged and no longer resolves.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> String {
        let path = path.into();
        let id = encode_project_id(&path);
        match self.projects.get(&id) {
            Some(existing) if *existing != path => {
                tracing::warn!(
                    "Project id {id} is shared by {} and {}; it will not be resolved",
                    existing.display(),
                    path.display()
                );
                self.ambiguous.insert(id.clone());
            }
            Some(_) => {}
            None => {
                self.projects.insert(id.clone(), path);
            }
        }
        id
    }

    /// Whether `project_id` is shared by several project paths.
    #[must_use]
    pub fn is_ambiguous(&self, project_id: &str) -> bool {
        self.ambiguous.contains(project_id)
    }

    /// Number of resolvable projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len() - self.ambiguous.len()
    }

    /// Whether no projects are resolvable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All resolvable projects.
    pub fn entries(&self) -> impl Iterator<Item = ProjectEntry> + '_ {
        self.projects
            .iter()
            .filter(|(id, _)| !self.ambiguous.contains(*id))
            .map(|(id, path)| ProjectEntry {
                id: id.clone(),
                path: path.clone(),
                exists: path.is_dir(),
            })
    }
}

impl ProjectRegistry for ProjectIndex {
    fn find(&self, project_id: &str) -> Option<ProjectEntry> {
        if self.is_ambiguous(project_id) {
            return None;
        }
        self.projects.get(project_id).map(|path| ProjectEntry {
            id: project_id.to_string(),
            path: path.clone(),
            exists: path.is_dir(),
        })
    }
}
