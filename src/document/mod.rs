//! Read-modify-write access to shared JSON configuration documents.
//!
//! Files such as `.claude/settings.json`, `.mcp.json`, and `~/.claude.json` are
//! owned by several tools at once. The engine only ever touches the keys it
//! owns (`hooks`, `mcpServers`) and must hand every other key back exactly as
//! it found it. [`JsonDocument`] therefore keeps the whole document as an
//! order-preserving [`JsonObject`] instead of a fixed struct.
//!
//! Every write goes through [`atomic_write`](crate::utils::fs::atomic_write):
//! content lands in `<path>.tmp` first and is renamed over the original, so a
//! reader never sees a half-written file. No lock is taken; two concurrent
//! writers race and the last rename wins.
//!
//! # Examples
//!
//! ```rust,no_run
//! use agcm::document::JsonDocument;
//! use serde_json::json;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), agcm::core::ConfigError> {
//! let mut doc = JsonDocument::load(Path::new(".mcp.json")).await?;
//! doc.object_mut("mcpServers")?.insert("github".into(), json!({"type": "http", "url": "https://example.com"}));
//! doc.save().await?;
//! # Ok(())
//! # }
//! ```

use crate::core::{ConfigError, FileOperation};
use crate::utils::fs::{JsonObject, parse_json_object, to_pretty_json, write_text_file};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A JSON document loaded from disk, ready to be mutated and saved atomically.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: PathBuf,
    root: JsonObject,
}

impl JsonDocument {
    /// Loads `path`, treating a missing file as an empty document.
    ///
    /// Parse failures abort: this is the primary document of an operation and
    /// guessing at its content could destroy user data on save.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_existing(path).await? {
            Some(doc) => Ok(doc),
            None => Ok(Self {
                path: path.to_path_buf(),
                root: JsonObject::new(),
            }),
        }
    }

    /// Loads `path`, returning `None` when the file does not exist.
    pub async fn load_existing(path: &Path) -> Result<Option<Self>, ConfigError> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(Self {
                path: path.to_path_buf(),
                root: parse_json_object(path, &content)?,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io(FileOperation::Read, path, e)),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document's top-level object.
    #[must_use]
    pub const fn root(&self) -> &JsonObject {
        &self.root
    }

    /// Mutable access to the top-level object.
    pub fn root_mut(&mut self) -> &mut JsonObject {
        &mut self.root
    }

    /// A top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// A top-level value that must be an object, if present.
    pub fn object(&self, key: &str) -> Result<Option<&JsonObject>, ConfigError> {
        match self.root.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(ConfigError::parse(&self.path, format!("'{key}' must be an object"))),
        }
    }

    /// A top-level object, created empty when absent.
    ///
    /// Fails with a parse error when the key holds something other than an object.
    pub fn object_mut(&mut self, key: &str) -> Result<&mut JsonObject, ConfigError> {
        let path = &self.path;
        match self.root.entry(key.to_string()).or_insert_with(|| Value::Object(JsonObject::new()))
        {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::parse(path, format!("'{key}' must be an object"))),
        }
    }

    /// Removes a top-level object key when it has no entries left.
    ///
    /// Returns `true` when the key was removed.
    pub fn remove_if_empty(&mut self, key: &str) -> bool {
        let empty = matches!(self.root.get(key), Some(Value::Object(map)) if map.is_empty());
        if empty {
            self.root.shift_remove(key);
        }
        empty
    }

    /// Renders the document exactly as [`save`](Self::save) would write it.
    pub fn render(&self) -> Result<String, ConfigError> {
        to_pretty_json(&self.root).map_err(|e| ConfigError::parse(&self.path, e))
    }

    /// Writes the document back atomically.
    pub async fn save(&self) -> Result<(), ConfigError> {
        let json = self.render()?;
        write_text_file(&self.path, &json).await?;
        tracing::debug!("Wrote {}", self.path.display());
        Ok(())
    }
}

/// Loads `path`, applies `mutate`, and saves the result atomically.
///
/// Nothing is written when `mutate` fails, so validation errors raised inside
/// the closure never touch the file.
pub async fn update_document<T, F>(path: &Path, mutate: F) -> Result<T, ConfigError>
where
    F: FnOnce(&mut JsonDocument) -> Result<T, ConfigError>,
{
    let mut doc = JsonDocument::load(path).await?;
    let output = mutate(&mut doc)?;
    doc.save().await?;
    Ok(output)
}
