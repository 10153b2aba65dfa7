use super::MCP_SERVERS_KEY;
use super::models::McpServerConfig;
use crate::core::ConfigError;
use crate::document::JsonDocument;
use crate::utils::fs::JsonObject;
use serde_json::Value;

/// A server entry read from a document.
pub fn get_server<'a>(doc: &'a JsonDocument, name: &str) -> Result<Option<&'a Value>, ConfigError> {
    Ok(doc.object(MCP_SERVERS_KEY)?.and_then(|servers| servers.get(name)))
}

/// Names of every server in a document, in stored order.
pub fn server_names(doc: &JsonDocument) -> Result<Vec<String>, ConfigError> {
    Ok(doc.object(MCP_SERVERS_KEY)?.map(|servers| servers.keys().cloned().collect()).unwrap_or_default())
}

/// Insert or replace a server, validating its transport first.
///
/// A replaced server keeps its position in `mcpServers`.
pub fn upsert_server(
    doc: &mut JsonDocument,
    name: &str,
    config: &McpServerConfig,
) -> Result<(), ConfigError> {
    config.validate()?;
    let value = config.to_value()?;
    doc.object_mut(MCP_SERVERS_KEY)?.insert(name.to_string(), value);
    tracing::debug!("Stored MCP server '{name}' in {}", doc.path().display());
    Ok(())
}

/// Remove a server, dropping `mcpServers` when it becomes empty.
///
/// Returns the removed entry.
pub fn remove_server(doc: &mut JsonDocument, name: &str) -> Result<Option<Value>, ConfigError> {
    if doc.object(MCP_SERVERS_KEY)?.is_none() {
        return Ok(None);
    }
    let removed = doc.object_mut(MCP_SERVERS_KEY)?.shift_remove(name);
    if removed.is_some() && doc.remove_if_empty(MCP_SERVERS_KEY) {
        tracing::debug!("Removed empty mcpServers from {}", doc.path().display());
    }
    Ok(removed)
}

/// Replace server `old_name` with `config` stored under `new_name`.
///
/// The entry keeps its position. Renaming onto another server of the same
/// document is a conflict.
pub fn rename_server(
    doc: &mut JsonDocument,
    old_name: &str,
    new_name: &str,
    config: &McpServerConfig,
) -> Result<(), ConfigError> {
    config.validate()?;
    let path = doc.path().to_path_buf();
    let value = config.to_value()?;
    let servers = doc.object_mut(MCP_SERVERS_KEY)?;

    if !servers.contains_key(old_name) {
        return Err(ConfigError::not_found("MCP server", old_name));
    }
    if old_name != new_name && servers.contains_key(new_name) {
        return Err(ConfigError::conflict(format!(
            "MCP server '{new_name}' already exists in {}",
            path.display()
        )));
    }

    let entries = std::mem::take(servers);
    let renamed: JsonObject = entries
        .into_iter()
        .map(|(key, existing)| {
            if key == old_name {
                (new_name.to_string(), value.clone())
            } else {
                (key, existing)
            }
        })
        .collect();
    *servers = renamed;
    Ok(())
}
