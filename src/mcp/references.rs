//! Finding mentions of an MCP server before it is deleted.
//!
//! Two kinds of mention are reported:
//!
//! - a hook whose `command` contains the server name (case-insensitive)
//! - a permission rule in `allow`, `deny`, or `ask` that is exactly
//!   `mcp__<name>` or starts with `mcp__<name>__`
//!
//! Findings are advisory. Files are scanned concurrently, and a missing or
//! unparseable file contributes nothing instead of failing the scan.

use crate::document::JsonDocument;
use crate::hooks::group_matcher;
use crate::hooks::merge::HOOKS_KEY;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Permission lists that may name MCP tools.
pub const PERMISSION_LISTS: [&str; 3] = ["allow", "deny", "ask"];

/// Where a server is mentioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReferenceKind {
    /// A hook command mentions the server
    Hook {
        /// Hook event
        event: String,
        /// Group matcher (`"*"` when absent)
        matcher: String,
        /// The command text
        command: String,
    },
    /// A permission rule names one of the server's tools
    Permission {
        /// `allow`, `deny`, or `ask`
        list: String,
        /// The rule text
        rule: String,
    },
}

/// One mention of a server in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// File containing the mention
    pub file: PathBuf,
    /// What mentions the server
    #[serde(flatten)]
    pub kind: ReferenceKind,
}

/// Whether a permission rule targets server `name`.
#[must_use]
pub fn permission_matches(rule: &str, name: &str) -> bool {
    let exact = format!("mcp__{name}");
    rule == exact || rule.starts_with(&format!("{exact}__"))
}

/// Scans settings documents for mentions of a server.
pub struct ReferenceScanner;

impl ReferenceScanner {
    /// Find every reference to `server_name` across `config_paths`.
    ///
    /// Results keep the order of `config_paths`.
    pub async fn find_references(server_name: &str, config_paths: &[PathBuf]) -> Vec<Reference> {
        let scans = config_paths.iter().map(|path| Self::scan_file(server_name, path));
        join_all(scans).await.into_iter().flatten().collect()
    }

    async fn scan_file(server_name: &str, path: &Path) -> Vec<Reference> {
        match JsonDocument::load_existing(path).await {
            Ok(Some(doc)) => Self::scan_document(server_name, &doc),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Skipping {} during reference scan: {e}", path.display());
                Vec::new()
            }
        }
    }

    /// Find references inside one loaded document.
    #[must_use]
    pub fn scan_document(server_name: &str, doc: &JsonDocument) -> Vec<Reference> {
        let mut found = Vec::new();
        let needle = server_name.to_lowercase();
        let file = doc.path().to_path_buf();

        if let Some(Value::Object(events)) = doc.get(HOOKS_KEY) {
            for (event, groups) in events {
                for group in groups.as_array().into_iter().flatten() {
                    let commands = group.get("hooks").and_then(Value::as_array);
                    for command in commands.into_iter().flatten() {
                        let Some(text) = command.get("command").and_then(Value::as_str) else {
                            continue;
                        };
                        if text.to_lowercase().contains(&needle) {
                            found.push(Reference {
                                file: file.clone(),
                                kind: ReferenceKind::Hook {
                                    event: event.clone(),
                                    matcher: group_matcher(group).to_string(),
                                    command: text.to_string(),
                                },
                            });
                        }
                    }
                }
            }
        }

        if let Some(Value::Object(permissions)) = doc.get("permissions") {
            for list in PERMISSION_LISTS {
                let rules = permissions.get(list).and_then(Value::as_array);
                for rule in rules.into_iter().flatten().filter_map(Value::as_str) {
                    if permission_matches(rule, server_name) {
                        found.push(Reference {
                            file: file.clone(),
                            kind: ReferenceKind::Permission {
                                list: list.to_string(),
                                rule: rule.to_string(),
                            },
                        });
                    }
                }
            }
        }

        found
    }
}
