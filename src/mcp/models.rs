use crate::core::ConfigError;
use crate::utils::fs::JsonObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How the host tool talks to an MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Spawned process speaking over stdin/stdout
    Stdio,
    /// Streamable HTTP endpoint
    Http,
    /// Server-sent events endpoint
    Sse,
}

impl Transport {
    /// The value stored in the `type` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdio => "stdio",
            Self::Http => "http",
            Self::Sse => "sse",
        }
    }

    /// Whether the server is reached over the network.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Http | Self::Sse)
    }

    /// Fields that must not appear for this transport.
    #[must_use]
    pub const fn forbidden_fields(self) -> &'static [&'static str] {
        match self {
            Self::Stdio => &["url", "headers"],
            Self::Http | Self::Sse => &["command", "args", "env"],
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            "sse" => Ok(Self::Sse),
            other => Err(ConfigError::validation("Invalid MCP server configuration")
                .with_details(vec![format!("type '{other}' must be one of stdio, http, sse")])),
        }
    }
}

/// One MCP server entry under `mcpServers`.
///
/// Fields the engine does not interpret (`enabled`, `timeout`, `retries`, ...)
/// are kept in `other` and written back after the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpServerConfig {
    /// Transport type; inferred from `command`/`url` when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,

    /// Command to start the server (stdio)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Command arguments (stdio)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<Value>>,

    /// Environment for the server process (stdio)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<JsonObject>,

    /// Endpoint (http/sse)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request headers (http/sse)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<JsonObject>,

    /// Transport-agnostic and unknown fields
    #[serde(flatten)]
    pub other: JsonObject,
}

impl McpServerConfig {
    /// Parse a stored or incoming entry.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::validation("Invalid MCP server configuration")
                .with_details(vec!["configuration must be a JSON object".to_string()]));
        }
        serde_json::from_value(value.clone()).map_err(|e| {
            ConfigError::validation("Invalid MCP server configuration").with_details(vec![e.to_string()])
        })
    }

    /// Serialize to the stored form.
    pub fn to_value(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| {
            ConfigError::validation("Invalid MCP server configuration").with_details(vec![e.to_string()])
        })
    }

    /// The explicit or inferred transport.
    ///
    /// Without a `type`, a `command` means stdio and a `url` means http.
    pub fn transport(&self) -> Result<Transport, ConfigError> {
        match self.server_type.as_deref() {
            Some(t) => t.parse(),
            None if self.command.is_some() => Ok(Transport::Stdio),
            None if self.url.is_some() => Ok(Transport::Http),
            None => Err(ConfigError::validation("Invalid MCP server configuration")
                .with_details(vec!["either command (stdio) or url (http/sse) is required".to_string()])),
        }
    }

    fn has_field(&self, field: &str) -> bool {
        match field {
            "command" => self.command.is_some(),
            "args" => self.args.is_some(),
            "env" => self.env.is_some(),
            "url" => self.url.is_some(),
            "headers" => self.headers.is_some(),
            _ => false,
        }
    }

    fn clear_field(&mut self, field: &str) {
        match field {
            "command" => self.command = None,
            "args" => self.args = None,
            "env" => self.env = None,
            "url" => self.url = None,
            "headers" => self.headers = None,
            _ => {}
        }
    }

    /// Check the transport invariants, collecting every violation.
    pub fn validate(&self) -> Result<Transport, ConfigError> {
        let transport = self.transport()?;
        let mut details = Vec::new();

        if transport.is_remote() {
            if self.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                details.push(format!("url is required for {transport} servers"));
            }
        } else if self.command.as_deref().is_none_or(|c| c.trim().is_empty()) {
            details.push("command is required for stdio servers".to_string());
        }

        for field in transport.forbidden_fields() {
            if self.has_field(field) {
                details.push(format!("{field} is not allowed for {transport} servers"));
            }
        }

        if details.is_empty() {
            Ok(transport)
        } else {
            Err(ConfigError::validation("Invalid MCP server configuration").with_details(details))
        }
    }

    /// Drop fields that are invalid for `transport`, keeping everything else.
    pub fn clear_invalid_fields(&mut self, transport: Transport) {
        for field in transport.forbidden_fields() {
            self.clear_field(field);
        }
    }
}

/// Overlay `patch` onto a stored entry.
///
/// When the patch changes the transport, fields that the new transport forbids
/// are dropped from the stored entry first. Fields in the patch itself are
/// never dropped, so an inconsistent patch still fails validation.
pub fn apply_patch(existing: &Value, patch: &JsonObject) -> Result<McpServerConfig, ConfigError> {
    let mut base = McpServerConfig::from_value(existing)?;
    let incoming = McpServerConfig::from_value(&Value::Object(patch.clone()))?;

    let old_transport = base.transport().ok();
    let new_transport = match &incoming.server_type {
        Some(t) => Some(t.parse::<Transport>()?),
        None if incoming.command.is_some() && base.url.is_some() => Some(Transport::Stdio),
        None if incoming.url.is_some() && base.command.is_some() => Some(Transport::Http),
        None => None,
    };

    if let Some(new_transport) = new_transport
        && old_transport != Some(new_transport)
    {
        tracing::debug!(
            "Switching MCP transport from {} to {new_transport}",
            old_transport.map_or("unknown", Transport::as_str)
        );
        base.clear_invalid_fields(new_transport);
        if base.server_type.is_some() {
            base.server_type = Some(new_transport.to_string());
        }
    }

    let mut merged = base.to_value()?;
    if let Value::Object(map) = &mut merged {
        for (key, value) in patch {
            map.insert(key.clone(), value.clone());
        }
    }
    McpServerConfig::from_value(&merged)
}
