//! Hook definitions for the host tool's `settings.json`.
//!
//! Hooks are stored under the `hooks` key as a three-level tree:
//!
//! ```json
//! {
//!   "hooks": {
//!     "PreToolUse": [
//!       {
//!         "matcher": "Bash",
//!         "hooks": [
//!           { "type": "command", "command": "echo pre", "enabled": true, "timeout": 60 }
//!         ]
//!       }
//!     ],
//!     "SessionStart": [
//!       { "hooks": [ { "type": "command", "command": "load-context.sh" } ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Events map to ordered matcher groups, and each group holds an ordered list of
//! commands. A group whose matcher is `"*"` omits the `matcher` field. The
//! [`merge`] module implements insertion, replacement, and removal on that tree.

pub mod merge;

pub use merge::{MergeOutcome, build_command, find_hook, group_matcher, merge_hook, remove_hook, replace_hook};

use crate::core::{ArtifactIdentity, ConfigError};
use crate::utils::fs::JsonObject;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Matcher value that applies a group to every tool.
pub const WILDCARD_MATCHER: &str = "*";

/// Hook event types supported by the host tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookEvent {
    /// Before a tool is executed
    PreToolUse,
    /// After a tool has been executed
    PostToolUse,
    /// When the tool needs permission or input is idle
    Notification,
    /// When the user submits a prompt
    UserPromptSubmit,
    /// When the main agent finishes responding
    Stop,
    /// When a subagent finishes responding
    SubagentStop,
    /// Before a compact operation
    PreCompact,
    /// When starting or resuming a session
    SessionStart,
    /// When a session ends
    SessionEnd,
}

impl HookEvent {
    /// Every event, in the order the host tool documents them.
    pub const ALL: [Self; 9] = [
        Self::PreToolUse,
        Self::PostToolUse,
        Self::Notification,
        Self::UserPromptSubmit,
        Self::Stop,
        Self::SubagentStop,
        Self::PreCompact,
        Self::SessionStart,
        Self::SessionEnd,
    ];

    /// The name used as a key under `hooks`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::Notification => "Notification",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::Stop => "Stop",
            Self::SubagentStop => "SubagentStop",
            Self::PreCompact => "PreCompact",
            Self::SessionStart => "SessionStart",
            Self::SessionEnd => "SessionEnd",
        }
    }

    /// Whether groups under this event can filter by tool name.
    #[must_use]
    pub const fn supports_matcher(self) -> bool {
        matches!(self, Self::PreToolUse | Self::PostToolUse)
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookEvent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|event| event.as_str() == s).ok_or_else(|| {
            ConfigError::validation(format!("Unknown hook event '{s}'"))
                .with_details(vec![event_list_detail()])
        })
    }
}

fn event_list_detail() -> String {
    let names: Vec<&str> = HookEvent::ALL.iter().map(|e| e.as_str()).collect();
    format!("event must be one of: {}", names.join(", "))
}

/// Values written into new commands when the caller does not supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookDefaults {
    /// Seconds before the host tool kills the command
    pub timeout: u64,
    /// Whether the command starts enabled
    pub enabled: bool,
}

impl Default for HookDefaults {
    fn default() -> Self {
        Self {
            timeout: 60,
            enabled: true,
        }
    }
}

/// A hook as supplied by a caller, before validation.
///
/// Unknown fields are kept and written after the known ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpec {
    /// Event name, one of [`HookEvent::ALL`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Tool matcher (`"*"` when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    /// Hook type (`"command"` when absent)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hook_type: Option<String>,
    /// Command line to run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Whether the command is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Any other fields
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl HookSpec {
    /// A command hook for `event` with the given matcher.
    pub fn new(event: impl Into<String>, matcher: Option<&str>, command: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            matcher: matcher.map(str::to_string),
            command: Some(command.into()),
            ..Default::default()
        }
    }

    /// Check every field, collecting all problems into one validation error.
    pub fn validate(&self) -> Result<ValidatedHook, ConfigError> {
        let mut details = Vec::new();

        let event = match self.event.as_deref().map(str::trim) {
            None | Some("") => {
                details.push("event is required".to_string());
                None
            }
            Some(name) => match name.parse::<HookEvent>() {
                Ok(event) => Some(event),
                Err(_) => {
                    details.push(format!("unknown event '{name}'"));
                    details.push(event_list_detail());
                    None
                }
            },
        };

        let command = match self.command.as_deref() {
            Some(command) if !command.trim().is_empty() => Some(command.to_string()),
            _ => {
                details.push("command is required".to_string());
                None
            }
        };

        if self.hook_type.as_deref().is_some_and(|t| t.trim().is_empty()) {
            details.push("type must not be empty".to_string());
        }
        if self.timeout == Some(0) {
            details.push("timeout must be a positive number of seconds".to_string());
        }

        let (Some(event), Some(command)) = (event, command) else {
            return Err(ConfigError::validation("Invalid hook").with_details(details));
        };
        if !details.is_empty() {
            return Err(ConfigError::validation("Invalid hook").with_details(details));
        }

        let mut warnings = Vec::new();
        let matcher = self.matcher.as_deref().map(str::trim).filter(|m| !m.is_empty());
        let matcher = match matcher {
            Some(m) if !event.supports_matcher() => {
                let warning = format!(
                    "Matcher '{m}' ignored: {event} hooks do not support matchers"
                );
                tracing::warn!("{warning}");
                warnings.push(warning);
                None
            }
            other => other.map(str::to_string),
        };

        Ok(ValidatedHook {
            event,
            matcher,
            hook_type: self.hook_type.clone().unwrap_or_else(|| "command".to_string()),
            command,
            enabled: self.enabled,
            timeout: self.timeout,
            extra: self.extra.clone(),
            warnings,
        })
    }
}

/// A hook that passed validation and is ready to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedHook {
    /// Target event
    pub event: HookEvent,
    /// Matcher exactly as the caller supplied it; `None` means `"*"`
    pub matcher: Option<String>,
    /// Hook type
    pub hook_type: String,
    /// Command line
    pub command: String,
    /// Caller-supplied `enabled`
    pub enabled: Option<bool>,
    /// Caller-supplied `timeout`
    pub timeout: Option<u64>,
    /// Extra fields, written after the known ones
    pub extra: JsonObject,
    /// Non-fatal problems found during validation
    pub warnings: Vec<String>,
}

impl ValidatedHook {
    /// The matcher used for grouping.
    #[must_use]
    pub fn effective_matcher(&self) -> &str {
        self.matcher.as_deref().unwrap_or(WILDCARD_MATCHER)
    }

    /// The `(event, matcher, command)` identity.
    #[must_use]
    pub fn identity(&self) -> ArtifactIdentity {
        ArtifactIdentity::Hook {
            event: self.event.to_string(),
            matcher: self.effective_matcher().to_string(),
            command: self.command.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_event_parsing() {
        for event in HookEvent::ALL {
            assert_eq!(event.as_str().parse::<HookEvent>().unwrap(), event);
        }
        let err = "OnSave".parse::<HookEvent>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(HookEvent::PreToolUse.supports_matcher());
        assert!(!HookEvent::Stop.supports_matcher());
    }

    #[test]
    fn test_validate_collects_all_problems() {
        let err = HookSpec::default().validate().unwrap_err();
        assert_eq!(err.details(), ["event is required", "command is required"]);

        let spec = HookSpec {
            event: Some("OnSave".into()),
            command: Some("x".into()),
            timeout: Some(0),
            ..Default::default()
        };
        let err = spec.validate().unwrap_err();
        assert!(err.details().iter().any(|d| d.starts_with("unknown event")));
        assert!(err.details().iter().any(|d| d.starts_with("timeout")));
    }

    #[test]
    fn test_matcher_ignored_for_non_tool_events() {
        let hook = HookSpec::new("SessionStart", Some("Bash"), "echo hi").validate().unwrap();
        assert!(hook.matcher.is_none());
        assert_eq!(hook.warnings.len(), 1);
        assert_eq!(hook.effective_matcher(), "*");
    }

    #[test]
    fn test_identity_uses_wildcard_when_matcher_absent() {
        let hook = HookSpec::new("Stop", None, "notify-send done").validate().unwrap();
        assert_eq!(hook.identity().key(), "Stop::*::notify-send done");
    }

    #[test]
    fn test_extra_fields_round_trip_through_serde() {
        let spec: HookSpec = serde_json::from_value(serde_json::json!({
            "event": "PreToolUse",
            "matcher": "Write",
            "command": "lint",
            "description": "Lint before writing"
        }))
        .unwrap();
        assert_eq!(spec.extra["description"], "Lint before writing");
        assert_eq!(spec.validate().unwrap().extra.len(), 1);
    }
}
