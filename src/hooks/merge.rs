//! Three-tier structural merge of hooks into a settings document.
//!
//! The tiers are event → matcher group → command. A command is identified by
//! `event::matcher::command`, and merging a command that already exists is a
//! no-op. Only the `hooks` key of the document is touched.

use super::{HookDefaults, HookEvent, ValidatedHook, WILDCARD_MATCHER};
use crate::core::ConfigError;
use crate::document::JsonDocument;
use crate::utils::fs::JsonObject;
use serde_json::Value;

/// Top-level key holding the hook tree.
pub const HOOKS_KEY: &str = "hooks";

/// What a merge did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new command was appended
    Added,
    /// An identical command already existed; nothing changed
    Duplicate,
    /// An existing command was replaced in place
    Replaced,
}

impl MergeOutcome {
    /// Whether the document needs to be written back.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Duplicate)
    }
}

/// The matcher a stored group applies to; absent or empty means `"*"`.
#[must_use]
pub fn group_matcher(group: &Value) -> &str {
    group.get("matcher").and_then(Value::as_str).filter(|m| !m.is_empty()).unwrap_or(WILDCARD_MATCHER)
}

/// Build the stored form of a command: `type`, `command`, `enabled`, `timeout`, then extras.
#[must_use]
pub fn build_command(hook: &ValidatedHook, defaults: &HookDefaults) -> Value {
    let mut command = JsonObject::new();
    command.insert("type".into(), Value::String(hook.hook_type.clone()));
    command.insert("command".into(), Value::String(hook.command.clone()));
    command.insert("enabled".into(), Value::Bool(hook.enabled.unwrap_or(defaults.enabled)));
    command.insert("timeout".into(), Value::from(hook.timeout.unwrap_or(defaults.timeout)));
    for (key, value) in &hook.extra {
        if !command.contains_key(key) {
            command.insert(key.clone(), value.clone());
        }
    }
    Value::Object(command)
}

fn malformed(doc_path: &std::path::Path, what: &str) -> ConfigError {
    ConfigError::parse(doc_path, format!("malformed hooks section: {what}"))
}

/// The `hooks` object of a document, if present.
fn hooks_object(doc: &JsonDocument) -> Result<Option<&JsonObject>, ConfigError> {
    doc.object(HOOKS_KEY)
}

/// Find a stored command by identity.
pub fn find_hook<'a>(
    doc: &'a JsonDocument,
    event: HookEvent,
    matcher: &str,
    command: &str,
) -> Result<Option<&'a Value>, ConfigError> {
    let Some(hooks) = hooks_object(doc)? else {
        return Ok(None);
    };
    let Some(groups) = hooks.get(event.as_str()).and_then(Value::as_array) else {
        return Ok(None);
    };

    Ok(groups
        .iter()
        .filter(|group| group_matcher(group) == matcher)
        .filter_map(|group| group.get("hooks").and_then(Value::as_array))
        .flatten()
        .find(|entry| entry.get("command").and_then(Value::as_str) == Some(command)))
}

/// Put `matcher` first in a group that lacks it.
fn add_matcher_field(group: &mut JsonObject, matcher: &str) {
    let rest = std::mem::take(group);
    group.insert("matcher".into(), Value::String(matcher.to_string()));
    group.extend(rest);
}

/// Find or create the group for `hook`, returning its command list.
fn group_commands<'a>(
    doc: &'a mut JsonDocument,
    hook: &ValidatedHook,
) -> Result<&'a mut Vec<Value>, ConfigError> {
    let path = doc.path().to_path_buf();
    let matcher = hook.effective_matcher();
    let explicit_wildcard = hook.matcher.as_deref() == Some(WILDCARD_MATCHER);

    let hooks = doc.object_mut(HOOKS_KEY)?;
    let groups = hooks
        .entry(hook.event.as_str().to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| malformed(&path, &format!("'{}' is not an array", hook.event)))?;

    let index = match groups.iter().position(|group| group_matcher(group) == matcher) {
        Some(index) => index,
        None => {
            let mut group = JsonObject::new();
            if matcher != WILDCARD_MATCHER {
                group.insert("matcher".into(), Value::String(matcher.to_string()));
            }
            group.insert("hooks".into(), Value::Array(Vec::new()));
            groups.push(Value::Object(group));
            groups.len() - 1
        }
    };

    let group = groups[index]
        .as_object_mut()
        .ok_or_else(|| malformed(&path, &format!("'{}' group is not an object", hook.event)))?;

    if explicit_wildcard && !group.contains_key("matcher") {
        tracing::debug!("Adding explicit '*' matcher to existing {} group", hook.event);
        add_matcher_field(group, WILDCARD_MATCHER);
    }

    group
        .entry("hooks")
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| malformed(&path, &format!("'{}' group hooks is not an array", hook.event)))
}

/// Merge one hook into the document.
///
/// An existing command with the same identity is left untouched, including
/// its `enabled` and `timeout`.
pub fn merge_hook(
    doc: &mut JsonDocument,
    hook: &ValidatedHook,
    defaults: &HookDefaults,
) -> Result<MergeOutcome, ConfigError> {
    let commands = group_commands(doc, hook)?;
    let exists = commands
        .iter()
        .any(|entry| entry.get("command").and_then(Value::as_str) == Some(hook.command.as_str()));

    if exists {
        tracing::debug!("Hook already present: {}", hook.identity().key());
        return Ok(MergeOutcome::Duplicate);
    }

    commands.push(build_command(hook, defaults));
    Ok(MergeOutcome::Added)
}

/// Replace the stored command with the same identity, or add it when absent.
pub fn replace_hook(
    doc: &mut JsonDocument,
    hook: &ValidatedHook,
    defaults: &HookDefaults,
) -> Result<MergeOutcome, ConfigError> {
    let replacement = build_command(hook, defaults);
    let commands = group_commands(doc, hook)?;
    let existing = commands
        .iter_mut()
        .find(|entry| entry.get("command").and_then(Value::as_str) == Some(hook.command.as_str()));

    match existing {
        Some(entry) => {
            *entry = replacement;
            Ok(MergeOutcome::Replaced)
        }
        None => {
            commands.push(replacement);
            Ok(MergeOutcome::Added)
        }
    }
}

/// Remove one command, pruning emptied groups, events, and the `hooks` key.
///
/// Returns `true` when a command was removed.
pub fn remove_hook(
    doc: &mut JsonDocument,
    event: HookEvent,
    matcher: &str,
    command: &str,
) -> Result<bool, ConfigError> {
    if hooks_object(doc)?.is_none() {
        return Ok(false);
    }

    let hooks = doc.object_mut(HOOKS_KEY)?;
    let Some(groups) = hooks.get_mut(event.as_str()).and_then(Value::as_array_mut) else {
        return Ok(false);
    };

    let mut removed = false;
    for group in groups.iter_mut().filter(|group| group_matcher(group) == matcher) {
        if let Some(commands) = group.get_mut("hooks").and_then(Value::as_array_mut) {
            let before = commands.len();
            commands.retain(|entry| entry.get("command").and_then(Value::as_str) != Some(command));
            removed |= commands.len() != before;
        }
    }

    if !removed {
        return Ok(false);
    }

    groups.retain(|group| {
        group.get("hooks").and_then(Value::as_array).is_none_or(|commands| !commands.is_empty())
    });
    if groups.is_empty() {
        hooks.shift_remove(event.as_str());
    }
    doc.remove_if_empty(HOOKS_KEY);
    Ok(true)
}
