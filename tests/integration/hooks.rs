use agcm::copy::{CopyOptions, CopyResult};
use agcm::core::Scope;
use agcm::hooks::HookSpec;
use agcm::test_utils::TestEnvironment;
use anyhow::Result;
use serde_json::json;
use std::fs;

fn project(env: &TestEnvironment) -> CopyOptions {
    CopyOptions::new(Scope::Project, Some(env.target_id.clone()))
}

#[tokio::test]
async fn test_first_hook_into_empty_settings() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;
    let settings = env.write_json(&env.target_dir, ".claude/settings.json", &json!({}))?;

    let hook = HookSpec::new("PreToolUse", Some("*.ts"), "tsc --noEmit");
    let result = orchestrator.copy_hook(&hook, &project(&env)).await;
    assert!(matches!(result, CopyResult::Merged { ref path, .. } if *path == settings));

    let written = env.read_json(&settings)?;
    assert_eq!(
        written["hooks"]["PreToolUse"],
        json!([{
            "matcher": "*.ts",
            "hooks": [{"type": "command", "command": "tsc --noEmit", "enabled": true, "timeout": 60}]
        }])
    );
    Ok(())
}

#[tokio::test]
async fn test_wildcard_groups_omit_matcher() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;

    orchestrator.copy_hook(&HookSpec::new("PostToolUse", None, "prettier --write"), &project(&env)).await;
    orchestrator.copy_hook(&HookSpec::new("PostToolUse", None, "eslint --fix"), &project(&env)).await;

    let written = env.read_json(&env.target_dir.join(".claude/settings.json"))?;
    let groups = written["hooks"]["PostToolUse"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].get("matcher").is_none());
    assert_eq!(groups[0]["hooks"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_explicit_wildcard_repairs_legacy_group() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;
    let settings = env.write_json(
        &env.target_dir,
        ".claude/settings.json",
        &json!({"hooks": {"PreToolUse": [{"hooks": [{"type": "command", "command": "audit"}]}]}}),
    )?;

    let hook = HookSpec::new("PreToolUse", Some("*"), "lint");
    assert!(orchestrator.copy_hook(&hook, &project(&env)).await.is_success());

    let written = env.read_json(&settings)?;
    let group = &written["hooks"]["PreToolUse"][0];
    assert_eq!(group["matcher"], "*");
    let commands: Vec<&str> =
        group["hooks"].as_array().unwrap().iter().filter_map(|h| h["command"].as_str()).collect();
    assert_eq!(commands, ["audit", "lint"]);
    Ok(())
}

#[tokio::test]
async fn test_repeat_copy_conflicts_and_keeps_unrelated_keys() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;
    let settings = env.write_json(
        &env.target_dir,
        ".claude/settings.json",
        &json!({"model": "sonnet", "permissions": {"allow": ["Read"]}, "env": {"A": "1"}}),
    )?;
    let hook = HookSpec::new("SessionStart", None, "echo hello");

    orchestrator.copy_hook(&hook, &project(&env)).await;
    let once = fs::read_to_string(&settings)?;
    let again = orchestrator.copy_hook(&hook, &project(&env)).await;
    assert!(matches!(again, CopyResult::Conflict(_)));
    assert_eq!(fs::read_to_string(&settings)?, once);

    let written = env.read_json(&settings)?;
    let keys: Vec<&String> = written.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["model", "permissions", "env", "hooks"]);
    assert!(once.contains("\n  \"model\": \"sonnet\""));
    Ok(())
}

#[tokio::test]
async fn test_matcher_on_non_tool_event_is_ignored() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;

    let hook = HookSpec::new("Stop", Some("Bash"), "notify");
    let CopyResult::Merged { path, warnings } = orchestrator.copy_hook(&hook, &project(&env)).await
    else {
        panic!("expected a merge");
    };
    assert_eq!(warnings.len(), 1);

    let written = env.read_json(&path)?;
    assert!(written["hooks"]["Stop"][0].get("matcher").is_none());
    Ok(())
}

#[tokio::test]
async fn test_user_scope_hooks_land_in_home_settings() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;

    let hook = HookSpec::new("UserPromptSubmit", None, "log-prompt");
    let result = orchestrator.copy_hook(&hook, &CopyOptions::new(Scope::User, None)).await;
    assert_eq!(result.path(), Some(&env.home_dir.join(".claude/settings.json")));
    Ok(())
}

#[tokio::test]
async fn test_invalid_settings_document_aborts() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;
    let settings = env.write(&env.target_dir, ".claude/settings.json", "{ \"model\": ")?;

    let result = orchestrator.copy_hook(&HookSpec::new("Stop", None, "x"), &project(&env)).await;
    assert!(result.error().is_some());
    assert_eq!(fs::read_to_string(&settings)?, "{ \"model\": ");
    Ok(())
}

#[tokio::test]
async fn test_remove_hook_prunes_empty_structure() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;
    let settings = env.write_json(&env.target_dir, ".claude/settings.json", &json!({"model": "opus"}))?;
    let id = Some(env.target_id.as_str());

    orchestrator.copy_hook(&HookSpec::new("PreToolUse", Some("Bash"), "guard"), &project(&env)).await;
    orchestrator.copy_hook(&HookSpec::new("PreToolUse", Some("Write"), "fmt"), &project(&env)).await;

    let result = orchestrator.delete_hook(Scope::Project, id, "PreToolUse", Some("Bash"), "guard").await;
    assert!(result.success);
    let written = env.read_json(&settings)?;
    assert_eq!(written["hooks"]["PreToolUse"].as_array().unwrap().len(), 1);

    orchestrator.delete_hook(Scope::Project, id, "PreToolUse", Some("Write"), "fmt").await;
    assert_eq!(env.read_json(&settings)?, json!({"model": "opus"}));

    let missing = orchestrator.delete_hook(Scope::Project, id, "PreToolUse", Some("Write"), "fmt").await;
    assert!(!missing.success);
    Ok(())
}
