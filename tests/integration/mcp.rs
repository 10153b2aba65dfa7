use agcm::copy::{CopyOptions, CopyResult};
use agcm::core::{ErrorKind, Scope};
use agcm::mcp::ReferenceKind;
use agcm::test_utils::TestEnvironment;
use anyhow::Result;
use serde_json::json;
use std::fs;

fn project(env: &TestEnvironment) -> CopyOptions {
    CopyOptions::new(Scope::Project, Some(env.target_id.clone()))
}

#[tokio::test]
async fn test_copy_creates_mcp_json_beside_settings() -> Result<()> {
    let env = TestEnvironment::new()?;
    let settings = env.write_json(
        &env.target_dir,
        ".claude/settings.json",
        &json!({"hooks": {}, "permissions": {"deny": ["Bash(rm:*)"]}}),
    )?;
    let settings_before = fs::read(&settings)?;
    let orchestrator = env.orchestrator().await?;

    let config = json!({"type": "http", "url": "https://mcp.github.example", "headers": {"X-Org": "acme"}});
    let result = orchestrator.copy_mcp_server("github", &config, &project(&env)).await;

    let mcp_json = env.target_dir.join(".mcp.json");
    assert_eq!(result.path(), Some(&mcp_json));
    assert_eq!(env.read_json(&mcp_json)?, json!({"mcpServers": {"github": config}}));
    assert_eq!(fs::read(&settings)?, settings_before);
    assert!(!env.has_temp_file(&mcp_json));
    Ok(())
}

#[tokio::test]
async fn test_user_scope_uses_claude_json_root() -> Result<()> {
    let env = TestEnvironment::new()?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator
        .copy_mcp_server("fs", &json!({"command": "npx", "args": ["-y", "fs-mcp"]}), &CopyOptions::new(Scope::User, None))
        .await;
    let claude_json = env.home_dir.join(".claude.json");
    assert_eq!(result.path(), Some(&claude_json));

    let written = env.read_json(&claude_json)?;
    assert_eq!(written["numStartups"], 3);
    assert!(written["projects"].as_object().is_some_and(|p| p.len() == 2));
    assert_eq!(written["mcpServers"]["fs"]["command"], "npx");
    assert!(!env.home_dir.join(".claude/settings.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_delete_reports_permission_reference() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_json(&env.target_dir, ".mcp.json", &json!({"mcpServers": {"github": {"command": "gh-mcp"}}}))?;
    let settings = env.write_json(
        &env.target_dir,
        ".claude/settings.json",
        &json!({"permissions": {"allow": ["mcp__github__read"]}}),
    )?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.delete_mcp_server(Scope::Project, Some(&env.target_id), "github").await;
    assert!(result.success);
    assert_eq!(result.references.len(), 1);
    assert_eq!(result.references[0].file, settings);
    assert_eq!(
        result.references[0].kind,
        ReferenceKind::Permission {
            list: "allow".into(),
            rule: "mcp__github__read".into()
        }
    );
    assert_eq!(env.read_json(&env.target_dir.join(".mcp.json"))?, json!({}));
    Ok(())
}

#[tokio::test]
async fn test_delete_without_mentions_omits_references() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_json(&env.target_dir, ".mcp.json", &json!({"mcpServers": {"github": {"command": "gh"}, "db": {"command": "pg"}}}))?;
    env.write(&env.target_dir, ".claude/settings.local.json", "not json")?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.delete_mcp_server(Scope::Project, Some(&env.target_id), "github").await;
    let wire = serde_json::to_value(&result)?;
    assert_eq!(wire["success"], true);
    assert!(wire.get("references").is_none());
    assert_eq!(
        env.read_json(&env.target_dir.join(".mcp.json"))?,
        json!({"mcpServers": {"db": {"command": "pg"}}})
    );
    Ok(())
}

#[tokio::test]
async fn test_hook_mentions_are_case_insensitive() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_json(
        &env.target_dir,
        ".claude/settings.local.json",
        &json!({"hooks": {"PostToolUse": [{"matcher": "Edit", "hooks": [{"type": "command", "command": "sync-GitHub.sh"}]}]}}),
    )?;
    let orchestrator = env.orchestrator().await?;

    let refs = orchestrator.find_mcp_references(Scope::Project, Some(&env.target_id), "github").await?;
    assert_eq!(refs.len(), 1);
    assert!(matches!(refs[0].kind, ReferenceKind::Hook { ref matcher, .. } if matcher == "Edit"));
    Ok(())
}

#[tokio::test]
async fn test_rename_onto_existing_name_conflicts() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mcp_json = env.write_json(
        &env.target_dir,
        ".mcp.json",
        &json!({"mcpServers": {"a": {"command": "a"}, "b": {"command": "b"}}}),
    )?;
    let before = fs::read_to_string(&mcp_json)?;
    let orchestrator = env.orchestrator().await?;

    let patch = serde_json::Map::new();
    let result = orchestrator
        .update_mcp_server(Scope::Project, Some(&env.target_id), "a", Some("b"), &patch)
        .await;
    assert_eq!(result.error().map(|e| e.kind()), Some(ErrorKind::Conflict));
    assert_eq!(fs::read_to_string(&mcp_json)?, before);
    Ok(())
}

#[tokio::test]
async fn test_list_spans_all_project_locations() -> Result<()> {
    let env = TestEnvironment::new()?;
    env.write_json(&env.target_dir, ".mcp.json", &json!({"mcpServers": {"github": {"command": "gh"}}}))?;
    env.write_json(
        &env.target_dir,
        ".claude/settings.local.json",
        &json!({"mcpServers": {"legacy": {"url": "https://legacy"}}}),
    )?;
    let orchestrator = env.orchestrator().await?;

    let servers = orchestrator.list_mcp_servers(Scope::Project, Some(&env.target_id)).await?;
    let names: Vec<&str> = servers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["github", "legacy"]);
    assert!(servers[1].file.ends_with("settings.local.json"));
    Ok(())
}

#[tokio::test]
async fn test_skip_leaves_existing_server() -> Result<()> {
    let env = TestEnvironment::new()?;
    let mcp_json =
        env.write_json(&env.target_dir, ".mcp.json", &json!({"mcpServers": {"db": {"command": "pg"}}}))?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator
        .copy_mcp_server("db", &json!({"command": "mysql-mcp"}), &project(&env).with_strategy("skip"))
        .await;
    assert!(matches!(result, CopyResult::Skipped { .. }));
    assert_eq!(env.read_json(&mcp_json)?["mcpServers"]["db"]["command"], "pg");
    Ok(())
}
