use agcm::test_utils::{MarkdownFixture, TestEnvironment};
use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn agcm(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("agcm").unwrap();
    cmd.env("AGCM_CONFIG_PATH", config).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("agcm")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("copy"))
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn test_projects_lists_registered_ids() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_config()?;

    agcm(&config)
        .arg("projects")
        .assert()
        .success()
        .stdout(predicate::str::contains(env.target_id.as_str()))
        .stdout(predicate::str::contains(env.source_id.as_str()));
    Ok(())
}

#[test]
fn test_copy_hook_prints_merge_result() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_config()?;

    agcm(&config)
        .args(["copy", "hook", "--event", "PreToolUse", "--matcher", "Bash", "--command", "guard.sh"])
        .args(["--scope", "project", "--project", env.target_id.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"))
        .stdout(predicate::str::contains("mergedInto"));

    let settings = env.read_json(&env.target_dir.join(".claude/settings.json"))?;
    assert_eq!(settings["hooks"]["PreToolUse"][0]["hooks"][0]["command"], "guard.sh");
    Ok(())
}

#[test]
fn test_conflict_exits_non_zero_and_rename_succeeds() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_config()?;
    let source = MarkdownFixture::agent("reviewer").write_to(&env.source_dir)?;
    MarkdownFixture::agent("reviewer").write_to(&env.target_dir)?;
    let source = source.to_string_lossy().into_owned();

    agcm(&config)
        .args(["copy", "agent", source.as_str(), "--scope", "project"])
        .args(["--project", env.target_id.as_str()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("\"conflict\""));

    agcm(&config)
        .args(["copy", "agent", source.as_str(), "--scope", "project"])
        .args(["--project", env.target_id.as_str(), "--strategy", "rename"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer-2.md"));
    Ok(())
}

#[test]
fn test_invalid_scope_is_rejected() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_config()?;

    agcm(&config)
        .args(["copy", "agent", "a.md", "--scope", "global"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("global"));
    Ok(())
}

#[test]
fn test_mcp_list_is_json_array() -> Result<()> {
    let env = TestEnvironment::new()?;
    let config = env.write_config()?;
    env.write_json(&env.home_dir, ".claude.json", &serde_json::json!({"mcpServers": {"fs": {"command": "fs-mcp"}}}))?;

    let output = agcm(&config).args(["mcp", "list", "--scope", "user"]).output()?;
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["name"], "fs");
    Ok(())
}
