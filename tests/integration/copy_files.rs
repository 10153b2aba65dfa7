use agcm::copy::{CopyOptions, CopyRequest, CopyResult, CopySource};
use agcm::core::{ErrorKind, Scope};
use agcm::test_utils::{MarkdownFixture, TestEnvironment};
use anyhow::Result;
use std::fs;

fn project(env: &TestEnvironment) -> CopyOptions {
    CopyOptions::new(Scope::Project, Some(env.target_id.clone()))
}

#[tokio::test]
async fn test_rename_suffix_skips_taken_names() -> Result<()> {
    let env = TestEnvironment::new()?;
    let source = MarkdownFixture::agent("test-agent").write_to(&env.source_dir)?;
    MarkdownFixture::agent("test-agent").write_to(&env.target_dir)?;
    MarkdownFixture::agent("test-agent-2").write_to(&env.target_dir)?;
    let orchestrator = env.orchestrator().await?;

    let request = CopyRequest {
        source: CopySource::Agent {
            path: source.clone(),
        },
        options: project(&env).with_strategy("rename"),
    };
    let result = orchestrator.copy(&request).await;

    let agents = env.target_dir.join(".claude/agents");
    assert_eq!(result.path(), Some(&agents.join("test-agent-3.md")));
    let mut names: Vec<String> = fs::read_dir(&agents)?
        .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    names.sort();
    assert_eq!(names, ["test-agent-2.md", "test-agent-3.md", "test-agent.md"]);

    let again = orchestrator.copy(&request).await;
    assert_eq!(again.path(), Some(&agents.join("test-agent-4.md")));
    Ok(())
}

#[tokio::test]
async fn test_copy_to_same_path_is_a_conflict() -> Result<()> {
    let env = TestEnvironment::new()?;
    let source = MarkdownFixture::agent("reviewer").write_to(&env.target_dir)?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.copy_agent(&source, &project(&env)).await;
    let CopyResult::Conflict(info) = result else {
        panic!("expected a conflict");
    };
    assert_eq!(info.target_path, source);
    assert_eq!(info.source_modified, info.target_modified);
    Ok(())
}

#[tokio::test]
async fn test_unterminated_frontmatter_rejected_even_with_conflict() -> Result<()> {
    let env = TestEnvironment::new()?;
    let source =
        env.write(&env.source_dir, ".claude/commands/deploy.md", "---\ndescription: Deploy\n\nRun it\n")?;
    MarkdownFixture::command("deploy.md").write_to(&env.target_dir)?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.copy_command(&source, &project(&env).with_strategy("overwrite")).await;
    assert_eq!(result.error().map(|e| e.kind()), Some(ErrorKind::Parse));
    assert_ne!(
        fs::read_to_string(env.target_dir.join(".claude/commands/deploy.md"))?,
        fs::read_to_string(&source)?
    );
    Ok(())
}

#[tokio::test]
async fn test_nested_command_rename() -> Result<()> {
    let env = TestEnvironment::new()?;
    let source = MarkdownFixture::command("git/commit.md").write_to(&env.source_dir)?;
    MarkdownFixture::command("git/commit.md").write_to(&env.target_dir)?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.copy_command(&source, &project(&env).with_strategy("rename")).await;
    assert_eq!(result.path(), Some(&env.target_dir.join(".claude/commands/git/commit-2.md")));
    Ok(())
}

#[tokio::test]
async fn test_skill_copy_to_user_scope() -> Result<()> {
    let env = TestEnvironment::new()?;
    let skill_md = MarkdownFixture::skill("release-notes").write_to(&env.source_dir)?;
    env.write(&env.source_dir, ".claude/skills/release-notes/templates/notes.md", "# Notes")?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.copy_skill(&skill_md, &CopyOptions::new(Scope::User, None)).await;
    let target = env.home_dir.join(".claude/skills/release-notes");
    assert_eq!(result.path(), Some(&target));
    assert!(target.join("SKILL.md").is_file());
    assert!(target.join("templates/notes.md").is_file());

    let skipped = orchestrator
        .copy_skill(&skill_md, &CopyOptions::new(Scope::User, None).with_strategy("skip"))
        .await;
    assert!(matches!(skipped, CopyResult::Skipped { .. }));
    Ok(())
}

#[tokio::test]
async fn test_skill_without_skill_md_is_invalid() -> Result<()> {
    let env = TestEnvironment::new()?;
    let dir = env.source_dir.join(".claude/skills/broken");
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("README.md"), "# nothing")?;
    let orchestrator = env.orchestrator().await?;

    let result = orchestrator.copy_skill(&dir, &project(&env)).await;
    assert_eq!(result.error().map(|e| e.kind()), Some(ErrorKind::Validation));
    assert!(!env.target_dir.join(".claude/skills/broken").exists());
    Ok(())
}

#[tokio::test]
async fn test_deleted_project_directory_is_not_found() -> Result<()> {
    let env = TestEnvironment::new()?;
    let source = MarkdownFixture::agent("reviewer").write_to(&env.source_dir)?;
    let orchestrator = env.orchestrator().await?;
    fs::remove_dir_all(&env.target_dir)?;

    let result = orchestrator.copy_agent(&source, &project(&env)).await;
    let err = result.error().expect("missing project directory");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status_code(), 404);
    Ok(())
}
