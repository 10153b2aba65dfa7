use agcm::document::{JsonDocument, update_document};
use agcm::utils::fs::{atomic_write, temp_path_for};
use anyhow::Result;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_failed_rename_leaves_target_and_no_temp() -> Result<()> {
    let temp = TempDir::new()?;
    // A non-empty directory cannot be replaced by a file rename.
    let target = temp.path().join("settings.json");
    fs::create_dir_all(&target)?;
    fs::write(target.join("keep"), "original")?;

    let result = atomic_write(&target, b"{}\n").await;
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(target.join("keep"))?, "original");
    assert!(!temp_path_for(&target).exists());
    Ok(())
}

#[tokio::test]
async fn test_stale_temp_file_is_replaced() -> Result<()> {
    let temp = TempDir::new()?;
    let target = temp.path().join(".mcp.json");
    fs::write(temp_path_for(&target), "garbage from a crash")?;

    let mut doc = JsonDocument::load(&target).await?;
    doc.object_mut("mcpServers")?.insert("x".into(), json!({"command": "x"}));
    doc.save().await?;

    assert_eq!(
        fs::read_to_string(&target)?,
        "{\n  \"mcpServers\": {\n    \"x\": {\n      \"command\": \"x\"\n    }\n  }\n}\n"
    );
    assert!(!temp_path_for(&target).exists());
    Ok(())
}

#[tokio::test]
async fn test_rejected_mutation_writes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let target = temp.path().join("settings.json");
    fs::write(&target, "{\"b\":1,\"a\":2}")?;

    let result: Result<(), _> = update_document(&target, |doc| {
        doc.root_mut().clear();
        Err(agcm::core::ConfigError::validation("nope"))
    })
    .await;
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&target)?, "{\"b\":1,\"a\":2}");
    Ok(())
}

#[tokio::test]
async fn test_readers_only_see_complete_documents() -> Result<()> {
    let temp = TempDir::new()?;
    let target = temp.path().join("settings.json");
    atomic_write(&target, b"{\"v\": 0}\n").await?;

    let writer = {
        let target = target.clone();
        tokio::spawn(async move {
            for i in 1..=50 {
                let body = format!("{{\"v\": {i}, \"pad\": \"{}\"}}\n", "x".repeat(4096));
                atomic_write(&target, body.as_bytes()).await?;
            }
            Ok::<_, agcm::core::ConfigError>(())
        })
    };

    for _ in 0..50 {
        let content = tokio::fs::read_to_string(&target).await?;
        serde_json::from_str::<serde_json::Value>(&content)?;
    }
    writer.await??;
    Ok(())
}
