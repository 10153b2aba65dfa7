use crate::utils::fs::path_exists;
use std::path::{Path, PathBuf};

/// Candidate name for suffix `n`.
///
/// Files get the suffix before their extension (`agent.md` → `agent-2.md`);
/// directories get it at the end (`pdf-tools` → `pdf-tools-2`).
fn suffixed(target: &Path, n: u32, is_dir: bool) -> PathBuf {
    let name = target.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let renamed = match (is_dir, target.extension(), target.file_stem()) {
        (false, Some(ext), Some(stem)) => {
            format!("{}-{n}.{}", stem.to_string_lossy(), ext.to_string_lossy())
        }
        _ => format!("{name}-{n}"),
    };
    target.with_file_name(renamed)
}

/// The lowest `-N` variant of `target` (N ≥ 2) that does not exist yet.
pub async fn next_available_path(target: &Path, is_dir: bool) -> PathBuf {
    let mut n = 2;
    loop {
        let candidate = suffixed(target, n, is_dir);
        if !path_exists(&candidate).await {
            tracing::debug!("Renaming {} to {}", target.display(), candidate.display());
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_suffix_placement() {
        let dir = Path::new("/p/.claude");
        assert_eq!(suffixed(&dir.join("agents/a.md"), 2, false), dir.join("agents/a-2.md"));
        assert_eq!(suffixed(&dir.join("commands/run"), 3, false), dir.join("commands/run-3"));
        assert_eq!(suffixed(&dir.join("skills/v1.2"), 2, true), dir.join("skills/v1.2-2"));
    }

    #[tokio::test]
    async fn test_lowest_unused_suffix() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let target = temp.path().join("test-agent.md");
        for name in ["test-agent.md", "test-agent-2.md", "test-agent-4.md"] {
            std::fs::write(temp.path().join(name), "x")?;
        }
        assert_eq!(next_available_path(&target, false).await, temp.path().join("test-agent-3.md"));
        Ok(())
    }
}
