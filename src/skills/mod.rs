//! Skill directory inspection and copying.
//!
//! A skill is a directory containing a `SKILL.md` file with YAML frontmatter
//! plus any supporting files the skill needs. Before a skill is copied, the
//! whole tree is inspected:
//!
//! - symlinks anywhere in the tree are rejected, since they could point at
//!   files outside the skill
//! - the tree must stay within [`MAX_SKILL_FILES`] files and
//!   [`MAX_SKILL_SIZE_BYTES`] bytes
//! - `SKILL.md` must exist at the root and carry well-formed frontmatter
//! - files that look executable are collected as warnings; copying them
//!   requires the caller to acknowledge the warnings explicitly
//!
//! # Implementation Notes
//!
//! `walkdir` is synchronous, so the inspection and the copy both run inside
//! `tokio::task::spawn_blocking`.

use crate::core::{ConfigError, FileOperation};
use crate::markdown::require_frontmatter;
use crate::resolver::SKILL_FILE;
use crate::utils::fs::{copy_dir, path_exists, remove_dir_all, temp_path_for};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maximum number of files in a skill directory.
pub const MAX_SKILL_FILES: usize = 1000;

/// Maximum total size of a skill directory.
pub const MAX_SKILL_SIZE_BYTES: u64 = 100 * 1024 * 1024; // 100 MB

/// File extensions treated as executable scripts.
pub const SCRIPT_EXTENSIONS: [&str; 6] = ["sh", "py", "js", "ts", "rb", "ps1"];

/// What an inspection of a skill directory found.
#[derive(Debug, Clone)]
pub struct SkillInspection {
    /// Skill directory that was inspected
    pub root: PathBuf,
    /// Relative paths of every file, sorted
    pub files: Vec<String>,
    /// Sum of all file sizes in bytes
    pub total_size: u64,
    /// Content of `SKILL.md`
    pub skill_md: String,
    /// One message per file that looks executable
    pub script_warnings: Vec<String>,
}

impl SkillInspection {
    /// Whether copying needs an explicit acknowledgement.
    #[must_use]
    pub fn requires_acknowledgement(&self) -> bool {
        !self.script_warnings.is_empty()
    }

    /// Fail unless the warnings are absent or acknowledged.
    pub fn ensure_acknowledged(&self, acknowledged: bool) -> Result<(), ConfigError> {
        if !self.requires_acknowledgement() || acknowledged {
            return Ok(());
        }
        Err(ConfigError::validation(
            "Skill contains executable scripts; set acknowledgedWarnings to copy it",
        )
        .with_details(self.script_warnings.clone()))
    }
}

fn is_script(path: &Path, metadata: &std::fs::Metadata) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SCRIPT_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        by_extension || metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        let _ = metadata;
        by_extension
    }
}

fn walk_error(root: &Path, e: walkdir::Error) -> ConfigError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ConfigError::io(FileOperation::Read, path, std::io::Error::other(e.to_string()))
}

/// Walk a skill directory, enforcing limits and collecting warnings.
///
/// Blocking; see [`inspect_skill`] for the async entry point.
fn collect_skill(root: &Path) -> Result<SkillInspection, ConfigError> {
    if !root.is_dir() {
        return Err(ConfigError::validation(format!(
            "Skill path {} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    let mut total_size = 0u64;
    let mut skill_md = None;
    let mut script_warnings = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| walk_error(root, e))?;

        if entry.file_type().is_symlink() {
            return Err(ConfigError::security(format!(
                "Skill at {} contains a symlink ({}); symlinks are not allowed",
                root.display(),
                entry.path().display()
            )));
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|_| ConfigError::security(format!("{} is outside the skill", path.display())))?
            .to_string_lossy()
            .replace('\\', "/");
        let metadata = entry.metadata().map_err(|e| walk_error(root, e))?;

        if relative == SKILL_FILE {
            skill_md = Some(
                std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::io(FileOperation::Read, path, e))?,
            );
        } else if is_script(path, &metadata) {
            script_warnings.push(format!("{relative} is an executable script"));
        }

        total_size += metadata.len();
        files.push(relative);

        if files.len() > MAX_SKILL_FILES {
            return Err(ConfigError::validation(format!(
                "Skill at {} contains more than {MAX_SKILL_FILES} files",
                root.display()
            )));
        }
        if total_size > MAX_SKILL_SIZE_BYTES {
            let limit_mb = MAX_SKILL_SIZE_BYTES / (1024 * 1024);
            return Err(ConfigError::validation(format!(
                "Skill at {} exceeds the {limit_mb} MB size limit",
                root.display()
            )));
        }
    }

    let skill_md = skill_md.ok_or_else(|| {
        ConfigError::validation(format!("{SKILL_FILE} not found in {}", root.display()))
    })?;
    require_frontmatter(&root.join(SKILL_FILE), &skill_md)?;

    files.sort();
    script_warnings.sort();

    Ok(SkillInspection {
        root: root.to_path_buf(),
        files,
        total_size,
        skill_md,
        script_warnings,
    })
}

fn join_error(e: tokio::task::JoinError, path: &Path) -> ConfigError {
    ConfigError::io(FileOperation::Copy, path, std::io::Error::other(e.to_string()))
}

/// Inspect a skill directory.
///
/// Accepts either the directory itself or the path of its `SKILL.md`.
///
/// # Errors
///
/// - `SecurityError` when the tree contains a symlink
/// - `ValidationError` when `SKILL.md` is missing or a limit is exceeded
/// - `InvalidFrontmatter` when `SKILL.md` has no well-formed frontmatter
pub async fn inspect_skill(path: &Path) -> Result<SkillInspection, ConfigError> {
    let root = if path.file_name().is_some_and(|name| name == SKILL_FILE) {
        path.parent().unwrap_or(path).to_path_buf()
    } else {
        path.to_path_buf()
    };

    let task_root = root.clone();
    tokio::task::spawn_blocking(move || collect_skill(&task_root))
        .await
        .map_err(|e| join_error(e, &root))?
}

/// Copy an inspected skill to `target`, replacing anything already there.
///
/// The tree is first copied to `<target>.tmp` and only swapped in once the copy
/// has completed, so a failed copy leaves an existing target untouched.
pub async fn copy_skill_dir(skill: &SkillInspection, target: &Path) -> Result<(), ConfigError> {
    let staging = temp_path_for(target);
    remove_dir_all(&staging).await?;

    let (src, dst) = (skill.root.clone(), staging.clone());
    let copied = tokio::task::spawn_blocking(move || copy_dir(&src, &dst))
        .await
        .map_err(|e| join_error(e, target))
        .and_then(|result| result);

    let swapped = match copied {
        Ok(()) => swap_in(&staging, target).await,
        Err(e) => Err(e),
    };
    if let Err(e) = swapped {
        if let Err(cleanup) = remove_dir_all(&staging).await {
            tracing::warn!("Failed to remove {}: {cleanup}", staging.display());
        }
        return Err(e);
    }

    tracing::info!(
        "Copied skill {} ({} files) to {}",
        skill.root.display(),
        skill.files.len(),
        target.display()
    );
    Ok(())
}

/// Returns the sibling an existing skill is parked at during a swap: `<path>.bak`.
fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Move `staging` to `target`.
///
/// An existing target is parked at `<target>.bak` first and moved back when
/// the rename fails, so the old skill is never lost.
async fn swap_in(staging: &Path, target: &Path) -> Result<(), ConfigError> {
    let backup = backup_path_for(target);
    let had_target = path_exists(target).await;
    if had_target {
        remove_dir_all(&backup).await?;
        tokio::fs::rename(target, &backup)
            .await
            .map_err(|e| ConfigError::io(FileOperation::Rename, target, e))?;
    }

    if let Err(e) = tokio::fs::rename(staging, target).await {
        if had_target && let Err(restore) = tokio::fs::rename(&backup, target).await {
            tracing::error!(
                "Failed to restore {} from {}: {restore}",
                target.display(),
                backup.display()
            );
        }
        return Err(ConfigError::io(FileOperation::Rename, staging, e));
    }

    if had_target && let Err(e) = remove_dir_all(&backup).await {
        tracing::warn!("Failed to remove {}: {e}", backup.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use anyhow::Result;
    use tempfile::tempdir;

    const SKILL_MD: &str = "---\nname: pdf-tools\ndescription: Work with PDFs\n---\n# PDF tools\n";

    fn write_skill(root: &Path) -> Result<()> {
        std::fs::create_dir_all(root.join("reference"))?;
        std::fs::write(root.join(SKILL_FILE), SKILL_MD)?;
        std::fs::write(root.join("reference/forms.md"), "# Forms")?;
        Ok(())
    }

    #[tokio::test]
    async fn test_inspect_plain_skill() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("pdf-tools");
        write_skill(&root)?;

        let skill = inspect_skill(&root.join(SKILL_FILE)).await?;
        assert_eq!(skill.root, root);
        assert_eq!(skill.files, ["SKILL.md", "reference/forms.md"]);
        assert!(!skill.requires_acknowledgement());
        skill.ensure_acknowledged(false)?;
        Ok(())
    }

    #[tokio::test]
    async fn test_scripts_need_acknowledgement() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("pdf-tools");
        write_skill(&root)?;
        std::fs::create_dir_all(root.join("scripts"))?;
        std::fs::write(root.join("scripts/fill.py"), "print('hi')")?;

        let skill = inspect_skill(&root).await?;
        assert_eq!(skill.script_warnings, ["scripts/fill.py is an executable script"]);

        let err = skill.ensure_acknowledged(false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details().len(), 1);
        skill.ensure_acknowledged(true)?;
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exec_bit_is_a_script() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir()?;
        let root = temp.path().join("tool");
        write_skill(&root)?;
        let bin = root.join("run");
        std::fs::write(&bin, "#!/bin/sh\n")?;
        std::fs::set_permissions(&bin, std::fs::Permissions::from_mode(0o755))?;

        let skill = inspect_skill(&root).await?;
        assert_eq!(skill.script_warnings, ["run is an executable script"]);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_rejected() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("tool");
        write_skill(&root)?;
        std::os::unix::fs::symlink("/etc/hosts", root.join("hosts"))?;

        let err = inspect_skill(&root).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Security);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_or_invalid_skill_md() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("empty");
        std::fs::create_dir_all(&root)?;
        let err = inspect_skill(&root).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        std::fs::write(root.join(SKILL_FILE), "# no frontmatter\n")?;
        let err = inspect_skill(&root).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFrontmatter { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_copy_replaces_target() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path().join("src/pdf-tools");
        write_skill(&root)?;
        let target = temp.path().join("dst/pdf-tools");
        std::fs::create_dir_all(&target)?;
        std::fs::write(target.join("stale.txt"), "old")?;

        let skill = inspect_skill(&root).await?;
        copy_skill_dir(&skill, &target).await?;

        assert_eq!(std::fs::read_to_string(target.join(SKILL_FILE))?, SKILL_MD);
        assert!(target.join("reference/forms.md").exists());
        assert!(!target.join("stale.txt").exists());
        assert!(!temp_path_for(&target).exists());
        assert!(!backup_path_for(&target).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_swap_restores_existing_skill() -> Result<()> {
        let temp = tempdir()?;
        let target = temp.path().join("pdf-tools");
        std::fs::create_dir_all(&target)?;
        std::fs::write(target.join(SKILL_FILE), "old")?;

        // Nothing staged, so the rename into place fails.
        let staging = temp_path_for(&target);
        let err = swap_in(&staging, &target).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileSystem);

        assert_eq!(std::fs::read_to_string(target.join(SKILL_FILE))?, "old");
        assert!(!backup_path_for(&target).exists());
        Ok(())
    }
}
