//! Path utilities for normalization and traversal checks.
//!
//! Every user-supplied path goes through [`check_path_input`] before it is
//! joined onto anything, and every computed target goes through
//! [`ensure_within`] before it is written.

use crate::core::ConfigError;
use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components.
///
/// This is purely lexical: it neither touches the filesystem nor resolves
/// symbolic links.
///
/// ```rust,no_run
/// use agcm::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("/foo/./bar/../baz")), PathBuf::from("/foo/baz"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                components.pop();
            }
            c => components.push(c),
        }
    }

    components.iter().collect()
}

/// Checks if a path stays inside `base` after normalization.
#[must_use]
pub fn is_safe_path(base: &Path, path: &Path) -> bool {
    let normalized_base = normalize_path(base);
    let normalized_path = if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    };

    normalized_path.starts_with(normalized_base)
}

/// Rejects raw path input that carries null bytes or traversal sequences.
///
/// Runs before any other validation so that a hostile path is reported as a
/// security problem even when it is also malformed in other ways.
pub fn check_path_input(raw: &str) -> Result<(), ConfigError> {
    if raw.contains('\0') {
        return Err(ConfigError::security("Path contains null bytes"));
    }

    let lowered = raw.to_ascii_lowercase();
    let has_encoded_traversal = lowered.contains("%2e%2e") || lowered.contains("%00");
    let has_parent_segment = raw.split(['/', '\\']).any(|segment| segment == "..");

    if has_parent_segment || has_encoded_traversal {
        return Err(ConfigError::security(format!("Path traversal detected in '{raw}'")));
    }

    Ok(())
}

/// Rejects a single path segment (file or directory name) that could escape its parent.
pub fn check_segment(name: &str) -> Result<(), ConfigError> {
    check_path_input(name)?;
    if name.is_empty() || name == "." || name.contains(['/', '\\']) {
        return Err(ConfigError::security(format!("Invalid path segment '{name}'")));
    }
    Ok(())
}

/// Ensures that `target` normalizes to a location inside `base`.
pub fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, ConfigError> {
    let normalized = normalize_path(target);
    if !is_safe_path(base, &normalized) {
        return Err(ConfigError::security(format!(
            "Path '{}' escapes base directory '{}'",
            target.display(),
            base.display()
        )));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("a/b/./c")), PathBuf::from("a/b/c"));
    }

    #[test]
    fn test_is_safe_path() {
        let base = Path::new("/home/user/project");
        assert!(is_safe_path(base, Path::new(".claude/agents/a.md")));
        assert!(!is_safe_path(base, Path::new("../../../etc/passwd")));
        assert!(!is_safe_path(base, Path::new("/etc/passwd")));
    }

    #[test]
    fn test_check_path_input() {
        assert!(check_path_input("/p/.claude/agents/a.md").is_ok());
        assert!(check_path_input("/p/.claude/agents/a..b.md").is_ok());

        for bad in ["../etc/passwd", "/p/../x.md", "a\\..\\b", "a\0b", "%2E%2E/secret"] {
            let err = check_path_input(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Security, "{bad}");
        }
    }

    #[test]
    fn test_check_segment() {
        assert!(check_segment("my-skill").is_ok());
        assert!(check_segment("a/b").is_err());
        assert!(check_segment("..").is_err());
        assert!(check_segment("").is_err());
    }

    #[test]
    fn test_ensure_within() {
        let base = Path::new("/p");
        assert_eq!(
            ensure_within(base, Path::new("/p/.claude/x.md")).unwrap(),
            PathBuf::from("/p/.claude/x.md")
        );
        assert!(ensure_within(base, Path::new("/p/../q/x.md")).is_err());
    }
}
