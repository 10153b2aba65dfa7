//! Global configuration for AGCM.
//!
//! The global configuration file (`~/.agcm/config.toml`) holds user-wide
//! settings that are not part of any project: which home directory the tool
//! treats as "the user's home" and the defaults applied to newly merged hooks.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.agcm/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\agcm\config.toml`
//!
//! The location can be overridden with the `AGCM_CONFIG_PATH` environment
//! variable or the `--config` command-line flag.
//!
//! # File Format
//!
//! ```toml
//! # Operate on a different home directory (tilde is expanded)
//! home = "~/sandbox-home"
//!
//! [hooks]
//! default_timeout = 30
//! default_enabled = true
//! ```
//!
//! Every key is optional; a missing file yields [`GlobalConfig::default`].

use crate::hooks::HookDefaults;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Environment variable that overrides the global config path.
pub const CONFIG_PATH_ENV: &str = "AGCM_CONFIG_PATH";

const fn default_timeout() -> u64 {
    60
}

const fn default_enabled() -> bool {
    true
}

/// Defaults written into newly created hook commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSettings {
    /// Seconds before the host tool kills a hook command.
    #[serde(default = "default_timeout")]
    pub default_timeout: u64,

    /// Whether new hook commands start enabled.
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,
}

impl Default for HookSettings {
    fn default() -> Self {
        Self {
            default_timeout: default_timeout(),
            default_enabled: default_enabled(),
        }
    }
}

impl From<&HookSettings> for HookDefaults {
    fn from(settings: &HookSettings) -> Self {
        Self {
            timeout: settings.default_timeout,
            enabled: settings.default_enabled,
        }
    }
}

/// User-wide settings loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Home directory override. `~` and environment variables are expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    /// Hook defaults.
    #[serde(default)]
    pub hooks: HookSettings,
}

impl GlobalConfig {
    /// Load from `AGCM_CONFIG_PATH` or the default location.
    ///
    /// A missing file yields the default configuration.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` when given, otherwise from [`default_path`](Self::default_path).
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No global config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse global config from {}", path.display()))
    }

    /// The config path: `AGCM_CONFIG_PATH` when set, otherwise the platform default.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("agcm")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".agcm")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// The home directory every user-scope path is rooted at.
    ///
    /// Uses the `home` override when set, falling back to the OS home directory.
    pub fn resolve_home(&self) -> Result<PathBuf> {
        if let Some(home) = &self.home {
            let expanded = shellexpand::full(home)
                .with_context(|| format!("Failed to expand home directory '{home}'"))?;
            return Ok(PathBuf::from(expanded.as_ref()));
        }

        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))
    }

    /// Hook defaults in the form the merge engine consumes.
    #[must_use]
    pub fn hook_defaults(&self) -> HookDefaults {
        HookDefaults::from(&self.hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert!(config.home.is_none());
        assert_eq!(config.hooks.default_timeout, 60);
        assert!(config.hooks.default_enabled);
        assert_eq!(config.hook_defaults(), HookDefaults::default());
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let config =
            GlobalConfig::load_with_optional(Some(temp.path().join("config.toml"))).await?;
        assert_eq!(config, GlobalConfig::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "[hooks]\ndefault_timeout = 15\n").await?;

        let config = GlobalConfig::load_from(&path).await?;
        assert_eq!(config.hooks.default_timeout, 15);
        assert!(config.hooks.default_enabled);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_from_file() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "home = \"/srv/home\"\n\n[hooks]\ndefault_timeout = 5\ndefault_enabled = false\n")
            .await?;

        let expected = GlobalConfig {
            home: Some("/srv/home".into()),
            hooks: HookSettings {
                default_timeout: 5,
                default_enabled: false,
            },
        };
        assert_eq!(GlobalConfig::load_from(&path).await?, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_toml_is_an_error() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.toml");
        fs::write(&path, "home = [").await?;
        assert!(GlobalConfig::load_from(&path).await.is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_home_override() -> Result<()> {
        let config = GlobalConfig {
            home: Some("/custom/home".into()),
            ..Default::default()
        };
        assert_eq!(config.resolve_home()?, PathBuf::from("/custom/home"));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_default_path_env_override() -> Result<()> {
        // SAFETY: serialized with every other test touching this variable
        unsafe { std::env::set_var(CONFIG_PATH_ENV, "/tmp/agcm-test/config.toml") };
        let path = GlobalConfig::default_path();
        unsafe { std::env::remove_var(CONFIG_PATH_ENV) };
        assert_eq!(path?, PathBuf::from("/tmp/agcm-test/config.toml"));
        Ok(())
    }
}
