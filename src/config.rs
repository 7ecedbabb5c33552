//! Configuration management for seriestui
//!
//! Config is stored at ~/.config/seriestui/config.toml. Every field is
//! optional; a missing or unreadable file means defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::acquisition::LockPolicy;
use crate::api::DEFAULT_BASE_URL;

/// Environment variable overriding the backend URL
pub const BACKEND_URL_ENV: &str = "SERIESTUI_BACKEND_URL";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker backend base URL
    pub backend_url: Option<String>,
    /// Log file used in TUI mode
    pub log_file: Option<PathBuf>,
    /// How search and grab exclude each other
    pub lock_policy: LockPolicy,
    /// Series list starts filtered to shows with missing seasons
    pub only_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            log_file: None,
            lock_policy: LockPolicy::default(),
            only_missing: true,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/seriestui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("seriestui").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from an explicit path, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine config path")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Remember the series filter chosen in the TUI.
    ///
    /// Writes to `path`, or the default location when `None`. Returns
    /// whether anything was written.
    pub fn persist_only_missing(&self, only_missing: bool, path: Option<&Path>) -> Result<bool> {
        if self.only_missing == only_missing {
            return Ok(false);
        }

        let updated = Self {
            only_missing,
            ..self.clone()
        };
        match path {
            Some(path) => updated.save_to(path)?,
            None => updated.save()?,
        }
        Ok(true)
    }

    /// Get the backend URL with fallback chain:
    /// 1. `--backend-url` flag
    /// 2. Environment variable SERIESTUI_BACKEND_URL
    /// 3. Config file
    /// 4. http://localhost:8000
    pub fn backend_url(&self, flag: Option<&str>) -> String {
        let env = std::env::var(BACKEND_URL_ENV).ok();
        resolve_backend_url(flag, env.as_deref(), self.backend_url.as_deref())
    }

    /// Log file for TUI mode (<data dir>/seriestui/seriestui.log by default)
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("seriestui")
                .join("seriestui.log")
        })
    }
}

/// First non-blank candidate wins; trailing slashes are dropped
fn resolve_backend_url(flag: Option<&str>, env: Option<&str>, file: Option<&str>) -> String {
    [flag, env, file]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.backend_url.is_none());
        assert!(config.only_missing);
        assert_eq!(config.lock_policy, LockPolicy::Independent);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"lock_policy = "shared""#).unwrap();
        assert_eq!(config.lock_policy, LockPolicy::Shared);
        assert!(config.only_missing);
    }

    #[test]
    fn test_backend_url_precedence() {
        assert_eq!(
            resolve_backend_url(Some("http://flag"), Some("http://env"), Some("http://file")),
            "http://flag"
        );
        assert_eq!(
            resolve_backend_url(None, Some("http://env/"), Some("http://file")),
            "http://env"
        );
        assert_eq!(
            resolve_backend_url(None, Some("  "), Some("http://file")),
            "http://file"
        );
        assert_eq!(resolve_backend_url(None, None, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("seriestui-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");

        let config = Config {
            backend_url: Some("http://tracker:8000".into()),
            log_file: None,
            lock_policy: LockPolicy::Shared,
            only_missing: false,
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_persist_only_missing_writes_on_change() {
        let dir = std::env::temp_dir().join(format!("seriestui-filter-{}", std::process::id()));
        let path = dir.join("config.toml");

        let config = Config {
            backend_url: Some("http://tracker:8000".into()),
            ..Config::default()
        };

        assert!(!config.persist_only_missing(true, Some(&path)).unwrap());
        assert!(!path.exists());

        assert!(config.persist_only_missing(false, Some(&path)).unwrap());
        let saved = Config::load_from(&path);
        assert!(!saved.only_missing);
        assert_eq!(saved.backend_url.as_deref(), Some("http://tracker:8000"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let config = Config::load_from(Path::new("/nonexistent/seriestui/config.toml"));
        assert_eq!(config, Config::default());
    }
}
