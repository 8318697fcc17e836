// src/infrastructure/config.rs
use crate::constants::{APP_DIR_NAME, DEFAULT_URL_EXPIRY_SECS};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// TOML configuration of the notes client
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Connection settings of the backend; opaque to the client logic
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Empty means the platform data directory
    #[serde(default)]
    pub data_dir: String,
    #[serde(default = "default_url_expiry_secs")]
    pub url_expiry_secs: u64,
    /// Refuse to sign URLs for objects that were never stored. Turning this
    /// off shows a broken link, not the missing-image marker, for a note
    /// whose upload failed.
    #[serde(default = "default_true")]
    pub validate_object_existence: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub open_browser: bool,
}

fn default_url_expiry_secs() -> u64 {
    DEFAULT_URL_EXPIRY_SECS
}

fn default_true() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            url_expiry_secs: default_url_expiry_secs(),
            validate_object_existence: default_true(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            open_browser: default_true(),
        }
    }
}

impl BackendConfig {
    pub fn url_ttl(&self) -> Duration {
        Duration::from_secs(self.url_expiry_secs)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Data directory: command-line override, then config, then platform default
    pub fn data_dir(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = cli_override {
            return Ok(dir.to_path_buf());
        }
        if !self.backend.data_dir.is_empty() {
            return Ok(PathBuf::from(&self.backend.data_dir));
        }
        let base = dirs::data_dir().context("Could not find data directory")?;
        Ok(base.join(APP_DIR_NAME))
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_default_config_when_inspecting_then_uses_defaults() {
        let config = Config::default();

        assert_eq!(config.backend.url_expiry_secs, DEFAULT_URL_EXPIRY_SECS);
        assert!(config.backend.validate_object_existence);
        assert!(config.display.open_browser);
        assert_eq!(config.backend.url_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn given_toml_file_when_loading_then_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let toml_content = r#"
[backend]
data_dir = "/srv/notes"
url_expiry_secs = 60
validate_object_existence = false

[display]
open_browser = false
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.backend.data_dir, "/srv/notes");
        assert_eq!(config.backend.url_expiry_secs, 60);
        assert!(!config.backend.validate_object_existence);
        assert!(!config.display.open_browser);
    }

    #[test]
    fn given_partial_toml_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[backend]\nurl_expiry_secs = 30\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.backend.url_expiry_secs, 30);
        assert_eq!(config.backend.data_dir, "");
        assert!(config.display.open_browser);
    }

    #[test]
    fn given_nonexistent_file_when_loading_then_returns_error() {
        let result = Config::load("/nonexistent/path/config.toml");

        assert!(result.is_err());
    }

    #[test]
    fn given_cli_override_when_resolving_data_dir_then_override_wins() {
        let config = Config {
            backend: BackendConfig {
                data_dir: "/from/config".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(
            config.data_dir(Some(Path::new("/from/cli"))).unwrap(),
            PathBuf::from("/from/cli")
        );
        assert_eq!(config.data_dir(None).unwrap(), PathBuf::from("/from/config"));
    }
}
