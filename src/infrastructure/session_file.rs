// src/infrastructure/session_file.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    username: String,
}

/// The signed-in session token, kept between command invocations.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Token of the saved session, if one was saved.
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        let stored: StoredSession =
            serde_json::from_str(&content).context("Failed to parse session file")?;
        debug!(username = %stored.username, "Loaded saved session");
        Ok(Some(stored.token))
    }

    pub fn save(&self, token: &str, username: &str) -> Result<()> {
        let stored = StoredSession {
            token: token.to_string(),
            username: username.to_string(),
        };
        let json = serde_json::to_string_pretty(&stored).context("Failed to serialize session")?;
        std::fs::write(&self.path, json).context("Failed to write session file")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn given_no_file_when_loading_then_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let file = SessionFile::new(temp_dir.path().join("session.json"));

        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn given_saved_session_when_loading_then_returns_token() {
        let temp_dir = TempDir::new().unwrap();
        let file = SessionFile::new(temp_dir.path().join("session.json"));

        file.save("tok-1", "alice").unwrap();

        assert_eq!(file.load().unwrap().as_deref(), Some("tok-1"));
    }

    #[test]
    fn given_saved_session_when_clearing_then_file_is_removed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let file = SessionFile::new(&path);
        file.save("tok-1", "alice").unwrap();

        file.clear().unwrap();
        file.clear().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn given_corrupt_file_when_loading_then_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(SessionFile::new(path).load().is_err());
    }
}
