use anyhow::{Context, Result};
use notesapp::infrastructure::Config;
use notesapp::{open_local_client, LocalNotesClient};
use std::path::PathBuf;
use tempfile::TempDir;

/// A local backend living in a temporary data directory
#[allow(dead_code)]
pub struct TestBackend {
    _temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub config: Config,
}

#[allow(dead_code)]
impl TestBackend {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let data_dir = temp_dir.path().join("data");

        Ok(Self {
            _temp_dir: temp_dir,
            data_dir,
            config: Config::default(),
        })
    }

    /// Open a fresh client over this backend, as a new app start would
    pub fn client(&self) -> Result<LocalNotesClient> {
        open_local_client(&self.data_dir, &self.config)
    }

    /// Client signed in as a newly registered user
    pub fn signed_in_client(&self, username: &str) -> Result<LocalNotesClient> {
        let mut client = self.client()?;
        client.sign_up(username, test_users::PASSWORD)?;
        client.sign_in(username, test_users::PASSWORD)?;
        Ok(client)
    }

    pub fn object_file(&self, identity_id: &str, key: &str) -> PathBuf {
        self.data_dir.join("media").join(identity_id).join(key)
    }
}

#[allow(dead_code)]
pub mod test_users {
    pub const ALICE: &str = "alice";
    pub const BOB: &str = "bob";
    pub const PASSWORD: &str = "correct horse battery staple";
}

/// Bytes of a tiny but valid PNG
#[allow(dead_code)]
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];
