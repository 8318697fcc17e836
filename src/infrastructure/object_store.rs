// src/infrastructure/object_store.rs
use crate::application::ObjectStore;
use crate::constants::SIGNING_KEY_FILE;
use crate::domain::{DomainError, Identity, ObjectPath, SignedUrl};
use anyhow::{Context, Result};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Objects stored as files under `<root>/media/<identityId>/<key>`
///
/// Display URLs are `file://` URLs carrying an expiry and an HMAC signature,
/// so they open directly in a browser while `fetch` can still verify them.
#[derive(Debug)]
pub struct LocalObjectStore {
    root: PathBuf,
    signing_key: Vec<u8>,
    validate_existence: bool,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, signing_key: Vec<u8>) -> Self {
        Self {
            root: root.into(),
            signing_key,
            validate_existence: true,
        }
    }

    /// Open the store at `root`, creating its signing key on first use.
    pub fn open(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create object root {}", root.display()))?;
        let key_path = root.join(SIGNING_KEY_FILE);

        let signing_key = if key_path.exists() {
            let encoded = std::fs::read_to_string(&key_path).context("Failed to read signing key")?;
            hex::decode(encoded.trim()).context("Signing key file is corrupt")?
        } else {
            let mut key = Uuid::new_v4().as_bytes().to_vec();
            key.extend_from_slice(Uuid::new_v4().as_bytes());
            std::fs::write(&key_path, hex::encode(&key)).context("Failed to write signing key")?;
            info!(?key_path, "Created URL signing key");
            key
        };

        Ok(Self::new(root, signing_key))
    }

    /// Whether `signed_url` refuses to sign paths with no stored object.
    pub fn with_existence_check(mut self, validate: bool) -> Self {
        self.validate_existence = validate;
        self
    }

    fn object_file(&self, path: &ObjectPath) -> PathBuf {
        self.root
            .join(crate::constants::MEDIA_PREFIX)
            .join(path.identity_id())
            .join(path.key())
    }

    fn mac(&self, path: &ObjectPath, expires_at: i64) -> Result<HmacSha256, DomainError> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key).map_err(|e| {
            DomainError::UrlResolutionFailure {
                path: path.to_string(),
                reason: format!("invalid signing key: {e}"),
            }
        })?;
        mac.update(format!("{path}\n{expires_at}").as_bytes());
        Ok(mac)
    }

    /// Recover the object path from the file part of a signed URL.
    fn object_path_of(&self, file: &str) -> Option<ObjectPath> {
        let relative = Path::new(file).strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                _ => return None,
            }
        }
        ObjectPath::parse(&parts.join("/")).ok()
    }
}

impl ObjectStore for LocalObjectStore {
    #[instrument(level = "debug", skip(self, bytes), fields(path = %path))]
    fn put_object(&self, path: &ObjectPath, bytes: &[u8]) -> Result<(), DomainError> {
        let upload_error = |reason: String| DomainError::UploadFailure {
            path: path.to_string(),
            reason,
        };
        let target = self.object_file(path);
        let dir = target
            .parent()
            .ok_or_else(|| upload_error("object has no parent directory".to_string()))?;
        std::fs::create_dir_all(dir).map_err(|e| upload_error(e.to_string()))?;

        // write next to the target and rename, so readers never see partial files
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| upload_error(e.to_string()))?;
        tmp.write_all(bytes).map_err(|e| upload_error(e.to_string()))?;
        tmp.persist(&target).map_err(|e| upload_error(e.error.to_string()))?;

        debug!(?target, bytes = bytes.len(), "Stored object");
        Ok(())
    }

    fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<SignedUrl, DomainError> {
        let file = self.object_file(path);
        if self.validate_existence && !file.is_file() {
            return Err(DomainError::UrlResolutionFailure {
                path: path.to_string(),
                reason: "object does not exist".to_string(),
            });
        }

        let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
        let signature = hex::encode(self.mac(path, expires_at)?.finalize().into_bytes());
        let url = format!(
            "file://{}?expires={}&signature={}",
            percent_encode(&file.to_string_lossy()),
            expires_at,
            signature
        );
        Ok(SignedUrl { url, expires_at })
    }

    #[instrument(level = "debug", skip(self, requester))]
    fn fetch(&self, requester: &Identity, url: &str) -> Result<Vec<u8>, DomainError> {
        let unresolvable = |path: &str, reason: &str| DomainError::UrlResolutionFailure {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let rest = url
            .strip_prefix("file://")
            .ok_or_else(|| unresolvable(url, "not a file URL"))?;
        let (file_part, query) = rest
            .split_once('?')
            .ok_or_else(|| unresolvable(url, "URL is not signed"))?;
        let file = percent_decode(file_part).ok_or_else(|| unresolvable(url, "malformed URL"))?;
        let path = self
            .object_path_of(&file)
            .ok_or_else(|| unresolvable(&file, "URL does not point into the object store"))?;

        let mut expires_at = None;
        let mut signature = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", value)) => expires_at = value.parse::<i64>().ok(),
                Some(("signature", value)) => signature = hex::decode(value).ok(),
                _ => {}
            }
        }
        let path_str = path.to_string();
        let (expires_at, signature) = expires_at
            .zip(signature)
            .ok_or_else(|| unresolvable(&path_str, "URL is not signed"))?;

        self.mac(&path, expires_at)?
            .verify_slice(&signature)
            .map_err(|_| unresolvable(&path_str, "signature mismatch"))?;
        if expires_at < Utc::now().timestamp() {
            return Err(unresolvable(&path_str, "URL expired"));
        }
        if !path.belongs_to(requester) {
            return Err(unresolvable(&path_str, "access denied"));
        }

        std::fs::read(self.object_file(&path)).map_err(|e| unresolvable(&path_str, &e.to_string()))
    }
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' | b':' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn percent_decode(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
