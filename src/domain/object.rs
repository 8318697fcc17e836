// src/domain/object.rs
use crate::constants::MEDIA_PREFIX;
use crate::domain::{DomainError, Identity};
use serde::Serialize;
use std::fmt;

/// Storage path of an uploaded object: `media/<identityId>/<objectKey>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    identity_id: String,
    key: String,
}

impl ObjectPath {
    pub fn media(identity: &Identity, key: &str) -> Self {
        Self {
            identity_id: identity.identity_id.clone(),
            key: key.to_string(),
        }
    }

    /// Parses `media/<identityId>/<objectKey>`.
    pub fn parse(path: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::UrlResolutionFailure {
            path: path.to_string(),
            reason: "not a media path".to_string(),
        };
        let mut parts = path.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(MEDIA_PREFIX), Some(identity_id), Some(key))
                if !identity_id.is_empty() && !key.is_empty() && !key.contains('/') =>
            {
                Ok(Self {
                    identity_id: identity_id.to_string(),
                    key: key.to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    pub fn identity_id(&self) -> &str {
        &self.identity_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn belongs_to(&self, identity: &Identity) -> bool {
        self.identity_id == identity.identity_id
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", MEDIA_PREFIX, self.identity_id, self.key)
    }
}

/// A time-limited URL granting read access to one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: i64,
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
