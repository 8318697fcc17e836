// src/domain/identity.rs
use serde::{Deserialize, Serialize};

/// An authenticated user as seen by the backend.
///
/// `identity_id` is the namespace under which the user's uploaded objects live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub identity_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}
