// src/infrastructure/auth.rs
use crate::application::AuthProvider;
use crate::constants::SESSION_TTL_SECS;
use crate::domain::{DomainError, Identity, Session};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Username/password accounts and session tokens in the local database.
///
/// Passwords are stored as Argon2id PHC strings, which carry their own salt.
pub struct SqliteAuth {
    conn: Connection,
    session_ttl: Duration,
}

fn auth_error(e: rusqlite::Error) -> DomainError {
    DomainError::AuthenticationFailure(format!("auth store unavailable: {e}"))
}

fn hash_password(password: &str) -> Result<String, DomainError> {
    let failure = |e: argon2::password_hash::Error| {
        DomainError::AuthenticationFailure(format!("password hashing failed: {e}"))
    };
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes()).map_err(failure)?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(failure)
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is unreadable");
            false
        }
    }
}

impl SqliteAuth {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            session_ttl: Duration::from_secs(SESSION_TTL_SECS),
        }
    }

    /// How long a token issued by `sign_in` stays valid.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    fn purge_expired_sessions(&self) -> Result<(), DomainError> {
        let purged = self
            .conn
            .execute(
                "DELETE FROM sessions WHERE expires_at <= ?1",
                params![Utc::now().timestamp()],
            )
            .map_err(auth_error)?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }
        Ok(())
    }
}

impl AuthProvider for SqliteAuth {
    #[instrument(level = "debug", skip(self, password))]
    fn sign_up(&self, username: &str, password: &str) -> Result<Identity, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::AuthenticationFailure(
                "username and password are required".to_string(),
            ));
        }
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1",
                params![username],
                |_| Ok(()),
            )
            .optional()
            .map_err(auth_error)?
            .is_some();
        if exists {
            return Err(DomainError::AuthenticationFailure(format!(
                "user already exists: {username}"
            )));
        }

        let identity = Identity {
            identity_id: Uuid::new_v4().to_string(),
            username: username.to_string(),
        };
        self.conn
            .execute(
                "INSERT INTO users (identity_id, username, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    identity.identity_id,
                    username,
                    hash_password(password)?,
                    Utc::now().to_rfc3339()
                ],
            )
            .map_err(auth_error)?;

        info!(identity_id = %identity.identity_id, "Registered user");
        Ok(identity)
    }

    #[instrument(level = "debug", skip(self, password))]
    fn sign_in(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT identity_id, password_hash FROM users WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(auth_error)?;

        let identity_id = match row {
            Some((identity_id, hash)) if verify_password(password, &hash) => identity_id,
            _ => {
                debug!("Rejected credentials");
                return Err(DomainError::AuthenticationFailure(
                    "incorrect username or password".to_string(),
                ));
            }
        };

        self.purge_expired_sessions()?;
        let now = Utc::now();
        let expires_at = now.timestamp() + self.session_ttl.as_secs() as i64;
        let token = Uuid::new_v4().simple().to_string();
        self.conn
            .execute(
                "INSERT INTO sessions (token, identity_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![token, identity_id, now.to_rfc3339(), expires_at],
            )
            .map_err(auth_error)?;

        Ok(Session {
            token,
            identity: Identity {
                identity_id,
                username: username.to_string(),
            },
        })
    }

    fn session(&self, token: &str) -> Result<Session, DomainError> {
        self.conn
            .query_row(
                "SELECT u.identity_id, u.username FROM sessions s
                 JOIN users u ON u.identity_id = s.identity_id
                 WHERE s.token = ?1 AND s.expires_at > ?2",
                params![token, Utc::now().timestamp()],
                |row| {
                    Ok(Identity {
                        identity_id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()
            .map_err(auth_error)?
            .map(|identity| Session {
                token: token.to_string(),
                identity,
            })
            .ok_or_else(|| {
                DomainError::AuthenticationFailure("session expired or signed out".to_string())
            })
    }

    fn sign_out(&self, token: &str) -> Result<(), DomainError> {
        let removed = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])
            .map_err(auth_error)?;
        debug!(removed, "Removed session");
        Ok(())
    }
}
