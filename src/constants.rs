// src/constants.rs
//
// Application-wide constants.

/// Top-level namespace for uploaded objects: `media/<identityId>/<objectKey>`.
pub const MEDIA_PREFIX: &str = "media";

/// Lifetime of a signed display URL when the config does not set one.
///
/// Used in: `infrastructure/config.rs`, `application/notes_client.rs`
pub const DEFAULT_URL_EXPIRY_SECS: u64 = 900;

/// Delay in milliseconds after writing the HTML page before the browser is opened.
///
/// Used in: `infrastructure/renderer.rs`
pub const BROWSER_LAUNCH_DELAY_MS: u64 = 200;

/// SQLite file holding users, sessions and notes of the local backend.
pub const DATABASE_FILE: &str = "notes.db";

/// File persisting the signed-in session between invocations.
pub const SESSION_FILE: &str = "session.json";

/// Per-installation key used to sign display URLs.
pub const SIGNING_KEY_FILE: &str = "signing.key";

/// Directory name under the platform config/data dirs.
pub const APP_DIR_NAME: &str = "notesapp";

/// Page written to the data directory when the browser is not opened.
pub const PAGE_FILE: &str = "notes.html";

/// Lifetime of a local backend session token: 30 days.
///
/// Used in: `infrastructure/auth.rs`
pub const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;
