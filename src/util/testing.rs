// src/util/testing.rs

use anyhow::Result;
use chrono::Utc;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::env;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{AuthProvider, NoteStore, ObjectStore};
use crate::domain::{
    DomainError, Identity, NewNote, Note, NoteId, ObjectPath, Session, SignedUrl,
};

const MOCK_URL_SCHEME: &str = "mock://";

/// Backend operation that a `MockBackend` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Failure {
    SignIn,
    SignOut,
    List,
    Create,
    Delete,
    Upload,
    SignUrl,
}

#[derive(Default)]
struct MockState {
    users: HashMap<String, (String, Identity)>,
    sessions: HashMap<String, Identity>,
    notes: Vec<(String, Note)>,
    objects: HashMap<String, Vec<u8>>,
    failures: HashSet<Failure>,
    next_id: u64,
    urls_issued: u64,
}

impl MockState {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, failure: Failure) -> Result<(), String> {
        if self.failures.contains(&failure) {
            Err(format!("injected {:?} failure", failure))
        } else {
            Ok(())
        }
    }
}

/// In-memory backend implementing every collaborator trait
///
/// Records, objects and sessions live in one shared state, so a single mock can
/// be passed by reference as auth provider, note store and object store at once.
/// Failures can be injected per operation, before or during a test.
///
/// # Examples
///
/// ```
/// use notesapp::util::testing::{Failure, MockBackend};
///
/// let backend = MockBackend::builder()
///     .with_user("alice", "secret")
///     .with_note("alice", "Groceries", "Milk, eggs", None)
///     .failing(Failure::Upload)
///     .build();
/// assert_eq!(backend.note_count(), 1);
/// ```
pub struct MockBackend {
    state: RefCell<MockState>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::new()
    }

    pub fn fail(&self, failure: Failure) {
        self.state.borrow_mut().failures.insert(failure);
    }

    pub fn recover(&self, failure: Failure) {
        self.state.borrow_mut().failures.remove(&failure);
    }

    pub fn note_count(&self) -> usize {
        self.state.borrow().notes.len()
    }

    /// Stored bytes at `media/<identityId>/<key>`, if any
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.state.borrow().objects.get(path).cloned()
    }

    /// Number of issued session tokens that were not signed out
    pub fn active_sessions(&self) -> usize {
        self.state.borrow().sessions.len()
    }

    pub fn identity_of(&self, username: &str) -> Option<Identity> {
        self.state
            .borrow()
            .users
            .get(username)
            .map(|(_, identity)| identity.clone())
    }
}

fn mock_identity(username: &str) -> Identity {
    Identity {
        identity_id: format!("identity-{username}"),
        username: username.to_string(),
    }
}

impl AuthProvider for MockBackend {
    fn sign_up(&self, username: &str, password: &str) -> Result<Identity, DomainError> {
        let mut state = self.state.borrow_mut();
        if state.users.contains_key(username) {
            return Err(DomainError::AuthenticationFailure(format!(
                "user already exists: {username}"
            )));
        }
        let identity = mock_identity(username);
        state
            .users
            .insert(username.to_string(), (password.to_string(), identity.clone()));
        Ok(identity)
    }

    fn sign_in(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        let mut state = self.state.borrow_mut();
        state
            .check(Failure::SignIn)
            .map_err(DomainError::AuthenticationFailure)?;
        let identity = match state.users.get(username) {
            Some((stored, identity)) if stored == password => identity.clone(),
            _ => {
                return Err(DomainError::AuthenticationFailure(
                    "incorrect username or password".to_string(),
                ))
            }
        };
        let token = format!("token-{}", state.next());
        state.sessions.insert(token.clone(), identity.clone());
        Ok(Session { token, identity })
    }

    fn session(&self, token: &str) -> Result<Session, DomainError> {
        self.state
            .borrow()
            .sessions
            .get(token)
            .map(|identity| Session {
                token: token.to_string(),
                identity: identity.clone(),
            })
            .ok_or_else(|| DomainError::AuthenticationFailure("session expired".to_string()))
    }

    fn sign_out(&self, token: &str) -> Result<(), DomainError> {
        let mut state = self.state.borrow_mut();
        state
            .check(Failure::SignOut)
            .map_err(DomainError::AuthenticationFailure)?;
        state.sessions.remove(token);
        Ok(())
    }
}

impl NoteStore for MockBackend {
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, DomainError> {
        let state = self.state.borrow();
        state.check(Failure::List).map_err(DomainError::RecordOperationFailure)?;
        Ok(state
            .notes
            .iter()
            .filter(|(identity_id, _)| *identity_id == owner.identity_id)
            .map(|(_, note)| note.clone())
            .collect())
    }

    fn create(&self, owner: &Identity, note: NewNote) -> Result<Note, DomainError> {
        let mut state = self.state.borrow_mut();
        state.check(Failure::Create).map_err(DomainError::RecordOperationFailure)?;
        let note = Note {
            id: NoteId(format!("note-{}", state.next())),
            name: note.name,
            description: note.description,
            image_key: note.image_key,
            created_at: Utc::now(),
        };
        state.notes.push((owner.identity_id.clone(), note.clone()));
        Ok(note)
    }

    fn delete(&self, owner: &Identity, id: &NoteId) -> Result<(), DomainError> {
        let mut state = self.state.borrow_mut();
        state.check(Failure::Delete).map_err(DomainError::RecordOperationFailure)?;
        let before = state.notes.len();
        state
            .notes
            .retain(|(identity_id, note)| !(*identity_id == owner.identity_id && note.id == *id));
        if state.notes.len() == before {
            return Err(DomainError::NoteNotFound(id.clone()));
        }
        Ok(())
    }
}

impl ObjectStore for MockBackend {
    fn put_object(&self, path: &ObjectPath, bytes: &[u8]) -> Result<(), DomainError> {
        let mut state = self.state.borrow_mut();
        state.check(Failure::Upload).map_err(|reason| DomainError::UploadFailure {
            path: path.to_string(),
            reason,
        })?;
        state.objects.insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<SignedUrl, DomainError> {
        let mut state = self.state.borrow_mut();
        let unresolvable = |reason: String| DomainError::UrlResolutionFailure {
            path: path.to_string(),
            reason,
        };
        state.check(Failure::SignUrl).map_err(unresolvable)?;
        if !state.objects.contains_key(&path.to_string()) {
            return Err(unresolvable("object does not exist".to_string()));
        }
        state.urls_issued += 1;
        Ok(SignedUrl {
            url: format!("{MOCK_URL_SCHEME}{path}?v={}", state.urls_issued),
            expires_at: Utc::now().timestamp() + ttl.as_secs() as i64,
        })
    }

    fn fetch(&self, requester: &Identity, url: &str) -> Result<Vec<u8>, DomainError> {
        let raw_path = url
            .strip_prefix(MOCK_URL_SCHEME)
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default();
        let path = ObjectPath::parse(raw_path)?;
        if !path.belongs_to(requester) {
            return Err(DomainError::UrlResolutionFailure {
                path: path.to_string(),
                reason: "access denied".to_string(),
            });
        }
        self.object(&path.to_string())
            .ok_or_else(|| DomainError::UrlResolutionFailure {
                path: path.to_string(),
                reason: "object does not exist".to_string(),
            })
    }
}

/// Builder for MockBackend
///
/// Provides a fluent interface for seeding users, notes and objects.
pub struct MockBackendBuilder {
    state: MockState,
}

impl MockBackendBuilder {
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
        }
    }

    /// Register a user that can sign in with `password`
    pub fn with_user(mut self, username: &str, password: &str) -> Self {
        self.state.users.insert(
            username.to_string(),
            (password.to_string(), mock_identity(username)),
        );
        self
    }

    /// Seed a note owned by `username`
    pub fn with_note(
        mut self,
        username: &str,
        name: &str,
        description: &str,
        image_key: Option<&str>,
    ) -> Self {
        let id = NoteId(format!("note-{}", self.state.next()));
        let note = Note {
            id,
            name: name.to_string(),
            description: description.to_string(),
            image_key: image_key.map(str::to_string),
            created_at: Utc::now(),
        };
        self.state
            .notes
            .push((mock_identity(username).identity_id, note));
        self
    }

    /// Seed an object stored under `media/<identity of username>/<key>`
    pub fn with_object(mut self, username: &str, key: &str, bytes: &[u8]) -> Self {
        let path = ObjectPath::media(&mock_identity(username), key);
        self.state.objects.insert(path.to_string(), bytes.to_vec());
        self
    }

    /// Make an operation fail from the start
    pub fn failing(mut self, failure: Failure) -> Self {
        self.state.failures.insert(failure);
        self
    }

    pub fn build(self) -> MockBackend {
        MockBackend {
            state: RefCell::new(self.state),
        }
    }
}

impl Default for MockBackendBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["rusqlite", "mio"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[test]
    fn given_seeded_user_when_signing_in_with_password_then_returns_session() {
        let backend = MockBackend::builder().with_user("alice", "secret").build();

        let session = backend.sign_in("alice", "secret").expect("sign in");

        assert_eq!(session.identity.username, "alice");
        assert_eq!(backend.session(&session.token).expect("live"), session);
    }

    #[test]
    fn given_wrong_password_when_signing_in_then_fails() {
        let backend = MockBackend::builder().with_user("alice", "secret").build();

        let result = backend.sign_in("alice", "nope");

        assert!(matches!(result, Err(DomainError::AuthenticationFailure(_))));
    }

    #[test]
    fn given_notes_of_two_users_when_listing_then_returns_only_owned() {
        let backend = MockBackend::builder()
            .with_user("alice", "a")
            .with_user("bob", "b")
            .with_note("alice", "Mine", "A", None)
            .with_note("bob", "Theirs", "B", None)
            .build();
        let alice = backend.identity_of("alice").expect("seeded");

        let notes = backend.list(&alice).expect("list");

        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].name, "Mine");
    }

    #[test]
    fn given_injected_failure_when_recovering_then_operation_succeeds_again() {
        let backend = MockBackend::builder()
            .with_user("alice", "a")
            .failing(Failure::List)
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        assert!(backend.list(&alice).is_err());

        backend.recover(Failure::List);

        assert!(backend.list(&alice).is_ok());
    }

    #[test]
    fn given_foreign_identity_when_fetching_url_then_access_is_denied() {
        let backend = MockBackend::builder()
            .with_user("alice", "a")
            .with_user("bob", "b")
            .with_object("alice", "photo.jpg", b"jpeg")
            .build();
        let alice = backend.identity_of("alice").expect("seeded");
        let bob = backend.identity_of("bob").expect("seeded");
        let url = backend
            .signed_url(&ObjectPath::media(&alice, "photo.jpg"), Duration::from_secs(60))
            .expect("signed");

        assert_eq!(backend.fetch(&alice, &url.url).expect("owner"), b"jpeg");
        assert!(backend.fetch(&bob, &url.url).is_err());
    }
}
