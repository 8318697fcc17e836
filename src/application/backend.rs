// src/application/backend.rs
//
// Collaborator interfaces of the managed backend. Every record and object
// operation is scoped to an explicit identity instead of ambient session state.
use crate::domain::{DomainError, Identity, NewNote, Note, NoteId, ObjectPath, Session, SignedUrl};
use std::time::Duration;

pub trait AuthProvider {
    /// Register a new user. Does not sign in.
    fn sign_up(&self, username: &str, password: &str) -> Result<Identity, DomainError>;

    fn sign_in(&self, username: &str, password: &str) -> Result<Session, DomainError>;

    /// Look up a live session by its token.
    fn session(&self, token: &str) -> Result<Session, DomainError>;

    fn sign_out(&self, token: &str) -> Result<(), DomainError>;
}

pub trait NoteStore {
    /// All notes owned by `owner`, in backend order.
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, DomainError>;

    /// Persist a note; the store assigns its id.
    fn create(&self, owner: &Identity, note: NewNote) -> Result<Note, DomainError>;

    /// Remove a note. Fails with `NoteNotFound` if `owner` has no note `id`.
    fn delete(&self, owner: &Identity, id: &NoteId) -> Result<(), DomainError>;
}

pub trait ObjectStore {
    fn put_object(&self, path: &ObjectPath, bytes: &[u8]) -> Result<(), DomainError>;

    /// Time-limited read URL for `path`.
    fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<SignedUrl, DomainError>;

    /// Resolve a signed URL on behalf of `requester` and return the object bytes.
    ///
    /// Rejects expired or tampered URLs and URLs outside the requester's namespace.
    fn fetch(&self, requester: &Identity, url: &str) -> Result<Vec<u8>, DomainError>;
}

impl<T: AuthProvider + ?Sized> AuthProvider for &T {
    fn sign_up(&self, username: &str, password: &str) -> Result<Identity, DomainError> {
        (**self).sign_up(username, password)
    }

    fn sign_in(&self, username: &str, password: &str) -> Result<Session, DomainError> {
        (**self).sign_in(username, password)
    }

    fn session(&self, token: &str) -> Result<Session, DomainError> {
        (**self).session(token)
    }

    fn sign_out(&self, token: &str) -> Result<(), DomainError> {
        (**self).sign_out(token)
    }
}

impl<T: NoteStore + ?Sized> NoteStore for &T {
    fn list(&self, owner: &Identity) -> Result<Vec<Note>, DomainError> {
        (**self).list(owner)
    }

    fn create(&self, owner: &Identity, note: NewNote) -> Result<Note, DomainError> {
        (**self).create(owner, note)
    }

    fn delete(&self, owner: &Identity, id: &NoteId) -> Result<(), DomainError> {
        (**self).delete(owner, id)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn put_object(&self, path: &ObjectPath, bytes: &[u8]) -> Result<(), DomainError> {
        (**self).put_object(path, bytes)
    }

    fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> Result<SignedUrl, DomainError> {
        (**self).signed_url(path, ttl)
    }

    fn fetch(&self, requester: &Identity, url: &str) -> Result<Vec<u8>, DomainError> {
        (**self).fetch(requester, url)
    }
}
