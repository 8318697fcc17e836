// src/application/notes_client.rs
//
// View state of the notes UI and the workflow around the backend calls.
// Every mutation is followed by a full refresh; the backend list always wins.
use crate::application::note_creator::{CreateOutcome, NoteCreator, UploadStatus};
use crate::application::note_deleter::{DeleteOutcome, NoteDeleter};
use crate::application::note_form::NoteForm;
use crate::application::note_lister::NoteLister;
use crate::application::notification::{NotificationKind, NotificationLevel, Notifications};
use crate::application::{AuthProvider, NoteStore, ObjectStore};
use crate::domain::{DomainError, Identity, NoteDraft, NoteId, NoteView, Session};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Delete,
}

/// `Unauthenticated -> Loading -> Loaded <-> Mutating -> Loaded`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Unauthenticated,
    Loading,
    Loaded,
    Mutating(Mutation),
}

/// Identifies one issued refresh. Results of older tickets are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket {
    epoch: u64,
    seq: u64,
}

pub struct NotesClient<A: AuthProvider, S: NoteStore, O: ObjectStore> {
    auth: A,
    store: S,
    objects: O,
    url_ttl: Duration,
    session: Option<Session>,
    state: ClientState,
    notes: Vec<NoteView>,
    stale: bool,
    notifications: Notifications,
    // bumped on every sign-in and sign-out
    epoch: u64,
    issued: u64,
    applied: u64,
}

impl<A: AuthProvider, S: NoteStore, O: ObjectStore> NotesClient<A, S, O> {
    pub fn new(auth: A, store: S, objects: O, url_ttl: Duration) -> Self {
        Self {
            auth,
            store,
            objects,
            url_ttl,
            session: None,
            state: ClientState::Unauthenticated,
            notes: Vec::new(),
            stale: false,
            notifications: Notifications::new(),
            epoch: 0,
            issued: 0,
            applied: 0,
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.as_ref().map(|s| &s.identity)
    }

    /// Notes of the last applied refresh.
    pub fn notes(&self) -> &[NoteView] {
        &self.notes
    }

    /// True when the last refresh failed and `notes()` shows older data.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn dismiss(&mut self, notification_id: u64) -> bool {
        self.notifications.dismiss(notification_id)
    }

    /// Register a user. The client stays signed out.
    pub fn sign_up(&mut self, username: &str, password: &str) -> Result<Identity, DomainError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(self.report(DomainError::AuthenticationFailure(
                "username and password are required".to_string(),
            )));
        }
        match self.auth.sign_up(username, password) {
            Ok(identity) => {
                info!(username, "Signed up");
                Ok(identity)
            }
            Err(e) => Err(self.report(e)),
        }
    }

    #[instrument(level = "debug", skip(self, password))]
    pub fn sign_in(&mut self, username: &str, password: &str) -> Result<(), DomainError> {
        match self.auth.sign_in(username, password) {
            Ok(session) => {
                self.start_session(session);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Restore a session persisted by an earlier run.
    pub fn resume(&mut self, token: &str) -> Result<(), DomainError> {
        match self.auth.session(token) {
            Ok(session) => {
                self.start_session(session);
                Ok(())
            }
            Err(e) => Err(self.report(e)),
        }
    }

    fn start_session(&mut self, session: Session) {
        info!(username = %session.identity.username, "Session started");
        if let Some(previous) = self.session.take() {
            if previous.token != session.token {
                self.revoke(&previous);
            }
        }
        self.reset_view();
        self.session = Some(session);
        self.state = ClientState::Loading;
        // a failed initial load leaves an empty, stale list and a notification
        let _ = self.refresh();
    }

    fn revoke(&self, previous: &Session) {
        match self.auth.sign_out(&previous.token) {
            Ok(()) => debug!(username = %previous.identity.username, "Revoked replaced session"),
            Err(e) => warn!(error = %e, "Failed to revoke replaced session"),
        }
    }

    /// End the session. Local state is torn down even if the backend call fails.
    #[instrument(level = "debug", skip(self))]
    pub fn sign_out(&mut self) -> Result<(), DomainError> {
        let session = self.session.take().ok_or(DomainError::NotAuthenticated)?;
        let result = self.auth.sign_out(&session.token);
        self.reset_view();
        self.state = ClientState::Unauthenticated;
        match result {
            Ok(()) => {
                info!(username = %session.identity.username, "Signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Backend sign-out failed, local session dropped");
                Err(e)
            }
        }
    }

    fn reset_view(&mut self) {
        self.epoch += 1;
        self.issued = 0;
        self.applied = 0;
        self.notes.clear();
        self.stale = false;
        self.notifications.clear();
    }

    fn require_identity(&mut self) -> Result<Identity, DomainError> {
        match self.identity() {
            Some(identity) => Ok(identity.clone()),
            None => Err(self.report(DomainError::NotAuthenticated)),
        }
    }

    /// Record a failure as a notification and hand it back to the caller.
    fn report(&mut self, err: DomainError) -> DomainError {
        debug!(error = %err, "Reporting failure");
        self.notifications.push_error(&err);
        err
    }

    /// Issue a refresh ticket. Call `fetch` and `apply_refresh` with it.
    pub fn begin_refresh(&mut self) -> Result<RefreshTicket, DomainError> {
        self.require_identity()?;
        self.issued += 1;
        if !matches!(self.state, ClientState::Mutating(_)) {
            self.state = ClientState::Loading;
        }
        Ok(RefreshTicket {
            epoch: self.epoch,
            seq: self.issued,
        })
    }

    /// Fetch the authoritative list without touching view state.
    pub fn fetch(&self, ticket: RefreshTicket) -> Result<Vec<NoteView>, DomainError> {
        let identity = match self.identity() {
            Some(identity) if ticket.epoch == self.epoch => identity,
            _ => return Err(DomainError::NotAuthenticated),
        };
        NoteLister::new(&self.store, &self.objects, self.url_ttl).list_notes(identity)
    }

    /// Apply a fetched list. Returns false if a newer refresh was already applied
    /// or the ticket belongs to an ended session.
    pub fn apply_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Vec<NoteView>, DomainError>,
    ) -> bool {
        if ticket.epoch != self.epoch || ticket.seq <= self.applied {
            debug!(?ticket, applied = self.applied, "Discarding stale refresh");
            return false;
        }
        self.applied = ticket.seq;

        match result {
            Ok(notes) => {
                debug!(count = notes.len(), "Applied refresh");
                self.notes = notes;
                self.stale = false;
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, keeping last list");
                self.stale = true;
                self.report(e);
            }
        }
        if ticket.seq == self.issued && !matches!(self.state, ClientState::Mutating(_)) {
            self.state = ClientState::Loaded;
        }
        true
    }

    /// Replace the view with the backend's current list.
    pub fn refresh(&mut self) -> Result<(), DomainError> {
        let ticket = self.begin_refresh()?;
        let result = self.fetch(ticket);
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone());
        self.apply_refresh(ticket, result);
        outcome
    }

    /// Create a note, upload its image if any, then refresh
    ///
    /// Returns an error only if the note record was not created. An upload
    /// failure is reported as a notification and in the outcome.
    pub fn create(&mut self, draft: &NoteDraft) -> Result<CreateOutcome, DomainError> {
        let identity = self.require_identity()?;
        self.state = ClientState::Mutating(Mutation::Create);

        let result = NoteCreator::new(&self.store, &self.objects).create_note(&identity, draft);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.state = ClientState::Loaded;
                return Err(self.report(e));
            }
        };
        if let UploadStatus::Failed(e) = &outcome.upload {
            self.notifications.push(
                NotificationKind::Upload,
                NotificationLevel::Warning,
                format!("Note \"{}\" was saved without its image: {}", outcome.note.name, e),
            );
        }

        self.state = ClientState::Loaded;
        let _ = self.refresh();
        Ok(outcome)
    }

    /// Validate the form, create the note and reset the form once the record exists.
    ///
    /// The form keeps its input when validation or record creation fails.
    pub fn submit(&mut self, form: &mut NoteForm) -> Result<CreateOutcome, DomainError> {
        let draft = form.to_draft().map_err(|e| self.report(e))?;
        let outcome = self.create(&draft)?;
        form.reset();
        Ok(outcome)
    }

    /// Delete a note by id, then refresh.
    pub fn delete(&mut self, note_id: &NoteId) -> Result<DeleteOutcome, DomainError> {
        let identity = self.require_identity()?;
        self.state = ClientState::Mutating(Mutation::Delete);

        let result = NoteDeleter::new(&self.store).delete_note(&identity, note_id);
        self.state = ClientState::Loaded;
        let outcome = result.map_err(|e| self.report(e))?;
        if outcome == DeleteOutcome::AlreadyAbsent {
            self.notifications.push(
                NotificationKind::Info,
                NotificationLevel::Info,
                format!("Note {note_id} no longer exists"),
            );
        }

        let _ = self.refresh();
        Ok(outcome)
    }

    /// Download the bytes behind a note's display URL as the signed-in user.
    pub fn fetch_image(&self, view: &NoteView) -> Result<Vec<u8>, DomainError> {
        let identity = self.identity().ok_or(DomainError::NotAuthenticated)?;
        let url = view.image.url().ok_or_else(|| DomainError::UrlResolutionFailure {
            path: view.note.image_key.clone().unwrap_or_default(),
            reason: "note has no resolvable image".to_string(),
        })?;
        self.objects.fetch(identity, &url.url)
    }
}
