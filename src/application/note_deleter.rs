// src/application/note_deleter.rs
use crate::application::NoteStore;
use crate::domain::{DomainError, Identity, NoteId};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The note did not exist (or was already deleted); nothing changed.
    AlreadyAbsent,
}

pub struct NoteDeleter<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NoteDeleter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Delete a note; deleting an unknown id is reported, not raised
    ///
    /// The note's image object is left in place since other notes may
    /// reference the same key.
    #[instrument(level = "debug", skip(self, identity))]
    pub fn delete_note(
        &self,
        identity: &Identity,
        note_id: &NoteId,
    ) -> Result<DeleteOutcome, DomainError> {
        match self.store.delete(identity, note_id) {
            Ok(()) => {
                info!(%note_id, "Deleted note");
                Ok(DeleteOutcome::Deleted)
            }
            Err(DomainError::NoteNotFound(_)) => {
                debug!(%note_id, "Note not found for deletion");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => Err(e),
        }
    }
}
