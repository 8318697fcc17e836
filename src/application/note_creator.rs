// src/application/note_creator.rs
use crate::application::{NoteStore, ObjectStore};
use crate::domain::{DomainError, Identity, Note, NoteDraft, ObjectPath};
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    NotRequested,
    Uploaded { path: String },
    /// The note was stored but its image was not.
    Failed(DomainError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub note: Note,
    pub upload: UploadStatus,
}

pub struct NoteCreator<S: NoteStore, O: ObjectStore> {
    store: S,
    objects: O,
}

impl<S: NoteStore, O: ObjectStore> NoteCreator<S, O> {
    pub fn new(store: S, objects: O) -> Self {
        Self { store, objects }
    }

    /// Create the note record, then upload its image
    ///
    /// The upload only starts once the record exists, so a failed create never
    /// leaves an orphaned object behind. Upload is best-effort: its failure is
    /// reported in the outcome while the note stays persisted.
    #[instrument(level = "debug", skip(self, identity, draft), fields(name = draft.name()))]
    pub fn create_note(
        &self,
        identity: &Identity,
        draft: &NoteDraft,
    ) -> Result<CreateOutcome, DomainError> {
        let note = self.store.create(identity, draft.to_new_note())?;
        info!(note_id = %note.id, "Created note");

        let upload = match (note.image_key.as_deref(), draft.image()) {
            (Some(key), Some(image)) => {
                let path = ObjectPath::media(identity, key);
                match self.objects.put_object(&path, &image.bytes) {
                    Ok(()) => {
                        info!(%path, bytes = image.bytes.len(), "Uploaded image");
                        UploadStatus::Uploaded {
                            path: path.to_string(),
                        }
                    }
                    Err(e) => {
                        warn!(%path, error = %e, "Image upload failed, note kept");
                        UploadStatus::Failed(e)
                    }
                }
            }
            _ => UploadStatus::NotRequested,
        };

        Ok(CreateOutcome { note, upload })
    }
}
