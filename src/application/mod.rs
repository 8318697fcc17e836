// src/application/mod.rs
pub mod backend;
pub mod note_creator;
pub mod note_deleter;
pub mod note_form;
pub mod note_lister;
pub mod notes_client;
pub mod notification;

pub use backend::{AuthProvider, NoteStore, ObjectStore};
pub use note_creator::{CreateOutcome, NoteCreator, UploadStatus};
pub use note_deleter::{DeleteOutcome, NoteDeleter};
pub use note_form::NoteForm;
pub use note_lister::NoteLister;
pub use notes_client::{ClientState, Mutation, NotesClient, RefreshTicket};
pub use notification::{Notification, NotificationKind, NotificationLevel, Notifications};
