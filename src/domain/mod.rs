// src/domain/mod.rs
pub mod error;
pub mod identity;
pub mod note;
pub mod object;

pub use error::DomainError;
pub use identity::{Identity, Session};
pub use note::{ImageDisplay, ImageUpload, NewNote, Note, NoteDraft, NoteId, NoteView};
pub use object::{ObjectPath, SignedUrl};
