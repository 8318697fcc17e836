// src/application/note_form.rs
use crate::domain::{DomainError, ImageUpload, NoteDraft};

/// Input of the "create note" form: name and description are required,
/// the image is optional and must be an image file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

impl NoteForm {
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn to_draft(&self) -> Result<NoteDraft, DomainError> {
        NoteDraft::new(self.name.clone(), self.description.clone(), self.image.clone())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
