// src/domain/note.rs
use crate::domain::object::SignedUrl;
use crate::domain::DomainError;
use crate::util::media::image_content_type;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        NoteId(value.to_string())
    }
}

/// A note as persisted by the record store.
///
/// `image_key` is always an object key, never a display URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    pub description: String,
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields sent to the record store on create; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub name: String,
    pub description: String,
    pub image_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Accepts only plain file names with an image extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DomainError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(DomainError::Validation("image file name is empty".to_string()));
        }
        let has_path = file_name.contains(|c: char| c == '/' || c == '\\');
        if has_path || file_name == "." || file_name == ".." {
            return Err(DomainError::Validation(format!(
                "image file name must not contain a path: {file_name}"
            )));
        }
        let content_type = image_content_type(&file_name).ok_or_else(|| {
            DomainError::Validation(format!("not an image file: {file_name}"))
        })?;
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// Validated input of the note form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    name: String,
    description: String,
    image: Option<ImageUpload>,
}

impl NoteDraft {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: Option<ImageUpload>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation("name is required".to_string()));
        }
        if description.trim().is_empty() {
            return Err(DomainError::Validation("description is required".to_string()));
        }
        Ok(Self {
            name,
            description,
            image,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    /// Record fields for the store; the image key is the uploaded file's name.
    pub fn to_new_note(&self) -> NewNote {
        NewNote {
            name: self.name.clone(),
            description: self.description.clone(),
            image_key: self.image.as_ref().map(|i| i.file_name.clone()),
        }
    }
}

/// Display state of a note's image. Derived on every list, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageDisplay {
    None,
    Url { url: SignedUrl },
    Missing { reason: String },
}

impl ImageDisplay {
    pub fn url(&self) -> Option<&SignedUrl> {
        match self {
            ImageDisplay::Url { url } => Some(url),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ImageDisplay::Missing { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,
    pub image: ImageDisplay,
}

impl NoteView {
    pub fn id(&self) -> &NoteId {
        &self.note.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_name_and_description_when_creating_draft_then_succeeds() {
        let draft = NoteDraft::new("Groceries", "Milk, eggs", None).expect("valid draft");

        let new_note = draft.to_new_note();
        assert_eq!(new_note.name, "Groceries");
        assert_eq!(new_note.description, "Milk, eggs");
        assert_eq!(new_note.image_key, None);
    }

    #[rstest]
    #[case("", "desc")]
    #[case("   ", "desc")]
    #[case("name", "")]
    #[case("name", "\t\n")]
    fn given_blank_required_field_when_creating_draft_then_fails(
        #[case] name: &str,
        #[case] description: &str,
    ) {
        let result = NoteDraft::new(name, description, None);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn given_image_when_creating_draft_then_key_is_file_name() {
        let image = ImageUpload::new("photo.jpg", vec![1, 2, 3]).expect("valid image");

        let draft = NoteDraft::new("Trip", "Beach", Some(image)).expect("valid draft");

        assert_eq!(draft.to_new_note().image_key.as_deref(), Some("photo.jpg"));
        assert_eq!(draft.image().map(|i| i.content_type), Some("image/jpeg"));
    }

    #[rstest]
    #[case("notes.txt")]
    #[case("")]
    #[case("../photo.jpg")]
    #[case("dir/photo.png")]
    fn given_invalid_image_name_when_creating_upload_then_fails(#[case] file_name: &str) {
        let result = ImageUpload::new(file_name, vec![]);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn given_note_view_when_serializing_then_flattens_note_and_tags_image() {
        let view = NoteView {
            note: Note {
                id: NoteId::from("n-1"),
                name: "Groceries".to_string(),
                description: "Milk, eggs".to_string(),
                image_key: None,
                created_at: Utc::now(),
            },
            image: ImageDisplay::None,
        };

        let json = serde_json::to_value(&view).expect("serializable");

        assert_eq!(json["id"], "n-1");
        assert_eq!(json["name"], "Groceries");
        assert_eq!(json["image"]["status"], "none");
    }
}
